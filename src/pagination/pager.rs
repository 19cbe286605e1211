//! Page-number pagination strategies and the pager that drives them
//!
//! The pager is an explicit state machine:
//!
//! ```text
//! Idle --fetch--> Continue(page=n+1) --fetch--> ... --> Done
//!   \                                                  ^
//!    `---------------- error / stop -------------------'
//! ```
//!
//! The first fetch never carries a page parameter. Every later fetch asks
//! for the page after the one the previous response reported.

use super::types::{NextPage, Page, PageState, PaginationPolicy, Paginator};
use crate::auth::ApiKeyCredential;
use crate::catalog::{OperationDescriptor, PaginationRule};
use crate::decode::extract_records;
use crate::error::Result;
use crate::http::Transport;
use crate::params::ParameterBag;
use crate::request::RequestBuilder;
use crate::types::{JsonValue, QueryMap};
use futures::stream::{self, Stream};
use tracing::{debug, warn};

// ============================================================================
// Strategies
// ============================================================================

/// No pagination - single request
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPaginator;

impl Paginator for NoPaginator {
    fn process_response(&self, _body: &JsonValue) -> NextPage {
        NextPage::Done
    }
}

/// Page-number pagination driven by the page the response reports
#[derive(Debug, Clone)]
pub struct PageNumberPaginator {
    rule: PaginationRule,
    policy: PaginationPolicy,
}

impl PageNumberPaginator {
    /// Create a new page number paginator
    pub fn new(rule: PaginationRule, policy: PaginationPolicy) -> Self {
        Self { rule, policy }
    }
}

impl Paginator for PageNumberPaginator {
    fn process_response(&self, body: &JsonValue) -> NextPage {
        let state = PageState::from_body(body, &self.rule);

        if !state.has_next_page {
            return NextPage::Done;
        }

        let Some(current_page) = state.current_page else {
            warn!(
                "Response has {} but no usable {}; stopping pagination",
                self.rule.next_page_url_path, self.rule.current_page_path
            );
            return NextPage::Done;
        };

        if self.policy.allows_after(current_page) {
            let Some(next_page) = current_page.checked_add(1) else {
                warn!(
                    "{} = {current_page} has no successor; stopping pagination",
                    self.rule.current_page_path
                );
                return NextPage::Done;
            };
            NextPage::with_param(&self.rule.page_param, next_page.to_string())
        } else {
            debug!(
                "Page limit {} reached at page {current_page}",
                self.policy.limit
            );
            NextPage::Done
        }
    }
}

/// Pick the strategy for a descriptor and policy
pub fn paginator_for(
    descriptor: &OperationDescriptor,
    policy: PaginationPolicy,
) -> Box<dyn Paginator> {
    match &descriptor.pagination {
        Some(rule) if policy.paginates() => {
            Box::new(PageNumberPaginator::new(rule.clone(), policy))
        }
        _ => Box::new(NoPaginator),
    }
}

// ============================================================================
// Pager
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum PagerState {
    Idle,
    Continue(QueryMap),
    Done,
}

/// Lazily fetches the pages of one operation
///
/// Pages are produced one at a time by [`Pager::next_page`]. A transport
/// error is yielded once; after it, and after the last page, the pager
/// yields nothing.
pub struct Pager<T> {
    builder: RequestBuilder,
    descriptor: OperationDescriptor,
    params: ParameterBag,
    credential: ApiKeyCredential,
    paginator: Box<dyn Paginator>,
    transport: T,
    state: PagerState,
    fetched: usize,
}

impl<T: Transport> Pager<T> {
    /// Create a pager for an operation
    pub fn new(
        builder: RequestBuilder,
        descriptor: OperationDescriptor,
        params: ParameterBag,
        credential: ApiKeyCredential,
        policy: PaginationPolicy,
        transport: T,
    ) -> Self {
        let paginator = paginator_for(&descriptor, policy);
        Self {
            builder,
            descriptor,
            params,
            credential,
            paginator,
            transport,
            state: PagerState::Idle,
            fetched: 0,
        }
    }

    /// Number of pages fetched so far
    pub fn pages_fetched(&self) -> usize {
        self.fetched
    }

    /// Whether the pager has nothing left to yield
    pub fn is_done(&self) -> bool {
        self.state == PagerState::Done
    }

    /// Fetch the next page
    ///
    /// Returns `None` once pagination has finished.
    pub async fn next_page(&mut self) -> Option<Result<Page>> {
        let query = match std::mem::replace(&mut self.state, PagerState::Done) {
            PagerState::Idle => self.paginator.initial_params(),
            PagerState::Continue(query) => query,
            PagerState::Done => return None,
        };

        let request = self
            .builder
            .build(&self.descriptor, &self.params, &self.credential, Some(&query));

        let response = match self.transport.send(&request).await {
            Ok(response) => response,
            Err(e) => {
                debug!(
                    "{} failed after {} page(s): {e}",
                    self.descriptor.key(),
                    self.fetched
                );
                return Some(Err(e));
            }
        };

        self.fetched += 1;
        let records = extract_records(&response.body, self.descriptor.records_path.as_deref());
        debug!(
            "{} page {}: {} records",
            self.descriptor.key(),
            self.fetched,
            records.len()
        );

        if let NextPage::Continue { query_params } = self.paginator.process_response(&response.body)
        {
            self.state = PagerState::Continue(query_params);
        }

        Some(Ok(Page {
            index: self.fetched,
            query,
            body: response.body,
            records,
        }))
    }

    /// Turn the pager into a stream of pages
    pub fn into_stream(self) -> impl Stream<Item = Result<Page>> {
        stream::unfold(self, |mut pager| async move {
            pager.next_page().await.map(|page| (page, pager))
        })
    }

    /// Fetch every remaining page
    ///
    /// Fails on the first error; pages fetched before it are discarded.
    pub async fn collect_pages(mut self) -> Result<Vec<Page>> {
        let mut pages = Vec::new();
        while let Some(page) = self.next_page().await {
            pages.push(page?);
        }
        Ok(pages)
    }

    /// Fetch every remaining page and concatenate their records
    pub async fn collect_records(self) -> Result<Vec<JsonValue>> {
        let pages = self.collect_pages().await?;
        Ok(pages.into_iter().flat_map(|page| page.records).collect())
    }
}

impl<T> std::fmt::Debug for Pager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pager")
            .field("operation", &self.descriptor.key())
            .field("state", &self.state)
            .field("fetched", &self.fetched)
            .finish_non_exhaustive()
    }
}
