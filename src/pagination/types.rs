//! Pagination types and traits
//!
//! Defines the policy, per-response page state and the strategy trait used
//! by the pager.

use crate::catalog::PaginationRule;
use crate::decode::extract_path;
use crate::types::{JsonValue, QueryMap};
use serde::{Deserialize, Serialize};

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available with these query parameters
    Continue {
        /// Query parameters for the next fetch
        query_params: QueryMap,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation with a single parameter
    pub fn with_param(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut query_params = QueryMap::new();
        query_params.insert(key.into(), value.into());
        Self::Continue { query_params }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Caller-supplied pagination policy
///
/// `return_all` and `limit` steer the pager; they are never sent as body
/// fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationPolicy {
    /// Follow pages until the API reports no next page
    #[serde(default)]
    pub return_all: bool,
    /// Highest page number to fetch when `return_all` is off
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    1
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            return_all: false,
            limit: default_limit(),
        }
    }
}

impl PaginationPolicy {
    /// Policy that fetches every page
    pub fn all() -> Self {
        Self {
            return_all: true,
            ..Default::default()
        }
    }

    /// Policy with a page limit (clamped to at least 1)
    pub fn limited(limit: u32) -> Self {
        Self {
            return_all: false,
            limit: limit.max(1),
        }
    }

    /// Whether this policy asks for more than one page
    pub fn paginates(&self) -> bool {
        self.return_all || self.limit > 1
    }

    /// Whether a page numbered `current_page` may be followed by another
    pub fn allows_after(&self, current_page: u64) -> bool {
        self.return_all || current_page < u64::from(self.limit)
    }
}

/// Pagination fields read from a single response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageState {
    /// Page number reported by the API
    pub current_page: Option<u64>,
    /// Whether the API reported a truthy next page URL
    pub has_next_page: bool,
}

impl PageState {
    /// Read page state from a response body
    pub fn from_body(body: &JsonValue, rule: &PaginationRule) -> Self {
        let current_page = extract_path(body, &rule.current_page_path).and_then(page_number);
        let has_next_page = extract_path(body, &rule.next_page_url_path).is_some_and(is_truthy);

        Self {
            current_page,
            has_next_page,
        }
    }
}

/// A page number is either a non-negative integer or a numeric string
///
/// Whole floats are accepted only while they fit in a `u64`.
fn page_number(value: &JsonValue) -> Option<u64> {
    match value {
        JsonValue::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f < u64::MAX as f64)
                .map(|f| f as u64)
        }),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Truthiness of a JSON value: null, false, 0 and "" are falsy
pub(crate) fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

/// One fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based position in fetch order
    pub index: usize,
    /// Query parameters the page was fetched with
    pub query: QueryMap,
    /// Full response body
    pub body: JsonValue,
    /// Records extracted from the body
    pub records: Vec<JsonValue>,
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Query parameters for the first request
    fn initial_params(&self) -> QueryMap {
        QueryMap::new()
    }

    /// Process a response and determine if there's a next page
    fn process_response(&self, body: &JsonValue) -> NextPage;
}
