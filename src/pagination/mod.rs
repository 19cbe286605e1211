//! Pagination module
//!
//! Page-number pagination where the response reports its own page number
//! and whether a next page exists.
//!
//! # Overview
//!
//! A [`Paginator`] turns one response into a [`NextPage`] decision; the
//! [`Pager`] drives requests through a transport until the decision is
//! `Done`. Operations without a pagination rule, or policies asking for a
//! single page, run exactly one fetch.

mod pager;
mod types;

pub use pager::{paginator_for, NoPaginator, PageNumberPaginator, Pager};
pub use types::{NextPage, Page, PageState, PaginationPolicy, Paginator};
