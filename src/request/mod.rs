//! Request building module
//!
//! Turns a descriptor, a parameter bag and a credential into a concrete
//! HTTP request (method, URL, headers, JSON body, query string).

mod builder;

pub use builder::{ApiRequest, RequestBuilder};
