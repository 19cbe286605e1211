//! HTTP module
//!
//! Provides the transport seam and its reqwest implementation.
//!
//! # Features
//!
//! - **Transport trait**: request in, decoded response out
//! - **Status mapping**: 401/403 become authentication errors
//! - **Timeouts**: configurable per transport
//! - **Pacing**: optional client-side rate limit using governor

mod rate_limit;
mod transport;

pub use rate_limit::RateLimiterConfig;
pub use transport::{
    ApiResponse, HttpTransport, HttpTransportConfig, HttpTransportConfigBuilder, Transport,
};

#[cfg(test)]
mod tests;
