//! Client-side request pacing
//!
//! WebinarJam publishes no rate limit headers, so pacing is configured
//! up front (`rate_limit` in the connector config) and applied by the
//! transport before every send. It only delays; it never drops a request.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// `rate_limit` section of the connector config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    pub requests_per_second: u32,
    /// Requests allowed back to back before pacing starts
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

fn default_burst() -> u32 {
    1
}

impl RateLimiterConfig {
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }
}

/// Paces the sends of one transport
pub(crate) struct RateLimiter {
    limiter: Governor<NotKeyed, InMemoryState, DefaultClock>,
}

impl RateLimiter {
    pub(crate) fn new(config: &RateLimiterConfig) -> Self {
        // Zero is rejected by config validation; clamp for direct construction
        let rate = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);

        Self {
            limiter: Governor::direct(Quota::per_second(rate).allow_burst(burst)),
        }
    }

    /// Wait for the next send slot
    pub(crate) async fn until_ready(&self) {
        self.limiter.until_ready().await;
    }
}
