//! Shared call budget for capability invocations.
//!
//! Extraction and summarization calls draw from one budget so that
//! concurrent workers collectively never exceed the configured
//! calls-per-minute ceiling. Burst is pinned to 1, which spaces permits
//! evenly: with a ceiling of `n`, consecutive calls are at least `60/n`
//! seconds apart, so no sliding one-minute window ever contains more than
//! `n` calls.

use std::num::NonZeroU32;

use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Token bucket shared by the extractor and summarizer.
pub struct CallBudget {
    limiter: DirectRateLimiter,
}

impl CallBudget {
    /// Budget of `max_calls_per_minute` capability calls, evenly spaced.
    pub fn per_minute(max_calls_per_minute: NonZeroU32) -> Self {
        let quota = Quota::per_minute(max_calls_per_minute).allow_burst(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::direct(quota),
        }
    }

    /// Wait until a call is allowed under the ceiling.
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }
}
