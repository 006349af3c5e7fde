//! Request rate limiting.
//!
//! Token bucket limiting of how fast probes are dispatched, so a large
//! target list does not flood a single address.

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// A shared requests-per-second limiter.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<GovLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl RateLimiter {
    /// Create a limiter allowing `rate` dispatches per second.
    ///
    /// Returns `None` for a rate of 0, which means unlimited.
    pub fn new(rate: u32) -> Option<Self> {
        let rate = NonZeroU32::new(rate)?;
        let limiter = GovLimiter::direct(Quota::per_second(rate));

        Some(Self {
            limiter: Arc::new(limiter),
        })
    }

    /// Wait until the next dispatch is allowed.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to take a token without waiting.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rate_is_unlimited() {
        assert!(RateLimiter::new(0).is_none());
    }

    #[test]
    fn test_rate_limiter_wait() {
        let limiter = RateLimiter::new(1000).unwrap();
        tokio_test::block_on(limiter.wait());
    }

    #[test]
    fn test_rate_limiter_clone_shares_state() {
        let limiter1 = RateLimiter::new(1).unwrap();
        let limiter2 = limiter1.clone();

        assert!(limiter1.try_acquire());
        // A quota of one per second is already spent
        assert!(!limiter2.try_acquire());
    }
}
