//! Token bucket throttling for outbound provider calls.
//!
//! Provider quotas are enforced per API key, so each credential gets its own
//! bucket. Waiting happens outside the bucket lock; callers in the same
//! process share the buckets through the map mutex.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use log::warn;
use tokio::time::Instant;

/// Alpha Vantage free-tier allowance.
const DEFAULT_REQUESTS_PER_MINUTE: f64 = 5.0;

const SECONDS_PER_MINUTE: f64 = 60.0;

struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

/// Throttle settings for one credential's bucket.
#[derive(Clone, Copy, Debug)]
pub struct RateLimiterConfig {
    /// Sustained request rate per key.
    pub requests_per_minute: f64,
    /// Requests allowed to go out back to back before throttling starts.
    pub burst: f64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            burst: DEFAULT_REQUESTS_PER_MINUTE,
        }
    }
}

/// Per-credential token bucket rate limiter.
pub struct KeyRateLimiter {
    buckets: Mutex<HashMap<String, TokenBucket>>,
    rate_per_second: f64,
    capacity: f64,
}

impl KeyRateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            rate_per_second: config.requests_per_minute / SECONDS_PER_MINUTE,
            capacity: config.burst.max(1.0),
        }
    }

    /// A limiter that never waits. Used in tests and for paid plans with
    /// effectively unlimited quotas.
    pub fn unthrottled() -> Self {
        Self::new(RateLimiterConfig {
            requests_per_minute: f64::MAX,
            burst: f64::MAX,
        })
    }

    /// Takes one token from the key's bucket, sleeping until one is
    /// available.
    pub async fn acquire(&self, api_key: &str) {
        loop {
            let wait = {
                let mut buckets = self.buckets.lock().unwrap_or_else(|poisoned| {
                    warn!("Rate limiter mutex poisoned; recovering");
                    poisoned.into_inner()
                });

                let bucket = buckets.entry(api_key.to_string()).or_insert(TokenBucket {
                    tokens: self.capacity,
                    last_update: Instant::now(),
                });

                let now = Instant::now();
                let elapsed = now.duration_since(bucket.last_update).as_secs_f64();
                bucket.tokens = (bucket.tokens + elapsed * self.rate_per_second).min(self.capacity);
                bucket.last_update = now;

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    None
                } else {
                    // A degenerate rate (zero, negative, infinite) produces a
                    // non-finite wait; fall back to a re-check interval
                    // instead of panicking inside Duration.
                    let wait_secs = (1.0 - bucket.tokens) / self.rate_per_second;
                    Some(
                        Duration::try_from_secs_f64(wait_secs)
                            .unwrap_or(Duration::from_secs(SECONDS_PER_MINUTE as u64)),
                    )
                }
            };

            match wait {
                None => return,
                Some(delay) => tokio::time::sleep(delay).await,
            }
        }
    }
}

impl Default for KeyRateLimiter {
    fn default() -> Self {
        Self::new(RateLimiterConfig::default())
    }
}
