//! Fetch orchestration: one symbol in, one outcome out.
//!
//! The fetcher drives the shared [`KeyRotator`] through the provider call.
//! Errors that only condemn the current key rotate to the next one; errors
//! about the symbol or the payload return immediately. The loop is bounded
//! by the pool size, so a fetch makes at most one attempt per configured
//! key before giving up.

use std::sync::Arc;

use log::{debug, warn};

use crate::errors::{FetchError, FetchResult, RetryClass};
use crate::limiter::KeyRateLimiter;
use crate::models::QuotePoint;
use crate::provider::QuoteProvider;
use crate::rotation::KeyRotator;

pub struct QuoteFetcher {
    provider: Arc<dyn QuoteProvider>,
    rotator: Arc<KeyRotator>,
    limiter: KeyRateLimiter,
}

impl QuoteFetcher {
    pub fn new(provider: Arc<dyn QuoteProvider>, rotator: Arc<KeyRotator>) -> Self {
        Self::with_limiter(provider, rotator, KeyRateLimiter::default())
    }

    pub fn with_limiter(
        provider: Arc<dyn QuoteProvider>,
        rotator: Arc<KeyRotator>,
        limiter: KeyRateLimiter,
    ) -> Self {
        Self {
            provider,
            rotator,
            limiter,
        }
    }

    pub fn rotator(&self) -> &KeyRotator {
        &self.rotator
    }

    /// Fetches the daily close series for one symbol, rotating API keys on
    /// throttling and transport failures.
    ///
    /// Every key gets at most one attempt per call; skipping a blank
    /// placeholder slot costs an attempt too, so the loop always terminates.
    /// The returned series is ordered most recent trading day first.
    pub async fn fetch_daily(&self, symbol: &str) -> FetchResult<Vec<QuotePoint>> {
        if self.rotator.is_empty() {
            warn!("No API keys configured; cannot fetch {}", symbol);
            return Err(FetchError::AllKeysExhausted);
        }

        let mut attempts = 0;
        let mut last_error: Option<FetchError> = None;

        while !self.rotator.exhausted(attempts) {
            let Some(credential) = self.rotator.current() else {
                break;
            };

            if !credential.is_usable() {
                debug!("Skipping blank API key slot for {}", symbol);
                self.rotator.advance();
                attempts += 1;
                continue;
            }

            self.limiter.acquire(credential.as_str()).await;

            match self.provider.fetch_daily(symbol, credential.as_str()).await {
                Ok(points) => return Ok(points),
                Err(error) => match error.retry_class() {
                    RetryClass::Never => return Err(error),
                    RetryClass::NextKey => {
                        debug!(
                            "Fetch attempt {} for {} failed, rotating key: {}",
                            attempts + 1,
                            symbol,
                            error
                        );
                        self.rotator.advance();
                        attempts += 1;
                        last_error = Some(error);
                    }
                },
            }
        }

        match last_error {
            Some(error) => warn!(
                "All {} API keys exhausted for {}; last error: {}",
                self.rotator.len(),
                symbol,
                error
            ),
            None => warn!(
                "All {} API key slots for {} were blank",
                self.rotator.len(),
                symbol
            ),
        }
        Err(FetchError::AllKeysExhausted)
    }
}
