//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`FetchError`]: the typed outcome of a failed fetch attempt
//! - [`RetryClass`]: classification for determining rotation behavior
//!
//! A fetch attempt has exactly one outcome: either a parsed daily series or
//! one of the variants below. Nothing escapes the provider boundary as a
//! panic; every exceptional condition is folded into this enum.

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Errors that can occur while fetching a daily quote series.
///
/// Each variant is classified into a [`RetryClass`] via the
/// [`retry_class`](Self::retry_class) method, which tells the fetch loop
/// whether rotating to the next API key can help.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The provider did not recognize the symbol.
    /// Terminal for the symbol - a different key cannot fix a bad ticker.
    #[error("Symbol not recognized by the quote provider")]
    InvalidSymbol,

    /// The current API key hit the provider's usage quota.
    /// The fetch loop rotates to the next key.
    #[error("Provider rate limit reached for the current API key")]
    RateLimited,

    /// The HTTP exchange failed below the payload level, e.g. a non-success
    /// status code or an unbuildable request URL.
    #[error("Transport failure: {detail}")]
    Transport {
        /// Short description, e.g. "HTTP status 503".
        detail: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("Request to the quote provider timed out")]
    Timeout,

    /// The provider answered 200 but the body was not the expected
    /// time-series shape and carried no recognizable error field either.
    /// Terminal for the symbol this cycle - the payload, not the key, is wrong.
    #[error("Unrecognized provider payload: {detail}")]
    MalformedResponse {
        /// What was missing or unparseable.
        detail: String,
    },

    /// Every configured credential was tried once without success.
    /// Reported by the fetch loop, never by a single attempt.
    #[error("All API keys exhausted")]
    AllKeysExhausted,

    /// A network-level error occurred before any HTTP status was seen.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl FetchError {
    /// Returns the retry classification for this error.
    ///
    /// - [`RetryClass::Never`]: the call ends, the outcome is final
    /// - [`RetryClass::NextKey`]: advance the credential cursor and try again
    pub fn retry_class(&self) -> RetryClass {
        match self {
            // Properties of the symbol or payload - rotation cannot help
            Self::InvalidSymbol | Self::MalformedResponse { .. } => RetryClass::Never,

            // Key- or moment-specific - the next credential may succeed
            Self::RateLimited | Self::Transport { .. } | Self::Timeout | Self::Network(_) => {
                RetryClass::NextKey
            }

            // Already the end of the rotation loop
            Self::AllKeysExhausted => RetryClass::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_symbol_never_rotates() {
        let error = FetchError::InvalidSymbol;
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_malformed_response_never_rotates() {
        let error = FetchError::MalformedResponse {
            detail: "missing time series field".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_all_keys_exhausted_never_rotates() {
        let error = FetchError::AllKeysExhausted;
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_rate_limited_rotates() {
        let error = FetchError::RateLimited;
        assert_eq!(error.retry_class(), RetryClass::NextKey);
    }

    #[test]
    fn test_transport_rotates() {
        let error = FetchError::Transport {
            detail: "HTTP status 503".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::NextKey);
    }

    #[test]
    fn test_timeout_rotates() {
        let error = FetchError::Timeout;
        assert_eq!(error.retry_class(), RetryClass::NextKey);
    }

    #[test]
    fn test_error_display() {
        let error = FetchError::Transport {
            detail: "HTTP status 429".to_string(),
        };
        assert_eq!(format!("{}", error), "Transport failure: HTTP status 429");

        let error = FetchError::MalformedResponse {
            detail: "missing \"Time Series (Daily)\" field".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Unrecognized provider payload: missing \"Time Series (Daily)\" field"
        );

        let error = FetchError::AllKeysExhausted;
        assert_eq!(format!("{}", error), "All API keys exhausted");
    }
}
