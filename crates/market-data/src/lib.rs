//! Foliotrack Market Data Crate
//!
//! This crate fetches daily close prices from a quote provider and shields
//! the rest of the application from the provider's failure modes.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Daily close series from the Alpha Vantage TIME_SERIES_DAILY endpoint
//! - Rotation over a pool of API keys, shared across fetches
//! - Per-key token bucket rate limiting
//! - Typed fetch outcomes; transport and payload failures never panic past
//!   the crate boundary
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |   QuoteFetcher   |  (bounded attempt loop, one per symbol)
//! +------------------+
//!     |           |
//!     v           v
//! +----------+ +----------------+
//! | KeyRotator| | KeyRateLimiter |  (shared cursor / per-key buckets)
//! +----------+ +----------------+
//!     |
//!     v
//! +------------------+
//! |  QuoteProvider   |  (Alpha Vantage)
//! +------------------+
//!     |
//!     v
//! +------------------+
//! |   QuotePoint     |  (date + close)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`QuotePoint`] - One trading day's close for a symbol
//! - [`FetchError`] - Typed fetch failure with a retry classification
//! - [`KeyRotator`] - Shared rotating cursor over the API key pool
//! - [`QuoteFetcher`] - Fetch orchestration over provider, rotator and limiter

pub mod errors;
pub mod fetcher;
pub mod limiter;
pub mod models;
pub mod provider;
pub mod rotation;

pub use errors::{FetchError, FetchResult, RetryClass};
pub use fetcher::QuoteFetcher;
pub use limiter::{KeyRateLimiter, RateLimiterConfig};
pub use models::QuotePoint;
pub use provider::{AlphaVantageProvider, ProviderConfig, QuoteProvider, RateLimitMatcher};
pub use rotation::{ApiCredential, KeyRotator};
