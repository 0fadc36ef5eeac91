//! Quote provider trait definition.
//!
//! This module defines the `QuoteProvider` trait that a daily time-series
//! source must implement.

use async_trait::async_trait;

use crate::errors::FetchResult;
use crate::models::QuotePoint;

/// Trait for daily quote providers.
///
/// Implement this trait to add support for a new quote source. One call is
/// one wire attempt with one credential; credential rotation happens above
/// this trait, in the fetch loop.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use foliotrack_market_data::provider::QuoteProvider;
///
/// struct MyProvider {
///     base_url: String,
/// }
///
/// #[async_trait]
/// impl QuoteProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     // ... implement fetch_daily
/// }
/// ```
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "ALPHA_VANTAGE".
    /// Used for logging and rate limiter bucket naming.
    fn id(&self) -> &'static str;

    /// Fetch the daily closing-price series for a symbol using one API key.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Upper-cased ticker to fetch
    /// * `api_key` - The credential to authenticate this single attempt with
    ///
    /// # Returns
    ///
    /// The non-empty series ordered most-recent-first, or a typed
    /// `FetchError`. Implementations must not panic past this boundary;
    /// every exceptional condition maps to an error variant.
    async fn fetch_daily(&self, symbol: &str, api_key: &str) -> FetchResult<Vec<QuotePoint>>;
}
