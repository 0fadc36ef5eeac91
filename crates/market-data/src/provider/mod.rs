//! Quote provider implementations.
//!
//! The `traits` module defines the provider interface; `alpha_vantage`
//! implements it against the Alpha Vantage daily time-series API.

pub mod alpha_vantage;
pub mod traits;

pub use alpha_vantage::{AlphaVantageProvider, ProviderConfig, RateLimitMatcher};
pub use traits::QuoteProvider;
