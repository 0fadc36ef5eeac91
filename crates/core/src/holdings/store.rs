//! Holding storage trait.
//!
//! Abstracts the persistence layer so different storage backends can be used
//! interchangeably. The refresh service and any embedding application talk
//! to holdings only through this trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::model::{Holding, Symbol};
use crate::errors::Result;

/// Storage interface for tracked holdings.
///
/// # Design Notes
///
/// - Async methods are used for mutations, which go through the single
///   writer
/// - Sync methods are used for simple reads that are typically fast
#[async_trait]
pub trait HoldingStore: Send + Sync {
    /// Adds a new holding.
    ///
    /// # Returns
    ///
    /// The stored holding, or a unique violation error when the symbol is
    /// already tracked.
    async fn add_holding(&self, holding: &Holding) -> Result<Holding>;

    /// Removes a holding and all price history recorded for its symbol.
    async fn remove_holding(&self, symbol: &Symbol) -> Result<()>;

    /// Records the most recent observed price for a tracked symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The tracked symbol
    /// * `price` - Latest close reported by the provider
    /// * `as_of` - When the price was recorded
    async fn record_current_price(
        &self,
        symbol: &Symbol,
        price: Decimal,
        as_of: DateTime<Utc>,
    ) -> Result<()>;

    /// Lists every tracked holding.
    fn list_holdings(&self) -> Result<Vec<Holding>>;

    /// The symbols a refresh cycle should fetch.
    ///
    /// Default implementation projects `list_holdings`.
    fn tracked_symbols(&self) -> Result<Vec<Symbol>> {
        Ok(self
            .list_holdings()?
            .into_iter()
            .map(|holding| holding.symbol)
            .collect())
    }
}
