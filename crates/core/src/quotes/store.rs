//! Price history storage trait.
//!
//! This module defines the storage interface for daily close history. The
//! trait abstracts the persistence layer, allowing different storage
//! backends (e.g., SQLite, PostgreSQL) to be used interchangeably.

use async_trait::async_trait;

use crate::errors::Result;
use crate::holdings::Symbol;
use foliotrack_market_data::QuotePoint;

/// Storage interface for daily close history.
///
/// # Design Notes
///
/// - Async methods are used for mutations, which go through the single
///   writer
/// - Sync methods are used for simple queries that are typically fast
/// - One row exists per symbol and trading day; re-appending a day the
///   store already has refreshes it in place instead of duplicating it
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Appends daily closes to the history.
    ///
    /// Writing the same series again leaves the store with the same rows,
    /// so refresh cycles can always write their full fetched series.
    ///
    /// # Arguments
    ///
    /// * `points` - The closes to store; symbols and days may repeat across
    ///   calls
    ///
    /// # Returns
    ///
    /// The number of rows written (inserted or refreshed in place)
    async fn append_history(&self, points: &[QuotePoint]) -> Result<usize>;

    /// Gets the most recent closes for a symbol, newest first.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The tracked symbol
    /// * `limit` - Maximum number of days to return
    fn recent_history(&self, symbol: &Symbol, limit: usize) -> Result<Vec<QuotePoint>>;

    /// Gets the full stored history for a symbol, newest first.
    fn full_history(&self, symbol: &Symbol) -> Result<Vec<QuotePoint>>;

    /// Gets stored history for multiple symbols in one query.
    ///
    /// This is more efficient than calling `full_history` in a loop and is
    /// what portfolio valuation reads. Ordering is unspecified.
    fn history_for_symbols(&self, symbols: &[Symbol]) -> Result<Vec<QuotePoint>>;
}
