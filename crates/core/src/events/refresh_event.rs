//! Refresh event types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Events emitted by the refresh service as a cycle progresses.
///
/// These events are facts about what the cycle did. Embedders translate them
/// into platform-specific actions (UI badges, notifications, metrics).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RefreshEvent {
    /// A symbol's latest close changed and was written to the store.
    PriceUpdated {
        symbol: String,
        date: NaiveDate,
        close: Decimal,
    },

    /// A symbol was left at its previous state for this cycle.
    SymbolSkipped { symbol: String, reason: String },

    /// A full cycle finished; counts cover every tracked symbol.
    CycleCompleted {
        updated: usize,
        unchanged: usize,
        skipped: usize,
        quote_rows_written: usize,
    },
}

impl RefreshEvent {
    /// Creates a PriceUpdated event.
    pub fn price_updated(symbol: impl Into<String>, date: NaiveDate, close: Decimal) -> Self {
        Self::PriceUpdated {
            symbol: symbol.into(),
            date,
            close,
        }
    }

    /// Creates a SymbolSkipped event.
    pub fn symbol_skipped(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SymbolSkipped {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    /// Creates a CycleCompleted event.
    pub fn cycle_completed(
        updated: usize,
        unchanged: usize,
        skipped: usize,
        quote_rows_written: usize,
    ) -> Self {
        Self::CycleCompleted {
            updated,
            unchanged,
            skipped,
            quote_rows_written,
        }
    }
}
