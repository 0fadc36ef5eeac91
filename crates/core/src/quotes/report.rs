//! Refresh cycle reporting types.

use std::fmt;

use foliotrack_market_data::FetchError;

use crate::holdings::Symbol;

/// Why a symbol was left at its previous state for a cycle.
#[derive(Debug)]
pub enum SkipReason {
    /// The fetch itself failed; carries the terminal fetch error.
    Fetch(FetchError),
    /// The fetch succeeded but storage rejected the write.
    StorageUnavailable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Fetch(error) => write!(f, "fetch failed: {}", error),
            SkipReason::StorageUnavailable(detail) => {
                write!(f, "storage unavailable: {}", detail)
            }
        }
    }
}

/// Terminal state of one symbol within a cycle.
#[derive(Debug)]
pub enum RefreshStatus {
    /// A new latest close was recorded and history was appended.
    Updated,
    /// The fetched series matched what the store already had.
    Unchanged,
    /// Nothing was written; prior state stands.
    Skipped(SkipReason),
}

/// Outcome for one symbol in one cycle.
#[derive(Debug)]
pub struct SymbolRefresh {
    pub symbol: Symbol,
    pub status: RefreshStatus,
    /// History rows written for this symbol (zero unless updated).
    pub rows_written: usize,
}

/// Aggregated outcome of one refresh cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    results: Vec<SymbolRefresh>,
}

impl CycleReport {
    pub fn add(&mut self, result: SymbolRefresh) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[SymbolRefresh] {
        &self.results
    }

    pub fn updated(&self) -> usize {
        self.count(|status| matches!(status, RefreshStatus::Updated))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|status| matches!(status, RefreshStatus::Unchanged))
    }

    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, RefreshStatus::Skipped(_)))
    }

    pub fn rows_written(&self) -> usize {
        self.results.iter().map(|result| result.rows_written).sum()
    }

    /// True when every symbol either updated or was already current.
    pub fn is_clean(&self) -> bool {
        self.skipped() == 0
    }

    /// One-line cycle summary for logs.
    pub fn summary(&self) -> String {
        format!(
            "{} updated, {} unchanged, {} skipped ({} history rows written)",
            self.updated(),
            self.unchanged(),
            self.skipped(),
            self.rows_written()
        )
    }

    fn count(&self, predicate: impl Fn(&RefreshStatus) -> bool) -> usize {
        self.results
            .iter()
            .filter(|result| predicate(&result.status))
            .count()
    }
}
