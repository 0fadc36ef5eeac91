//! Refresh service: one cycle of fetching and storing daily closes.
//!
//! A cycle snapshots the tracked holdings, fetches each symbol's daily
//! series with bounded concurrency, and lands results in the stores. Symbols
//! are independent; one failing fetch or write never aborts the cycle.

use std::sync::Arc;

use chrono::Utc;
use futures::{stream, StreamExt};
use log::{debug, info};
use tokio::sync::Mutex;

use foliotrack_market_data::{FetchError, QuoteFetcher};

use super::report::{CycleReport, RefreshStatus, SkipReason, SymbolRefresh};
use super::store::PriceStore;
use crate::constants::DEFAULT_MAX_CONCURRENT_FETCHES;
use crate::errors::Result;
use crate::events::{RefreshEvent, RefreshEventSink};
use crate::holdings::{Holding, HoldingStore};

pub struct RefreshService<H, P> {
    holdings: Arc<H>,
    prices: Arc<P>,
    fetcher: Arc<QuoteFetcher>,
    events: Arc<dyn RefreshEventSink>,
    max_concurrent: usize,
    // Serializes cycles so a manual run cannot overlap a scheduled one.
    run_guard: Mutex<()>,
}

impl<H, P> RefreshService<H, P>
where
    H: HoldingStore,
    P: PriceStore,
{
    pub fn new(
        holdings: Arc<H>,
        prices: Arc<P>,
        fetcher: Arc<QuoteFetcher>,
        events: Arc<dyn RefreshEventSink>,
    ) -> Self {
        Self {
            holdings,
            prices,
            fetcher,
            events,
            max_concurrent: DEFAULT_MAX_CONCURRENT_FETCHES,
            run_guard: Mutex::new(()),
        }
    }

    /// Caps provider fetches in flight during a cycle. The cap is fixed at
    /// construction and does not grow with portfolio size.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Runs one full refresh cycle over the holdings tracked right now.
    ///
    /// Holdings added mid-cycle are picked up next cycle. Returns the
    /// per-symbol report; an error here means holdings could not even be
    /// listed, not that any symbol failed.
    pub async fn run_once(&self) -> Result<CycleReport> {
        let _guard = self.run_guard.lock().await;

        let holdings = self.holdings.list_holdings()?;
        if holdings.is_empty() {
            debug!("No holdings tracked; refresh cycle is a no-op");
            return Ok(CycleReport::default());
        }

        info!("Starting refresh cycle for {} symbols", holdings.len());

        let results: Vec<SymbolRefresh> = stream::iter(holdings)
            .map(|holding| async move { self.refresh_symbol(&holding).await })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        let mut report = CycleReport::default();
        for result in results {
            report.add(result);
        }

        self.events.emit(RefreshEvent::cycle_completed(
            report.updated(),
            report.unchanged(),
            report.skipped(),
            report.rows_written(),
        ));
        info!("Refresh cycle finished: {}", report.summary());
        Ok(report)
    }

    async fn refresh_symbol(&self, holding: &Holding) -> SymbolRefresh {
        match self.try_refresh(holding).await {
            Ok(result) => result,
            Err(reason) => {
                self.events.emit(RefreshEvent::symbol_skipped(
                    holding.symbol.as_str(),
                    reason.to_string(),
                ));
                debug!("Skipping {} this cycle: {}", holding.symbol, reason);
                SymbolRefresh {
                    symbol: holding.symbol.clone(),
                    status: RefreshStatus::Skipped(reason),
                    rows_written: 0,
                }
            }
        }
    }

    async fn try_refresh(
        &self,
        holding: &Holding,
    ) -> std::result::Result<SymbolRefresh, SkipReason> {
        let symbol = &holding.symbol;

        let points = self
            .fetcher
            .fetch_daily(symbol.as_str())
            .await
            .map_err(SkipReason::Fetch)?;

        // The fetcher returns the series most recent trading day first.
        let Some(latest) = points.first().cloned() else {
            return Err(SkipReason::Fetch(FetchError::MalformedResponse {
                detail: "empty series".to_string(),
            }));
        };

        let stored_latest = self
            .prices
            .recent_history(symbol, 1)
            .map_err(|error| SkipReason::StorageUnavailable(error.to_string()))?
            .into_iter()
            .next();

        if stored_latest.as_ref() == Some(&latest) && holding.last_price == Some(latest.close) {
            debug!("{} unchanged at {} ({})", symbol, latest.close, latest.date);
            return Ok(SymbolRefresh {
                symbol: symbol.clone(),
                status: RefreshStatus::Unchanged,
                rows_written: 0,
            });
        }

        let rows_written = self
            .prices
            .append_history(&points)
            .await
            .map_err(|error| SkipReason::StorageUnavailable(error.to_string()))?;

        self.holdings
            .record_current_price(symbol, latest.close, Utc::now())
            .await
            .map_err(|error| SkipReason::StorageUnavailable(error.to_string()))?;

        self.events.emit(RefreshEvent::price_updated(
            symbol.as_str(),
            latest.date,
            latest.close,
        ));
        debug!(
            "{} updated to {} ({}); {} history rows written",
            symbol, latest.close, latest.date, rows_written
        );

        Ok(SymbolRefresh {
            symbol: symbol.clone(),
            status: RefreshStatus::Updated,
            rows_written,
        })
    }
}
