//! Quote refresh module.
//!
//! This module provides the types and services that keep stored prices
//! current:
//!
//! - [`store`] - Storage trait for daily close history
//! - [`report`] - Per-cycle outcome reporting
//! - [`refresh`] - The refresh service (one cycle end to end)
//! - [`scheduler`] - Periodic scheduling on top of the refresh service
//!
//! # Architecture
//!
//! ```text
//! RefreshScheduler → RefreshService → QuoteFetcher (market-data crate)
//!                         ↓
//!            HoldingStore + PriceStore (storage)
//! ```
//!
//! The refresh service owns cycle semantics (snapshot, bounded concurrency,
//! independent symbols); the scheduler only decides when cycles run. Both
//! talk to storage exclusively through the store traits, so tests drive
//! them with in-memory fakes.

pub mod refresh;
pub mod report;
pub mod scheduler;
pub mod store;


// Re-export commonly used types for convenience
pub use refresh::RefreshService;
pub use report::{CycleReport, RefreshStatus, SkipReason, SymbolRefresh};
pub use scheduler::{RefreshScheduler, SchedulerConfig};
pub use store::PriceStore;

// Re-export the quote model storage implementations persist
pub use foliotrack_market_data::QuotePoint;
