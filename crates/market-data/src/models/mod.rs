//! Market data models
//!
//! This module contains the data types produced by quote fetching:
//! - `quote` - Daily closing-price observations (QuotePoint)

mod quote;

pub use quote::QuotePoint;
