//! Holdings domain module.
//!
//! Defines the tracked position model, the storage trait implemented by the
//! persistence layer, and portfolio valuation over quote history.

mod model;
mod store;
mod valuation;

pub use model::*;
pub use store::*;
pub use valuation::*;
