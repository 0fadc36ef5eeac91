//! Refresh events module.
//!
//! Provides event types describing refresh outcomes and the sink trait for
//! emitting them. Embedders implement the sink to surface refresh progress
//! in whatever frontend they drive.

mod refresh_event;
mod sink;

pub use refresh_event::*;
pub use sink::*;
