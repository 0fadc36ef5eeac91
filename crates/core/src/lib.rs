//! Foliotrack Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for Foliotrack.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod events;
pub mod holdings;
pub mod quotes;

// Re-export common types from holdings and quotes modules
pub use holdings::*;
pub use quotes::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
