//! SQLite storage implementation for Foliotrack.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the storage traits defined in `foliotrack-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The portfolio repository (holdings and daily close history)
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The other crates (`core`, `market-data`) are database-agnostic and work with traits.
//!
//! ```text
//! core (domain)      market-data (provider)
//!       │                      │
//!       └──────────┬───────────┘
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod portfolio;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, DbConnection, DbPool,
    WriteHandle,
};
pub use db::write_actor::spawn_writer;

// Re-export the portfolio repository
pub use portfolio::SqlitePortfolioStore;

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from foliotrack-core for convenience
pub use foliotrack_core::errors::{DatabaseError, Error, Result};
