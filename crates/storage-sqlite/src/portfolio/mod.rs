//! SQLite persistence for holdings and daily close history.

pub mod model;
pub mod repository;

pub use model::{HoldingDB, PricePointDB};
pub use repository::SqlitePortfolioStore;
