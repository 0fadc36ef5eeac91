use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::model::{HoldingDB, PricePointDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::holdings::dsl as holdings_dsl;
use crate::schema::price_history::dsl as price_history_dsl;
use crate::utils::chunk_for_sqlite;
use foliotrack_core::errors::DatabaseError;
use foliotrack_core::holdings::{Holding, HoldingStore, Symbol};
use foliotrack_core::quotes::{PriceStore, QuotePoint};
use foliotrack_core::Result;

/// SQLite-backed store for holdings and their daily close history.
///
/// Reads go straight to the pool; mutations are funneled through the single
/// writer actor so concurrent refresh cycles never contend on SQLite locks.
pub struct SqlitePortfolioStore {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SqlitePortfolioStore {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

// =============================================================================
// HoldingStore Implementation
// =============================================================================

#[async_trait]
impl HoldingStore for SqlitePortfolioStore {
    // =========================================================================
    // Mutations
    // =========================================================================

    async fn add_holding(&self, holding: &Holding) -> Result<Holding> {
        let stored = holding.clone();
        let db_row = HoldingDB::from_domain(holding, Utc::now());

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(holdings_dsl::holdings)
                    .values(&db_row)
                    .execute(conn)
                    .map_err(StorageError::QueryFailed)?;
                Ok(())
            })
            .await?;

        Ok(stored)
    }

    async fn remove_holding(&self, symbol: &Symbol) -> Result<()> {
        let symbol_str = symbol.as_str().to_string();

        // History rows ride along in the same transaction so a removed
        // holding never leaves orphaned closes behind.
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::delete(
                    price_history_dsl::price_history
                        .filter(price_history_dsl::symbol.eq(&symbol_str)),
                )
                .execute(conn)
                .map_err(StorageError::QueryFailed)?;

                let deleted = diesel::delete(
                    holdings_dsl::holdings.filter(holdings_dsl::symbol.eq(&symbol_str)),
                )
                .execute(conn)
                .map_err(StorageError::QueryFailed)?;

                if deleted == 0 {
                    return Err(DatabaseError::NotFound(format!(
                        "Holding not found: {}",
                        symbol_str
                    ))
                    .into());
                }
                Ok(())
            })
            .await
    }

    async fn record_current_price(
        &self,
        symbol: &Symbol,
        price: Decimal,
        as_of: DateTime<Utc>,
    ) -> Result<()> {
        let symbol_str = symbol.as_str().to_string();
        let price_str = price.to_string();
        let as_of_str = as_of.to_rfc3339();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let updated = diesel::update(
                    holdings_dsl::holdings.filter(holdings_dsl::symbol.eq(&symbol_str)),
                )
                .set((
                    holdings_dsl::last_price.eq(Some(price_str)),
                    holdings_dsl::last_price_at.eq(Some(as_of_str)),
                ))
                .execute(conn)
                .map_err(StorageError::QueryFailed)?;

                if updated == 0 {
                    return Err(DatabaseError::NotFound(format!(
                        "Holding not found: {}",
                        symbol_str
                    ))
                    .into());
                }
                Ok(())
            })
            .await
    }

    // =========================================================================
    // Queries
    // =========================================================================

    fn list_holdings(&self) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = holdings_dsl::holdings
            .order(holdings_dsl::symbol.asc())
            .load::<HoldingDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(HoldingDB::into_domain).collect()
    }
}

// =============================================================================
// PriceStore Implementation
// =============================================================================

#[async_trait]
impl PriceStore for SqlitePortfolioStore {
    // =========================================================================
    // Mutations
    // =========================================================================

    async fn append_history(&self, points: &[QuotePoint]) -> Result<usize> {
        if points.is_empty() {
            return Ok(0);
        }

        let db_rows: Vec<PricePointDB> = points.iter().map(PricePointDB::from).collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut total_written = 0;
                for chunk in db_rows.chunks(1_000) {
                    total_written += diesel::replace_into(price_history_dsl::price_history)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::QueryFailed)?;
                }
                Ok(total_written)
            })
            .await
    }

    // =========================================================================
    // Queries
    // =========================================================================

    fn recent_history(&self, symbol: &Symbol, limit: usize) -> Result<Vec<QuotePoint>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = price_history_dsl::price_history
            .filter(price_history_dsl::symbol.eq(symbol.as_str()))
            .order(price_history_dsl::date.desc())
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .load::<PricePointDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(PricePointDB::into_domain).collect()
    }

    fn full_history(&self, symbol: &Symbol) -> Result<Vec<QuotePoint>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = price_history_dsl::price_history
            .filter(price_history_dsl::symbol.eq(symbol.as_str()))
            .order(price_history_dsl::date.desc())
            .load::<PricePointDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(PricePointDB::into_domain).collect()
    }

    fn history_for_symbols(&self, symbols: &[Symbol]) -> Result<Vec<QuotePoint>> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = get_connection(&self.pool)?;

        let mut all_points = Vec::new();
        for chunk in chunk_for_sqlite(symbols) {
            let names: Vec<&str> = chunk.iter().map(Symbol::as_str).collect();
            let rows = price_history_dsl::price_history
                .filter(price_history_dsl::symbol.eq_any(names))
                .load::<PricePointDB>(&mut conn)
                .into_core()?;
            for row in rows {
                all_points.push(row.into_domain()?);
            }
        }

        Ok(all_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use foliotrack_core::errors::Error;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, SqlitePortfolioStore) {
        let dir = TempDir::new().unwrap();
        let db_path = crate::db::init(dir.path().to_string_lossy().as_ref()).unwrap();
        let pool = crate::db::create_pool(&db_path).unwrap();
        crate::db::run_migrations(&pool).unwrap();
        let writer = crate::db::write_actor::spawn_writer((*pool).clone());
        (dir, SqlitePortfolioStore::new(pool, writer))
    }

    fn holding(symbol: &str, shares: u32) -> Holding {
        Holding::new(Symbol::new(symbol).unwrap(), shares, dec!(1000)).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn point(symbol: &str, date: NaiveDate, close: Decimal) -> QuotePoint {
        QuotePoint::new(symbol, date, close)
    }

    #[tokio::test]
    async fn test_add_and_list_holdings() {
        let (_dir, store) = open_store();

        store.add_holding(&holding("MSFT", 3)).await.unwrap();
        store.add_holding(&holding("AAPL", 10)).await.unwrap();

        let listed = store.list_holdings().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].symbol.as_str(), "AAPL");
        assert_eq!(listed[1].symbol.as_str(), "MSFT");
        assert_eq!(listed[0].shares, 10);
        assert_eq!(listed[0].cost_basis, dec!(1000));
        assert_eq!(listed[0].last_price, None);
    }

    #[tokio::test]
    async fn test_add_duplicate_symbol_is_a_unique_violation() {
        let (_dir, store) = open_store();

        store.add_holding(&holding("AAPL", 10)).await.unwrap();
        let err = store.add_holding(&holding("AAPL", 5)).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Database(DatabaseError::UniqueViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_record_current_price_updates_holding() {
        let (_dir, store) = open_store();
        let symbol = Symbol::new("AAPL").unwrap();

        store.add_holding(&holding("AAPL", 10)).await.unwrap();
        store
            .record_current_price(&symbol, dec!(185.64), Utc::now())
            .await
            .unwrap();

        let listed = store.list_holdings().unwrap();
        assert_eq!(listed[0].last_price, Some(dec!(185.64)));
        assert!(listed[0].last_price_at.is_some());
    }

    #[tokio::test]
    async fn test_record_price_for_unknown_symbol_is_not_found() {
        let (_dir, store) = open_store();
        let symbol = Symbol::new("AAPL").unwrap();

        let err = store
            .record_current_price(&symbol, dec!(185.64), Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Database(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_holding_cascades_history() {
        let (_dir, store) = open_store();
        let symbol = Symbol::new("AAPL").unwrap();

        store.add_holding(&holding("AAPL", 10)).await.unwrap();
        store
            .append_history(&[
                point("AAPL", day(2024, 6, 3), dec!(185.64)),
                point("AAPL", day(2024, 6, 4), dec!(187.12)),
            ])
            .await
            .unwrap();

        store.remove_holding(&symbol).await.unwrap();

        assert!(store.list_holdings().unwrap().is_empty());
        assert!(store.full_history(&symbol).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_unknown_holding_is_not_found() {
        let (_dir, store) = open_store();
        let symbol = Symbol::new("AAPL").unwrap();

        let err = store.remove_holding(&symbol).await.unwrap_err();
        assert!(matches!(err, Error::Database(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_append_history_is_idempotent() {
        let (_dir, store) = open_store();
        let symbol = Symbol::new("AAPL").unwrap();
        let series = vec![
            point("AAPL", day(2024, 6, 3), dec!(185.64)),
            point("AAPL", day(2024, 6, 4), dec!(187.12)),
            point("AAPL", day(2024, 6, 5), dec!(186.02)),
        ];

        let first = store.append_history(&series).await.unwrap();
        let second = store.append_history(&series).await.unwrap();

        assert_eq!(first, 3);
        assert_eq!(second, 3);
        assert_eq!(store.full_history(&symbol).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_append_history_refreshes_close_in_place() {
        let (_dir, store) = open_store();
        let symbol = Symbol::new("AAPL").unwrap();

        store
            .append_history(&[point("AAPL", day(2024, 6, 3), dec!(185.64))])
            .await
            .unwrap();
        store
            .append_history(&[point("AAPL", day(2024, 6, 3), dec!(186.50))])
            .await
            .unwrap();

        let history = store.full_history(&symbol).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].close, dec!(186.50));
    }

    #[tokio::test]
    async fn test_empty_append_writes_nothing() {
        let (_dir, store) = open_store();
        assert_eq!(store.append_history(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_recent_history_is_newest_first_and_limited() {
        let (_dir, store) = open_store();
        let symbol = Symbol::new("AAPL").unwrap();

        store
            .append_history(&[
                point("AAPL", day(2024, 6, 3), dec!(185.64)),
                point("AAPL", day(2024, 6, 5), dec!(186.02)),
                point("AAPL", day(2024, 6, 4), dec!(187.12)),
            ])
            .await
            .unwrap();

        let recent = store.recent_history(&symbol, 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].date, day(2024, 6, 5));
        assert_eq!(recent[1].date, day(2024, 6, 4));
    }

    #[tokio::test]
    async fn test_history_for_symbols_spans_symbols() {
        let (_dir, store) = open_store();

        store
            .append_history(&[
                point("AAPL", day(2024, 6, 3), dec!(185.64)),
                point("MSFT", day(2024, 6, 3), dec!(415.20)),
                point("GOOG", day(2024, 6, 3), dec!(174.42)),
            ])
            .await
            .unwrap();

        let symbols = vec![Symbol::new("AAPL").unwrap(), Symbol::new("MSFT").unwrap()];
        let points = store.history_for_symbols(&symbols).unwrap();

        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.symbol != "GOOG"));
    }

    #[tokio::test]
    async fn test_tracked_symbols_projects_holdings() {
        let (_dir, store) = open_store();

        store.add_holding(&holding("MSFT", 3)).await.unwrap();
        store.add_holding(&holding("AAPL", 10)).await.unwrap();

        let symbols = store.tracked_symbols().unwrap();
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].as_str(), "AAPL");
        assert_eq!(symbols[1].as_str(), "MSFT");
    }
}
