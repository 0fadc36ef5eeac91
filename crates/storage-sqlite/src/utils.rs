//! Utility functions for SQLite storage operations.

/// Maximum number of parameters for SQLite IN (...) queries.
///
/// SQLite has a compile-time limit on the number of parameters in a SQL statement,
/// typically around 999 (SQLITE_MAX_VARIABLE_NUMBER). To stay safely under this limit
/// and leave room for other parameters in the query, we use 500 as our chunk size.
///
/// Any query that uses `IN (...)` with a potentially large list of symbols should use
/// `chunk_for_sqlite` to split the list into manageable chunks.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Chunk a slice into smaller slices for batch SQLite queries.
///
/// # Example
///
/// ```ignore
/// let symbols: Vec<Symbol> = tracked_symbols(); // Could be > 999 items
///
/// let mut all_rows = Vec::new();
/// for chunk in chunk_for_sqlite(&symbols) {
///     let rows = load_history_for(chunk)?;
///     all_rows.extend(rows);
/// }
/// ```
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}
