use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One daily closing-price observation for a symbol.
///
/// A point is immutable once fetched and logically unique per
/// (symbol, date): re-fetching the same trading day with a different
/// close replaces the stored value rather than duplicating it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotePoint {
    /// Upper-cased ticker the point belongs to.
    pub symbol: String,

    /// Trading date of the observation.
    pub date: NaiveDate,

    /// Closing price (non-negative).
    pub close: Decimal,
}

impl QuotePoint {
    pub fn new(symbol: impl Into<String>, date: NaiveDate, close: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            date,
            close,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_quote_point_new() {
        let point = QuotePoint::new("AAPL", day(2024, 3, 15), dec!(172.62));
        assert_eq!(point.symbol, "AAPL");
        assert_eq!(point.date, day(2024, 3, 15));
        assert_eq!(point.close, dec!(172.62));
    }

    #[test]
    fn test_quote_point_equality_is_per_symbol_and_date() {
        let a = QuotePoint::new("AAPL", day(2024, 3, 15), dec!(172.62));
        let b = QuotePoint::new("AAPL", day(2024, 3, 15), dec!(172.62));
        let c = QuotePoint::new("AAPL", day(2024, 3, 14), dec!(172.62));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
