//! Portfolio valuation over quote history.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foliotrack_market_data::QuotePoint;

use super::model::Holding;
use crate::constants::DECIMAL_PRECISION;

/// Total portfolio value on one trading day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationPoint {
    pub date: NaiveDate,
    pub total: Decimal,
}

/// Builds the portfolio value series from holdings and their quote history.
///
/// Each day's total is the sum of `shares * close` over every holding with a
/// quote on that day. Days where a holding has no quote simply omit that
/// holding from the total; quotes for symbols that are not held are ignored.
/// The input history is assumed deduplicated per symbol and day, which the
/// price store guarantees. Output is ordered oldest day first.
pub fn portfolio_value_series(holdings: &[Holding], history: &[QuotePoint]) -> Vec<ValuationPoint> {
    let shares_by_symbol: HashMap<&str, Decimal> = holdings
        .iter()
        .map(|holding| (holding.symbol.as_str(), Decimal::from(holding.shares)))
        .collect();

    let mut totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for point in history {
        if let Some(shares) = shares_by_symbol.get(point.symbol.as_str()) {
            *totals.entry(point.date).or_default() += *shares * point.close;
        }
    }

    totals
        .into_iter()
        .map(|(date, total)| ValuationPoint {
            date,
            total: total.round_dp(DECIMAL_PRECISION),
        })
        .collect()
}
