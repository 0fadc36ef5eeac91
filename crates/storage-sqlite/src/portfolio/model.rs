//! Database models for portfolio holdings and price history.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use foliotrack_core::errors::{Result, ValidationError};
use foliotrack_core::holdings::{Holding, Symbol};
use foliotrack_core::quotes::QuotePoint;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database model for tracked holdings
#[derive(
    Debug,
    Clone,
    Serialize,
    Deserialize,
    PartialEq,
    Queryable,
    Identifiable,
    Selectable,
    Insertable,
    AsChangeset,
)]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(primary_key(symbol))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct HoldingDB {
    pub symbol: String,
    pub shares: i64,
    pub cost_basis: String,
    pub last_price: Option<String>,
    pub last_price_at: Option<String>,
    pub created_at: String,
}

impl HoldingDB {
    pub fn from_domain(holding: &Holding, created_at: DateTime<Utc>) -> Self {
        Self {
            symbol: holding.symbol.as_str().to_string(),
            shares: i64::from(holding.shares),
            cost_basis: holding.cost_basis.to_string(),
            last_price: holding.last_price.map(|price| price.to_string()),
            last_price_at: holding.last_price_at.map(|at| at.to_rfc3339()),
            created_at: created_at.to_rfc3339(),
        }
    }

    /// Parse the stored row back into a domain holding.
    ///
    /// Rows are written from validated domain values, so a parse failure here
    /// means the database was edited out of band. Surfacing the error beats
    /// valuing the portfolio from a defaulted price.
    pub fn into_domain(self) -> Result<Holding> {
        let last_price = self
            .last_price
            .as_deref()
            .map(Decimal::from_str)
            .transpose()
            .map_err(ValidationError::from)?;
        let last_price_at = self
            .last_price_at
            .as_deref()
            .map(parse_rfc3339)
            .transpose()?;
        let shares = u32::try_from(self.shares).map_err(|_| {
            ValidationError::InvalidInput(format!(
                "stored share count out of range: {}",
                self.shares
            ))
        })?;

        Ok(Holding {
            symbol: Symbol::new(&self.symbol)?,
            shares,
            cost_basis: Decimal::from_str(&self.cost_basis).map_err(ValidationError::from)?,
            last_price,
            last_price_at,
        })
    }
}

/// Database model for daily close history
#[derive(
    Debug,
    Clone,
    Serialize,
    Deserialize,
    PartialEq,
    Queryable,
    Identifiable,
    Selectable,
    Insertable,
    AsChangeset,
)]
#[diesel(table_name = crate::schema::price_history)]
#[diesel(primary_key(symbol, date))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct PricePointDB {
    pub symbol: String,
    pub date: String,
    pub close: String,
}

impl From<&QuotePoint> for PricePointDB {
    fn from(point: &QuotePoint) -> Self {
        Self {
            symbol: point.symbol.clone(),
            date: point.date.format(DATE_FORMAT).to_string(),
            close: point.close.to_string(),
        }
    }
}

impl PricePointDB {
    pub fn into_domain(self) -> Result<QuotePoint> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(ValidationError::from)?;
        let close = Decimal::from_str(&self.close).map_err(ValidationError::from)?;
        Ok(QuotePoint::new(self.symbol, date, close))
    }
}

fn parse_rfc3339(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .map_err(ValidationError::from)?
        .with_timezone(&Utc))
}
