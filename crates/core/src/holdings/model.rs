//! Holding domain models.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// A validated ticker symbol.
///
/// Construction normalizes to uppercase and rejects blank input, so any
/// `Symbol` in the system is usable as a provider query parameter and as a
/// storage key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(
                ValidationError::InvalidInput("symbol must not be blank".to_string()).into(),
            );
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidInput(format!(
                "symbol must not contain whitespace: '{}'",
                trimmed
            ))
            .into());
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A tracked position: how much of a symbol the portfolio holds and the most
/// recent price the refresh cycle recorded for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: Symbol,
    pub shares: u32,
    pub cost_basis: Decimal,
    /// Latest close recorded by a refresh cycle, if any has run yet.
    pub last_price: Option<Decimal>,
    /// When `last_price` was recorded.
    pub last_price_at: Option<DateTime<Utc>>,
}

impl Holding {
    /// Creates a new holding with no recorded price.
    pub fn new(symbol: Symbol, shares: u32, cost_basis: Decimal) -> Result<Self> {
        if shares == 0 {
            return Err(
                ValidationError::InvalidInput("shares must be positive".to_string()).into(),
            );
        }
        if cost_basis.is_sign_negative() {
            return Err(ValidationError::InvalidInput(format!(
                "cost basis must not be negative: {}",
                cost_basis
            ))
            .into());
        }
        Ok(Self {
            symbol,
            shares,
            cost_basis,
            last_price: None,
            last_price_at: None,
        })
    }

    /// Position value at the last recorded price. `None` until a refresh
    /// cycle has recorded one.
    pub fn market_value(&self) -> Option<Decimal> {
        self.last_price
            .map(|price| price * Decimal::from(self.shares))
    }
}
