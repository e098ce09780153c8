//! Fixed-point currency amounts.
//!
//! Stored as integer minor units (cents) so SQL arithmetic on balances is
//! exact. Crosses the JSON boundary as a `Decimal`: serialized as a decimal
//! string, accepted as a string or a number.

use crate::error::{BankError, BankResult};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits carried by every amount.
pub const SCALE: u32 = 2;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Convert a decimal amount. Rejects more than two fractional digits
    /// instead of rounding them away.
    pub fn from_decimal(value: Decimal) -> BankResult<Self> {
        let scaled = value
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(|| BankError::InvalidAmount(format!("{value} is out of range")))?;
        if !scaled.fract().is_zero() {
            return Err(BankError::InvalidAmount(format!(
                "{value} has more than {SCALE} fractional digits"
            )));
        }
        scaled
            .to_i64()
            .map(Self)
            .ok_or_else(|| BankError::InvalidAmount(format!("{value} is out of range")))
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, SCALE)
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = BankError;

    fn try_from(value: Decimal) -> BankResult<Self> {
        Self::from_decimal(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.to_decimal()
    }
}

impl FromStr for Money {
    type Err = BankError;

    fn from_str(s: &str) -> BankResult<Self> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| BankError::InvalidAmount(format!("'{s}': {e}")))?;
        Self::from_decimal(value)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Self)
    }
}
