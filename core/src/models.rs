//! Row types returned by the store.

use crate::{
    money::Money,
    types::{AccountId, CustomerId, TransactionId},
};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: AccountId,
    pub customer_id: CustomerId,
    pub account_number: String,
    pub balance: Money,
    pub opening_balance: Money,
}

/// Direction of a ledger entry. Amounts are always positive; the kind
/// carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }

    /// Balance change this entry applies for `amount`.
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            Self::Credit => amount,
            Self::Debit => Money::from_cents(-amount.cents()),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            other => Err(format!("unknown transaction kind '{other}'")),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub account_id: AccountId,
    #[serde(rename = "transaction_type")]
    pub kind: TransactionKind,
    pub amount: Money,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Filter for `BankStore::get_transactions`.
///
/// Unless both dates are set, the newest rows are returned, capped at `limit`
/// or the store's configured default; a lone bound is ignored. With both
/// bounds the whole inclusive date range is returned unless `limit` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<u32>,
}

impl TransactionQuery {
    pub fn recent() -> Self {
        Self::default()
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn is_dated(&self) -> bool {
        self.start_date.is_some() && self.end_date.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusLabel {
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "not found")]
    NotFound,
}

/// Existence probe result. Transactions have no pending state, so
/// `Completed` is the only positive status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionStatus {
    pub status: StatusLabel,
    pub transaction: Option<Transaction>,
}

impl From<Option<Transaction>> for TransactionStatus {
    fn from(transaction: Option<Transaction>) -> Self {
        let status = match transaction {
            Some(_) => StatusLabel::Completed,
            None => StatusLabel::NotFound,
        };
        Self {
            status,
            transaction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReceipt {
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    pub amount: Money,
    pub debit_transaction_id: TransactionId,
    pub credit_transaction_id: TransactionId,
}

/// Result of checking one account's balance against its entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerCheck {
    pub account_id: AccountId,
    pub opening_balance: Money,
    pub total_credits: Money,
    pub total_debits: Money,
    pub expected_balance: Money,
    pub actual_balance: Money,
    pub balanced: bool,
}
