use crate::{money::Money, types::AccountId};
use rusqlite::ErrorCode;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BankError {
    #[error("Insufficient funds in account {account_id}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        account_id: AccountId,
        balance: Money,
        requested: Money,
    },

    #[error("Account {0} not found")]
    AccountNotFound(AccountId),

    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Connectivity error: {0}")]
    Connectivity(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Unknown(String),
}

pub type BankResult<T> = Result<T, BankError>;

/// Stable, serializable tag for each failure cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InsufficientFunds,
    AccountNotFound,
    Integrity,
    InvalidAmount,
    InvalidRequest,
    Connectivity,
    Serialization,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InsufficientFunds => "insufficient_funds",
            Self::AccountNotFound => "account_not_found",
            Self::Integrity => "integrity",
            Self::InvalidAmount => "invalid_amount",
            Self::InvalidRequest => "invalid_request",
            Self::Connectivity => "connectivity",
            Self::Serialization => "serialization",
            Self::Unknown => "unknown",
        }
    }
}

impl BankError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::AccountNotFound(_) => ErrorKind::AccountNotFound,
            Self::Integrity(_) => ErrorKind::Integrity,
            Self::InvalidAmount(_) => ErrorKind::InvalidAmount,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Connectivity(_) => ErrorKind::Connectivity,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }
}

impl From<rusqlite::Error> for BankError {
    fn from(err: rusqlite::Error) -> Self {
        let code = match &err {
            rusqlite::Error::SqliteFailure(e, _) => Some(e.code),
            _ => None,
        };
        match code {
            Some(ErrorCode::ConstraintViolation) => Self::Integrity(err.to_string()),
            Some(
                ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::CannotOpen
                | ErrorCode::NotADatabase
                | ErrorCode::PermissionDenied
                | ErrorCode::SystemIoFailure,
            ) => Self::Connectivity(err.to_string()),
            _ => Self::Unknown(err.to_string()),
        }
    }
}

impl From<r2d2::Error> for BankError {
    fn from(err: r2d2::Error) -> Self {
        Self::Connectivity(err.to_string())
    }
}
