//! Tool implementations for an external agent host.
//!
//! Each tool takes a JSON-deserializable params struct and returns a
//! JSON-serializable result. The host finds tools through
//! `tool_definitions()` and invokes them by name through `call_tool()`.
//!
//! `transfer_funds` is the only tool that modifies data.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::{BankError, BankResult};
use crate::models::{Account, Customer, LedgerCheck, Transaction, TransactionQuery, TransactionStatus, TransferReceipt};
use crate::money::Money;
use crate::store::{BankStore, DEFAULT_TRANSFER_DESCRIPTION};
use crate::types::{AccountId, CustomerId, TransactionId};

pub const GET_CUSTOMER_SUMMARY: &str = "get_customer_summary";
pub const TRANSFER_FUNDS: &str = "transfer_funds";
pub const GET_TRANSACTIONS: &str = "get_transactions";
pub const GET_TRANSACTION_STATUS: &str = "get_transaction_status";
pub const RECONCILE_ACCOUNT: &str = "reconcile_account";

// =============================================================================
// Errors
// =============================================================================

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error(transparent)]
    Bank(#[from] BankError),
}

/// JSON form of a failure: a stable tag plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl ToolError {
    pub fn body(&self) -> ErrorBody {
        let kind = match self {
            Self::UnknownTool(_) => "unknown_tool".to_string(),
            Self::InvalidArguments { .. } => "invalid_arguments".to_string(),
            Self::Bank(e) => e.kind().as_str().to_string(),
        };
        ErrorBody {
            kind,
            message: self.to_string(),
        }
    }
}

impl From<&BankError> for ErrorBody {
    fn from(err: &BankError) -> Self {
        Self {
            kind: err.kind().as_str().to_string(),
            message: err.to_string(),
        }
    }
}

// =============================================================================
// get_customer_summary
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CustomerSummaryParams {
    #[schemars(description = "Customer ID")]
    pub customer_id: CustomerId,
}

#[derive(Debug, Serialize)]
pub struct CustomerSummary {
    /// `None` when the customer does not exist.
    pub customer: Option<Customer>,
    pub number_of_accounts: usize,
    pub accounts: Vec<Account>,
}

/// Customer details together with every account they own
pub fn get_customer_summary(
    store: &BankStore,
    params: CustomerSummaryParams,
) -> BankResult<CustomerSummary> {
    let customer = store.get_customer(params.customer_id)?;
    let accounts = store.get_accounts_by_customer(params.customer_id)?;
    Ok(CustomerSummary {
        customer,
        number_of_accounts: accounts.len(),
        accounts,
    })
}

// =============================================================================
// transfer_funds
// =============================================================================

fn default_transfer_description() -> String {
    DEFAULT_TRANSFER_DESCRIPTION.to_string()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TransferFundsParams {
    #[schemars(description = "Source account ID")]
    pub from_account_id: AccountId,

    #[schemars(description = "Destination account ID")]
    pub to_account_id: AccountId,

    #[schemars(
        with = "f64",
        description = "Amount to move, positive, at most two decimal places"
    )]
    pub amount: Money,

    #[serde(default = "default_transfer_description")]
    #[schemars(description = "Description stored on both entries (default: Fund Transfer)")]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct TransferOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<TransferReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// Move funds between accounts. Never fails at the tool level: a refused
/// transfer is reported as `success: false` with the cause attached.
pub fn transfer_funds(store: &BankStore, params: TransferFundsParams) -> TransferOutcome {
    match store.transfer_funds(
        params.from_account_id,
        params.to_account_id,
        params.amount,
        &params.description,
    ) {
        Ok(receipt) => TransferOutcome {
            success: true,
            receipt: Some(receipt),
            error: None,
        },
        Err(e) => TransferOutcome {
            success: false,
            receipt: None,
            error: Some(ErrorBody::from(&e)),
        },
    }
}

// =============================================================================
// get_transactions
// =============================================================================

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct GetTransactionsParams {
    #[schemars(description = "Account ID")]
    pub account_id: AccountId,

    #[schemars(description = "Start date in YYYY-MM-DD format (inclusive)")]
    pub start_date: Option<String>,

    #[schemars(description = "End date in YYYY-MM-DD format (inclusive)")]
    pub end_date: Option<String>,

    #[schemars(
        description = "Maximum number of results. Defaults to 100 unless both dates are given, unlimited otherwise"
    )]
    pub limit: Option<u32>,
}

/// Parse optional date strings
pub fn parse_date_opt(s: Option<&str>) -> BankResult<Option<NaiveDate>> {
    match s.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(date_str) => NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                BankError::InvalidRequest(format!(
                    "Invalid date format: {date_str}. Use YYYY-MM-DD"
                ))
            }),
    }
}

/// Entries for an account, newest first
pub fn get_transactions(
    store: &BankStore,
    params: GetTransactionsParams,
) -> BankResult<Vec<Transaction>> {
    let query = TransactionQuery {
        start_date: parse_date_opt(params.start_date.as_deref())?,
        end_date: parse_date_opt(params.end_date.as_deref())?,
        limit: params.limit,
    };
    store.get_transactions(params.account_id, &query)
}

// =============================================================================
// get_transaction_status
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TransactionStatusParams {
    #[schemars(description = "Transaction ID")]
    pub transaction_id: TransactionId,
}

pub fn get_transaction_status(
    store: &BankStore,
    params: TransactionStatusParams,
) -> BankResult<TransactionStatus> {
    store.get_transaction_status(params.transaction_id)
}

// =============================================================================
// reconcile_account
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReconcileAccountParams {
    #[schemars(description = "Account ID")]
    pub account_id: AccountId,
}

pub fn reconcile_account(
    store: &BankStore,
    params: ReconcileAccountParams,
) -> BankResult<LedgerCheck> {
    store.reconcile_account(params.account_id)
}

// =============================================================================
// Registration and dispatch
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

fn definition<P: schemars::JsonSchema>(
    name: &'static str,
    description: &'static str,
) -> BankResult<ToolDefinition> {
    Ok(ToolDefinition {
        name,
        description,
        input_schema: serde_json::to_value(schemars::schema_for!(P))?,
    })
}

/// Every tool this crate exposes, with a JSON Schema for its arguments.
pub fn tool_definitions() -> BankResult<Vec<ToolDefinition>> {
    Ok(vec![
        definition::<CustomerSummaryParams>(
            GET_CUSTOMER_SUMMARY,
            "Get a customer's details, account count and accounts",
        )?,
        definition::<TransferFundsParams>(
            TRANSFER_FUNDS,
            "Transfer funds from one account to another",
        )?,
        definition::<GetTransactionsParams>(
            GET_TRANSACTIONS,
            "List an account's transactions, newest first, optionally within a date range",
        )?,
        definition::<TransactionStatusParams>(
            GET_TRANSACTION_STATUS,
            "Look up a transaction and report whether it exists",
        )?,
        definition::<ReconcileAccountParams>(
            RECONCILE_ACCOUNT,
            "Check an account's balance against its transaction history",
        )?,
    ])
}

fn parse_params<P: DeserializeOwned>(tool: &str, args: Value) -> Result<P, ToolError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

fn respond<T: Serialize>(value: T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError::Bank(e.into()))
}

/// Invoke a tool by name with JSON arguments.
pub fn call_tool(store: &BankStore, name: &str, args: Value) -> Result<Value, ToolError> {
    log::debug!("tool call {name}: {args}");
    match name {
        GET_CUSTOMER_SUMMARY => respond(get_customer_summary(store, parse_params(name, args)?)?),
        TRANSFER_FUNDS => respond(transfer_funds(store, parse_params(name, args)?)),
        GET_TRANSACTIONS => respond(get_transactions(store, parse_params(name, args)?)?),
        GET_TRANSACTION_STATUS => {
            respond(get_transaction_status(store, parse_params(name, args)?)?)
        }
        RECONCILE_ACCOUNT => respond(reconcile_account(store, parse_params(name, args)?)?),
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn parse_date_opt_accepts_iso_and_blank() {
        assert_eq!(parse_date_opt(None).unwrap(), None);
        assert_eq!(parse_date_opt(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_date_opt(Some("2024-02-29")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn parse_date_opt_rejects_other_formats() {
        let err = parse_date_opt(Some("02/29/2024")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn transfer_params_default_description() {
        let params: TransferFundsParams = serde_json::from_value(serde_json::json!({
            "from_account_id": 1,
            "to_account_id": 2,
            "amount": 12.5
        }))
        .unwrap();
        assert_eq!(params.description, "Fund Transfer");
        assert_eq!(params.amount, Money::from_cents(1250));
    }

    #[test]
    fn definitions_cover_every_tool() {
        let names: Vec<&str> = tool_definitions()
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(
            names,
            vec![
                GET_CUSTOMER_SUMMARY,
                TRANSFER_FUNDS,
                GET_TRANSACTIONS,
                GET_TRANSACTION_STATUS,
                RECONCILE_ACCOUNT
            ]
        );
    }

    #[test]
    fn error_kind_tags_are_snake_case() {
        let err = ToolError::Bank(BankError::AccountNotFound(9));
        assert_eq!(err.body().kind, "account_not_found");
        assert_eq!(ToolError::UnknownTool("x".into()).body().kind, "unknown_tool");
    }
}
