use super::{format_timestamp, timestamp_column, BankStore};
use crate::{
    error::{BankError, BankResult},
    models::{Transaction, TransactionKind, TransactionQuery, TransactionStatus},
    money::Money,
    types::{AccountId, TransactionId},
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

const TRANSACTION_COLUMNS: &str =
    "transaction_id, account_id, transaction_type, amount_cents, description, created_at";

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        transaction_id: row.get(0)?,
        account_id: row.get(1)?,
        kind: row.get(2)?,
        amount: row.get(3)?,
        description: row.get(4)?,
        created_at: timestamp_column(row, 5)?,
    })
}

pub(super) fn ensure_positive(amount: Money) -> BankResult<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(BankError::InvalidAmount(format!(
            "amount must be positive, got {amount}"
        )))
    }
}

/// Apply one entry's balance effect and append its row, on a connection
/// that is already inside a unit of work.
///
/// With `require_funds` a debit is a conditional decrement: the balance
/// check and the write are one statement, so no interleaving can take the
/// balance below zero. Without it the delta is applied as-is.
pub(super) fn post_entry(
    conn: &Connection,
    account_id: AccountId,
    kind: TransactionKind,
    amount: Money,
    description: &str,
    created_at: DateTime<Utc>,
    require_funds: bool,
) -> BankResult<TransactionId> {
    let updated = match kind {
        TransactionKind::Credit => conn.execute(
            "UPDATE accounts SET balance_cents = balance_cents + ?1 WHERE account_id = ?2",
            params![amount, account_id],
        )?,
        TransactionKind::Debit if require_funds => conn.execute(
            "UPDATE accounts SET balance_cents = balance_cents - ?1
             WHERE account_id = ?2 AND balance_cents >= ?1",
            params![amount, account_id],
        )?,
        TransactionKind::Debit => conn.execute(
            "UPDATE accounts SET balance_cents = balance_cents - ?1 WHERE account_id = ?2",
            params![amount, account_id],
        )?,
    };

    if updated == 0 {
        let balance: Option<Money> = conn
            .query_row(
                "SELECT balance_cents FROM accounts WHERE account_id = ?1",
                params![account_id],
                |row| row.get(0),
            )
            .optional()?;
        return Err(match balance {
            None => BankError::AccountNotFound(account_id),
            Some(balance) => BankError::InsufficientFunds {
                account_id,
                balance,
                requested: amount,
            },
        });
    }

    conn.execute(
        "INSERT INTO transactions (account_id, transaction_type, amount_cents, description, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            account_id,
            kind,
            amount,
            description,
            format_timestamp(created_at)
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl BankStore {
    // ── Transaction ───────────────────────────────────────────────

    /// Record a credit or debit and apply it to the account balance as one
    /// unit of work. Direct debits are not checked against the balance.
    pub fn create_transaction(
        &self,
        account_id: AccountId,
        kind: TransactionKind,
        amount: Money,
        description: &str,
    ) -> BankResult<TransactionId> {
        ensure_positive(amount)?;
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let transaction_id = post_entry(
            &tx,
            account_id,
            kind,
            amount,
            description,
            self.now(),
            false,
        )?;
        tx.commit()?;
        log::debug!("posted {kind} {transaction_id} of {amount} on account {account_id}");
        Ok(transaction_id)
    }

    pub fn get_transaction(&self, transaction_id: TransactionId) -> BankResult<Option<Transaction>> {
        let transaction = self
            .conn()?
            .query_row(
                &format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE transaction_id = ?1"),
                params![transaction_id],
                transaction_from_row,
            )
            .optional()?;
        Ok(transaction)
    }

    /// Entries for one account, newest first.
    ///
    /// Undated queries are capped at `query.limit`, or at the configured
    /// `recent_transactions_limit` when no limit is given. Dated queries
    /// (both bounds set) return every entry whose creation date falls in the
    /// inclusive range unless `query.limit` is set. A lone bound is ignored.
    pub fn get_transactions(
        &self,
        account_id: AccountId,
        query: &TransactionQuery,
    ) -> BankResult<Vec<Transaction>> {
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            if start > end {
                return Err(BankError::InvalidRequest(format!(
                    "start date {start} is after end date {end}"
                )));
            }
        }

        // SQLite treats a negative LIMIT as "no limit".
        let limit: i64 = match (query.limit, query.is_dated()) {
            (Some(limit), _) => i64::from(limit),
            (None, false) => i64::from(self.recent_transactions_limit),
            (None, true) => -1,
        };
        let (start, end) = match (query.start_date, query.end_date) {
            (Some(start), Some(end)) => (
                Some(start.format("%Y-%m-%d").to_string()),
                Some(end.format("%Y-%m-%d").to_string()),
            ),
            _ => (None, None),
        };

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions
             WHERE account_id = ?1
               AND (?2 IS NULL OR date(created_at) >= ?2)
               AND (?3 IS NULL OR date(created_at) <= ?3)
             ORDER BY created_at DESC, transaction_id DESC
             LIMIT ?4"
        ))?;
        let rows = stmt.query_map(params![account_id, start, end, limit], transaction_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn get_transaction_status(
        &self,
        transaction_id: TransactionId,
    ) -> BankResult<TransactionStatus> {
        Ok(self.get_transaction(transaction_id)?.into())
    }
}
