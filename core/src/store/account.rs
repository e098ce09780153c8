use super::BankStore;
use crate::{
    error::{BankError, BankResult},
    models::Account,
    money::Money,
    types::{AccountId, CustomerId},
};
use rusqlite::{params, OptionalExtension, Row};

const ACCOUNT_COLUMNS: &str =
    "account_id, customer_id, account_number, balance_cents, opening_balance_cents";

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        account_id: row.get(0)?,
        customer_id: row.get(1)?,
        account_number: row.get(2)?,
        balance: row.get(3)?,
        opening_balance: row.get(4)?,
    })
}

impl BankStore {
    // ── Account ───────────────────────────────────────────────────

    /// Open an account for an existing customer. Duplicate account numbers
    /// and unknown customers are `Integrity` errors.
    pub fn create_account(
        &self,
        customer_id: CustomerId,
        account_number: &str,
        initial_balance: Money,
    ) -> BankResult<AccountId> {
        if initial_balance.is_negative() {
            return Err(BankError::InvalidAmount(format!(
                "opening balance {initial_balance} is negative"
            )));
        }
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO accounts (customer_id, account_number, balance_cents, opening_balance_cents)
             VALUES (?1, ?2, ?3, ?3)",
            params![customer_id, account_number, initial_balance],
        )?;
        let account_id = conn.last_insert_rowid();
        log::debug!(
            "created account {account_id} ({account_number}) for customer {customer_id} with {initial_balance}"
        );
        Ok(account_id)
    }

    pub fn get_account(&self, account_id: AccountId) -> BankResult<Option<Account>> {
        let account = self
            .conn()?
            .query_row(
                &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = ?1"),
                params![account_id],
                account_from_row,
            )
            .optional()?;
        Ok(account)
    }

    /// All accounts owned by `customer_id`, oldest first.
    pub fn get_accounts_by_customer(&self, customer_id: CustomerId) -> BankResult<Vec<Account>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE customer_id = ?1 ORDER BY account_id ASC"
        ))?;
        let rows = stmt.query_map(params![customer_id], account_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
