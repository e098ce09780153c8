use super::BankStore;
use crate::{
    error::{BankError, BankResult},
    models::LedgerCheck,
    money::Money,
    types::AccountId,
};
use rusqlite::{params, Row};

/// Opening balance, current balance and entry totals per account.
/// `?1` NULL selects every account.
const LEDGER_SQL: &str = "
    SELECT a.account_id,
           a.opening_balance_cents,
           a.balance_cents,
           COALESCE(SUM(CASE WHEN t.transaction_type = 'credit' THEN t.amount_cents END), 0),
           COALESCE(SUM(CASE WHEN t.transaction_type = 'debit'  THEN t.amount_cents END), 0)
    FROM accounts a
    LEFT JOIN transactions t ON t.account_id = a.account_id
    WHERE ?1 IS NULL OR a.account_id = ?1
    GROUP BY a.account_id
    ORDER BY a.account_id ASC";

fn ledger_from_row(row: &Row<'_>) -> rusqlite::Result<LedgerCheck> {
    let opening: i64 = row.get(1)?;
    let actual: i64 = row.get(2)?;
    let credits: i64 = row.get(3)?;
    let debits: i64 = row.get(4)?;
    let expected = opening + credits - debits;
    Ok(LedgerCheck {
        account_id: row.get(0)?,
        opening_balance: Money::from_cents(opening),
        total_credits: Money::from_cents(credits),
        total_debits: Money::from_cents(debits),
        expected_balance: Money::from_cents(expected),
        actual_balance: Money::from_cents(actual),
        balanced: expected == actual,
    })
}

impl BankStore {
    // ── Reconciliation ────────────────────────────────────────────

    /// Check that an account's balance equals its opening balance plus
    /// credits minus debits.
    pub fn reconcile_account(&self, account_id: AccountId) -> BankResult<LedgerCheck> {
        self.ledger_checks(Some(account_id))?
            .pop()
            .ok_or(BankError::AccountNotFound(account_id))
    }

    /// Reconcile every account. Logs each account that does not balance.
    pub fn reconcile_all(&self) -> BankResult<Vec<LedgerCheck>> {
        let checks = self.ledger_checks(None)?;
        for check in checks.iter().filter(|c| !c.balanced) {
            log::error!(
                "account {} out of balance: expected {}, actual {}",
                check.account_id,
                check.expected_balance,
                check.actual_balance
            );
        }
        Ok(checks)
    }

    fn ledger_checks(&self, account_id: Option<AccountId>) -> BankResult<Vec<LedgerCheck>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(LEDGER_SQL)?;
        let rows = stmt.query_map(params![account_id], ledger_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
