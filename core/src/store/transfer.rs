use super::{
    transaction::{ensure_positive, post_entry},
    BankStore,
};
use crate::{
    error::{BankError, BankResult},
    models::{TransactionKind, TransferReceipt},
    money::Money,
    types::AccountId,
};
use rusqlite::{params, OptionalExtension, TransactionBehavior};

/// Description used when a caller does not supply one.
pub const DEFAULT_TRANSFER_DESCRIPTION: &str = "Fund Transfer";

impl BankStore {
    // ── Transfer ──────────────────────────────────────────────────

    /// Move `amount` from one account to another as a debit/credit pair.
    ///
    /// The unit of work is opened with `BEGIN IMMEDIATE`, which takes the
    /// database write lock before the balance is read. Concurrent transfers
    /// therefore run one after another, and a single lock means there is no
    /// lock order to get wrong. Any failure drops the transaction, which
    /// rolls back both entries.
    pub fn transfer_funds(
        &self,
        from_account_id: AccountId,
        to_account_id: AccountId,
        amount: Money,
        description: &str,
    ) -> BankResult<TransferReceipt> {
        let result = self.try_transfer(from_account_id, to_account_id, amount, description);
        match &result {
            Ok(receipt) => log::info!(
                "transferred {amount} from {from_account_id} to {to_account_id} (debit {}, credit {})",
                receipt.debit_transaction_id,
                receipt.credit_transaction_id
            ),
            Err(e) => log::warn!(
                "transfer of {amount} from {from_account_id} to {to_account_id} failed: {e}"
            ),
        }
        result
    }

    fn try_transfer(
        &self,
        from_account_id: AccountId,
        to_account_id: AccountId,
        amount: Money,
        description: &str,
    ) -> BankResult<TransferReceipt> {
        ensure_positive(amount)?;
        if from_account_id == to_account_id {
            return Err(BankError::InvalidRequest(format!(
                "cannot transfer from account {from_account_id} to itself"
            )));
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let destination: Option<AccountId> = tx
            .query_row(
                "SELECT account_id FROM accounts WHERE account_id = ?1",
                params![to_account_id],
                |row| row.get(0),
            )
            .optional()?;
        if destination.is_none() {
            return Err(BankError::AccountNotFound(to_account_id));
        }

        let created_at = self.now();
        let debit_transaction_id = post_entry(
            &tx,
            from_account_id,
            TransactionKind::Debit,
            amount,
            description,
            created_at,
            true,
        )?;
        let credit_transaction_id = post_entry(
            &tx,
            to_account_id,
            TransactionKind::Credit,
            amount,
            description,
            created_at,
            true,
        )?;
        tx.commit()?;

        Ok(TransferReceipt {
            from_account_id,
            to_account_id,
            amount,
            debit_transaction_id,
            credit_transaction_id,
        })
    }
}
