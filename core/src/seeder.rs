//! Random data seeder.
//!
//! Populates a store with synthetic customers, accounts and transactions
//! using only the public store operations, so every generated row obeys the
//! same invariants as real traffic. A fraction of the transactions go
//! through `transfer_funds`; the rest are single-account credits/debits.
//!
//! Phases run in a fixed order, each on its own RNG stream:
//!   1. Customers
//!   2. Accounts
//!   3. Transactions

use crate::{
    config::SeedConfig,
    error::{BankError, BankResult},
    models::TransactionKind,
    money::Money,
    name_generator::NameGenerator,
    rng::{RngBank, SeedRng, SeedSlot},
    store::BankStore,
    types::{AccountId, CustomerId},
};
use serde::Serialize;
use std::collections::HashSet;

const ACCOUNT_NUMBER_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub customers: u32,
    pub accounts: u32,
    /// Single-account credits and debits that were applied.
    pub entries: u32,
    /// Transfers that committed.
    pub transfers: u32,
    /// Generated operations the store refused, such as transfers that would
    /// overdraw the source account.
    pub rejected: u32,
}

pub struct Seeder<'a> {
    store: &'a BankStore,
    config: SeedConfig,
    rng_bank: RngBank,
}

impl<'a> Seeder<'a> {
    pub fn new(store: &'a BankStore, config: SeedConfig, seed: u64) -> Self {
        Self {
            store,
            config,
            rng_bank: RngBank::new(seed),
        }
    }

    pub fn run(&self) -> BankResult<SeedReport> {
        self.config
            .validate()
            .map_err(|e| BankError::InvalidRequest(e.to_string()))?;

        let mut report = SeedReport::default();

        let customer_ids = self.seed_customers()?;
        report.customers = customer_ids.len() as u32;
        log::info!("seeded {} customers", report.customers);

        let account_ids = self.seed_accounts(&customer_ids)?;
        report.accounts = account_ids.len() as u32;
        log::info!("seeded {} accounts", report.accounts);

        self.seed_transactions(&account_ids, &mut report)?;
        log::info!(
            "seeded {} entries and {} transfers ({} rejected)",
            report.entries,
            report.transfers,
            report.rejected
        );

        Ok(report)
    }

    fn seed_customers(&self) -> BankResult<Vec<CustomerId>> {
        let mut rng = self.rng_bank.for_phase(SeedSlot::Customers);
        // Offset serials by existing rows so reseeding a file never reuses
        // an email.
        let serial_base = self.store.customer_count()? as u32;

        (0..self.config.customers)
            .map(|i| {
                let name = NameGenerator::generate_full_name(&mut rng);
                let email = NameGenerator::generate_email(&mut rng, &name, serial_base + i);
                let phone = NameGenerator::generate_phone(&mut rng);
                self.store.create_customer(&name, &email, &phone)
            })
            .collect()
    }

    fn seed_accounts(&self, customer_ids: &[CustomerId]) -> BankResult<Vec<AccountId>> {
        let mut rng = self.rng_bank.for_phase(SeedSlot::Accounts);
        let mut used_numbers = HashSet::new();
        let mut account_ids = Vec::new();

        for &customer_id in customer_ids {
            let count = rng.range_inclusive(
                i64::from(self.config.min_accounts_per_customer),
                i64::from(self.config.max_accounts_per_customer),
            );
            for _ in 0..count {
                let opening = Money::from_cents(rng.range_inclusive(
                    self.config.opening_balance_min_cents,
                    self.config.opening_balance_max_cents,
                ));
                let account_id =
                    self.open_account(&mut rng, &mut used_numbers, customer_id, opening)?;
                account_ids.push(account_id);
            }
        }
        Ok(account_ids)
    }

    /// Open an account under a fresh random ten-digit number, retrying if
    /// the number is already taken in the database.
    fn open_account(
        &self,
        rng: &mut SeedRng,
        used_numbers: &mut HashSet<String>,
        customer_id: CustomerId,
        opening: Money,
    ) -> BankResult<AccountId> {
        let mut attempt = 0;
        loop {
            let number = loop {
                let candidate = rng.range_inclusive(1_000_000_000, 9_999_999_999).to_string();
                if used_numbers.insert(candidate.clone()) {
                    break candidate;
                }
            };
            attempt += 1;
            match self.store.create_account(customer_id, &number, opening) {
                Err(BankError::Integrity(msg)) if attempt < ACCOUNT_NUMBER_ATTEMPTS => {
                    log::debug!("account number {number} rejected ({msg}), retrying");
                }
                result => return result,
            }
        }
    }

    fn seed_transactions(&self, account_ids: &[AccountId], report: &mut SeedReport) -> BankResult<()> {
        if account_ids.is_empty() {
            return Ok(());
        }
        let mut rng = self.rng_bank.for_phase(SeedSlot::Transactions);
        let config = &self.config;

        for _ in 0..config.transactions {
            let outcome = if account_ids.len() >= 2 && rng.chance(config.transfer_share) {
                let (from, to) = rng.two_distinct(account_ids.len());
                let amount = Money::from_cents(rng.range_inclusive(
                    config.transfer_amount_min_cents,
                    config.transfer_amount_max_cents,
                ));
                self.store
                    .transfer_funds(
                        account_ids[from],
                        account_ids[to],
                        amount,
                        &config.transfer_description,
                    )
                    .map(|_| report.transfers += 1)
            } else {
                let account_id = *rng.pick(account_ids);
                let kind = if rng.chance(0.5) {
                    TransactionKind::Credit
                } else {
                    TransactionKind::Debit
                };
                let amount = Money::from_cents(rng.range_inclusive(
                    config.entry_amount_min_cents,
                    config.entry_amount_max_cents,
                ));
                let description = NameGenerator::generate_sentence(&mut rng, 4);
                self.store
                    .create_transaction(account_id, kind, amount, &description)
                    .map(|_| report.entries += 1)
            };

            match outcome {
                Ok(()) => {}
                Err(e) if is_rejection(&e) => {
                    log::debug!("seed operation rejected: {e}");
                    report.rejected += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// Business refusals are part of realistic traffic; anything else aborts
/// the run.
fn is_rejection(err: &BankError) -> bool {
    matches!(
        err,
        BankError::InsufficientFunds { .. }
            | BankError::AccountNotFound(_)
            | BankError::InvalidAmount(_)
            | BankError::InvalidRequest(_)
    )
}
