//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Every public method checks one connection out of the pool, runs a single
//! statement or a single unit of work on it, and hands it back on return.
//!
//! Organized by entity:
//! - `customer` - customer rows
//! - `account` - account rows
//! - `transaction` - ledger entries and their balance effect
//! - `transfer` - paired debit/credit between two accounts
//! - `ledger` - balance reconciliation

use crate::{
    clock::{Clock, SystemClock},
    config::BankConfig,
    error::{BankError, BankResult},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Type;
use std::sync::Arc;
use std::time::Duration;

mod account;
mod customer;
mod ledger;
mod transaction;
mod transfer;

pub use transfer::DEFAULT_TRANSFER_DESCRIPTION;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
const MEMORY_PATH: &str = ":memory:";

#[derive(Clone)]
pub struct BankStore {
    pool: DbPool,
    clock: Arc<dyn Clock>,
    recent_transactions_limit: u32,
}

impl BankStore {
    /// Build a connection pool for `config.database_path`.
    ///
    /// `:memory:` yields a single-connection pool so every checkout sees the
    /// same private database.
    pub fn open(config: &BankConfig) -> BankResult<Self> {
        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
        let in_memory = config.database_path == MEMORY_PATH;

        let manager = if in_memory {
            SqliteConnectionManager::memory()
        } else {
            SqliteConnectionManager::file(&config.database_path)
        };
        let manager = manager.with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            conn.execute_batch("PRAGMA foreign_keys=ON;")
        });

        let builder = Pool::builder()
            .connection_timeout(Duration::from_millis(config.connection_timeout_ms));
        let pool = if in_memory {
            // Dropping the only connection would drop the database with it.
            builder
                .max_size(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .build(manager)?
        } else {
            builder.max_size(config.pool_max_size).build(manager)?
        };

        if !in_memory {
            // WAL lets readers proceed while a transfer holds the write lock.
            let conn = pool.get()?;
            let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        }

        log::debug!(
            "opened store at {} (pool size {})",
            config.database_path,
            pool.max_size()
        );

        Ok(Self {
            pool,
            clock: Arc::new(SystemClock),
            recent_transactions_limit: config.recent_transactions_limit,
        })
    }

    /// Open a migrated in-memory database (used in tests).
    pub fn in_memory() -> BankResult<Self> {
        let store = Self::open(&BankConfig::default_test())?;
        store.migrate()?;
        Ok(store)
    }

    /// Replace the time source used to stamp new transactions.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create the schema if it does not exist yet.
    pub fn migrate(&self) -> BankResult<()> {
        self.conn()?
            .execute_batch(include_str!("../../../migrations/001_banking.sql"))?;
        Ok(())
    }

    pub fn recent_transactions_limit(&self) -> u32 {
        self.recent_transactions_limit
    }

    pub fn customer_count(&self) -> BankResult<i64> {
        self.count("SELECT COUNT(*) FROM customers")
    }

    pub fn account_count(&self) -> BankResult<i64> {
        self.count("SELECT COUNT(*) FROM accounts")
    }

    pub fn transaction_count(&self) -> BankResult<i64> {
        self.count("SELECT COUNT(*) FROM transactions")
    }

    fn count(&self, sql: &str) -> BankResult<i64> {
        let count = self.conn()?.query_row(sql, [], |row| row.get(0))?;
        Ok(count)
    }

    /// Check a connection out of the pool. It returns to the pool when the
    /// guard drops, on success and error paths alike.
    pub(crate) fn conn(&self) -> BankResult<DbConn> {
        self.pool.get().map_err(BankError::from)
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Read a timestamp column written by `format_timestamp`.
pub(crate) fn timestamp_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|dt| dt.and_utc())
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
