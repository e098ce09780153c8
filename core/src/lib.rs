//! Banking data-access layer: customers, accounts and their transactions on
//! SQLite, an atomic fund transfer, a deterministic data seeder, and a tool
//! surface for external agent hosts.

pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod money;
pub mod name_generator;
pub mod rng;
pub mod seeder;
pub mod store;
pub mod tools;
pub mod types;

pub use error::{BankError, BankResult, ErrorKind};
pub use models::{
    Account, Customer, LedgerCheck, Transaction, TransactionKind, TransactionQuery,
    TransactionStatus, TransferReceipt,
};
pub use money::Money;
pub use store::BankStore;
