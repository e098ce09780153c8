//! Shared primitive types used across the banking layer.

/// Auto-assigned identity of a customer row.
pub type CustomerId = i64;

/// Auto-assigned identity of an account row.
pub type AccountId = i64;

/// Auto-assigned identity of a transaction row.
pub type TransactionId = i64;
