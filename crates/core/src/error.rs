//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Transport/presentation mapping belongs elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested account or product is absent.
    #[error("not found")]
    NotFound,

    /// A conflict occurred (duplicate insert, lock contention budget exhausted).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Ownership mismatch between caller and resource owner.
    #[error("unauthorized")]
    Unauthorized,

    /// A debit larger than the current balance was requested.
    #[error("insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: i64, required: i64 },

    /// A stock reservation larger than the available stock was requested.
    #[error("insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: i64, requested: i64 },

    /// A deposit amount outside the fixed coin set.
    #[error("invalid denomination: {0}")]
    InvalidDenomination(i64),

    /// A non-positive quantity.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// An amount not expressible in the coin system (negative or not a
    /// multiple of the smallest denomination).
    #[error("invalid amount: {0}")]
    InvalidAmount(i64),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
