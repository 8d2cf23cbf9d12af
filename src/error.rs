use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::transaction::TransactionStatus;

#[derive(Error, Debug)]
pub enum PaymentError {
    /// A gateway handshake step failed. Not retriable in place; retrying
    /// requires a fresh transaction (and therefore a fresh gateway order).
    #[error("gateway error: {0}")]
    Gateway(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        available: Decimal,
        requested: Decimal,
    },

    /// Completion notification from an unrecognized origin. Logged and
    /// dropped by the orchestrator, never surfaced to the sender.
    #[error("completion notification from unrecognized origin: {declared}")]
    InvalidOrigin { declared: String },

    #[error("state conflict: expected {expected}, found {actual}")]
    StateConflict {
        expected: TransactionStatus,
        actual: TransactionStatus,
    },

    #[error("payout state conflict: {0}")]
    PayoutStateConflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
