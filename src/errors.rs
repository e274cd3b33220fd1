use thiserror::Error;

use crate::domain::MoneySource;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Error type that captures ledger failures surfaced to callers.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Insufficient funds: not enough {pool} balance ({available:.2} available, {requested:.2} requested)")]
    InsufficientFunds {
        pool: MoneySource,
        requested: f64,
        available: f64,
    },
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    /// True for failures caused by caller input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            LedgerError::Validation(_) | LedgerError::InsufficientFunds { .. }
        )
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Persistence(err.to_string())
    }
}
