#![doc(test(attr(deny(warnings))))]

//! Pocket Ledger keeps a local, persisted list of bank and cash transactions
//! and derives balances, spend and time-bucketed analytics from it.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::{LedgerEngine, Session};
pub use crate::domain::{Aggregates, MoneySource, Transaction, TransactionKind};
pub use crate::errors::{LedgerError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Pocket Ledger tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
