use std::io;

use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::errors::LedgerError;

/// Failure of a single shell command; reported and the shell keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Not logged in. Use `login <name>` first.")]
    NotLoggedIn,
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Fatal shell error that ends the process.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error(transparent)]
    Command(#[from] CommandError),
}
