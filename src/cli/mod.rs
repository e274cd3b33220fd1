//! Interactive shell driving a ledger session from the terminal.

pub mod commands;
pub mod errors;
pub mod formatting;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
pub mod shell;
pub mod shell_context;

pub use errors::{CliError, CommandError};
pub use shell::{run_cli, SCRIPT_ENV};
pub use shell_context::{CliMode, CommandResult, LoopControl, ShellContext};
