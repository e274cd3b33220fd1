pub mod analytics;
pub mod session;
pub mod system;
pub mod transaction;

use crate::cli::errors::CommandError;
use crate::cli::registry::CommandEntry;
use crate::domain::MoneySource;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(session::definitions());
    commands.extend(transaction::definitions());
    commands.extend(analytics::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid amount")))
}

pub(crate) fn parse_source(raw: &str) -> Result<MoneySource, CommandError> {
    raw.parse::<MoneySource>().map_err(|_| {
        CommandError::InvalidArguments(format!("unknown source `{raw}`; expected bank or cash"))
    })
}

pub(crate) fn parse_count(raw: &str, what: &str) -> Result<usize, CommandError> {
    raw.parse::<usize>()
        .map_err(|_| CommandError::InvalidArguments(format!("{what} must be a whole number")))
}
