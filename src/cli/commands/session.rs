use crate::cli::errors::CommandError;
use crate::cli::formatting::format_amount;
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{CommandResult, LoopControl, ShellContext};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "login",
            "Start a session and load the saved ledger",
            "login <name>",
            cmd_login,
        ),
        CommandEntry::new(
            "logout",
            "End the session and erase the saved ledger",
            "logout",
            cmd_logout,
        ),
    ]
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::InvalidArguments("usage: login <name>".into()));
    }
    let user = args.join(" ");
    let symbol = context.config().currency_symbol.clone();
    let session = context.start_session(&user)?;
    let (count, aggregates) = session.with_engine(|engine| {
        (engine.transactions().len(), engine.aggregates().clone())
    })?;
    io::print_success(format!(
        "Welcome, {}. {} transaction(s) loaded.",
        session.user(),
        count
    ));
    io::print_info(format!(
        "Balances  bank {}  cash {}",
        format_amount(&symbol, aggregates.balance.bank),
        format_amount(&symbol, aggregates.balance.cash)
    ));
    Ok(LoopControl::Continue)
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session()?;
    if !context.confirm("Log out and erase the saved transaction history?")? {
        io::print_info("Logout cancelled.");
        return Ok(LoopControl::Continue);
    }
    let user = context.end_session()?;
    io::print_success(format!("Goodbye, {user}. Local history cleared."));
    Ok(LoopControl::Continue)
}
