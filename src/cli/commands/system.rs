use crate::cli::errors::CommandError;
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{CommandResult, LoopControl, ShellContext};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "config",
            "Show settings, or change one",
            "config [currency_symbol|storage_key|spending_categories <value>]",
            cmd_config,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            let config = context.config();
            output_section("Settings");
            io::print_info(format!("  currency_symbol     : {}", config.currency_symbol));
            io::print_info(format!("  storage_key         : {}", config.storage_key));
            io::print_info(format!(
                "  spending_categories : {}",
                config.spending_categories.join(", ")
            ));
            io::print_info(format!(
                "  file                : {}",
                context.config_manager().path().display()
            ));
            Ok(LoopControl::Continue)
        }
        [key, value @ ..] if !value.is_empty() => {
            context.update_config(key, &value.join(" "))?;
            io::print_success(format!("Updated `{key}`."));
            if context.is_logged_in() {
                io::print_info("The change applies from the next login.");
            }
            Ok(LoopControl::Continue)
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: config [<key> <value>]".into(),
        )),
    }
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Pocket Ledger {}", meta.version));
    io::print_info(format!("  Build hash   : {}", meta.git_hash));
    io::print_info(format!("  Built at     : {}", meta.timestamp));
    io::print_info(format!("  Target       : {}", meta.target));
    io::print_info(format!("  Profile      : {}", meta.profile));
    Ok(LoopControl::Continue)
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.registry().get(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        }
        return Ok(LoopControl::Continue);
    }

    help::print_overview(context.registry());
    Ok(LoopControl::Continue)
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
