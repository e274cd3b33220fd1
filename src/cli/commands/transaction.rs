use crate::cli::commands::{parse_amount, parse_count, parse_source};
use crate::cli::errors::CommandError;
use crate::cli::formatting::{date_label, format_amount, format_signed};
use crate::cli::io;
use crate::cli::output::{self, section};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{CommandResult, LoopControl, ShellContext};
use crate::domain::{MoneySource, Transaction, TransactionKind};

const DEFAULT_HISTORY_LIMIT: usize = 20;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "credit",
            "Add money to bank or cash",
            "credit <amount> <bank|cash> <category> [note...]",
            cmd_credit,
        ),
        CommandEntry::new(
            "debit",
            "Record spending from bank or cash",
            "debit <amount> <bank|cash> <category> [note...]",
            cmd_debit,
        ),
        CommandEntry::new(
            "history",
            "List recent transactions, newest first",
            "history [limit] [credit|debit] [bank|cash]",
            cmd_history,
        ),
        CommandEntry::new(
            "clear",
            "Delete every recorded transaction",
            "clear",
            cmd_clear,
        ),
        CommandEntry::new(
            "sync",
            "Retry saving changes the store rejected earlier",
            "sync",
            cmd_sync,
        ),
    ]
}

struct RecordArgs<'a> {
    amount: f64,
    source: MoneySource,
    category: &'a str,
    note: Option<String>,
}

fn parse_record_args<'a>(args: &[&'a str], usage: &str) -> Result<RecordArgs<'a>, CommandError> {
    if args.len() < 3 {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    }
    let note = (args.len() > 3).then(|| args[3..].join(" "));
    Ok(RecordArgs {
        amount: parse_amount(args[0])?,
        source: parse_source(args[1])?,
        category: args[2],
        note,
    })
}

fn cmd_credit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_record_args(args, "credit <amount> <bank|cash> <category> [note...]")?;
    let transaction = context.session()?.with_engine(|engine| {
        engine.record_credit_with_note(
            parsed.amount,
            parsed.category,
            parsed.source,
            parsed.note.as_deref(),
        )
    })??;
    io::print_success(format!(
        "{} added to {} balance.",
        format_amount(&context.config().currency_symbol, transaction.amount()),
        transaction.source()
    ));
    Ok(LoopControl::Continue)
}

fn cmd_debit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_record_args(args, "debit <amount> <bank|cash> <category> [note...]")?;
    let transaction = context.session()?.with_engine(|engine| {
        engine.record_debit_with_note(
            parsed.amount,
            parsed.category,
            parsed.source,
            parsed.note.as_deref(),
        )
    })??;
    io::print_success(format!(
        "{} spent from {}.",
        format_amount(&context.config().currency_symbol, transaction.amount()),
        transaction.source()
    ));
    Ok(LoopControl::Continue)
}

#[derive(Debug, Default, PartialEq)]
struct HistoryFilter {
    limit: Option<usize>,
    kind: Option<TransactionKind>,
    source: Option<MoneySource>,
}

impl HistoryFilter {
    fn parse(args: &[&str]) -> Result<Self, CommandError> {
        let mut filter = Self::default();
        for arg in args {
            if arg.chars().all(|c| c.is_ascii_digit()) {
                filter.limit = Some(parse_count(arg, "limit")?);
            } else if let Ok(kind) = arg.parse::<TransactionKind>() {
                filter.kind = Some(kind);
            } else if let Ok(source) = arg.parse::<MoneySource>() {
                filter.source = Some(source);
            } else {
                return Err(CommandError::InvalidArguments(format!(
                    "unexpected history filter `{arg}`"
                )));
            }
        }
        Ok(filter)
    }

    fn matches(&self, transaction: &Transaction) -> bool {
        self.kind.map_or(true, |kind| transaction.kind() == kind)
            && self.source.map_or(true, |source| transaction.source() == source)
    }
}

fn cmd_history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let filter = HistoryFilter::parse(args)?;
    let limit = filter.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let symbol = context.config().currency_symbol.clone();

    let (today, rows) = context.session()?.with_engine(|engine| {
        let rows: Vec<Transaction> = engine
            .transactions()
            .iter()
            .filter(|txn| filter.matches(txn))
            .take(limit)
            .cloned()
            .collect();
        (engine.today(), rows)
    })?;

    section("Transactions");
    if rows.is_empty() {
        io::print_info("No transactions yet.");
        return Ok(LoopControl::Continue);
    }
    for txn in rows {
        let amount = output::signed(format_signed(&symbol, &txn), txn.is_credit());
        io::print_info(format!(
            "  {:<10} {:>12}  {:<4}  {:<12} {}",
            date_label(txn.timestamp(), today),
            amount,
            txn.source(),
            txn.category(),
            txn.note().unwrap_or_default()
        ));
    }
    Ok(LoopControl::Continue)
}

fn cmd_clear(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = context.session()?;
    if !context.confirm("Delete all transactions? This cannot be undone.")? {
        io::print_info("Nothing deleted.");
        return Ok(LoopControl::Continue);
    }
    let dirty = session.with_engine(|engine| {
        engine.clear();
        engine.is_dirty()
    })?;
    if dirty {
        io::print_warning("History cleared in memory; the saved copy will be removed on `sync`.");
    } else {
        io::print_success("Transaction history cleared.");
    }
    Ok(LoopControl::Continue)
}

fn cmd_sync(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = context.session()?;
    let was_dirty = session.with_engine(|engine| engine.is_dirty())?;
    session.with_engine(|engine| engine.flush())??;
    if was_dirty {
        io::print_success("Pending changes saved.");
    } else {
        io::print_info("Everything is already saved.");
    }
    Ok(LoopControl::Continue)
}
