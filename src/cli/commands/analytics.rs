use chrono::Duration;

use crate::cli::commands::{parse_amount, parse_count};
use crate::cli::errors::CommandError;
use crate::cli::formatting::{bar, format_amount};
use crate::cli::io;
use crate::cli::output::section;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{CommandResult, LoopControl, ShellContext};
use crate::core::services::InsightsService;
use crate::domain::{MoneySource, WEEKDAY_LABELS};

const BAR_WIDTH: usize = 24;
const DEFAULT_INSIGHT_DAYS: usize = 30;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "balance",
            "Show balance and spend per source",
            "balance",
            cmd_balance,
        ),
        CommandEntry::new(
            "categories",
            "Show spend per category and the suggested categories",
            "categories",
            cmd_categories,
        ),
        CommandEntry::new(
            "weekly",
            "Chart spending over the last seven days",
            "weekly",
            cmd_weekly,
        ),
        CommandEntry::new(
            "monthly",
            "Chart spending per month, or look up specific months",
            "monthly [Jan Feb ...]",
            cmd_monthly,
        ),
        CommandEntry::new(
            "insights",
            "Summarize income, spend and savings rate",
            "insights [days]",
            cmd_insights,
        ),
        CommandEntry::new(
            "goal",
            "Show progress of the total balance towards a target",
            "goal <target>",
            cmd_goal,
        ),
    ]
}

fn cmd_balance(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let symbol = context.config().currency_symbol.clone();
    let aggregates = context.session()?.aggregates()?;

    section("Balances");
    for source in MoneySource::ALL {
        io::print_info(format!(
            "  {:<5} balance {:>12}   spent {:>12}",
            source,
            format_amount(&symbol, aggregates.balance_of(source)),
            format_amount(&symbol, aggregates.spend_of(source))
        ));
    }
    io::print_info(format!(
        "  total balance {:>12}",
        format_amount(&symbol, aggregates.balance.total())
    ));
    Ok(LoopControl::Continue)
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let symbol = context.config().currency_symbol.clone();
    let suggested = context.config().spending_categories.join(", ");
    let aggregates = context.session()?.aggregates()?;

    section("Spending by category");
    let ranked = aggregates.top_categories();
    if ranked.is_empty() {
        io::print_info("No spending recorded yet.");
    }
    let max = ranked.first().map(|(_, amount)| *amount).unwrap_or(0.0);
    for (name, amount) in &ranked {
        io::print_info(format!(
            "  {:<14} {:>12}  {}",
            name,
            format_amount(&symbol, *amount),
            bar(*amount, max, BAR_WIDTH)
        ));
    }
    io::print_info(format!("Suggested categories: {suggested}"));
    Ok(LoopControl::Continue)
}

fn cmd_weekly(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let symbol = context.config().currency_symbol.clone();
    let series = context.session()?.with_engine(|engine| engine.current_week())?;

    section("Last 7 days");
    let max = series.iter().copied().fold(0.0, f64::max);
    for (label, amount) in WEEKDAY_LABELS.iter().zip(series.iter()) {
        io::print_info(format!(
            "  {:<4} {:>12}  {}",
            label,
            format_amount(&symbol, *amount),
            bar(*amount, max, BAR_WIDTH)
        ));
    }
    Ok(LoopControl::Continue)
}

fn cmd_monthly(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let symbol = context.config().currency_symbol.clone();
    let session = context.session()?;

    if !args.is_empty() {
        let amounts = session.with_engine(|engine| engine.monthly_bucket(args))?;
        section("Monthly spend");
        for (label, amount) in args.iter().zip(amounts) {
            io::print_info(format!("  {:<4} {:>12}", label, format_amount(&symbol, amount)));
        }
        return Ok(LoopControl::Continue);
    }

    let totals = session.with_engine(|engine| engine.monthly_totals())?;
    section("Monthly spend");
    if totals.is_empty() {
        io::print_info("No spending recorded yet.");
        return Ok(LoopControl::Continue);
    }
    let max = totals.iter().map(|total| total.amount).fold(0.0, f64::max);
    for total in &totals {
        io::print_info(format!(
            "  {} {} {:>12}  {}",
            total.label,
            total.year,
            format_amount(&symbol, total.amount),
            bar(total.amount, max, BAR_WIDTH)
        ));
    }
    Ok(LoopControl::Continue)
}

fn cmd_insights(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let days = match args.first() {
        Some(raw) => parse_count(raw, "days")?,
        None => DEFAULT_INSIGHT_DAYS,
    };
    if days == 0 {
        return Err(CommandError::InvalidArguments("days must be at least 1".into()));
    }
    let symbol = context.config().currency_symbol.clone();
    let insight = context.session()?.with_engine(|engine| {
        let end = engine.today();
        let start = end - Duration::days(days as i64 - 1);
        InsightsService::summarize_range(engine.ledger(), start, end)
    })?;

    section(format!("Last {days} day(s)"));
    io::print_info(format!("  income         {:>12}", format_amount(&symbol, insight.income)));
    io::print_info(format!("  spent          {:>12}", format_amount(&symbol, insight.spent)));
    io::print_info(format!("  savings rate   {:>11.1}%", insight.savings_rate));
    io::print_info(format!(
        "  daily average  {:>12}",
        format_amount(&symbol, insight.daily_average)
    ));
    if let Some((category, amount)) = insight.top_category {
        io::print_info(format!(
            "  top category   {} ({})",
            category,
            format_amount(&symbol, amount)
        ));
    }
    Ok(LoopControl::Continue)
}

fn cmd_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(CommandError::InvalidArguments("usage: goal <target>".into()));
    };
    let target = parse_amount(raw)?;
    if target <= 0.0 {
        return Err(CommandError::InvalidArguments("target must be positive".into()));
    }
    let symbol = context.config().currency_symbol.clone();
    let saved = context.session()?.aggregates()?.balance.total();
    let progress = InsightsService::progress_percent(saved.max(0.0), target);

    io::print_info(format!(
        "{} of {} saved ({progress:.0}%)  {}",
        format_amount(&symbol, saved),
        format_amount(&symbol, target),
        bar(progress, 100.0, BAR_WIDTH)
    ));
    Ok(LoopControl::Continue)
}
