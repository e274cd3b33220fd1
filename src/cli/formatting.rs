use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::domain::Transaction;

const BAR_GLYPH: char = '#';

pub fn format_amount(symbol: &str, amount: f64) -> String {
    format!("{symbol}{amount:.2}")
}

/// Amount prefixed with `+` for credits and `-` for debits.
pub fn format_signed(symbol: &str, transaction: &Transaction) -> String {
    let sign = if transaction.is_credit() { '+' } else { '-' };
    format!("{sign}{}", format_amount(symbol, transaction.amount()))
}

/// Human label for a transaction date relative to `today`.
///
/// `Today`, `Yesterday`, `Mar 5` within the current year, `Mar 5, 2023` otherwise.
pub fn date_label(timestamp: DateTime<Utc>, today: NaiveDate) -> String {
    let date = timestamp.date_naive();
    if date == today {
        return "Today".into();
    }
    if date == today - Duration::days(1) {
        return "Yesterday".into();
    }
    if date.year() == today.year() {
        date.format("%b %-d").to_string()
    } else {
        date.format("%b %-d, %Y").to_string()
    }
}

/// Horizontal bar scaled so that `max` fills `width` glyphs.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    std::iter::repeat(BAR_GLYPH)
        .take(filled.clamp(1, width))
        .collect()
}
