use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::domain::{MonthTotal, Transaction, WeeklySeries};

/// Number of calendar days, today included, covered by the weekly series.
pub const WEEK_WINDOW_DAYS: i64 = 7;
/// Maximum number of months reported by the monthly series.
pub const MONTH_WINDOW: usize = 6;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Slot index for a date: 0 = Monday through 6 = Sunday.
pub fn weekday_slot(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

pub fn month_label(month: u32) -> &'static str {
    MONTH_LABELS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("???")
}

/// First day of the trailing weekly window ending on `now`'s date.
pub fn week_window_start(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive() - Duration::days(WEEK_WINDOW_DAYS - 1)
}

/// Sums debits dated within the trailing seven calendar days into weekday slots.
pub fn weekly_bucket<'a, I>(transactions: I, now: DateTime<Utc>) -> WeeklySeries
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let today = now.date_naive();
    let start = week_window_start(now);
    let mut series = [0.0; 7];
    for txn in transactions.into_iter().filter(|txn| txn.is_debit()) {
        let day = txn.timestamp().date_naive();
        if day < start || day > today {
            continue;
        }
        series[weekday_slot(day)] += txn.amount();
    }
    series
}

/// Debit totals per calendar month for the most recent months present, oldest first.
pub fn monthly_totals<'a, I>(transactions: I) -> Vec<MonthTotal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for txn in transactions.into_iter().filter(|txn| txn.is_debit()) {
        let date = txn.timestamp().date_naive();
        *totals.entry((date.year(), date.month())).or_insert(0.0) += txn.amount();
    }
    let skip = totals.len().saturating_sub(MONTH_WINDOW);
    totals
        .into_iter()
        .skip(skip)
        .map(|((year, month), amount)| MonthTotal {
            year,
            month,
            label: month_label(month).to_string(),
            amount,
        })
        .collect()
}

/// Looks up each requested month label among `totals`; unknown labels map to zero.
pub fn monthly_bucket<S: AsRef<str>>(totals: &[MonthTotal], month_labels: &[S]) -> Vec<f64> {
    month_labels
        .iter()
        .map(|label| {
            let wanted = label.as_ref().trim();
            totals
                .iter()
                .rev()
                .find(|total| total.label.eq_ignore_ascii_case(wanted))
                .map(|total| total.amount)
                .unwrap_or(0.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MoneySource, TransactionKind};
    use chrono::TimeZone;

    fn debit_on(year: i32, month: u32, day: u32, amount: f64) -> Transaction {
        let ts = Utc.with_ymd_and_hms(year, month, day, 9, 30, 0).unwrap();
        Transaction::new(TransactionKind::Debit, amount, "Food", MoneySource::Cash, None, ts)
            .unwrap()
    }

    #[test]
    fn weekday_slots_start_on_monday() {
        // 2024-03-04 is a Monday, 2024-03-10 a Sunday.
        assert_eq!(weekday_slot(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()), 0);
        assert_eq!(weekday_slot(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()), 6);
    }

    #[test]
    fn weekly_bucket_ignores_old_future_and_credit_entries() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap();
        let credit = Transaction::new(
            TransactionKind::Credit,
            500.0,
            "Salary",
            MoneySource::Bank,
            None,
            now,
        )
        .unwrap();
        let transactions = vec![
            debit_on(2024, 3, 10, 10.0),
            debit_on(2024, 3, 4, 4.0),
            debit_on(2024, 3, 3, 99.0),
            debit_on(2024, 3, 11, 77.0),
            credit,
        ];
        let series = weekly_bucket(&transactions, now);
        assert_eq!(series, [4.0, 0.0, 0.0, 0.0, 0.0, 0.0, 10.0]);
    }

    #[test]
    fn monthly_totals_keep_latest_six_months_in_order() {
        let transactions: Vec<Transaction> = (1..=8)
            .map(|month| debit_on(2024, month, 15, month as f64))
            .collect();
        let totals = monthly_totals(&transactions);
        let labels: Vec<&str> = totals.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Mar", "Apr", "May", "Jun", "Jul", "Aug"]);
        assert_eq!(totals.last().unwrap().amount, 8.0);
    }

    #[test]
    fn monthly_totals_do_not_merge_years() {
        let transactions = vec![debit_on(2023, 1, 5, 10.0), debit_on(2024, 1, 5, 20.0)];
        let totals = monthly_totals(&transactions);
        assert_eq!(totals.len(), 2);
        assert_eq!(monthly_bucket(&totals, &["jan", "Feb"]), vec![20.0, 0.0]);
    }
}
