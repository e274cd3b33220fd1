use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        Aggregates, Identifiable, MoneySource, MonthTotal, Transaction, TransactionKind,
        WeeklySeries,
    },
    errors::LedgerError,
};

use super::time_buckets;

/// Ordered, append-only collection of transactions, newest first.
///
/// Serializes as a bare JSON array so the persisted value is exactly the list
/// of transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

/// Outcome of hydrating a ledger from its serialized form.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub ledger: Ledger,
    pub warnings: Vec<String>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already ordered (newest first) sequence.
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    /// Parses the persisted array. Entries that fail to decode, including those
    /// that break the transaction invariants, are skipped and reported as
    /// warnings; a payload that is not an array at all is an error.
    pub fn from_json(raw: &str) -> Result<LoadReport, LedgerError> {
        let entries: Vec<serde_json::Value> = serde_json::from_str(raw)?;
        let mut report = LoadReport::default();
        for (index, entry) in entries.into_iter().enumerate() {
            let txn: Transaction = match serde_json::from_value(entry) {
                Ok(txn) => txn,
                Err(err) => {
                    report
                        .warnings
                        .push(format!("entry {index} skipped: {err}"));
                    continue;
                }
            };
            report.ledger.transactions.push(txn);
        }
        Ok(report)
    }

    pub fn to_json(&self) -> Result<String, LedgerError> {
        Ok(serde_json::to_string(&self.transactions)?)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id() == id)
    }

    pub(crate) fn prepend(&mut self, transaction: Transaction) {
        self.transactions.insert(0, transaction);
    }

    pub(crate) fn clear(&mut self) {
        self.transactions.clear();
    }

    pub fn aggregates(&self) -> Aggregates {
        Aggregates::from_transactions(&self.transactions)
    }

    /// Credits minus debits for a single source.
    pub fn balance(&self, source: MoneySource) -> f64 {
        self.transactions
            .iter()
            .filter(|txn| txn.source() == source)
            .map(Transaction::signed_amount)
            .sum()
    }

    pub fn filter_by_type(&self, kind: TransactionKind) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|txn| txn.kind() == kind)
            .collect()
    }

    pub fn filter_by_source(&self, source: MoneySource) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|txn| txn.source() == source)
            .collect()
    }

    /// Transactions whose UTC date falls within `start..=end`.
    pub fn filter_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|txn| {
                let date = txn.timestamp().date_naive();
                date >= start && date <= end
            })
            .collect()
    }

    pub fn total_spent(&self) -> f64 {
        self.total_of(TransactionKind::Debit)
    }

    pub fn total_credited(&self) -> f64 {
        self.total_of(TransactionKind::Credit)
    }

    fn total_of(&self, kind: TransactionKind) -> f64 {
        self.transactions
            .iter()
            .filter(|txn| txn.kind() == kind)
            .map(Transaction::amount)
            .sum()
    }

    pub fn weekly_bucket(&self, now: DateTime<Utc>) -> WeeklySeries {
        time_buckets::weekly_bucket(&self.transactions, now)
    }

    pub fn monthly_totals(&self) -> Vec<MonthTotal> {
        time_buckets::monthly_totals(&self.transactions)
    }

    pub fn monthly_bucket<S: AsRef<str>>(&self, month_labels: &[S]) -> Vec<f64> {
        time_buckets::monthly_bucket(&self.monthly_totals(), month_labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 8, 0, 0).unwrap()
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        for (kind, amount, category, source, day) in [
            (TransactionKind::Credit, 1000.0, "Salary", MoneySource::Bank, 1),
            (TransactionKind::Debit, 200.0, "Groceries", MoneySource::Bank, 2),
            (TransactionKind::Credit, 50.0, "Gift", MoneySource::Cash, 3),
            (TransactionKind::Debit, 20.0, "Transport", MoneySource::Cash, 4),
        ] {
            let txn = Transaction::new(kind, amount, category, source, None, ts(day)).unwrap();
            ledger.prepend(txn);
        }
        ledger
    }

    #[test]
    fn balances_follow_signed_sums_per_source() {
        let ledger = sample_ledger();
        assert_eq!(ledger.balance(MoneySource::Bank), 800.0);
        assert_eq!(ledger.balance(MoneySource::Cash), 30.0);
        let aggregates = ledger.aggregates();
        assert_eq!(aggregates.balance_of(MoneySource::Bank), 800.0);
        assert_eq!(aggregates.spend_of(MoneySource::Cash), 20.0);
        assert_eq!(ledger.total_spent(), 220.0);
        assert_eq!(ledger.total_credited(), 1050.0);
    }

    #[test]
    fn filters_preserve_newest_first_order() {
        let ledger = sample_ledger();
        let debits = ledger.filter_by_type(TransactionKind::Debit);
        let categories: Vec<&str> = debits.iter().map(|txn| txn.category()).collect();
        assert_eq!(categories, vec!["Transport", "Groceries"]);

        let cash = ledger.filter_by_source(MoneySource::Cash);
        assert_eq!(cash.len(), 2);

        let window = ledger.filter_by_date_range(
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
        );
        let categories: Vec<&str> = window.iter().map(|txn| txn.category()).collect();
        assert_eq!(categories, vec!["Gift", "Groceries"]);
    }

    #[test]
    fn from_json_skips_invalid_entries() {
        let raw = r#"[
            {"id":"a","type":"debit","amount":5,"category":"Food","source":"cash","timestamp":"2024-05-01T00:00:00Z"},
            {"id":"b","type":"debit","amount":-5,"category":"Food","source":"cash","timestamp":"2024-05-01T00:00:00Z"},
            {"id":"c","type":"transfer","amount":5,"category":"Food","source":"cash","timestamp":"2024-05-01T00:00:00Z"}
        ]"#;
        let report = Ledger::from_json(raw).expect("array parses");
        assert_eq!(report.ledger.len(), 1);
        assert_eq!(report.warnings.len(), 2);
        assert!(report.ledger.transaction("a").is_some());
    }

    #[test]
    fn from_json_rejects_non_array_payload() {
        assert!(Ledger::from_json("{\"oops\":true}").is_err());
        assert!(Ledger::from_json("not json").is_err());
    }
}
