use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::transaction::{MoneySource, Transaction, TransactionKind};

/// Seven day-of-week slots, Monday first.
pub type WeeklySeries = [f64; 7];

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// One value per money source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceTotals {
    pub bank: f64,
    pub cash: f64,
}

impl SourceTotals {
    pub fn get(&self, source: MoneySource) -> f64 {
        match source {
            MoneySource::Bank => self.bank,
            MoneySource::Cash => self.cash,
        }
    }

    fn add(&mut self, source: MoneySource, amount: f64) {
        match source {
            MoneySource::Bank => self.bank += amount,
            MoneySource::Cash => self.cash += amount,
        }
    }

    pub fn total(&self) -> f64 {
        self.bank + self.cash
    }
}

/// Derived summary of a transaction sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    pub balance: SourceTotals,
    pub spend: SourceTotals,
    /// Debit amounts grouped by category. Credits never contribute.
    pub category_totals: BTreeMap<String, f64>,
}

impl Aggregates {
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut aggregates = Aggregates::default();
        for txn in transactions {
            aggregates.balance.add(txn.source(), txn.signed_amount());
            if txn.kind() == TransactionKind::Debit {
                aggregates.spend.add(txn.source(), txn.amount());
                *aggregates
                    .category_totals
                    .entry(txn.category().to_string())
                    .or_insert(0.0) += txn.amount();
            }
        }
        aggregates
    }

    pub fn balance_of(&self, source: MoneySource) -> f64 {
        self.balance.get(source)
    }

    pub fn spend_of(&self, source: MoneySource) -> f64 {
        self.spend.get(source)
    }

    /// Categories ordered by descending spend, ties broken by name.
    pub fn top_categories(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self
            .category_totals
            .iter()
            .map(|(name, amount)| (name.as_str(), *amount))
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

/// Spend total for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTotal {
    pub year: i32,
    pub month: u32,
    /// Short English month name, e.g. `Jan`.
    pub label: String,
    pub amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn txn(kind: TransactionKind, amount: f64, category: &str, source: MoneySource) -> Transaction {
        Transaction::new(kind, amount, category, source, None, Utc::now()).unwrap()
    }

    #[test]
    fn category_totals_exclude_credits() {
        let transactions = vec![
            txn(TransactionKind::Debit, 50.0, "Food", MoneySource::Bank),
            txn(TransactionKind::Debit, 30.0, "Food", MoneySource::Cash),
            txn(TransactionKind::Credit, 100.0, "Salary", MoneySource::Bank),
        ];
        let aggregates = Aggregates::from_transactions(&transactions);
        assert_eq!(aggregates.category_totals.len(), 1);
        assert_eq!(aggregates.category_totals.get("Food"), Some(&80.0));
        assert_eq!(aggregates.balance.bank, 50.0);
        assert_eq!(aggregates.balance.cash, -30.0);
        assert_eq!(aggregates.spend.total(), 80.0);
    }

    #[test]
    fn top_categories_sorted_by_amount() {
        let transactions = vec![
            txn(TransactionKind::Debit, 5.0, "Misc", MoneySource::Cash),
            txn(TransactionKind::Debit, 40.0, "Bills", MoneySource::Bank),
            txn(TransactionKind::Debit, 5.0, "Food", MoneySource::Cash),
        ];
        let aggregates = Aggregates::from_transactions(&transactions);
        let names: Vec<&str> = aggregates.top_categories().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Bills", "Food", "Misc"]);
    }
}
