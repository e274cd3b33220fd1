//! Derived figures shown alongside the ledger: savings rate, goal progress and averages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::Ledger;

/// Headline numbers for a period of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingInsight {
    pub income: f64,
    pub spent: f64,
    pub savings_rate: f64,
    pub daily_average: f64,
    pub top_category: Option<(String, f64)>,
}

pub struct InsightsService;

impl InsightsService {
    /// Share of income left after expenses, as a percentage. Zero without income.
    pub fn savings_rate(income: f64, expenses: f64) -> f64 {
        if income == 0.0 {
            return 0.0;
        }
        ((income - expenses) / income) * 100.0
    }

    /// Progress towards a target as a percentage, capped at 100.
    pub fn progress_percent(current: f64, target: f64) -> f64 {
        if target == 0.0 {
            return 0.0;
        }
        ((current / target) * 100.0).min(100.0)
    }

    pub fn daily_average(total: f64, days: u32) -> f64 {
        if days == 0 {
            return 0.0;
        }
        total / f64::from(days)
    }

    /// Summarizes transactions dated within `start..=end`.
    pub fn summarize_range(ledger: &Ledger, start: NaiveDate, end: NaiveDate) -> SpendingInsight {
        let window = Ledger::from_transactions(
            ledger
                .filter_by_date_range(start, end)
                .into_iter()
                .cloned()
                .collect(),
        );
        let days = (end - start).num_days().max(0) as u32 + 1;
        Self::summarize(&window, days)
    }

    /// Summarizes the whole ledger, averaging spend over `days`.
    pub fn summarize(ledger: &Ledger, days: u32) -> SpendingInsight {
        let income = ledger.total_credited();
        let spent = ledger.total_spent();
        let aggregates = ledger.aggregates();
        let top_category = aggregates
            .top_categories()
            .first()
            .map(|(name, amount)| (name.to_string(), *amount));
        SpendingInsight {
            income,
            spent,
            savings_rate: Self::savings_rate(income, spent),
            daily_average: Self::daily_average(spent, days),
            top_category,
        }
    }
}
