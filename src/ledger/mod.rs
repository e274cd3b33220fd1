//! Ledger aggregate root and time-bucketed views over it.

#[allow(clippy::module_inception)]
pub mod ledger;
pub mod time_buckets;

pub use ledger::{Ledger, LoadReport};
pub use time_buckets::{month_label, weekday_slot, MONTH_WINDOW, WEEK_WINDOW_DAYS};
