pub mod aggregates;
pub mod common;
pub mod transaction;

pub use aggregates::{Aggregates, MonthTotal, SourceTotals, WeeklySeries, WEEKDAY_LABELS};
pub use common::{Displayable, Identifiable};
pub use transaction::{MoneySource, Transaction, TransactionId, TransactionKind};
