pub mod engine;
pub mod observers;
pub mod services;
pub mod session;
pub mod time;
pub mod utils;

pub use engine::LedgerEngine;
pub use observers::{ObserverRegistry, SubscriptionId};
pub use session::Session;
pub use time::{Clock, FixedClock, SystemClock};
