//! The ledger engine: validated mutations over a persisted transaction list.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    config::Config,
    core::{
        observers::{ObserverRegistry, SubscriptionId},
        time::{Clock, SystemClock},
    },
    domain::{
        transaction::default_note, Aggregates, Displayable, MoneySource, MonthTotal,
        Transaction, TransactionKind, WeeklySeries,
    },
    errors::{LedgerError, Result},
    ledger::Ledger,
    storage::KeyValueStore,
};

/// Relative slack, in units of the available balance, within which a debit
/// counts as spending exactly that balance. Covers the few ulps of drift left
/// by summing decimal amounts, e.g. `0.7 + 0.1` landing just under `0.8`.
const EXACT_SPEND_ULPS: f64 = 4.0 * f64::EPSILON;

/// Store operation still owed after a failed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingFlush {
    Write,
    Remove,
}

/// Owns one user's ledger, keeps its aggregates current and mirrors every
/// change into the key-value store under a single key.
pub struct LedgerEngine {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    storage_key: String,
    currency_symbol: String,
    ledger: Ledger,
    aggregates: Aggregates,
    observers: ObserverRegistry,
    pending: Option<PendingFlush>,
}

impl LedgerEngine {
    /// Creates an empty engine; call [`LedgerEngine::load`] to hydrate it.
    pub fn new(store: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            storage_key: config.storage_key.clone(),
            currency_symbol: config.currency_symbol.clone(),
            ledger: Ledger::new(),
            aggregates: Aggregates::default(),
            observers: ObserverRegistry::new(),
            pending: None,
        }
    }

    /// Creates and hydrates an engine in one step.
    pub fn open(store: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        let mut engine = Self::new(store, config);
        engine.load();
        engine
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the in-memory ledger with the persisted one.
    ///
    /// Never fails: a missing entry, unreadable store or malformed payload all
    /// produce an empty ledger, logged at `warn`.
    pub fn load(&mut self) -> &Ledger {
        self.ledger = match self.store.get(&self.storage_key) {
            Ok(Some(raw)) => match Ledger::from_json(&raw) {
                Ok(report) => {
                    for warning in &report.warnings {
                        tracing::warn!(key = %self.storage_key, "{warning}");
                    }
                    report.ledger
                }
                Err(err) => {
                    tracing::warn!(key = %self.storage_key, error = %err, "stored ledger unreadable, starting empty");
                    Ledger::new()
                }
            },
            Ok(None) => Ledger::new(),
            Err(err) => {
                tracing::warn!(key = %self.storage_key, error = %err, "store unavailable, starting empty");
                Ledger::new()
            }
        };
        self.pending = None;
        tracing::info!(
            key = %self.storage_key,
            transactions = self.ledger.len(),
            "ledger loaded"
        );
        self.refresh();
        &self.ledger
    }

    pub fn record_credit(
        &mut self,
        amount: f64,
        category: &str,
        source: MoneySource,
    ) -> Result<Transaction> {
        self.record(TransactionKind::Credit, amount, category, source, None)
    }

    pub fn record_credit_with_note(
        &mut self,
        amount: f64,
        category: &str,
        source: MoneySource,
        note: Option<&str>,
    ) -> Result<Transaction> {
        self.record(TransactionKind::Credit, amount, category, source, note)
    }

    /// Records spending. Fails with [`LedgerError::InsufficientFunds`] when the
    /// amount exceeds the current balance of `source`.
    pub fn record_debit(
        &mut self,
        amount: f64,
        category: &str,
        source: MoneySource,
    ) -> Result<Transaction> {
        self.record(TransactionKind::Debit, amount, category, source, None)
    }

    pub fn record_debit_with_note(
        &mut self,
        amount: f64,
        category: &str,
        source: MoneySource,
        note: Option<&str>,
    ) -> Result<Transaction> {
        self.record(TransactionKind::Debit, amount, category, source, note)
    }

    fn record(
        &mut self,
        kind: TransactionKind,
        amount: f64,
        category: &str,
        source: MoneySource,
        note: Option<&str>,
    ) -> Result<Transaction> {
        let note = note
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_note(kind, amount, source, &self.currency_symbol));
        let transaction = Transaction::new(kind, amount, category, source, Some(note), self.clock.now())?;

        if kind == TransactionKind::Debit {
            let available = self.aggregates.balance_of(source);
            if exceeds_balance(transaction.amount(), available) {
                tracing::debug!(%source, requested = amount, available, "debit rejected");
                return Err(LedgerError::InsufficientFunds {
                    pool: source,
                    requested: amount,
                    available,
                });
            }
        }

        self.ledger.prepend(transaction.clone());
        tracing::debug!(
            transaction = %transaction.display_label(),
            amount,
            category = transaction.category(),
            "transaction recorded"
        );
        self.persist(PendingFlush::Write);
        self.refresh();
        Ok(transaction)
    }

    /// Empties the ledger and removes the persisted entry. Safe to repeat.
    pub fn clear(&mut self) {
        let had_entries = !self.ledger.is_empty();
        self.ledger.clear();
        self.persist(PendingFlush::Remove);
        if had_entries {
            tracing::info!(key = %self.storage_key, "ledger cleared");
        }
        self.refresh();
    }

    /// Retries a store write that failed earlier. A no-op when nothing is owed.
    pub fn flush(&mut self) -> Result<()> {
        match self.pending {
            None => Ok(()),
            Some(op) => {
                self.write_through(op)?;
                self.pending = None;
                Ok(())
            }
        }
    }

    /// True when the in-memory ledger is ahead of the store.
    pub fn is_dirty(&self) -> bool {
        self.pending.is_some()
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.ledger.transactions()
    }

    pub fn balance(&self, source: MoneySource) -> f64 {
        self.aggregates.balance_of(source)
    }

    pub fn filter_by_type(&self, kind: TransactionKind) -> Vec<&Transaction> {
        self.ledger.filter_by_type(kind)
    }

    pub fn weekly_bucket(&self, now: DateTime<Utc>) -> WeeklySeries {
        self.ledger.weekly_bucket(now)
    }

    /// Weekly series anchored at the engine clock's current time.
    pub fn current_week(&self) -> WeeklySeries {
        self.weekly_bucket(self.clock.now())
    }

    pub fn monthly_totals(&self) -> Vec<MonthTotal> {
        self.ledger.monthly_totals()
    }

    pub fn monthly_bucket<S: AsRef<str>>(&self, month_labels: &[S]) -> Vec<f64> {
        self.ledger.monthly_bucket(month_labels)
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(&Aggregates) + Send + 'static,
    {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn persist(&mut self, op: PendingFlush) {
        match self.write_through(op) {
            Ok(()) => self.pending = None,
            Err(err) => {
                tracing::warn!(
                    key = %self.storage_key,
                    error = %err,
                    "ledger change kept in memory only"
                );
                self.pending = Some(op);
            }
        }
    }

    fn write_through(&self, op: PendingFlush) -> Result<()> {
        match op {
            PendingFlush::Remove if self.ledger.is_empty() => self.store.remove(&self.storage_key),
            _ => {
                let json = self.ledger.to_json()?;
                self.store.set(&self.storage_key, &json)
            }
        }
    }

    fn refresh(&mut self) {
        self.aggregates = self.ledger.aggregates();
        self.observers.notify(&self.aggregates);
    }
}

/// True when debiting `amount` would take `available` below zero. An empty or
/// negative pool covers nothing; otherwise only a gap of a few ulps is forgiven.
fn exceeds_balance(amount: f64, available: f64) -> bool {
    if amount <= available {
        return false;
    }
    available <= 0.0 || amount - available > available * EXACT_SPEND_ULPS
}
