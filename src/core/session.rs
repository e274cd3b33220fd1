use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    config::Config,
    core::{engine::LedgerEngine, time::Clock},
    domain::{Aggregates, MoneySource, Transaction},
    errors::{LedgerError, Result},
    storage::KeyValueStore,
};

/// Login-to-logout owner of one user's ledger engine.
///
/// All access goes through a per-session mutex, so a mutation and its store
/// write complete before the next mutation starts.
pub struct Session {
    user: String,
    engine: Mutex<LedgerEngine>,
}

impl Session {
    pub fn login(
        user: impl Into<String>,
        store: Arc<dyn KeyValueStore>,
        config: &Config,
    ) -> Result<Self> {
        Self::login_with_clock(user, store, config, None)
    }

    pub fn login_with_clock(
        user: impl Into<String>,
        store: Arc<dyn KeyValueStore>,
        config: &Config,
        clock: Option<Arc<dyn Clock>>,
    ) -> Result<Self> {
        let user = user.into().trim().to_string();
        if user.is_empty() {
            return Err(LedgerError::validation("user name must not be empty"));
        }
        config.validate()?;
        let mut engine = LedgerEngine::new(store, config);
        if let Some(clock) = clock {
            engine = engine.with_clock(clock);
        }
        engine.load();
        tracing::info!(%user, "session started");
        Ok(Self {
            user,
            engine: Mutex::new(engine),
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Runs `f` with exclusive access to the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut LedgerEngine) -> R) -> Result<R> {
        let mut engine = self.lock()?;
        Ok(f(&mut engine))
    }

    pub fn record_credit(
        &self,
        amount: f64,
        category: &str,
        source: MoneySource,
    ) -> Result<Transaction> {
        self.lock()?.record_credit(amount, category, source)
    }

    pub fn record_debit(
        &self,
        amount: f64,
        category: &str,
        source: MoneySource,
    ) -> Result<Transaction> {
        self.lock()?.record_debit(amount, category, source)
    }

    pub fn aggregates(&self) -> Result<Aggregates> {
        Ok(self.lock()?.aggregates().clone())
    }

    /// Ends the session and wipes the persisted ledger entry.
    pub fn logout(self) -> Result<()> {
        let mut engine = self
            .engine
            .into_inner()
            .map_err(|_| LedgerError::Persistence("session lock poisoned".into()))?;
        engine.clear();
        if engine.is_dirty() {
            tracing::warn!(user = %self.user, "logout could not clear the stored ledger");
        }
        tracing::info!(user = %self.user, "session ended");
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, LedgerEngine>> {
        self.engine
            .lock()
            .map_err(|_| LedgerError::Persistence("session lock poisoned".into()))
    }
}
