use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable};
use crate::errors::LedgerError;

/// Opaque transaction identifier. Freshly recorded transactions receive a UUID v4,
/// but any string is accepted when hydrating previously stored data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "credit",
            TransactionKind::Debit => "debit",
        }
    }

    /// Multiplier applied to an amount when deriving balances.
    pub fn sign(&self) -> f64 {
        match self {
            TransactionKind::Credit => 1.0,
            TransactionKind::Debit => -1.0,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "credit" | "in" | "added" => Ok(TransactionKind::Credit),
            "debit" | "out" | "spent" => Ok(TransactionKind::Debit),
            other => Err(LedgerError::validation(format!(
                "unknown transaction type `{other}` (expected credit or debit)"
            ))),
        }
    }
}

/// Money pool a transaction draws from or adds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoneySource {
    Bank,
    Cash,
}

impl MoneySource {
    pub const ALL: [MoneySource; 2] = [MoneySource::Bank, MoneySource::Cash];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoneySource::Bank => "bank",
            MoneySource::Cash => "cash",
        }
    }
}

impl fmt::Display for MoneySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoneySource {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bank" => Ok(MoneySource::Bank),
            "cash" => Ok(MoneySource::Cash),
            other => Err(LedgerError::validation(format!(
                "unknown source `{other}` (expected bank or cash)"
            ))),
        }
    }
}

/// A single recorded credit or debit. Fields are read-only once constructed.
///
/// Deserializing goes through the same amount and category checks as
/// [`Transaction::new`], so a stored entry with `amount: 0` or a blank
/// category fails to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredTransaction")]
pub struct Transaction {
    id: TransactionId,
    #[serde(rename = "type")]
    kind: TransactionKind,
    amount: f64,
    category: String,
    source: MoneySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Builds a validated transaction with a freshly generated identifier.
    pub fn new(
        kind: TransactionKind,
        amount: f64,
        category: &str,
        source: MoneySource,
        note: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, LedgerError> {
        validate_amount(amount)?;
        let category = normalize_category(category)?;
        let note = note
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Ok(Self {
            id: TransactionId::generate(),
            kind,
            amount,
            category,
            source,
            note,
            timestamp,
        })
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Amount with the sign applied by transaction kind.
    pub fn signed_amount(&self) -> f64 {
        self.kind.sign() * self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn source(&self) -> MoneySource {
        self.source
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_credit(&self) -> bool {
        self.kind == TransactionKind::Credit
    }

    pub fn is_debit(&self) -> bool {
        self.kind == TransactionKind::Debit
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("txn:{} [{} {}]", self.id, self.kind, self.source)
    }
}

/// Persisted shape of a transaction before its invariants are checked.
#[derive(Deserialize)]
struct StoredTransaction {
    id: TransactionId,
    #[serde(rename = "type")]
    kind: TransactionKind,
    amount: f64,
    category: String,
    source: MoneySource,
    #[serde(default)]
    note: Option<String>,
    timestamp: DateTime<Utc>,
}

impl TryFrom<StoredTransaction> for Transaction {
    type Error = LedgerError;

    fn try_from(stored: StoredTransaction) -> Result<Self, Self::Error> {
        validate_amount(stored.amount)?;
        let category = normalize_category(&stored.category)?;
        Ok(Self {
            id: stored.id,
            kind: stored.kind,
            amount: stored.amount,
            category,
            source: stored.source,
            note: stored.note,
            timestamp: stored.timestamp,
        })
    }
}

/// Note attached to a recorded transaction when the caller leaves it blank.
pub fn default_note(
    kind: TransactionKind,
    amount: f64,
    source: MoneySource,
    currency_symbol: &str,
) -> String {
    match kind {
        TransactionKind::Credit => format!("Added {currency_symbol}{amount} to {source}"),
        TransactionKind::Debit => format!("Spent {currency_symbol}{amount} from {source}"),
    }
}

fn validate_amount(amount: f64) -> Result<(), LedgerError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(LedgerError::validation(
            "amount must be a positive number",
        ));
    }
    Ok(())
}

fn normalize_category(category: &str) -> Result<String, LedgerError> {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation("category must not be empty"));
    }
    Ok(trimmed.to_string())
}
