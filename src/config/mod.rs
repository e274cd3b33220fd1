use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::utils::{app_data_dir, config_file_in, ensure_dir};
use crate::errors::LedgerError;
use crate::utils::persistence::write_atomic;

pub const DEFAULT_STORAGE_KEY: &str = "@transactions";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Spending categories offered as quick picks when recording a debit.
pub const SUGGESTED_SPENDING_CATEGORIES: [&str; 5] =
    ["Food", "Transport", "Shopping", "Bills", "Misc"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_storage_key")]
    pub storage_key: String,
    #[serde(default = "Config::default_spending_categories")]
    pub spending_categories: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: Self::default_currency_symbol(),
            storage_key: Self::default_storage_key(),
            spending_categories: Self::default_spending_categories(),
        }
    }
}

impl Config {
    fn default_currency_symbol() -> String {
        DEFAULT_CURRENCY_SYMBOL.into()
    }

    fn default_storage_key() -> String {
        DEFAULT_STORAGE_KEY.into()
    }

    fn default_spending_categories() -> Vec<String> {
        SUGGESTED_SPENDING_CATEGORIES
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Rejects values the ledger engine cannot work with.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.storage_key.trim().is_empty() {
            return Err(LedgerError::Config("storage_key must not be empty".into()));
        }
        Ok(())
    }

    /// Applies a `key value` update as issued from the shell.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), LedgerError> {
        match key {
            "currency_symbol" | "currency" => self.currency_symbol = value.trim().to_string(),
            "storage_key" => self.storage_key = value.trim().to_string(),
            "spending_categories" | "categories" => {
                self.spending_categories = value
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            other => {
                return Err(LedgerError::Config(format!(
                    "unknown configuration key `{other}`"
                )))
            }
        }
        self.validate()
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, LedgerError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)
            .map_err(|err| LedgerError::Config(format!("{}: {err}", self.path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
