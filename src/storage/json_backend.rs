use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use crate::core::utils::{app_data_dir, ensure_dir, store_dir_in};
use crate::utils::persistence::write_atomic;

use super::{KeyValueStore, Result};

const VALUE_EXTENSION: &str = "json";
/// File stem used for the empty key. A lone `%` never comes out of escaping.
const EMPTY_KEY_STEM: &str = "%";

/// File-backed key-value store: every key lives in its own `<key>.json` file
/// under the store root and is replaced atomically on write.
///
/// Keys map to file names one-to-one. ASCII letters, digits, `-` and `_` are
/// kept as they are and every other byte is written as `%XX`, so `@ledger`
/// is stored in `%40ledger.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(|| store_dir_in(&app_data_dir()));
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn key_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_key(key), VALUE_EXTENSION))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        Ok(Some(data))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        write_atomic(&path, value)?;
        tracing::debug!(key, path = %path.display(), bytes = value.len(), "store entry written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!(key, path = %path.display(), "store entry removed");
        }
        Ok(())
    }
}

fn canonical_key(key: &str) -> String {
    if key.is_empty() {
        return EMPTY_KEY_STEM.into();
    }
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => stem.push(byte as char),
            _ => {
                let _ = write!(stem, "%{byte:02X}");
            }
        }
    }
    stem
}
