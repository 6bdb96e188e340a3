//! Persistent signature history on top of a string key-value store.
//!
//! Records are stored as JSON under `<prefix><id>`; the ordered id list
//! (newest first) lives under `<prefix>history`. In the browser the store is
//! `localStorage`; tests and native hosts use [`MemoryStore`].

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::stroke::SignatureData;
use crate::util::clock::now_ms;

pub const DEFAULT_KEY_PREFIX: &str = "signature_";
pub const DEFAULT_MAX_HISTORY: usize = 50;
const HISTORY_SUFFIX: &str = "history";
const ID_PREFIX: &str = "sig_";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing store refused the operation (quota, privacy mode, ...).
    #[error("storage backend error: {0}")]
    Backend(String),
    /// No backing store is available in this environment.
    #[error("storage is unavailable")]
    Unavailable,
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Minimal string key-value store.
pub trait KeyValueStore {
    /// # Errors
    ///
    /// Returns `Err` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns `Err` if the backend rejects the write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `Err` if the backend rejects the removal.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Process-local store backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// The window's `localStorage`.
#[cfg(feature = "web")]
pub struct LocalStorage {
    inner: web_sys::Storage,
}

#[cfg(feature = "web")]
impl LocalStorage {
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] outside a window or when storage
    /// access is denied.
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        match window.local_storage() {
            Ok(Some(inner)) => Ok(Self { inner }),
            Ok(None) | Err(_) => Err(StorageError::Unavailable),
        }
    }
}

#[cfg(feature = "web")]
fn backend_error(err: &wasm_bindgen::JsValue) -> StorageError {
    StorageError::Backend(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

#[cfg(feature = "web")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key).map_err(|e| backend_error(&e))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set_item(key, value).map_err(|e| backend_error(&e))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner.remove_item(key).map_err(|e| backend_error(&e))
    }
}

/// One saved signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRecord {
    pub id: String,
    pub data: SignatureData,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Optional preview image as a data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl SignatureRecord {
    fn matches(&self, query: &str) -> bool {
        self.id.contains(query) || self.tags.iter().any(|tag| tag.contains(query))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageOptions {
    pub key_prefix: String,
    pub max_history: usize,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self { key_prefix: DEFAULT_KEY_PREFIX.to_owned(), max_history: DEFAULT_MAX_HISTORY }
    }
}

/// Record count and total serialized size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    pub count: usize,
    /// Sum of the stored JSON lengths in bytes.
    pub estimated_size: usize,
}

pub struct SignatureStorage<K: KeyValueStore> {
    store: K,
    key_prefix: String,
    max_history: usize,
}

impl<K: KeyValueStore> SignatureStorage<K> {
    /// An empty prefix or zero `max_history` falls back to the defaults.
    #[must_use]
    pub fn new(store: K, options: StorageOptions) -> Self {
        let key_prefix = if options.key_prefix.is_empty() { DEFAULT_KEY_PREFIX.to_owned() } else { options.key_prefix };
        let max_history = if options.max_history == 0 { DEFAULT_MAX_HISTORY } else { options.max_history };
        Self { store, key_prefix, max_history }
    }

    #[must_use]
    pub fn store(&self) -> &K {
        &self.store
    }

    /// Persist `data` as a new record at the head of the history.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the record cannot be serialized or written.
    pub fn save(&mut self, data: SignatureData, tags: Vec<String>) -> Result<String, StorageError> {
        let id = format!("{ID_PREFIX}{}", uuid::Uuid::new_v4().simple());
        let record = SignatureRecord { id: id.clone(), data, created_at: now_ms(), thumbnail: None, tags };
        self.put(&record)?;
        Ok(id)
    }

    /// Persist a fully formed record (e.g. one carrying a thumbnail).
    ///
    /// # Errors
    ///
    /// Returns `Err` if the record cannot be serialized or written.
    pub fn put(&mut self, record: &SignatureRecord) -> Result<(), StorageError> {
        let raw = serde_json::to_string(record)?;
        self.store.set(&self.record_key(&record.id), &raw)?;
        self.push_history(&record.id)
    }

    /// Load one record. Missing or unparseable records yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `Err` only if the backend cannot be read.
    pub fn load(&self, id: &str) -> Result<Option<SignatureRecord>, StorageError> {
        let Some(raw) = self.store.get(&self.record_key(id))? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                log::error!("storage: failed to parse record {id}: {e}");
                Ok(None)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `Err` if the backend rejects the removal.
    pub fn delete(&mut self, id: &str) -> Result<(), StorageError> {
        self.store.remove(&self.record_key(id))?;
        let mut ids = self.history_ids()?;
        let before = ids.len();
        ids.retain(|existing| existing != id);
        if ids.len() != before {
            self.write_history(&ids)?;
        }
        Ok(())
    }

    /// All loadable records, newest first.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend cannot be read.
    pub fn history(&self) -> Result<Vec<SignatureRecord>, StorageError> {
        let mut records = Vec::new();
        for id in self.history_ids()? {
            if let Some(record) = self.load(&id)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Remove every record in the history and the history list itself.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend rejects a removal.
    pub fn clear_history(&mut self) -> Result<(), StorageError> {
        for id in self.history_ids()? {
            self.store.remove(&self.record_key(&id))?;
        }
        self.store.remove(&self.history_key())
    }

    /// Records whose id or any tag contains `query`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend cannot be read.
    pub fn search(&self, query: &str) -> Result<Vec<SignatureRecord>, StorageError> {
        Ok(self.history()?.into_iter().filter(|r| r.matches(query)).collect())
    }

    /// # Errors
    ///
    /// Returns `Err` if the backend cannot be read.
    pub fn storage_info(&self) -> Result<StorageInfo, StorageError> {
        let mut info = StorageInfo::default();
        for record in self.history()? {
            info.count += 1;
            if let Some(raw) = self.store.get(&self.record_key(&record.id))? {
                info.estimated_size += raw.len();
            }
        }
        Ok(info)
    }

    fn record_key(&self, id: &str) -> String {
        format!("{}{id}", self.key_prefix)
    }

    fn history_key(&self) -> String {
        format!("{}{HISTORY_SUFFIX}", self.key_prefix)
    }

    fn history_ids(&self) -> Result<Vec<String>, StorageError> {
        let Some(raw) = self.store.get(&self.history_key())? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(ids) => Ok(ids),
            Err(e) => {
                log::error!("storage: failed to parse history list: {e}");
                Ok(Vec::new())
            }
        }
    }

    fn write_history(&mut self, ids: &[String]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(ids)?;
        self.store.set(&self.history_key(), &raw)
    }

    fn push_history(&mut self, id: &str) -> Result<(), StorageError> {
        let mut ids = self.history_ids()?;
        ids.retain(|existing| existing != id);
        ids.insert(0, id.to_owned());
        if ids.len() > self.max_history {
            for evicted in ids.split_off(self.max_history) {
                log::debug!("storage: evicting {evicted}");
                self.store.remove(&self.record_key(&evicted))?;
            }
        }
        self.write_history(&ids)
    }
}
