//! In-process store with an optional byte quota.

use std::collections::BTreeMap;

use super::KeyValueStore;
use crate::error::{StoreError, StoreResult};

/// A store held in memory.
///
/// With a quota, a write that would push the total size of keys and values
/// past the limit is refused and the previous value stays in place.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
    unavailable: bool,
}

impl MemoryStore {
    /// Create an empty, unlimited store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total stored bytes.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Make every mutation fail, as when storage is disabled.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Total bytes of keys and values.
    pub fn size(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable {
            return Err(StoreError::Unavailable("storage is disabled".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.check_available()?;
        if let Some(limit) = self.quota {
            let replaced = self.entries.get(key).map_or(0, |v| key.len() + v.len());
            let needed = self.size() - replaced + key.len() + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded { needed, limit });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn remove_item(&mut self, key: &str) -> StoreResult<()> {
        self.check_available()?;
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}
