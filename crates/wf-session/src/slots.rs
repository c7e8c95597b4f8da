//! Named save slots and the last-command cell over a key-value store.

use chrono::Utc;
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::error::StoreResult;
use crate::store::KeyValueStore;

/// Save slot gateway.
///
/// Slot `name` lives under key `<namespace>_<name>`; the last submitted
/// command lives under a single separate key.
#[derive(Debug)]
pub struct SlotStore<S> {
    store: S,
    prefix: String,
    last_command_key: String,
}

impl<S: KeyValueStore> SlotStore<S> {
    /// Create a gateway with the namespace and keys from `config`.
    pub fn new(store: S, config: &SessionConfig) -> Self {
        Self {
            store,
            prefix: config.slot_prefix(),
            last_command_key: config.last_command_key.clone(),
        }
    }

    fn key(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    /// Slot names in lexicographic order.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .store
            .keys()
            .into_iter()
            .filter_map(|k| k.strip_prefix(&self.prefix).map(str::to_string))
            .collect();
        names.sort();
        names
    }

    /// Store `payload` under slot `name`, replacing any previous save.
    pub fn write(&mut self, name: &str, payload: &str) -> StoreResult<()> {
        let key = self.key(name);
        self.store.set_item(&key, payload).inspect_err(|e| {
            warn!(slot = %name, error = %e, "slot write failed");
        })?;
        debug!(slot = %name, bytes = payload.len(), "slot written");
        Ok(())
    }

    /// The payload saved under slot `name`.
    pub fn read(&self, name: &str) -> Option<String> {
        self.store.get_item(&self.key(name))
    }

    /// Whether slot `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.read(name).is_some()
    }

    /// Remove slot `name`.
    pub fn delete(&mut self, name: &str) -> StoreResult<()> {
        let key = self.key(name);
        self.store.remove_item(&key).inspect_err(|e| {
            warn!(slot = %name, error = %e, "slot delete failed");
        })
    }

    /// The most recently submitted command.
    pub fn last_command(&self) -> Option<String> {
        self.store.get_item(&self.last_command_key)
    }

    /// Remember the most recently submitted command.
    pub fn set_last_command(&mut self, command: &str) -> StoreResult<()> {
        self.store.set_item(&self.last_command_key, command)
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Slot name to use for a save: the trimmed input, or `save_<unix-millis>` when blank.
pub fn slot_name_or_generated(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        format!("save_{}", Utc::now().timestamp_millis())
    } else {
        trimmed.to_string()
    }
}
