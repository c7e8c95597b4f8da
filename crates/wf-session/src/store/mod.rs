//! Persistent key-value media behind the save slot gateway.
//!
//! A [`KeyValueStore`] is a flat string-to-string map that may refuse
//! writes (quota, unavailable medium). Reads never fail: an unreadable
//! entry is simply absent.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StoreResult;

/// A namespaced key-value medium.
///
/// Mutations either apply fully or leave the previous value intact.
pub trait KeyValueStore {
    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// The value under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Remove `key`. Removing a missing key succeeds.
    fn remove_item(&mut self, key: &str) -> StoreResult<()>;

    /// Every key currently held, in no particular order.
    fn keys(&self) -> Vec<String>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_item(key, value)
    }

    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn remove_item(&mut self, key: &str) -> StoreResult<()> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}
