//! Store persisted as one JSON document on disk.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::error::{StoreError, StoreResult};

/// A store backed by a JSON file.
///
/// Each mutation writes the whole document to a temporary file next to the
/// target and renames it into place. The in-memory view changes only once
/// the rename succeeded, so a failed write leaves both disk and memory at
/// the previous state.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed.
    /// A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = entries.len(), "opened file store");
        Ok(Self { path, entries })
    }

    /// Open the store at `path`, setting an unreadable document aside.
    ///
    /// A malformed file is renamed to `<name>.corrupt` and the store starts
    /// empty. The second value is the set-aside path, if any. I/O failures
    /// are still errors.
    pub fn open_or_reset(path: impl Into<PathBuf>) -> StoreResult<(Self, Option<PathBuf>)> {
        let path = path.into();
        match Self::open(&path) {
            Err(StoreError::Malformed(e)) => {
                let aside = corrupt_path(&path);
                warn!(
                    path = %path.display(),
                    aside = %aside.display(),
                    error = %e,
                    "store document unreadable, starting empty"
                );
                fs::rename(&path, &aside)?;
                let store = Self {
                    path,
                    entries: BTreeMap::new(),
                };
                Ok((store, Some(aside)))
            }
            other => other.map(|store| (store, None)),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn commit(&mut self, next: BTreeMap<String, String>) -> StoreResult<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, &next)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        self.entries = next;
        Ok(())
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".corrupt");
    path.with_file_name(name)
}

impl KeyValueStore for FileStore {
    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.commit(next)
    }

    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn remove_item(&mut self, key: &str) -> StoreResult<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.remove(key);
        self.commit(next)
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}
