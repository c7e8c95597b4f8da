pub mod play;
pub mod slots;

use std::path::Path;

use wf_session::{FileStore, SessionConfig, SlotStore};

/// Config for a session storing slots under `namespace`.
fn config_for(namespace: &str) -> SessionConfig {
    SessionConfig::default().with_namespace(namespace)
}

/// Open the slot file, creating its directory if needed.
fn open_store(path: &Path) -> Result<FileStore, String> {
    FileStore::open(path).map_err(|e| format!("cannot open {}: {e}", path.display()))
}

/// Open the slot gateway over the file at `path`.
fn open_slots(path: &Path, namespace: &str) -> Result<SlotStore<FileStore>, String> {
    let config = config_for(namespace);
    config.validate().map_err(|e| e.to_string())?;
    Ok(SlotStore::new(open_store(path)?, &config))
}
