//! Session controller for Wayfarer.
//!
//! Sits between a turn-based narrative [`Engine`](wf_core::Engine) and a human
//! operator. A [`Session`] runs the turn loop (submit, feed, drain, process
//! output, refresh location) and the side commands around it: undo/redo,
//! named save slots, transcript clearing, command recall, and a timed hint
//! catalog whose reveal delay doubles with every hint the player has seen.

pub mod adapter;
pub mod config;
pub mod error;
pub mod hint;
pub mod history;
pub mod output;
pub mod session;
pub mod slots;
pub mod store;

pub use adapter::EngineAdapter;
pub use config::SessionConfig;
pub use error::{SessionError, SessionResult, StoreError, StoreResult};
pub use hint::{HintDisclosure, HintLedger, HintPhase, HintView};
pub use history::{History, RecallDirection};
pub use session::Session;
pub use slots::SlotStore;
pub use store::{FileStore, KeyValueStore, MemoryStore};
