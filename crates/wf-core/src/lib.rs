//! Core types for Wayfarer: transcript lines, the narrative engine contract,
//! and a deterministic scripted engine.
//!
//! This crate knows nothing about history, persistence, or hints. It defines
//! what flows between the engine and the session controller: the
//! [`UpdateRecord`] an engine emits after a turn and the [`Line`]s a session
//! accumulates in its [`Transcript`].

/// The narrative engine contract and its raw update record.
pub mod engine;
/// Error types used throughout the crate.
pub mod error;
/// Transcript lines and the append-only line stream.
pub mod line;
/// A deterministic engine driven by a JSON script.
pub mod scripted;

/// Re-export the engine contract.
pub use engine::{Engine, UpdateRecord};
/// Re-export error types.
pub use error::{EngineError, EngineResult};
/// Re-export transcript types.
pub use line::{Line, LineId, Transcript};
/// Re-export the scripted engine.
pub use scripted::{EngineCall, Script, ScriptedEngine};
