//! Error types for the session controller.

use thiserror::Error;

/// Result type for key-value store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for session setup.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors raised by a persistence medium.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Writing would exceed the medium's capacity.
    #[error("storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded {
        /// Bytes the store would hold after the write.
        needed: usize,
        /// Configured capacity in bytes.
        limit: usize,
    },

    /// The medium cannot be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Filesystem error.
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be parsed or written.
    #[error("storage document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors that prevent a session from being set up.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The persistence medium failed while opening.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// The engine could not be created.
    #[error("{0}")]
    Engine(#[from] wf_core::EngineError),
}
