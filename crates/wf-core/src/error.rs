/// Alias for `Result<T, EngineError>`.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors reported across the engine boundary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine has not been created yet, or creation failed.
    #[error("engine not initialized")]
    NotInitialized,

    /// The engine could not be created.
    #[error("engine creation failed: {0}")]
    Create(String),

    /// A serialized state could not be restored.
    #[error("restore failed: {0}")]
    Restore(String),

    /// A script or payload could not be parsed.
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}
