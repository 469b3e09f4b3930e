/// Errors from persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The target path has no parent directory to stage the temp file in.
    #[error("invalid target path: {0}")]
    InvalidPath(String),
}

/// Result alias for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;
