use thiserror::Error;

/// Failures the model layer can hit: encoding the artifact as JSON and
/// touching the filesystem while writing it. Parsing and acquisition carry
/// their own error types in their own crates.
#[derive(Debug, Error)]
pub enum LeiError {
    #[error("could not encode document as JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("filesystem access failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),
}

/// Result specialized to [`LeiError`].
pub type Result<T> = std::result::Result<T, LeiError>;
