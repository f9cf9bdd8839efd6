use thiserror::Error;

/// Parsing failures. A parser that raises is retried with the fallback
/// strategy; only both strategies failing aborts the import.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("structured document has no hasPart tree")]
    MissingHasPart,

    #[error("no articles recognized in source")]
    NoArticles,
}

/// Result specialized to [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;
