use thiserror::Error;

/// Acquisition failures. Every variant is fatal to the pipeline: the
/// importer never emits a partial artifact from a partial fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("law not found: {0}")]
    NotFound(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("no binary text variant available for {0}")]
    NoVariantAvailable(String),

    #[error("source text is not decodable as utf-8, latin-1, or cp1252")]
    Decode,

    #[error("unknown alias: {0}")]
    UnknownAlias(String),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("could not read source: {0}")]
    Io(#[from] std::io::Error),

    #[error("response body is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result specialized to [`FetchError`].
pub type Result<T> = std::result::Result<T, FetchError>;
