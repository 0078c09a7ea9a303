use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid chunk size: {0} (must be a positive number of words)")]
    InvalidChunkSize(usize),

    #[error("Semantic scorer failed: {0}")]
    ScorerFailure(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Aggregation cancelled")]
    Cancelled,

    #[error("Duplicate document id: {0}")]
    DuplicateDocument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
