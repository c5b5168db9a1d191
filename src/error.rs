use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a single record could not be aggregated.
/// Produced by extractors, which do not know file positions; the engine wraps
/// it with line/chunk context before it reaches the caller.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("unparseable `date` value: {0:?}")]
    BadDate(String),
}

/// Error taxonomy for an analysis run. A run either returns a complete
/// result or exactly one of these; no partial results.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A record that failed to parse, with its 1-based file line number.
    #[error("malformed record at line {line}: {source}")]
    MalformedRecord {
        line: u64,
        #[source]
        source: RecordError,
    },

    /// A chunk task failed; the run was cancelled (fail-fast).
    #[error("chunk {chunk} failed: {source}")]
    ChunkProcessing {
        chunk: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error reading line source: {0}")]
    Io(#[from] std::io::Error),
}
