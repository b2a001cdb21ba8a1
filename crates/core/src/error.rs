use reqwest::StatusCode;
use thiserror::Error;

/// A single document could not be turned into text. Recovered per file; the
/// batch continues.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("unreadable document {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unparsable document {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("document has no extractable text: {path}")]
    EmptyText { path: String },
}

/// A write to either store failed. Fatal to the batch run; never retried.
#[derive(Debug, Error)]
pub enum IndexingError {
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{backend} write failed with status {status}")]
    Backend { backend: String, status: StatusCode },
}

/// The full-text query could not produce a document list. Recovered by the
/// dispatcher and classified into a user-facing message.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("unable to reach {backend}: {details}")]
    Transport { backend: String, details: String },

    #[error("{backend} query returned status {status}")]
    Status { backend: String, status: StatusCode },

    #[error("{backend} returned an unexpected response shape")]
    UnexpectedFormat { backend: String },
}

/// The generation service failed. Always a soft failure: logged, the summary
/// is omitted, the query result is unaffected.
#[derive(Debug, Error)]
pub enum SummarizationError {
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation service returned status {status}")]
    Backend { status: StatusCode },
}

/// Run-level failure of an ingestion batch.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("indexing error: {0}")]
    Indexing(#[from] IndexingError),

    #[error("target is neither a file nor a directory: {0}")]
    InvalidTarget(String),
}
