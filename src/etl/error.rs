use thiserror::Error;

/// Errors in the shape of an input record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Timestamp out of range: {0} ms")]
    InvalidTimestamp(i64),

    #[error("Song file contains no record")]
    EmptySongFile,

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
