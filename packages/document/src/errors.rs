//! Error types for document paths and bodies

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Empty path")]
    EmptyPath,

    #[error("Invalid path segment {segment:?} in {path:?}")]
    InvalidSegment { path: String, segment: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
