use contractform_document::{DocumentError, DocumentId};
use contractform_sync::SyncError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("Encoding error: {0}")]
    Encode(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WorkspaceError>;
