//! Error types for the remote store and the sync engine

use contractform_document::DocumentId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("Invalid document id: {0:?}")]
    InvalidId(String),

    #[error("Document {id} is owned by {stored_owner}")]
    OwnerMismatch { id: DocumentId, stored_owner: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Not signed in")]
    Unauthenticated,

    #[error("Document {id} belongs to {owner_id}")]
    NotOwner { id: DocumentId, owner_id: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
