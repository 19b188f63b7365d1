//! # Remote Store
//!
//! Key-value document store addressed by owner and document id. The sync
//! engine is the only caller. Both operations are idempotent, so a failed
//! call can simply be repeated on the next poll.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use contractform_document::{Document, DocumentId};

use crate::errors::StoreError;
use crate::identity::Credentials;

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Every document owned by the caller.
    async fn list_for_owner(&self, credentials: &Credentials) -> Result<Vec<Document>, StoreError>;

    /// One document, if it exists and is owned by the caller.
    async fn get(
        &self,
        credentials: &Credentials,
        id: &DocumentId,
    ) -> Result<Option<Document>, StoreError>;

    /// Insert or replace a document owned by the caller.
    async fn upsert(&self, credentials: &Credentials, document: &Document) -> Result<(), StoreError>;
}

/// Reject writes that would move a document between owners.
pub(crate) fn check_owner(
    credentials: &Credentials,
    document: &Document,
    stored: Option<&Document>,
) -> Result<(), StoreError> {
    let stored_owner = stored.map_or(document.owner_id.as_str(), |d| d.owner_id.as_str());
    if stored_owner != credentials.owner_id || document.owner_id != credentials.owner_id {
        return Err(StoreError::OwnerMismatch {
            id: document.id.clone(),
            stored_owner: stored_owner.to_string(),
        });
    }
    Ok(())
}

/// In-process store, used by tests and demos
#[derive(Debug)]
pub struct MemoryStore {
    documents: Mutex<HashMap<DocumentId, Document>>,
    available: AtomicBool,
    upserts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
            upserts: AtomicUsize::new(0),
        }
    }

    /// While unavailable every call fails with [`StoreError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Successful upserts so far
    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    /// Stored copy of a document, bypassing ownership checks.
    pub fn peek(&self, id: &DocumentId) -> Option<Document> {
        self.lock().get(id).cloned()
    }

    /// Write a document as if from another session, bypassing checks.
    pub fn put_external(&self, document: Document) {
        self.lock().insert(document.id.clone(), document);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<DocumentId, Document>> {
        self.documents
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store offline".to_string()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list_for_owner(&self, credentials: &Credentials) -> Result<Vec<Document>, StoreError> {
        self.ensure_available()?;
        Ok(self
            .lock()
            .values()
            .filter(|d| d.owner_id == credentials.owner_id)
            .cloned()
            .collect())
    }

    async fn get(
        &self,
        credentials: &Credentials,
        id: &DocumentId,
    ) -> Result<Option<Document>, StoreError> {
        self.ensure_available()?;
        Ok(self
            .lock()
            .get(id)
            .filter(|d| d.owner_id == credentials.owner_id)
            .cloned())
    }

    async fn upsert(&self, credentials: &Credentials, document: &Document) -> Result<(), StoreError> {
        self.ensure_available()?;
        let mut documents = self.lock();
        check_owner(credentials, document, documents.get(&document.id))?;
        documents.insert(document.id.clone(), document.clone());
        self.upserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contractform_document::Value;

    fn creds(owner: &str) -> Credentials {
        Credentials::new(owner, "t")
    }

    fn doc(id: &str, owner: &str, at: i64) -> Document {
        Document::new(id.into(), owner, Value::Null, at)
    }

    #[tokio::test]
    async fn test_list_filters_by_owner() {
        let store = MemoryStore::new();
        store.upsert(&creds("a"), &doc("1", "a", 1)).await.unwrap();
        store.upsert(&creds("b"), &doc("2", "b", 1)).await.unwrap();

        let listed = store.list_for_owner(&creds("a")).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id.as_str(), "1");
    }

    #[tokio::test]
    async fn test_get_hides_foreign_documents() {
        let store = MemoryStore::new();
        store.upsert(&creds("a"), &doc("1", "a", 1)).await.unwrap();

        assert!(store.get(&creds("b"), &"1".into()).await.unwrap().is_none());
        assert!(store.get(&creds("a"), &"1".into()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_upsert_rejects_owner_change() {
        let store = MemoryStore::new();
        store.upsert(&creds("a"), &doc("1", "a", 1)).await.unwrap();

        let err = store.upsert(&creds("b"), &doc("1", "b", 2)).await.unwrap_err();
        assert!(matches!(err, StoreError::OwnerMismatch { .. }));
        assert_eq!(store.peek(&"1".into()).unwrap().owner_id, "a");
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let store = MemoryStore::new();
        store.set_available(false);
        assert!(matches!(
            store.list_for_owner(&creds("a")).await,
            Err(StoreError::Unavailable(_))
        ));
        store.set_available(true);
        assert!(store.list_for_owner(&creds("a")).await.is_ok());
    }
}
