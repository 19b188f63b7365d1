//! Directory-backed store: one `<id>.json` file per document.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use contractform_document::{Document, DocumentId};

use crate::errors::StoreError;
use crate::identity::Credentials;
use crate::store::{check_owner, RemoteStore};

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &DocumentId) -> Result<PathBuf, StoreError> {
        let raw = id.as_str();
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidId(raw.to_string()));
        }
        Ok(self.root.join(format!("{raw}.json")))
    }

    async fn read(&self, path: &Path) -> Result<Option<Document>, StoreError> {
        match tokio::fs::read_to_string(path).await {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl RemoteStore for FileStore {
    async fn list_for_owner(&self, credentials: &Credentials) -> Result<Vec<Document>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut documents = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            match self.read(&path).await {
                Ok(Some(doc)) if doc.owner_id == credentials.owner_id => documents.push(doc),
                Ok(_) => {}
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable document"),
            }
        }
        Ok(documents)
    }

    async fn get(
        &self,
        credentials: &Credentials,
        id: &DocumentId,
    ) -> Result<Option<Document>, StoreError> {
        let path = self.path_for(id)?;
        Ok(self
            .read(&path)
            .await?
            .filter(|d| d.owner_id == credentials.owner_id))
    }

    async fn upsert(&self, credentials: &Credentials, document: &Document) -> Result<(), StoreError> {
        let path = self.path_for(&document.id)?;
        let stored = self.read(&path).await?;
        check_owner(credentials, document, stored.as_ref())?;

        tokio::fs::create_dir_all(&self.root).await?;
        let json = serde_json::to_string_pretty(document)?;
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || write_atomic(&root, &path, json.as_bytes()))
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))??;

        tracing::debug!(doc_id = %document.id, last_modified = document.last_modified, "stored document");
        Ok(())
    }
}

/// Write `bytes` to a fresh temp file in `dir`, then rename it over `path`.
/// Each writer gets its own temp file, so concurrent writers never collide.
fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contractform_document::{contract, Value};

    fn creds(owner: &str) -> Credentials {
        Credentials::new(owner, "t")
    }

    #[tokio::test]
    async fn test_roundtrip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("contracts"));
        let doc = Document::new("abc_-1".into(), "a", contract::template_body(), 10);

        store.upsert(&creds("a"), &doc).await.unwrap();

        let loaded = store.get(&creds("a"), &doc.id).await.unwrap().unwrap();
        assert_eq!(loaded, doc);
        assert_eq!(store.list_for_owner(&creds("a")).await.unwrap(), vec![doc]);
        assert!(store.list_for_owner(&creds("b")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent"));
        assert!(store.list_for_owner(&creds("a")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let doc = Document::new("../escape".into(), "a", Value::Null, 1);

        let err = store.upsert(&creds("a"), &doc).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(_)));
    }

    #[tokio::test]
    async fn test_skips_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        let store = FileStore::new(dir.path());
        let doc = Document::new("good".into(), "a", Value::Null, 1);
        store.upsert(&creds("a"), &doc).await.unwrap();

        let listed = store.list_for_owner(&creds("a")).await.unwrap();
        assert_eq!(listed, vec![doc]);
    }

    #[tokio::test]
    async fn test_owner_mismatch_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store
            .upsert(&creds("a"), &Document::new("x".into(), "a", Value::Null, 1))
            .await
            .unwrap();

        let err = store
            .upsert(&creds("b"), &Document::new("x".into(), "b", Value::Null, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::OwnerMismatch { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_upserts_of_one_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(FileStore::new(dir.path()));

        let writers: Vec<_> = (0..4)
            .map(|writer| {
                let store = store.clone();
                tokio::spawn(async move {
                    for round in 0..25 {
                        let at = writer * 100 + round;
                        let doc = Document::new("d1".into(), "a", Value::from(at.to_string()), at);
                        store.upsert(&creds("a"), &doc).await?;
                    }
                    Ok::<_, StoreError>(())
                })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap().unwrap();
        }

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("d1.json")]);
        assert!(store.get(&creds("a"), &"d1".into()).await.unwrap().is_some());
    }
}
