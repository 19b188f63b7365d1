//! # Document Index
//!
//! The client-side map of document id to the newest known revision.
//!
//! Entries are `Arc<Document>` and are only ever replaced whole, so a reader
//! holding an entry never sees it change underneath it. Which revision wins
//! is decided by `last_modified` alone:
//!
//! | local | remote | result |
//! |-------|--------|--------|
//! | none  | r      | r added |
//! | l     | r > l  | r replaces l |
//! | l     | r <= l | l kept (same `Arc`) |

use std::collections::HashMap;
use std::sync::Arc;

use contractform_document::{Document, DocumentId};

/// Outcome of merging one remote revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    Added,
    Replaced,
    Kept,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentIndex {
    entries: HashMap<DocumentId, Arc<Document>>,
}

impl DocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Arc<Document>> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn documents(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.entries.values()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Merge a revision observed in the remote store; strictly newer wins.
    pub fn reconcile(&mut self, remote: Document) -> Reconciled {
        match self.entries.get(&remote.id) {
            Some(local) if remote.last_modified <= local.last_modified => Reconciled::Kept,
            Some(_) => {
                self.entries.insert(remote.id.clone(), Arc::new(remote));
                Reconciled::Replaced
            }
            None => {
                self.entries.insert(remote.id.clone(), Arc::new(remote));
                Reconciled::Added
            }
        }
    }

    /// Install a local edit. The stamp is raised past the current entry if
    /// needed, so the entry never moves backwards in time.
    pub fn commit(&mut self, mut document: Document) -> Arc<Document> {
        if let Some(current) = self.entries.get(&document.id) {
            let floor = current.last_modified.saturating_add(1);
            document.last_modified = document.last_modified.max(floor);
        }
        let document = Arc::new(document);
        self.entries.insert(document.id.clone(), document.clone());
        document
    }
}

impl FromIterator<Document> for DocumentIndex {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut index = Self::new();
        for document in iter {
            index.reconcile(document);
        }
        index
    }
}
