//! Binds form cursors to the sync engine: an edit produces a new body, the
//! body becomes a new revision, and the revision is committed.

use std::cell::RefCell;
use std::sync::Arc;

use contractform_document::contract::{self, fields};
use contractform_document::{Document, DocumentId, Path, PathCursor, Segment, Value};
use contractform_sync::SyncEngine;
use tracing::debug;

use crate::errors::{Result, WorkspaceError};

/// Cursor id prefix for form fields
pub const FORM_ID_PREFIX: &str = "ContractForm";

#[derive(Clone)]
pub struct ContractEditor {
    engine: SyncEngine,
    id: DocumentId,
}

impl ContractEditor {
    pub fn new(engine: SyncEngine, id: DocumentId) -> Self {
        Self { engine, id }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Latest indexed revision of the document being edited.
    pub fn current(&self) -> Result<Arc<Document>> {
        self.engine
            .get(&self.id)
            .ok_or_else(|| WorkspaceError::NotFound(self.id.clone()))
    }

    /// Run `f` against a root cursor over the current body and commit the
    /// body it writes. If `f` writes nothing the current revision is
    /// returned unchanged.
    pub fn edit<F>(&self, f: F) -> Result<Arc<Document>>
    where
        F: FnOnce(&PathCursor<'_>),
    {
        let current = self.current()?;
        let staged = RefCell::new(None);
        {
            let root = PathCursor::root(
                format!("{FORM_ID_PREFIX}.{}", self.id),
                current.body.clone(),
                |next| *staged.borrow_mut() = Some(next),
            );
            f(&root);
        }

        let Some(body) = staged.into_inner() else {
            return Ok(current);
        };
        let stored = self.engine.commit(current.touched(body))?;
        debug!(doc_id = %self.id, last_modified = stored.last_modified, "edit committed");
        Ok(stored)
    }

    /// Write one value at `path`. Rows of the classes table go through the
    /// classes sizing policy, so filling the last row adds a blank one.
    pub fn set(&self, path: &Path, value: Value) -> Result<Arc<Document>> {
        self.edit(|root| match path.segments() {
            [Segment::Field(name), Segment::Index(row), rest @ ..] if name == fields::CLASSES => {
                let classes = root.field(fields::CLASSES);
                let row = classes.element_with(*row, contract::resize_classes);
                row.at(&Path::from(rest.to_vec())).set(value);
            }
            _ => root.at(path).set(value),
        })
    }

    /// [`Self::set`] with the path given as dotted text.
    pub fn set_raw(&self, path: &str, value: Value) -> Result<Arc<Document>> {
        let path = Path::parse(path)?;
        self.set(&path, value)
    }
}
