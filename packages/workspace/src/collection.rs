//! # Collection View
//!
//! The document list: summaries of every indexed document, newest first,
//! plus the current [`Selector`]. Unknown selections and an empty index are
//! ordinary states, not errors.

use std::sync::Arc;

use chrono::Duration;
use contractform_document::contract::{self, fields};
use contractform_document::{now_millis, Document, DocumentId};
use contractform_sync::SyncEngine;
use tracing::debug;

use crate::editor::ContractEditor;
use crate::errors::Result;
use crate::selector::Selector;

/// Course names in a label are cut to this many characters
pub const LABEL_COURSES_WIDTH: usize = 15;

/// One row of the document list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub id: DocumentId,
    pub last_modified: i64,
    pub label: String,
    pub is_current: bool,
}

impl DocumentSummary {
    pub fn new(document: &Document, now: i64, selector: &Selector) -> Self {
        Self {
            id: document.id.clone(),
            last_modified: document.last_modified,
            label: label(document, now),
            is_current: selector.is_selected(&document.id),
        }
    }
}

/// `"<semester> <year>; [<courses>]; <age> ago"`; the course part is left
/// out when no class has a name.
pub fn label(document: &Document, now: i64) -> String {
    let body = &document.body;
    let courses: Vec<String> = contract::class_entries(body)
        .into_iter()
        .map(|entry| entry.course_name)
        .filter(|name| !name.is_empty())
        .collect();

    let mut label = format!(
        "{} {}; ",
        body.field(fields::SEMESTER).str_or_empty(),
        body.field(fields::CONTRACT_YEAR).str_or_empty()
    );
    if !courses.is_empty() {
        let joined: String = courses.join(",").chars().take(LABEL_COURSES_WIDTH).collect();
        label.push_str(&format!("[{joined}]; "));
    }
    label.push_str(&time_since(elapsed(document.last_modified, now)));
    label.push_str(" ago");
    label
}

/// Time from `since` to `now`, clamped to what a `Duration` can hold.
pub fn elapsed(since: i64, now: i64) -> Duration {
    Duration::milliseconds(now.saturating_sub(since).max(-i64::MAX))
}

/// Coarse human age: the largest unit with a count above one.
pub fn time_since(elapsed: Duration) -> String {
    const UNITS: [(i64, &str); 5] = [
        (31_536_000, "years"),
        (2_592_000, "months"),
        (86_400, "days"),
        (3_600, "hours"),
        (60, "minutes"),
    ];

    let seconds = elapsed.num_seconds();
    UNITS
        .iter()
        .map(|(unit, name)| (seconds / unit, name))
        .find(|(count, _)| *count > 1)
        .map_or_else(|| "just now".to_string(), |(count, name)| format!("{count} {name}"))
}

#[derive(Clone)]
pub struct CollectionView {
    engine: SyncEngine,
    selector: Selector,
}

impl CollectionView {
    pub fn new(engine: SyncEngine) -> Self {
        Self::with_selector(engine, Selector::none())
    }

    pub fn with_selector(engine: SyncEngine, selector: Selector) -> Self {
        Self { engine, selector }
    }

    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Documents sorted by `last_modified` descending, ties by id.
    pub fn documents(&self) -> Vec<Arc<Document>> {
        let mut documents: Vec<Arc<Document>> = self.engine.snapshot().documents().cloned().collect();
        documents.sort_by(|a, b| {
            b.last_modified
                .cmp(&a.last_modified)
                .then_with(|| a.id.cmp(&b.id))
        });
        documents
    }

    pub fn summaries(&self) -> Vec<DocumentSummary> {
        self.summaries_at(now_millis())
    }

    /// [`Self::summaries`] with ages measured from `now`.
    pub fn summaries_at(&self, now: i64) -> Vec<DocumentSummary> {
        self.documents()
            .iter()
            .map(|document| DocumentSummary::new(document, now, &self.selector))
            .collect()
    }

    pub fn select(&mut self, id: DocumentId) {
        debug!(doc_id = %id, "selected");
        self.selector.select(id);
    }

    /// Create a contract from the blank template and select it.
    pub fn create(&mut self) -> Result<DocumentId> {
        let id = self.engine.create(contract::template_body())?;
        self.select(id.clone());
        Ok(id)
    }

    /// The selected document, if the selection names an indexed one.
    pub fn detail(&self) -> Option<Arc<Document>> {
        self.selector.id().and_then(|id| self.engine.get(id))
    }

    /// Editor for the selected document.
    pub fn editor(&self) -> Option<ContractEditor> {
        self.detail()
            .map(|document| ContractEditor::new(self.engine.clone(), document.id.clone()))
    }

    /// Select the most recent document when nothing is selected yet.
    /// Returns whether the selection changed.
    pub fn select_first_if_empty(&mut self) -> bool {
        if self.selector.id().is_some() {
            return false;
        }
        match self.documents().first() {
            Some(first) => {
                self.select(first.id.clone());
                true
            }
            None => false,
        }
    }
}
