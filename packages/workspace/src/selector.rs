//! Current document selection, persisted as a URL fragment (`#<id>`).

use std::fmt;

use contractform_document::DocumentId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector(Option<DocumentId>);

impl Selector {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn of(id: DocumentId) -> Self {
        Self(Some(id))
    }

    /// Read a selection back from a location fragment. A missing, empty or
    /// bare `#` fragment selects nothing.
    pub fn from_fragment(fragment: &str) -> Self {
        let raw = fragment.trim();
        let raw = raw.strip_prefix('#').unwrap_or(raw);
        if raw.is_empty() {
            Self::none()
        } else {
            Self::of(DocumentId::from(raw))
        }
    }

    /// Fragment for a shareable link; empty when nothing is selected.
    pub fn to_fragment(&self) -> String {
        match &self.0 {
            Some(id) => format!("#{id}"),
            None => String::new(),
        }
    }

    pub fn id(&self) -> Option<&DocumentId> {
        self.0.as_ref()
    }

    pub fn is_selected(&self, id: &DocumentId) -> bool {
        self.0.as_ref() == Some(id)
    }

    pub fn select(&mut self, id: DocumentId) {
        self.0 = Some(id);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fragment())
    }
}
