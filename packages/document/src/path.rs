//! Field paths into a document body.
//!
//! A path is written as dot-separated segments, e.g. `classes.2.courseName`.
//! All-digit segments address list elements, everything else addresses a
//! record field.

use std::fmt;
use std::str::FromStr;

use crate::DocumentError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Field(String),
    Index(usize),
}

impl Segment {
    pub fn field(key: impl Into<String>) -> Self {
        Segment::Field(key.into())
    }

    pub fn index(index: usize) -> Self {
        Segment::Index(index)
    }

    fn parse(raw: &str, path: &str) -> Result<Self, DocumentError> {
        if raw.is_empty() || raw.chars().any(char::is_whitespace) {
            return Err(DocumentError::InvalidSegment {
                path: path.to_string(),
                segment: raw.to_string(),
            });
        }
        if raw.bytes().all(|b| b.is_ascii_digit()) {
            let index = raw.parse().map_err(|_| DocumentError::InvalidSegment {
                path: path.to_string(),
                segment: raw.to_string(),
            })?;
            return Ok(Segment::Index(index));
        }
        Ok(Segment::Field(raw.to_string()))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Ordered list of segments from the body root
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path(Vec<Segment>);

impl Path {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn parse(raw: &str) -> Result<Self, DocumentError> {
        raw.parse()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    pub fn field(&self, key: impl Into<String>) -> Self {
        self.child(Segment::field(key))
    }

    pub fn index(&self, index: usize) -> Self {
        self.child(Segment::Index(index))
    }

    /// Dotted identifier under `prefix`, e.g. `ContractForm.abc.classes.0`.
    pub fn id(&self, prefix: &str) -> String {
        if self.is_root() {
            prefix.to_string()
        } else if prefix.is_empty() {
            self.to_string()
        } else {
            format!("{prefix}.{self}")
        }
    }
}

impl FromStr for Path {
    type Err = DocumentError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DocumentError::EmptyPath);
        }
        trimmed
            .split('.')
            .map(|segment| Segment::parse(segment, trimmed))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}
