//! # Documents
//!
//! A [`Document`] is one contract record: identifier, owner, body and the
//! time of its last committed edit. Documents are values; an edit produces a
//! new `Document` via [`Document::revise`] and leaves the old one intact.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Random bytes per generated identifier (120 bits)
pub const ID_BYTES: usize = 15;

/// Opaque, URL-safe document identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Fresh identifier from the OS random source.
    pub fn generate() -> Self {
        let mut bytes = [0u8; ID_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,

    /// Identity of the creator, as supplied by the identity provider
    pub owner_id: String,

    #[serde(default)]
    pub body: Value,

    /// Milliseconds since the Unix epoch
    pub last_modified: i64,
}

impl Document {
    pub fn new(id: DocumentId, owner_id: impl Into<String>, body: Value, last_modified: i64) -> Self {
        Self {
            id,
            owner_id: owner_id.into(),
            body,
            last_modified,
        }
    }

    /// New revision with `body`, stamped at `now` or one past the current
    /// stamp, whichever is later.
    pub fn revise(&self, body: Value, now: i64) -> Self {
        Self {
            id: self.id.clone(),
            owner_id: self.owner_id.clone(),
            body,
            last_modified: now.max(self.last_modified.saturating_add(1)),
        }
    }

    /// [`Self::revise`] against the wall clock.
    pub fn touched(&self, body: Value) -> Self {
        self.revise(body, now_millis())
    }
}

/// Wall-clock milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
