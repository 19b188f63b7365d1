//! # Document Values
//!
//! Persistent tree used for document bodies.
//!
//! Containers and text are reference-counted, so cloning a `Value` is cheap
//! and every write is a shallow copy along one path:
//!
//! ```text
//! root ─┬─ firstName          (shared)
//!       ├─ classes ─┬─ [0]    (shared)
//!       │           └─ [1] ── courseName   ← replaced
//!       └─ goals              (shared)
//! ```
//!
//! Every ancestor of the replaced node is a fresh allocation; every sibling is
//! the same allocation as before (see [`Value::ptr_eq`]).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::DocumentError;
use crate::path::Segment;

/// Field map of a record node
pub type Record = BTreeMap<String, Value>;

static NULL: Value = Value::Null;

/// Immutable, structurally shared JSON-like value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(Arc<str>),
    List(Arc<Vec<Value>>),
    Record(Arc<Record>),
}

impl Value {
    pub fn text(s: impl Into<Arc<str>>) -> Self {
        Value::Text(s.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Arc::new(items))
    }

    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Record(Arc::new(
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Parse a JSON text into a value.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Text content, or `""` for anything that is not text
    pub fn str_or_empty(&self) -> &str {
        self.as_str().unwrap_or("")
    }

    /// True for null, `false`, `""`, and empty containers
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(_) => false,
            Value::Text(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Record(fields) => fields.is_empty(),
        }
    }

    /// Read a record field; missing fields and non-records read as null.
    pub fn field(&self, key: &str) -> &Value {
        self.as_record()
            .and_then(|fields| fields.get(key))
            .unwrap_or(&NULL)
    }

    /// Read a list element; out-of-range indexes and non-lists read as null.
    pub fn element(&self, index: usize) -> &Value {
        self.as_list()
            .and_then(|items| items.get(index))
            .unwrap_or(&NULL)
    }

    pub fn get(&self, segment: &Segment) -> &Value {
        match segment {
            Segment::Field(key) => self.field(key),
            Segment::Index(index) => self.element(*index),
        }
    }

    pub fn get_in(&self, path: &[Segment]) -> &Value {
        path.iter().fold(self, |node, segment| node.get(segment))
    }

    /// Shallow copy with `key` replaced.
    ///
    /// A non-record receiver is treated as an empty record.
    pub fn with_field(&self, key: &str, value: Value) -> Value {
        let mut fields = self.as_record().cloned().unwrap_or_default();
        fields.insert(key.to_string(), value);
        Value::Record(Arc::new(fields))
    }

    /// Shallow copy with element `index` replaced.
    ///
    /// A non-list receiver is treated as an empty list; gaps are null-padded.
    pub fn with_element(&self, index: usize, value: Value) -> Value {
        let items = self.as_list().map(<[Value]>::to_vec).unwrap_or_default();
        Value::list(place(items, index, value))
    }

    pub fn with(&self, segment: &Segment, value: Value) -> Value {
        match segment {
            Segment::Field(key) => self.with_field(key, value),
            Segment::Index(index) => self.with_element(*index, value),
        }
    }

    /// Replace the node at `path`, copying each ancestor once.
    pub fn set_in(&self, path: &[Segment], value: Value) -> Value {
        match path.split_first() {
            None => value,
            Some((head, rest)) => {
                let child = self.get(head).set_in(rest, value);
                self.with(head, child)
            }
        }
    }

    pub fn update_in(&self, path: &[Segment], f: impl FnOnce(&Value) -> Value) -> Value {
        let next = f(self.get_in(path));
        self.set_in(path, next)
    }

    /// Reference identity for shared nodes, equality for inline scalars.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => Arc::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b),
            (Value::Record(a), Value::Record(b)) => Arc::ptr_eq(a, b),
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            _ => false,
        }
    }
}

pub(crate) fn place(mut items: Vec<Value>, index: usize, value: Value) -> Vec<Value> {
    if index >= items.len() {
        items.resize(index + 1, Value::Null);
    }
    items[index] = value;
    items
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

/// Decode a typed view out of a [`Value`], defaulting whatever is missing.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Self;
}

pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl FromValue for String {
    fn from_value(value: &Value) -> Self {
        value.str_or_empty().to_string()
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::text(self)
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Self {
        value.as_bool().unwrap_or(false)
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Self {
        value.clone()
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}
