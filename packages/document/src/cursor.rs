//! # Path Cursors
//!
//! A [`PathCursor`] is what an editor is handed: a snapshot of one node in
//! the body, a stable id for that node, and a way to replace it.
//!
//! ```text
//! root cursor ── field("classes") ── element(2) ── field("courseName")
//!      ▲                │                 │                 │
//!      └──── set ◄──────┴──── set ◄───────┴──── set ◄───────┘
//! ```
//!
//! Calling `set` on a child copies its parent once with the new child in
//! place and hands that copy to the parent's `set`, all the way up to the
//! root's update function. No node is mutated in place, and no cursor needs
//! to know the overall shape of the body.

use std::fmt;

use crate::path::{Path, Segment};
use crate::value::{place, Value};

pub struct PathCursor<'a> {
    id: String,
    value: Value,
    update: Box<dyn Fn(Value) + 'a>,
}

impl<'a> PathCursor<'a> {
    /// Root cursor; `update` receives every new root value.
    pub fn root(id: impl Into<String>, value: Value, update: impl Fn(Value) + 'a) -> Self {
        Self {
            id: id.into(),
            value,
            update: Box::new(update),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn set(&self, value: Value) {
        (self.update)(value);
    }

    pub fn modify(&self, f: impl FnOnce(&Value) -> Value) {
        self.set(f(&self.value));
    }

    pub fn child(&self, segment: Segment) -> PathCursor<'_> {
        let value = self.value.get(&segment).clone();
        let id = format!("{}.{}", self.id, segment);
        PathCursor {
            id,
            value,
            update: Box::new(move |next| self.set(self.value.with(&segment, next))),
        }
    }

    pub fn field(&self, key: &str) -> PathCursor<'_> {
        self.child(Segment::field(key))
    }

    pub fn element(&self, index: usize) -> PathCursor<'_> {
        self.child(Segment::Index(index))
    }

    /// Element cursor whose writes pass the whole updated list through
    /// `finish` before it reaches this cursor.
    pub fn element_with<'b, F>(&'b self, index: usize, finish: F) -> PathCursor<'b>
    where
        F: Fn(Vec<Value>) -> Vec<Value> + 'b,
    {
        let value = self.value.element(index).clone();
        let id = format!("{}.{}", self.id, index);
        PathCursor {
            id,
            value,
            update: Box::new(move |next| {
                let items = self
                    .value
                    .as_list()
                    .map(<[Value]>::to_vec)
                    .unwrap_or_default();
                self.set(Value::list(finish(place(items, index, next))));
            }),
        }
    }

    /// Cursor several segments below this one.
    pub fn at(&self, path: &Path) -> PathCursor<'_> {
        let value = self.value.get_in(path.segments()).clone();
        let id = path.id(&self.id);
        let path = path.clone();
        PathCursor {
            id,
            value,
            update: Box::new(move |next| self.set(self.value.set_in(path.segments(), next))),
        }
    }

    /// One cursor per element of a list node.
    pub fn elements(&self) -> Vec<PathCursor<'_>> {
        let len = self.value.as_list().map_or(0, <[Value]>::len);
        (0..len).map(|i| self.element(i)).collect()
    }
}

impl fmt::Debug for PathCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathCursor")
            .field("id", &self.id)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}
