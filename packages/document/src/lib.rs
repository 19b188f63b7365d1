//! # Contractform Document
//!
//! Immutable document model for contract editing.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ value: persistent, structurally shared tree │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ path / lens: get & set at any depth         │
//! │ cursor: editor handle bound to one path     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ document: id, owner, body, last modified    │
//! │ contract: form schema + classes list policy │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use contractform_document::{contract, PathCursor, Value};
//! use std::cell::RefCell;
//!
//! let body = contract::template_body();
//! let committed = RefCell::new(None);
//! let root = PathCursor::root("ContractForm.abc", body.clone(), |next| {
//!     *committed.borrow_mut() = Some(next);
//! });
//!
//! root.field("firstName").set(Value::from("Jane"));
//!
//! let next = committed.borrow_mut().take().unwrap();
//! assert_eq!(next.field("firstName").as_str(), Some("Jane"));
//! assert_eq!(body.field("firstName").as_str(), Some(""));
//! ```

pub mod contract;
mod cursor;
mod document;
mod errors;
pub mod lens;
mod list_sizer;
mod path;
mod value;

pub use cursor::PathCursor;
pub use document::{now_millis, Document, DocumentId, ID_BYTES};
pub use errors::DocumentError;
pub use lens::{Compose, Lens, Typed};
pub use list_sizer::{resize, ListSizer};
pub use path::{Path, Segment};
pub use value::{FromValue, IntoValue, Record, Value};
