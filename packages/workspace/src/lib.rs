//! # Contractform Workspace
//!
//! The view layer over a [`SyncEngine`](contractform_sync::SyncEngine),
//! independent of any rendering technology.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │ CollectionView                             │
//! │  summaries (newest first) + Selector       │
//! └────────────────────────────────────────────┘
//!          ↓ detail / editor          ↓ fragment
//! ┌──────────────────────┐   ┌─────────────────┐
//! │ ContractEditor       │   │ Selector        │
//! │ cursor edit → commit │   │ "#<id>" ↔ id    │
//! └──────────────────────┘   └─────────────────┘
//!          ↓
//! ┌────────────────────────────────────────────┐
//! │ PreviewRequest → renderer URL              │
//! └────────────────────────────────────────────┘
//! ```

mod collection;
mod editor;
mod errors;
mod preview;
mod selector;

pub use collection::{label, time_since, CollectionView, DocumentSummary, LABEL_COURSES_WIDTH};
pub use editor::{ContractEditor, FORM_ID_PREFIX};
pub use errors::{Result, WorkspaceError};
pub use preview::{
    PreviewAuthentication, PreviewOptions, PreviewRequest, DEFAULT_PREVIEW_ENDPOINT, REQUEST_PARAM,
};
pub use selector::Selector;
