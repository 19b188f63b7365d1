//! # Contractform Sync
//!
//! Keeps a local document index consistent with a remote store.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ SyncEngine                               │
//! │  - commit: optimistic local update       │
//! │  - poll: push pending, merge remote      │
//! │  - events: broadcast of index changes    │
//! └──────────────────────────────────────────┘
//!          ↓                        ↑
//! ┌──────────────────┐   ┌──────────────────┐
//! │ DocumentIndex    │   │ IdentityState    │
//! │ newest revision  │   │ (watch channel)  │
//! └──────────────────┘   └──────────────────┘
//!          ↓
//! ┌──────────────────────────────────────────┐
//! │ RemoteStore: MemoryStore | FileStore     │
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Conflict policy
//!
//! Last writer wins by `last_modified`. A remote revision replaces the local
//! one only when strictly newer; commits are stamped so the local entry never
//! moves backwards.

mod config;
mod engine;
mod errors;
mod file_store;
mod identity;
mod index;
mod store;

pub use config::{SyncConfig, DEFAULT_EVENT_CAPACITY, DEFAULT_POLL_INTERVAL};
pub use engine::{ChangeOrigin, DocumentEvent, PollHandle, PollReport, SyncEngine};
pub use errors::{StoreError, SyncError};
pub use file_store::FileStore;
pub use identity::{Credentials, IdentityState};
pub use index::{DocumentIndex, Reconciled};
pub use store::{MemoryStore, RemoteStore};
