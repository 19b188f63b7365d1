//! # Sync Engine
//!
//! Owns the [`DocumentIndex`] and keeps it in step with a [`RemoteStore`].
//!
//! ```text
//!  editor ── commit(doc) ──► index (optimistic) ──► event: Changed{Local}
//!                                 │
//!                                 └─ spawn push ──► store.upsert
//!                                                     │ fails → stays unpushed
//!
//!  timer ─── poll() ──► push unpushed ──► store.list_for_owner
//!                                             │
//!                       reconcile each ◄──────┘ ──► event: Changed{Remote}
//! ```
//!
//! ## Rules
//!
//! 1. **Optimistic**: `commit` updates the index before any I/O.
//! 2. **Strictly newer wins**: a remote revision replaces the local entry only
//!    if its `last_modified` is greater; ties keep the local value.
//! 3. **Contained failures**: store errors are logged and retried on the next
//!    poll, never surfaced to editors.
//! 4. **Epochs**: every identity change bumps an epoch; a poll that started
//!    under an older epoch has its result thrown away, as does a push that
//!    started before a change of owner.
//! 5. **One push per document**: a commit made while its document is being
//!    pushed only marks the newer revision; the running push sends it next.
//!    A document leaves the unpushed set only when the revision that landed
//!    is still the indexed one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contractform_document::{now_millis, Document, DocumentId, Value};
use tokio::sync::{broadcast, watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::errors::{StoreError, SyncError};
use crate::identity::{Credentials, IdentityState};
use crate::index::{DocumentIndex, Reconciled};
use crate::store::RemoteStore;

/// Where a change to the index came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    Local,
    Remote,
}

/// Change notification for index subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    Changed {
        id: DocumentId,
        last_modified: i64,
        origin: ChangeOrigin,
    },
    /// The index was emptied (signed out or switched user)
    Cleared,
}

/// What a single poll did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollReport {
    pub added: Vec<DocumentId>,
    pub updated: Vec<DocumentId>,
    pub unchanged: usize,
    pub pushed: usize,
    /// Identity changed while the poll was in flight; nothing was applied
    pub stale: bool,
}

struct EngineState {
    index: DocumentIndex,
    identity: IdentityState,
    epoch: u64,
    /// Documents whose latest local revision has not reached the store
    unpushed: HashMap<DocumentId, i64>,
    /// Ticket of the one push allowed in flight per document
    in_flight: HashMap<DocumentId, u64>,
    next_ticket: u64,
}

impl EngineState {
    /// Newest unpushed revision of `id` and the credentials to send it with.
    fn pending_revision(&self, id: &DocumentId) -> Option<(Credentials, Arc<Document>)> {
        let credentials = self.identity.credentials()?.clone();
        self.unpushed.get(id)?;
        let document = self.index.get(id)?.clone();
        Some((credentials, document))
    }
}

struct PushJob {
    ticket: u64,
    credentials: Credentials,
    document: Arc<Document>,
}

enum Claim {
    Ready(PushJob),
    Busy,
    Idle,
}

enum Settled {
    Done(PushOutcome),
    Again(PushJob),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PushOutcome {
    Landed,
    Failed,
    Nothing,
}

/// Releases a document's push slot however the push ends, cancellation
/// included.
struct PushSlot<'a> {
    inner: &'a Inner,
    id: DocumentId,
    ticket: u64,
}

impl Drop for PushSlot<'_> {
    fn drop(&mut self) {
        self.inner.release_slot(&self.id, self.ticket);
    }
}

struct Inner {
    store: Arc<dyn RemoteStore>,
    config: SyncConfig,
    state: Mutex<EngineState>,
    events: broadcast::Sender<DocumentEvent>,
    slot_released: Notify,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: DocumentEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    /// Reconcile one remote revision and announce it if it changed the
    /// index. A replaced entry is no longer waiting to be pushed.
    fn merge_remote(&self, state: &mut EngineState, document: Document) -> Reconciled {
        let id = document.id.clone();
        let last_modified = document.last_modified;
        let outcome = state.index.reconcile(document);
        if outcome == Reconciled::Kept {
            return outcome;
        }
        if outcome == Reconciled::Replaced {
            if let Some(local) = state.unpushed.remove(&id) {
                warn!(
                    doc_id = %id,
                    local,
                    remote = last_modified,
                    "newer remote revision replaced an unpushed local edit"
                );
            }
        }
        self.emit(DocumentEvent::Changed {
            id,
            last_modified,
            origin: ChangeOrigin::Remote,
        });
        outcome
    }

    fn claim_push(&self, id: &DocumentId) -> Claim {
        let mut state = self.lock();
        if state.in_flight.contains_key(id) {
            return Claim::Busy;
        }
        let Some((credentials, document)) = state.pending_revision(id) else {
            return Claim::Idle;
        };
        state.next_ticket += 1;
        let ticket = state.next_ticket;
        state.in_flight.insert(id.clone(), ticket);
        Claim::Ready(PushJob {
            ticket,
            credentials,
            document,
        })
    }

    fn release_slot(&self, id: &DocumentId, ticket: u64) {
        let mut state = self.lock();
        if state.in_flight.get(id) == Some(&ticket) {
            state.in_flight.remove(id);
            self.slot_released.notify_waiters();
        }
    }

    /// Record the outcome of one upsert. A revision committed while it was
    /// in flight comes back as the next job for the same slot.
    fn settle_push(&self, job: &PushJob, result: Result<(), StoreError>) -> Settled {
        let id = &job.document.id;
        let mut state = self.lock();
        if state.in_flight.get(id) != Some(&job.ticket) {
            debug!(doc_id = %id, "discarding push result from previous identity");
            return Settled::Done(PushOutcome::Failed);
        }
        if let Err(e) = result {
            warn!(doc_id = %id, error = %e, "push failed; will retry on next poll");
            return Settled::Done(PushOutcome::Failed);
        }

        debug!(doc_id = %id, last_modified = job.document.last_modified, "pushed");
        let landed_is_current = state
            .index
            .get(id)
            .is_some_and(|current| Arc::ptr_eq(current, &job.document));
        if landed_is_current {
            state.unpushed.remove(id);
        }
        match state.pending_revision(id) {
            Some((credentials, document)) => Settled::Again(PushJob {
                ticket: job.ticket,
                credentials,
                document,
            }),
            None => Settled::Done(PushOutcome::Landed),
        }
    }

    /// Upsert until the newest revision of the claimed document has landed
    /// or a push fails.
    async fn run_push(&self, mut job: PushJob) -> PushOutcome {
        let _slot = PushSlot {
            inner: self,
            id: job.document.id.clone(),
            ticket: job.ticket,
        };
        loop {
            let result = self.store.upsert(&job.credentials, &job.document).await;
            match self.settle_push(&job, result) {
                Settled::Done(outcome) => return outcome,
                Settled::Again(next) => job = next,
            }
        }
    }

    /// Push `id` unless a push for it is already running.
    async fn try_push(&self, id: &DocumentId) -> PushOutcome {
        match self.claim_push(id) {
            Claim::Ready(job) => self.run_push(job).await,
            Claim::Busy | Claim::Idle => PushOutcome::Nothing,
        }
    }

    /// Push `id`, first waiting out a push already in flight.
    async fn push_settled(&self, id: &DocumentId) -> PushOutcome {
        loop {
            let released = self.slot_released.notified();
            match self.claim_push(id) {
                Claim::Ready(job) => return self.run_push(job).await,
                Claim::Busy => released.await,
                Claim::Idle => return PushOutcome::Nothing,
            }
        }
    }
}

/// Shared handle to the engine; clones refer to the same index.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<Inner>,
}

impl SyncEngine {
    pub fn new(store: Arc<dyn RemoteStore>, config: SyncConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            inner: Arc::new(Inner {
                store,
                config,
                state: Mutex::new(EngineState {
                    index: DocumentIndex::new(),
                    identity: IdentityState::Unauthenticated,
                    epoch: 0,
                    unpushed: HashMap::new(),
                    in_flight: HashMap::new(),
                    next_ticket: 0,
                }),
                events,
                slot_released: Notify::new(),
            }),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DocumentEvent> {
        self.inner.events.subscribe()
    }

    pub fn identity(&self) -> IdentityState {
        self.inner.lock().identity.clone()
    }

    pub fn get(&self, id: &DocumentId) -> Option<Arc<Document>> {
        self.inner.lock().index.get(id).cloned()
    }

    /// Copy of the index; entries are shared, not cloned.
    pub fn snapshot(&self) -> DocumentIndex {
        self.inner.lock().index.clone()
    }

    /// Ids committed locally but not yet confirmed by the store
    pub fn unpushed(&self) -> Vec<DocumentId> {
        self.inner.lock().unpushed.keys().cloned().collect()
    }

    /// Apply an identity transition from the login provider.
    ///
    /// Signing out, or signing in as someone else, empties the index.
    pub fn set_identity(&self, identity: IdentityState) {
        let mut state = self.inner.lock();
        if state.identity == identity {
            return;
        }
        let owner_changed = state.identity.owner_id() != identity.owner_id();
        let was_signed_in = state.identity.is_authenticated();
        info!(
            from = state.identity.owner_id().unwrap_or("-"),
            to = identity.owner_id().unwrap_or("-"),
            "identity changed"
        );
        state.identity = identity;
        state.epoch += 1;
        if owner_changed {
            state.index.clear();
            state.unpushed.clear();
            state.in_flight.clear();
            self.inner.slot_released.notify_waiters();
            if was_signed_in {
                self.inner.emit(DocumentEvent::Cleared);
            }
        }
    }

    /// Submit an edited document.
    ///
    /// The index is updated immediately; the push to the store happens in
    /// the background and is retried by [`Self::poll`] if it fails.
    pub fn commit(&self, document: Document) -> Result<Arc<Document>, SyncError> {
        let stored = {
            let mut state = self.inner.lock();
            let owner_id = state.identity.owner_id().ok_or(SyncError::Unauthenticated)?;
            if document.owner_id != owner_id {
                return Err(SyncError::NotOwner {
                    id: document.id,
                    owner_id: document.owner_id,
                });
            }
            let stored = state.index.commit(document);
            state
                .unpushed
                .insert(stored.id.clone(), stored.last_modified);
            self.inner.emit(DocumentEvent::Changed {
                id: stored.id.clone(),
                last_modified: stored.last_modified,
                origin: ChangeOrigin::Local,
            });
            stored
        };

        debug!(doc_id = %stored.id, last_modified = stored.last_modified, "committed");
        self.spawn_push(stored.id.clone());
        Ok(stored)
    }

    /// Create a document from `template`, commit it, and return its id.
    pub fn create(&self, template: Value) -> Result<DocumentId, SyncError> {
        let owner_id = self
            .identity()
            .owner_id()
            .map(str::to_string)
            .ok_or(SyncError::Unauthenticated)?;
        let document = Document::new(DocumentId::generate(), owner_id, template, now_millis());
        let id = document.id.clone();
        self.commit(document)?;
        info!(doc_id = %id, "created document");
        Ok(id)
    }

    /// Background push of `id`; skipped when one is already running, since
    /// that push picks up the newest revision before it finishes.
    fn spawn_push(&self, id: DocumentId) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!(doc_id = %id, "no runtime; push deferred to next poll");
            return;
        };
        let inner = self.inner.clone();
        runtime.spawn(async move {
            inner.try_push(&id).await;
        });
    }

    /// Push every unpushed document, waiting for pushes already in flight.
    /// Failures are logged and left for the next attempt; returns how many
    /// pushes landed.
    pub async fn push_pending(&self) -> usize {
        let pending: Vec<DocumentId> = {
            let state = self.inner.lock();
            if !state.identity.is_authenticated() {
                return 0;
            }
            state.unpushed.keys().cloned().collect()
        };

        let mut pushed = 0;
        for id in pending {
            if self.inner.push_settled(&id).await == PushOutcome::Landed {
                pushed += 1;
            }
        }
        pushed
    }

    /// One sync round: retry pending pushes, then merge the owner's remote
    /// documents into the index.
    ///
    /// Signed out, this does nothing and reports nothing.
    pub async fn poll(&self) -> Result<PollReport, SyncError> {
        let (credentials, epoch) = {
            let state = self.inner.lock();
            match state.identity.credentials() {
                Some(credentials) => (credentials.clone(), state.epoch),
                None => return Ok(PollReport::default()),
            }
        };

        let pushed = self.push_pending().await;
        let remote = self.inner.store.list_for_owner(&credentials).await?;

        let mut report = PollReport {
            pushed,
            ..PollReport::default()
        };
        let mut state = self.inner.lock();
        if state.epoch != epoch {
            debug!("discarding poll result from previous identity");
            report.stale = true;
            return Ok(report);
        }

        for document in remote {
            if document.owner_id != credentials.owner_id {
                warn!(doc_id = %document.id, "store returned a foreign document; ignoring");
                continue;
            }
            let id = document.id.clone();
            match self.inner.merge_remote(&mut state, document) {
                Reconciled::Kept => report.unchanged += 1,
                Reconciled::Added => report.added.push(id),
                Reconciled::Replaced => report.updated.push(id),
            }
        }

        if !report.added.is_empty() || !report.updated.is_empty() {
            info!(
                added = report.added.len(),
                updated = report.updated.len(),
                "merged remote changes"
            );
        }
        Ok(report)
    }

    /// Read one document straight from the store and merge it into the
    /// index, returning the indexed revision (a newer local edit wins).
    ///
    /// Fails with [`StoreError::NotFound`] when the store has no such
    /// document for the signed-in owner.
    pub async fn fetch(&self, id: &DocumentId) -> Result<Arc<Document>, SyncError> {
        let (credentials, epoch) = {
            let state = self.inner.lock();
            let credentials = state
                .identity
                .credentials()
                .ok_or(SyncError::Unauthenticated)?;
            (credentials.clone(), state.epoch)
        };

        let remote = self
            .inner
            .store
            .get(&credentials, id)
            .await?
            .filter(|document| document.owner_id == credentials.owner_id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let mut state = self.inner.lock();
        if state.epoch != epoch {
            debug!(doc_id = %id, "discarding fetch result from previous identity");
            if !state.identity.is_authenticated() {
                return Err(SyncError::Unauthenticated);
            }
        } else {
            self.inner.merge_remote(&mut state, remote);
        }
        state
            .index
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()).into())
    }

    /// Start polling on the configured interval, following `identity`.
    ///
    /// The loop runs until the returned handle is stopped or dropped.
    pub fn start(&self, mut identity: watch::Receiver<IdentityState>) -> PollHandle {
        let engine = self.clone();
        let task = tokio::spawn(async move {
            engine.set_identity(identity.borrow_and_update().clone());

            let mut ticker = tokio::time::interval(engine.inner.config.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut following = true;

            loop {
                tokio::select! {
                    changed = identity.changed(), if following => {
                        if changed.is_err() {
                            debug!("identity provider closed; keeping last identity");
                            following = false;
                            continue;
                        }
                        engine.set_identity(identity.borrow_and_update().clone());
                        ticker.reset_immediately();
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = engine.poll().await {
                            warn!(error = %e, "poll failed; retrying next interval");
                        }
                    }
                }
            }
        });
        PollHandle { task: Some(task) }
    }
}

/// Running poll loop; stopping or dropping it cancels the loop.
///
/// Cancellation only lands at an await point, and the index is only touched
/// between await points, so stopping never leaves a half-applied poll.
#[derive(Debug)]
pub struct PollHandle {
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn stop(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop and wait for the loop to wind down.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn signed_in(owner: &str) -> IdentityState {
        IdentityState::Authenticated(Credentials::new(owner, "token"))
    }

    #[test]
    fn test_commit_without_runtime_defers_push() {
        let store = Arc::new(MemoryStore::new());
        let engine = SyncEngine::new(store.clone(), SyncConfig::default());
        engine.set_identity(signed_in("me"));

        let doc = Document::new("d1".into(), "me", Value::Null, 10);
        engine.commit(doc).unwrap();

        assert_eq!(engine.unpushed(), vec![DocumentId::from("d1")]);
        assert_eq!(store.upsert_count(), 0);
    }

    #[test]
    fn test_commit_requires_identity() {
        let engine = SyncEngine::new(Arc::new(MemoryStore::new()), SyncConfig::default());
        let err = engine
            .commit(Document::new("d1".into(), "me", Value::Null, 1))
            .unwrap_err();
        assert!(matches!(err, SyncError::Unauthenticated));
        assert!(engine.snapshot().is_empty());
    }

    #[test]
    fn test_commit_rejects_foreign_owner() {
        let engine = SyncEngine::new(Arc::new(MemoryStore::new()), SyncConfig::default());
        engine.set_identity(signed_in("me"));
        let err = engine
            .commit(Document::new("d1".into(), "you", Value::Null, 1))
            .unwrap_err();
        assert!(matches!(err, SyncError::NotOwner { .. }));
    }

    #[test]
    fn test_token_refresh_keeps_index() {
        let engine = SyncEngine::new(Arc::new(MemoryStore::new()), SyncConfig::default());
        engine.set_identity(signed_in("me"));
        engine
            .commit(Document::new("d1".into(), "me", Value::Null, 1))
            .unwrap();

        engine.set_identity(IdentityState::Authenticated(Credentials::new("me", "fresh")));
        assert_eq!(engine.snapshot().len(), 1);

        engine.set_identity(IdentityState::Unauthenticated);
        assert!(engine.snapshot().is_empty());
    }
}
