//! Property tests for index stamps under interleaved local and remote writes

use std::sync::Arc;

use contractform_document::{Document, DocumentId, Value};
use contractform_sync::{Credentials, IdentityState, MemoryStore, SyncConfig, SyncEngine};
use proptest::prelude::*;
use proptest::test_runner::{Config, TestCaseError};

#[derive(Debug, Clone)]
enum Op {
    Commit(i64),
    External(i64),
    Poll,
    Online(bool),
}

fn stamp() -> impl Strategy<Value = i64> {
    prop_oneof![
        8 => 0_i64..1_000,
        1 => Just(i64::MAX),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => stamp().prop_map(Op::Commit),
        2 => stamp().prop_map(Op::External),
        2 => Just(Op::Poll),
        1 => any::<bool>().prop_map(Op::Online),
    ]
}

async fn run(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let store = Arc::new(MemoryStore::new());
    let engine = SyncEngine::new(store.clone(), SyncConfig::default());
    engine.set_identity(IdentityState::Authenticated(Credentials::new("me", "t")));
    let id = DocumentId::from("d1");
    let revision = |at: i64| Document::new(id.clone(), "me", Value::from(at.to_string()), at);

    let mut seen = i64::MIN;
    for op in ops {
        match op {
            Op::Commit(at) => prop_assert!(engine.commit(revision(at)).is_ok()),
            Op::External(at) => store.put_external(revision(at)),
            Op::Poll => {
                // an offline store fails the poll; the index must still hold
                let _ = engine.poll().await;
            }
            Op::Online(online) => store.set_available(online),
        }
        tokio::task::yield_now().await;

        if let Some(current) = engine.get(&id) {
            prop_assert!(
                current.last_modified >= seen,
                "stamp went from {} to {}",
                seen,
                current.last_modified
            );
            seen = current.last_modified;
        }
    }

    store.set_available(true);
    prop_assert!(engine.poll().await.is_ok());
    prop_assert!(engine.unpushed().is_empty());
    if let (Some(local), Some(remote)) = (engine.get(&id), store.peek(&id)) {
        prop_assert!(local.last_modified >= remote.last_modified);
    }
    Ok(())
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn index_stamps_never_decrease(ops in prop::collection::vec(op(), 0..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(run(ops))?;
    }
}
