//! Collection view over a live engine

use std::sync::Arc;

use contractform_document::{contract, Document, Value};
use contractform_sync::{Credentials, IdentityState, MemoryStore, SyncConfig, SyncEngine};
use contractform_workspace::{CollectionView, Selector};

fn signed_in_engine() -> (Arc<MemoryStore>, SyncEngine) {
    let store = Arc::new(MemoryStore::new());
    let engine = SyncEngine::new(store.clone(), SyncConfig::default());
    engine.set_identity(IdentityState::Authenticated(Credentials::new("me", "t")));
    (store, engine)
}

fn doc(id: &str, at: i64) -> Document {
    Document::new(id.into(), "me", contract::template_body(), at)
}

#[tokio::test]
async fn test_newest_first() {
    let (store, engine) = signed_in_engine();
    store.put_external(doc("a", 100));
    store.put_external(doc("b", 300));
    store.put_external(doc("c", 200));
    engine.poll().await.unwrap();

    let view = CollectionView::new(engine);
    let ids: Vec<String> = view
        .summaries()
        .into_iter()
        .map(|s| s.id.to_string())
        .collect();
    assert_eq!(ids, ["b", "c", "a"]);
}

#[test]
fn test_ties_break_by_id() {
    let (_store, engine) = signed_in_engine();
    engine.commit(doc("y", 5)).unwrap();
    engine.commit(doc("x", 5)).unwrap();

    let view = CollectionView::new(engine);
    let ids: Vec<String> = view.documents().iter().map(|d| d.id.to_string()).collect();
    assert_eq!(ids, ["x", "y"]);
}

#[test]
fn test_empty_index_renders_empty_list() {
    let engine = SyncEngine::new(Arc::new(MemoryStore::new()), SyncConfig::default());
    let mut view = CollectionView::new(engine);

    assert!(view.summaries().is_empty());
    assert!(view.detail().is_none());
    assert!(!view.select_first_if_empty());
}

#[test]
fn test_unknown_selection_has_no_detail() {
    let (_store, engine) = signed_in_engine();
    engine.commit(doc("known", 1)).unwrap();

    let view = CollectionView::with_selector(engine, Selector::from_fragment("#ghost"));
    assert!(view.detail().is_none());
    assert!(view.editor().is_none());
    assert!(view.summaries().iter().all(|s| !s.is_current));
}

#[test]
fn test_create_selects_new_document() {
    let (_store, engine) = signed_in_engine();
    let mut view = CollectionView::new(engine);

    let id = view.create().unwrap();

    assert_eq!(view.selector().id(), Some(&id));
    let detail = view.detail().unwrap();
    assert_eq!(detail.owner_id, "me");
    assert_eq!(view.summaries()[0].id, id);
    assert!(view.summaries()[0].is_current);
}

#[test]
fn test_create_while_signed_out_fails() {
    let engine = SyncEngine::new(Arc::new(MemoryStore::new()), SyncConfig::default());
    let mut view = CollectionView::new(engine);
    assert!(view.create().is_err());
    assert_eq!(view.selector(), &Selector::none());
}

#[test]
fn test_select_first_if_empty_picks_newest() {
    let (_store, engine) = signed_in_engine();
    engine.commit(doc("old", 1)).unwrap();
    engine.commit(doc("new", 2)).unwrap();
    let mut view = CollectionView::new(engine);

    assert!(view.select_first_if_empty());
    assert_eq!(view.selector().to_fragment(), "#new");

    view.select("old".into());
    assert!(!view.select_first_if_empty());
    assert_eq!(view.selector().to_fragment(), "#old");
}

#[test]
fn test_edits_show_up_in_collection() {
    let (_store, engine) = signed_in_engine();
    engine.commit(doc("a", 1)).unwrap();
    engine.commit(doc("b", 2)).unwrap();
    let mut view = CollectionView::new(engine);
    view.select("a".into());

    view.editor()
        .unwrap()
        .set(&"semester".parse().unwrap(), Value::from("Spring"))
        .unwrap();

    let first = &view.summaries()[0];
    assert_eq!(first.id.as_str(), "a");
    assert!(first.label.starts_with("Spring ; "));
}
