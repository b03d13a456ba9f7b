mod common;

use common::FakeEntityStore;
use flowgate::prelude::*;
use serde_json::json;

const ID: &str = "8a6b2cce-9e9b-4a7a-b6ac-6d84f1f115c1";

#[tokio::test]
async fn name_hit_is_authoritative() {
    let store = FakeEntityStore {
        named: vec![("web-1".to_string(), json!({"id": ID, "name": "web-1"}))],
        ..Default::default()
    };
    let entity = resolve_name_or_id(&store, "web-1").await.unwrap();
    assert_eq!(entity["id"], ID);
    // no id fallback was attempted
    assert_eq!(store.calls(), vec!["search web-1".to_string()]);
}

#[tokio::test]
async fn missing_name_that_is_no_id_propagates_the_original_404() {
    let store = FakeEntityStore::default();
    let err = resolve_name_or_id(&store, "no-such-server").await.unwrap_err();
    assert!(err.is_not_found());
    // the original search failure, not a UUID parse complaint
    assert!(err.to_string().contains("name miss"));
    assert_eq!(store.calls(), vec!["search no-such-server".to_string()]);
}

#[tokio::test]
async fn missing_name_that_parses_as_id_falls_back_to_get() {
    let store = FakeEntityStore {
        stored: vec![(ID.to_string(), json!({"id": ID, "name": "web-1"}))],
        ..Default::default()
    };
    let entity = resolve_name_or_id(&store, ID).await.unwrap();
    assert_eq!(entity["name"], "web-1");
    assert_eq!(
        store.calls(),
        vec![format!("search {ID}"), format!("get {ID}")]
    );
}

#[tokio::test]
async fn fallback_get_failure_is_returned_as_is() {
    let store = FakeEntityStore::default();
    let err = resolve_name_or_id(&store, ID).await.unwrap_err();
    assert!(err.is_not_found());
    // the get failure, not the search one
    assert!(err.to_string().contains("id miss"));
    assert_eq!(
        store.calls(),
        vec![format!("search {ID}"), format!("get {ID}")]
    );
}

#[tokio::test]
async fn non_404_search_failure_is_never_masked() {
    let store = FakeEntityStore {
        search_miss_code: 500,
        ..Default::default()
    };
    // token would parse as an id, but the fallback must not run
    let err = resolve_name_or_id(&store, ID).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(store.calls(), vec![format!("search {ID}")]);
}
