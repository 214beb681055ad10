//! Unit tests for the Collection Resolver.

use std::sync::Arc;

use linkshelf::database::{LibraryStore, SqliteStore};
use linkshelf::services::collection_resolver::{CollectionResolver, ResolvedCollection};
use linkshelf::types::collection::NewCollection;
use linkshelf::types::errors::EngineError;

fn setup() -> (Arc<SqliteStore>, CollectionResolver) {
    let store = Arc::new(SqliteStore::in_memory().expect("in-memory store"));
    let resolver = CollectionResolver::new(store.clone());
    (store, resolver)
}

#[tokio::test]
async fn test_new_collection_gets_its_id_as_slug() {
    let (store, resolver) = setup();
    let resolved = resolver.resolve(None, "My Reading List", "imported").await.unwrap();

    assert!(!resolved.is_reused());
    let c = resolved.collection();
    assert_eq!(c.name, "My Reading List");
    assert_eq!(c.description, "imported");
    assert!(c.is_public);
    assert_eq!(c.sort_order, 0);
    assert_eq!(c.slug.as_deref(), Some(c.id.as_str()));

    let stored = store.find_collection(&c.id).await.unwrap().unwrap();
    assert_eq!(stored.slug, c.slug);
}

#[tokio::test]
async fn test_existing_target_is_reused() {
    let (store, resolver) = setup();
    let existing = store
        .create_collection(NewCollection::with_defaults("Existing", ""))
        .await
        .unwrap();

    let resolved = resolver
        .resolve(Some(existing.id.as_str()), "ignored name", "")
        .await
        .unwrap();
    assert!(matches!(&resolved, ResolvedCollection::Reused(c) if c.id == existing.id));
    assert_eq!(resolved.collection().name, "Existing");
}

#[tokio::test]
async fn test_missing_target_is_not_found() {
    let (_store, resolver) = setup();
    let err = resolver.resolve(Some("nope"), "x", "").await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(ref m) if m == "Specified collection does not exist"));
}

#[tokio::test]
async fn test_taken_name_is_conflict() {
    let (_store, resolver) = setup();
    resolver.resolve(None, "Dev Tools", "").await.unwrap();
    let err = resolver.resolve(None, "Dev Tools", "").await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn test_taken_slug_is_conflict() {
    let (store, resolver) = setup();
    let c = store
        .create_collection(NewCollection::with_defaults("something else", ""))
        .await
        .unwrap();
    store
        .update_collection(
            &c.id,
            linkshelf::types::collection::CollectionUpdate {
                slug: Some("dev-tools".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = resolver.resolve(None, "Dev  Tools", "").await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn test_conflict_creates_nothing() {
    let (store, resolver) = setup();
    resolver.resolve(None, "Once", "").await.unwrap();
    let _ = resolver.resolve(None, "Once", "").await;

    let count: i64 = store
        .with_connection(|c| c.query_row("SELECT COUNT(*) FROM collections", [], |r| r.get(0)))
        .unwrap();
    assert_eq!(count, 1);
}
