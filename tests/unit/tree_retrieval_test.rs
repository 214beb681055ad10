//! Unit tests for the Tree Retrieval Engine: contents listing, expansion depth,
//! breadcrumb paths and the access guard in front of them.

use std::sync::Arc;

use linkshelf::database::{LibraryStore, SqliteStore};
use linkshelf::services::tree_retrieval::{ContentsQuery, TreeRetrieval};
use linkshelf::types::bookmark::NewBookmark;
use linkshelf::types::collection::{CollectionUpdate, NewCollection};
use linkshelf::types::errors::EngineError;
use linkshelf::types::folder::NewFolder;
use linkshelf::types::query::{SortDirection, SortField, SortSpec};
use linkshelf::types::session::StaticSession;
use linkshelf::types::settings::RetrievalSettings;
use linkshelf::types::tree::TreeItem;

struct Fixture {
    store: Arc<SqliteStore>,
    retrieval: TreeRetrieval,
    cid: String,
}

impl Fixture {
    async fn new() -> Self {
        let store = Arc::new(SqliteStore::in_memory().expect("in-memory store"));
        let cid = store
            .create_collection(NewCollection::with_defaults("Library", ""))
            .await
            .unwrap()
            .id;
        let retrieval = TreeRetrieval::new(store.clone(), RetrievalSettings::default());
        Self { store, retrieval, cid }
    }

    async fn folder(&self, name: &str, parent: Option<&str>, sort: i64) -> String {
        self.store
            .create_folder(NewFolder {
                name: name.to_string(),
                collection_id: self.cid.clone(),
                parent_id: parent.map(str::to_string),
                sort_order: sort,
                ..NewFolder::default()
            })
            .await
            .unwrap()
            .id
    }

    async fn bookmark(&self, title: &str, folder: Option<&str>, sort: i64) {
        self.store
            .create_bookmark(NewBookmark {
                title: title.to_string(),
                url: format!("https://{}.example", title.to_lowercase()),
                collection_id: self.cid.clone(),
                folder_id: folder.map(str::to_string),
                sort_order: sort,
                ..NewBookmark::default()
            })
            .await
            .unwrap();
    }

    async fn make_private(&self) {
        self.store
            .update_collection(
                &self.cid,
                CollectionUpdate {
                    is_public: Some(false),
                    ..CollectionUpdate::default()
                },
            )
            .await
            .unwrap();
    }
}

fn item_names(items: &[TreeItem]) -> Vec<String> {
    items
        .iter()
        .map(|i| match i {
            TreeItem::Folder(node) => format!("folder:{}", node.folder.name),
            TreeItem::Bookmark(b) => format!("bookmark:{}", b.title),
        })
        .collect()
}

// ─── Operation A: contents ───

#[tokio::test]
async fn test_root_listing_with_one_expanded_level() {
    let fx = Fixture::new().await;
    let docs = fx.folder("Docs", None, 1).await;
    let tools = fx.folder("Tools", None, 2).await;
    let nested = fx.folder("Nested", Some(docs.as_str()), 0).await;
    fx.bookmark("Home", None, 0).await;
    fx.bookmark("Rust", Some(docs.as_str()), 0).await;
    fx.bookmark("Cargo", Some(docs.as_str()), 1).await;
    fx.bookmark("Deep", Some(nested.as_str()), 0).await;
    fx.bookmark("Hammer", Some(tools.as_str()), 0).await;

    let contents = fx
        .retrieval
        .list_contents(&ContentsQuery::new(&fx.cid, None))
        .await
        .unwrap();

    assert_eq!(contents.current_bookmarks.len(), 1);
    assert_eq!(contents.current_bookmarks[0].title, "Home");

    let names: Vec<&str> = contents.subfolders.iter().map(|n| n.folder.name.as_str()).collect();
    assert_eq!(names, vec!["Docs", "Tools"]);

    let docs_node = &contents.subfolders[0];
    assert_eq!(docs_node.bookmark_count, Some(2));
    assert_eq!(
        item_names(docs_node.items()),
        vec!["folder:Nested", "bookmark:Rust", "bookmark:Cargo"]
    );

    // One level only: the nested folder is present but not expanded.
    match &docs_node.items()[0] {
        TreeItem::Folder(n) => {
            assert!(!n.is_expanded());
            assert!(n.items().is_empty());
        }
        other => panic!("expected folder, got {:?}", other),
    }
}

#[tokio::test]
async fn test_listing_a_folder() {
    let fx = Fixture::new().await;
    let docs = fx.folder("Docs", None, 0).await;
    let inner = fx.folder("Inner", Some(docs.as_str()), 0).await;
    fx.bookmark("Rust", Some(docs.as_str()), 0).await;
    fx.bookmark("Home", None, 0).await;
    fx.bookmark("Leaf", Some(inner.as_str()), 0).await;

    let contents = fx
        .retrieval
        .list_contents(&ContentsQuery::new(&fx.cid, Some(docs.as_str())))
        .await
        .unwrap();

    assert_eq!(contents.current_bookmarks.len(), 1);
    assert_eq!(contents.current_bookmarks[0].title, "Rust");
    assert_eq!(contents.subfolders.len(), 1);
    assert_eq!(contents.subfolders[0].folder.id, inner);
    assert_eq!(item_names(contents.subfolders[0].items()), vec!["bookmark:Leaf"]);
}

#[tokio::test]
async fn test_expand_depth_zero_and_two() {
    let fx = Fixture::new().await;
    let a = fx.folder("A", None, 0).await;
    let b = fx.folder("B", Some(a.as_str()), 0).await;
    fx.folder("C", Some(b.as_str()), 0).await;

    let bare = fx
        .retrieval
        .list_contents(&ContentsQuery {
            expand_depth: Some(0),
            ..ContentsQuery::new(&fx.cid, None)
        })
        .await
        .unwrap();
    assert!(!bare.subfolders[0].is_expanded());
    assert!(bare.subfolders[0].items().is_empty());

    let deep = fx
        .retrieval
        .list_contents(&ContentsQuery {
            expand_depth: Some(2),
            ..ContentsQuery::new(&fx.cid, None)
        })
        .await
        .unwrap();
    let a_node = &deep.subfolders[0];
    let b_node = match &a_node.items()[0] {
        TreeItem::Folder(n) => n,
        other => panic!("expected folder, got {:?}", other),
    };
    assert!(b_node.is_expanded());
    assert_eq!(item_names(b_node.items()), vec!["folder:C"]);
    match &b_node.items()[0] {
        TreeItem::Folder(c) => assert!(!c.is_expanded()),
        other => panic!("expected folder, got {:?}", other),
    }
}

#[tokio::test]
async fn test_page_size_bounds_prefetched_bookmarks_not_the_count() {
    let fx = Fixture::new().await;
    let f = fx.folder("Big", None, 0).await;
    for i in 0..5 {
        fx.bookmark(&format!("B{}", i), Some(f.as_str()), i).await;
    }

    let contents = fx
        .retrieval
        .list_contents(&ContentsQuery {
            page_size: Some(2),
            ..ContentsQuery::new(&fx.cid, None)
        })
        .await
        .unwrap();
    let node = &contents.subfolders[0];
    assert_eq!(node.items().len(), 2);
    assert_eq!(node.bookmark_count, Some(5));
}

#[tokio::test]
async fn test_sort_by_title_desc() {
    let fx = Fixture::new().await;
    fx.folder("beta", None, 0).await;
    fx.folder("alpha", None, 1).await;
    fx.bookmark("Apple", None, 2).await;
    fx.bookmark("Cherry", None, 1).await;
    fx.bookmark("Banana", None, 0).await;

    let contents = fx
        .retrieval
        .list_contents(&ContentsQuery {
            sort: Some(SortSpec::new(SortField::Title, SortDirection::Desc)),
            ..ContentsQuery::new(&fx.cid, None)
        })
        .await
        .unwrap();

    let titles: Vec<&str> = contents.current_bookmarks.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Cherry", "Banana", "Apple"]);
    let names: Vec<&str> = contents.subfolders.iter().map(|n| n.folder.name.as_str()).collect();
    assert_eq!(names, vec!["beta", "alpha"]);
}

#[tokio::test]
async fn test_contents_wire_shape() {
    let fx = Fixture::new().await;
    let f = fx.folder("F", None, 0).await;
    fx.bookmark("Inside", Some(f.as_str()), 0).await;

    let contents = fx
        .retrieval
        .list_contents(&ContentsQuery::new(&fx.cid, None))
        .await
        .unwrap();
    let json = serde_json::to_value(&contents).unwrap();

    assert!(json["currentBookmarks"].as_array().unwrap().is_empty());
    let sub = &json["subfolders"][0];
    assert_eq!(sub["name"], "F");
    assert_eq!(sub["bookmarkCount"], 1);
    assert_eq!(sub["items"][0]["type"], "bookmark");
    assert_eq!(sub["items"][0]["title"], "Inside");
}

#[tokio::test]
async fn test_expanded_empty_folder_still_sends_items() {
    let fx = Fixture::new().await;
    fx.folder("Empty", None, 0).await;

    let contents = fx
        .retrieval
        .list_contents(&ContentsQuery::new(&fx.cid, None))
        .await
        .unwrap();
    let json = serde_json::to_value(&contents).unwrap();
    let sub = &json["subfolders"][0];
    assert_eq!(sub["name"], "Empty");
    assert_eq!(sub["bookmarkCount"], 0);
    assert_eq!(sub["items"], serde_json::json!([]));

    let bare = fx
        .retrieval
        .list_contents(&ContentsQuery {
            expand_depth: Some(0),
            ..ContentsQuery::new(&fx.cid, None)
        })
        .await
        .unwrap();
    let json = serde_json::to_value(&bare).unwrap();
    assert!(json["subfolders"][0].get("items").is_none());
    assert!(json["subfolders"][0].get("bookmarkCount").is_none());
}

// ─── Operation B: path ───

#[tokio::test]
async fn test_path_is_root_first() {
    let fx = Fixture::new().await;
    let root = fx.folder("Root", None, 0).await;
    let a = fx.folder("A", Some(root.as_str()), 0).await;
    let b = fx.folder("B", Some(a.as_str()), 0).await;
    let c = fx.folder("C", Some(b.as_str()), 0).await;

    let path = fx.retrieval.folder_path(&fx.cid, &c).await.unwrap();
    let names: Vec<&str> = path.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Root", "A", "B", "C"]);
    assert_eq!(path[0].id, root);
    assert_eq!(path[3].id, c);
}

#[tokio::test]
async fn test_path_of_root_folder() {
    let fx = Fixture::new().await;
    let root = fx.folder("Root", None, 0).await;
    let path = fx.retrieval.folder_path(&fx.cid, &root).await.unwrap();
    assert_eq!(path.len(), 1);
}

#[tokio::test]
async fn test_path_rejects_folder_of_another_collection() {
    let fx = Fixture::new().await;
    let other = fx
        .store
        .create_collection(NewCollection::with_defaults("Other", ""))
        .await
        .unwrap();
    let f = fx.folder("Mine", None, 0).await;

    let err = fx.retrieval.folder_path(&other.id, &f).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
    let err = fx.retrieval.folder_path(&fx.cid, "missing").await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn test_path_stops_at_cycle() {
    let fx = Fixture::new().await;
    let a = fx.folder("A", None, 0).await;
    let b = fx.folder("B", Some(a.as_str()), 0).await;
    // Corrupt the tree behind the store's back: A now points at B.
    fx.store
        .with_connection(|c| {
            c.execute(
                "UPDATE folders SET parent_id = ?1 WHERE id = ?2",
                rusqlite::params![b, a],
            )
        })
        .unwrap();

    let path = fx.retrieval.folder_path(&fx.cid, &b).await.unwrap();
    let names: Vec<&str> = path.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

// ─── Access guard ───

#[tokio::test]
async fn test_private_collection_is_hidden_from_anonymous_callers() {
    let fx = Fixture::new().await;
    let f = fx.folder("Secret", None, 0).await;
    fx.make_private().await;

    let anonymous = StaticSession::anonymous();
    let signed_in = StaticSession::authenticated("owner");
    let query = ContentsQuery::new(&fx.cid, None);

    let err = fx
        .retrieval
        .list_contents_guarded(&query, &anonymous)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
    let err = fx
        .retrieval
        .folder_path_guarded(&fx.cid, &f, &anonymous)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    assert!(fx.retrieval.list_contents_guarded(&query, &signed_in).await.is_ok());
    assert!(fx.retrieval.folder_path_guarded(&fx.cid, &f, &signed_in).await.is_ok());
}

#[tokio::test]
async fn test_public_collection_is_visible_to_everyone() {
    let fx = Fixture::new().await;
    let query = ContentsQuery::new(&fx.cid, None);
    for session in [StaticSession::anonymous(), StaticSession::authenticated("u")] {
        assert!(fx.retrieval.list_contents_guarded(&query, &session).await.is_ok());
    }
}

#[tokio::test]
async fn test_missing_collection_reports_not_found() {
    let fx = Fixture::new().await;
    let query = ContentsQuery::new("missing", None);
    let err = fx
        .retrieval
        .list_contents_guarded(&query, &StaticSession::authenticated("u"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}
