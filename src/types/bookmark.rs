use serde::{Deserialize, Serialize};

/// A saved link inside a collection, optionally filed under a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub is_featured: bool,
    pub view_count: i64,
    pub sort_order: i64,
    pub collection_id: String,
    /// `None` means the bookmark sits at the collection root.
    pub folder_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields required to persist a new bookmark.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub collection_id: String,
    pub folder_id: Option<String>,
    pub sort_order: i64,
}
