use serde::{Deserialize, Serialize};

/// A node of the folder tree of one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub collection_id: String,
    /// `None` marks a root folder of the collection.
    pub parent_id: Option<String>,
    pub sort_order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields required to persist a new folder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewFolder {
    pub name: String,
    pub icon: Option<String>,
    pub collection_id: String,
    pub parent_id: Option<String>,
    pub sort_order: i64,
}

/// One step of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    pub id: String,
    pub name: String,
}
