use serde::{Deserialize, Serialize};

/// Field used to order listings.
///
/// Folders have no title or view count, so those fall back to `name` and
/// `sort_order` respectively when ordering folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    SortOrder,
    Title,
    CreatedAt,
    UpdatedAt,
    ViewCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortField {
    /// Parses the wire name (`sortOrder`, `title`, ...). Unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sortOrder" => Some(SortField::SortOrder),
            "title" | "name" => Some(SortField::Title),
            "createdAt" => Some(SortField::CreatedAt),
            "updatedAt" => Some(SortField::UpdatedAt),
            "viewCount" => Some(SortField::ViewCount),
            _ => None,
        }
    }

    pub fn bookmark_column(&self) -> &'static str {
        match self {
            SortField::SortOrder => "sort_order",
            SortField::Title => "title",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::ViewCount => "view_count",
        }
    }

    pub fn folder_column(&self) -> &'static str {
        match self {
            SortField::SortOrder | SortField::ViewCount => "sort_order",
            SortField::Title => "name",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

impl SortDirection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// Which level of the tree a listing is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderScope {
    /// Every item of the collection regardless of nesting.
    All,
    /// Items whose parent reference is null.
    Root,
    /// Items directly inside the given folder.
    In(String),
}

impl FolderScope {
    /// `None` maps to the collection root, like a missing `folderId` parameter.
    pub fn from_parent(parent: Option<&str>) -> Self {
        match parent {
            Some(id) => FolderScope::In(id.to_string()),
            None => FolderScope::Root,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FolderQuery {
    pub collection_id: String,
    pub parent: FolderScope,
    pub sort: SortSpec,
    pub limit: Option<u32>,
}

impl FolderQuery {
    pub fn children_of(collection_id: &str, parent: Option<&str>) -> Self {
        Self {
            collection_id: collection_id.to_string(),
            parent: FolderScope::from_parent(parent),
            sort: SortSpec::default(),
            limit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkQuery {
    pub collection_id: String,
    pub folder: FolderScope,
    pub url: Option<String>,
    pub title: Option<String>,
    pub sort: SortSpec,
    pub limit: Option<u32>,
}

impl BookmarkQuery {
    pub fn in_folder(collection_id: &str, folder: Option<&str>) -> Self {
        Self {
            collection_id: collection_id.to_string(),
            folder: FolderScope::from_parent(folder),
            url: None,
            title: None,
            sort: SortSpec::default(),
            limit: None,
        }
    }

    pub fn whole_collection(collection_id: &str) -> Self {
        Self {
            folder: FolderScope::All,
            ..Self::in_folder(collection_id, None)
        }
    }
}
