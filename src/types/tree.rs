use serde::Serialize;

use super::bookmark::Bookmark;
use super::folder::Folder;

/// A subfolder as returned by a contents listing.
///
/// Expanded nodes carry their direct children (possibly none) and a bookmark
/// count; nodes past the expansion limit carry neither, and `items` is left
/// off the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    #[serde(flatten)]
    pub folder: Folder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<TreeItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmark_count: Option<u64>,
}

impl FolderNode {
    pub fn bare(folder: Folder) -> Self {
        Self {
            folder,
            items: None,
            bookmark_count: None,
        }
    }

    /// Direct children; empty for a bare node.
    pub fn items(&self) -> &[TreeItem] {
        self.items.as_deref().unwrap_or_default()
    }

    pub fn is_expanded(&self) -> bool {
        self.bookmark_count.is_some()
    }
}

/// A child entry of an expanded folder, tagged with its kind on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeItem {
    Folder(FolderNode),
    Bookmark(Bookmark),
}

/// Contents of one level of a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderContents {
    pub current_bookmarks: Vec<Bookmark>,
    pub subfolders: Vec<FolderNode>,
}
