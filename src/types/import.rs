use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportItemKind {
    Folder,
    Link,
}

/// One entry of a flattened browser export.
///
/// `id` and `parent_id` are process ids: they only mean something inside the
/// batch they arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ImportItemKind,
    pub title: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
    /// Nesting depth declared by the exporter (folders only). Informational.
    #[serde(default)]
    pub depth: Option<u32>,
    #[serde(default)]
    pub add_date: Option<i64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl ImportItem {
    pub fn folder(id: &str, title: &str, parent_id: Option<&str>, depth: u32) -> Self {
        Self {
            id: id.to_string(),
            kind: ImportItemKind::Folder,
            title: title.to_string(),
            parent_id: parent_id.map(str::to_string),
            sort_order: 0,
            depth: Some(depth),
            add_date: None,
            url: None,
            icon: None,
        }
    }

    pub fn link(id: &str, title: &str, url: &str, parent_id: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            kind: ImportItemKind::Link,
            title: title.to_string(),
            parent_id: parent_id.map(str::to_string),
            sort_order: 0,
            depth: None,
            add_date: None,
            url: Some(url.to_string()),
            icon: None,
        }
    }

    pub fn with_sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn is_folder(&self) -> bool {
        self.kind == ImportItemKind::Folder
    }
}

/// A `(processId, storageId)` pair of the id remap table, in its wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderMapEntry {
    #[serde(rename = "processId")]
    pub process_id: String,
    #[serde(rename = "dataBaseId")]
    pub storage_id: String,
}

/// Body of an import call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub bookmarks: Option<Vec<ImportItem>>,
    /// Reuse this collection instead of creating one.
    #[serde(default)]
    pub collection_id: Option<String>,
    /// Remap table returned by an earlier, interrupted run.
    #[serde(default)]
    pub folder_map: Option<Vec<FolderMapEntry>>,
}

/// Result of a successful import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub collection_id: String,
    pub inside_folder_map: Vec<FolderMapEntry>,
    pub items_imported: usize,
}
