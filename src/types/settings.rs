use serde::{Deserialize, Serialize};

use super::query::{SortDirection, SortField, SortSpec};

/// Top-level engine settings container. Any missing section or field takes
/// its default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineSettings {
    #[serde(default)]
    pub import: ImportSettings,
    #[serde(default)]
    pub icons: IconSettings,
    #[serde(default)]
    pub retrieval: RetrievalSettings,
}

/// Bulk import limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImportSettings {
    /// Upper bound on folder/bookmark creations in flight at once.
    pub max_concurrent_creates: usize,
    /// Wall-clock budget of a whole import call.
    pub timeout_secs: u64,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_concurrent_creates: 10,
            timeout_secs: 60,
        }
    }
}

/// Icon URL rewriting.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IconSettings {
    /// Access token appended to rewritten icon URLs.
    pub replacement_token: Option<String>,
}

/// Defaults for contents listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Maximum bookmarks returned per prefetched subfolder.
    pub page_size: u32,
    /// Levels of subfolders eagerly expanded below the current folder.
    pub expand_depth: u32,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            page_size: 100,
            expand_depth: 1,
            sort_field: SortField::SortOrder,
            sort_direction: SortDirection::Asc,
        }
    }
}

impl RetrievalSettings {
    pub fn sort(&self) -> SortSpec {
        SortSpec::new(self.sort_field, self.sort_direction)
    }
}
