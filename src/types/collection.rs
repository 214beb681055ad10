use serde::{Deserialize, Serialize};

/// How a collection is laid out by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewStyle {
    #[default]
    List,
    Card,
}

/// Default ordering applied to a collection's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortStyle {
    #[default]
    Alpha,
    Manual,
    Recent,
}

impl ViewStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewStyle::List => "list",
            ViewStyle::Card => "card",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "card" => ViewStyle::Card,
            _ => ViewStyle::List,
        }
    }
}

impl SortStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortStyle::Alpha => "alpha",
            SortStyle::Manual => "manual",
            SortStyle::Recent => "recent",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "manual" => SortStyle::Manual,
            "recent" => SortStyle::Recent,
            _ => SortStyle::Alpha,
        }
    }
}

/// A named container of folders and bookmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    /// Unique across all collections once assigned.
    pub slug: Option<String>,
    pub description: String,
    pub is_public: bool,
    pub view_style: ViewStyle,
    pub sort_style: SortStyle,
    pub sort_order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields required to persist a new collection.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCollection {
    pub name: String,
    pub description: String,
    pub is_public: bool,
    pub view_style: ViewStyle,
    pub sort_style: SortStyle,
    pub sort_order: i64,
}

impl NewCollection {
    /// A public collection with the default view/sort style and sort order 0.
    pub fn with_defaults(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            is_public: true,
            view_style: ViewStyle::default(),
            sort_style: SortStyle::default(),
            sort_order: 0,
        }
    }
}

/// Partial update of a collection; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub sort_order: Option<i64>,
}

/// A collection together with how many items it owns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    #[serde(flatten)]
    pub collection: Collection,
    pub bookmark_count: u64,
    pub folder_count: u64,
}

/// Derives the human-readable slug of a collection name: lowercase, with each
/// run of whitespace collapsed into a single hyphen. Leading and trailing
/// whitespace is dropped rather than hyphenated, so `" Reads "` and `"Reads"`
/// share the slug `reads`.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
