//! Bookmark Materializer.
//!
//! Creates a bookmark for every link item of a batch once all folders are
//! mapped. Links are independent of each other and run at the limiter's
//! concurrency; they never produce remap entries.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;

use super::concurrency_limiter::ConcurrencyLimiter;
use super::icon_normalizer::IconNormalizer;
use super::id_remap::IdRemapTable;
use crate::database::LibraryStore;
use crate::types::bookmark::NewBookmark;
use crate::types::errors::EngineError;
use crate::types::import::{ImportItem, ImportItemKind};
use crate::types::query::{BookmarkQuery, FolderScope};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookmarkReport {
    pub created: usize,
    /// Links found already stored by an earlier run.
    pub skipped: usize,
}

pub struct BookmarkMaterializer {
    store: Arc<dyn LibraryStore>,
    limiter: ConcurrencyLimiter,
    icons: IconNormalizer,
    skip_existing: bool,
}

impl BookmarkMaterializer {
    pub fn new(store: Arc<dyn LibraryStore>, limiter: ConcurrencyLimiter, icons: IconNormalizer) -> Self {
        Self {
            store,
            limiter,
            icons,
            skip_existing: false,
        }
    }

    /// When set, links already stored by an earlier run are not created again.
    ///
    /// Stored bookmarks are counted per (folder, url, title) once, before any
    /// link is created; that many batch links with the same key are skipped,
    /// in batch order. Used when importing into an existing collection.
    pub fn skip_existing(mut self, skip: bool) -> Self {
        self.skip_existing = skip;
        self
    }

    /// Creates all link items of `items`. Bookmarks created before a failure
    /// are kept.
    pub async fn materialize(
        &self,
        collection_id: &str,
        items: &[ImportItem],
        table: &IdRemapTable,
    ) -> Result<BookmarkReport, EngineError> {
        let links: Vec<PlannedLink> = items
            .iter()
            .filter(|i| i.kind == ImportItemKind::Link)
            .map(|item| PlannedLink::resolve(item, table))
            .collect();

        let mut report = BookmarkReport::default();
        let pending = if self.skip_existing {
            let stored = self.stored_counts(collection_id, &links).await?;
            let total = links.len();
            let pending = already_stored(links, stored);
            report.skipped = total - pending.len();
            pending
        } else {
            links
        };
        tracing::debug!(links = pending.len(), skipped = report.skipped, "materializing bookmarks");

        let units = pending
            .iter()
            .map(|link| self.limiter.run(self.materialize_one(collection_id, link)));
        let outcomes = join_all(units).await;

        let mut first_error = None;
        for outcome in outcomes {
            match outcome {
                Ok(()) => report.created += 1,
                Err(e) => {
                    tracing::error!(error = %e, "bookmark creation failed");
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    /// Number of stored bookmarks for every distinct key of `links`.
    async fn stored_counts(
        &self,
        collection_id: &str,
        links: &[PlannedLink<'_>],
    ) -> Result<HashMap<LinkKey, u64>, EngineError> {
        let mut counts = HashMap::new();
        for link in links {
            let key = link.key();
            if counts.contains_key(&key) {
                continue;
            }
            let query = BookmarkQuery {
                folder: FolderScope::from_parent(link.folder_id.as_deref()),
                url: Some(link.url.clone()),
                title: Some(link.item.title.clone()),
                ..BookmarkQuery::whole_collection(collection_id)
            };
            let n = self.store.count_bookmarks(&query).await?;
            counts.insert(key, n);
        }
        Ok(counts)
    }

    async fn materialize_one(&self, collection_id: &str, link: &PlannedLink<'_>) -> Result<(), EngineError> {
        let item = link.item;
        self.store
            .create_bookmark(NewBookmark {
                title: item.title.clone(),
                url: link.url.clone(),
                icon: self.icons.normalize_opt(item.icon.as_deref()),
                description: None,
                collection_id: collection_id.to_string(),
                folder_id: link.folder_id.clone(),
                sort_order: item.sort_order,
            })
            .await?;
        Ok(())
    }
}

/// (folder, url, title) of a link.
type LinkKey = (Option<String>, String, String);

/// A link item with its storage folder resolved.
struct PlannedLink<'a> {
    item: &'a ImportItem,
    folder_id: Option<String>,
    url: String,
}

impl<'a> PlannedLink<'a> {
    fn resolve(item: &'a ImportItem, table: &IdRemapTable) -> Self {
        let folder_id = table.resolve_parent(item.parent_id.as_deref());
        if folder_id.is_none() {
            if let Some(p) = &item.parent_id {
                tracing::warn!(link = %item.id, parent = %p, "parent folder unknown, filing at root");
            }
        }
        Self {
            item,
            folder_id,
            url: item.url.clone().unwrap_or_default(),
        }
    }

    fn key(&self) -> LinkKey {
        (self.folder_id.clone(), self.url.clone(), self.item.title.clone())
    }
}

/// Drops, per key, the first `stored[key]` links in batch order.
fn already_stored(links: Vec<PlannedLink<'_>>, mut stored: HashMap<LinkKey, u64>) -> Vec<PlannedLink<'_>> {
    links
        .into_iter()
        .filter(|link| match stored.get_mut(&link.key()) {
            Some(n) if *n > 0 => {
                *n -= 1;
                false
            }
            _ => true,
        })
        .collect()
}
