//! Depth-Ordered Folder Materializer.
//!
//! Folders of an import batch are grouped into depth buckets and created one
//! bucket at a time. Within a bucket creations run concurrently through the
//! shared [`ConcurrencyLimiter`]; the next bucket starts only after every unit
//! of the current one has finished, so a folder's parent is always mapped in
//! the [`IdRemapTable`] before the folder itself is created.
//!
//! Depth is derived from the `parent_id` chain inside the batch. The depth an
//! exporter declares is only compared against it and logged when it differs.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;

use super::concurrency_limiter::ConcurrencyLimiter;
use super::id_remap::IdRemapTable;
use crate::database::LibraryStore;
use crate::types::errors::EngineError;
use crate::types::folder::NewFolder;
use crate::types::import::ImportItem;

/// Folders of a batch keyed by derived depth, batch order kept inside a bucket.
pub type DepthBuckets<'a> = BTreeMap<u32, Vec<&'a ImportItem>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderReport {
    pub created: usize,
    /// Folders already present in the seeded remap table.
    pub skipped: usize,
}

/// Groups the folder items of `items` by their depth in the batch tree.
///
/// A folder whose parent is not a folder of this batch is at depth 0.
///
/// # Errors
/// `Validation` on a repeated folder id or a parent cycle.
pub fn bucket_by_depth(items: &[ImportItem]) -> Result<DepthBuckets<'_>, EngineError> {
    let folders: Vec<&ImportItem> = items.iter().filter(|i| i.is_folder()).collect();

    let mut by_id: HashMap<&str, &ImportItem> = HashMap::with_capacity(folders.len());
    for &folder in &folders {
        if by_id.insert(folder.id.as_str(), folder).is_some() {
            return Err(EngineError::validation(format!(
                "duplicate folder id in batch: {}",
                folder.id
            )));
        }
    }

    let mut depths: HashMap<&str, u32> = HashMap::with_capacity(folders.len());
    for &folder in &folders {
        let mut chain: Vec<&str> = Vec::new();
        let mut on_chain: HashSet<&str> = HashSet::new();
        let mut cursor = Some(folder.id.as_str());

        let top_depth = loop {
            let Some(id) = cursor else { break 0 };
            if let Some(d) = depths.get(id) {
                break d + 1;
            }
            if !on_chain.insert(id) {
                return Err(EngineError::validation(format!(
                    "folder parent cycle through: {}",
                    id
                )));
            }
            chain.push(id);
            cursor = by_id
                .get(id)
                .and_then(|f| f.parent_id.as_deref())
                .filter(|p| by_id.contains_key(p));
        };

        for (offset, id) in chain.iter().rev().enumerate() {
            depths.insert(*id, top_depth + offset as u32);
        }
    }

    let mut buckets: DepthBuckets = BTreeMap::new();
    for folder in folders {
        let depth = depths[folder.id.as_str()];
        if let Some(declared) = folder.depth {
            if declared != depth {
                tracing::warn!(
                    folder = %folder.id,
                    declared,
                    derived = depth,
                    "declared folder depth disagrees with parent chain"
                );
            }
        }
        buckets.entry(depth).or_default().push(folder);
    }
    Ok(buckets)
}

pub struct FolderMaterializer {
    store: Arc<dyn LibraryStore>,
    limiter: ConcurrencyLimiter,
}

impl FolderMaterializer {
    pub fn new(store: Arc<dyn LibraryStore>, limiter: ConcurrencyLimiter) -> Self {
        Self { store, limiter }
    }

    /// Creates every folder of `buckets` not yet in `table`, lowest depth first.
    ///
    /// On failure the table keeps every mapping recorded so far, so running
    /// again with the same table picks up where this run stopped.
    pub async fn materialize(
        &self,
        collection_id: &str,
        buckets: &DepthBuckets<'_>,
        table: &IdRemapTable,
    ) -> Result<FolderReport, EngineError> {
        let mut report = FolderReport::default();

        for (depth, bucket) in buckets {
            tracing::debug!(depth, folders = bucket.len(), "materializing folder bucket");

            let units = bucket
                .iter()
                .map(|item| self.limiter.run(self.materialize_one(collection_id, item, table)));
            let outcomes = join_all(units).await;

            let mut first_error = None;
            for outcome in outcomes {
                match outcome {
                    Ok(true) => report.created += 1,
                    Ok(false) => report.skipped += 1,
                    Err(e) => {
                        tracing::error!(depth, error = %e, "folder creation failed");
                        first_error.get_or_insert(e);
                    }
                }
            }
            if let Some(e) = first_error {
                return Err(e);
            }
        }

        Ok(report)
    }

    /// Returns `Ok(false)` when the folder was already mapped.
    async fn materialize_one(
        &self,
        collection_id: &str,
        item: &ImportItem,
        table: &IdRemapTable,
    ) -> Result<bool, EngineError> {
        if table.contains(&item.id) {
            return Ok(false);
        }

        let parent_id = table.resolve_parent(item.parent_id.as_deref());
        if parent_id.is_none() {
            if let Some(p) = &item.parent_id {
                tracing::warn!(folder = %item.id, parent = %p, "parent never materialized, creating at root");
            }
        }

        let created = self
            .store
            .create_folder(NewFolder {
                name: item.title.clone(),
                icon: None,
                collection_id: collection_id.to_string(),
                parent_id,
                sort_order: item.sort_order,
            })
            .await?;

        table.insert(&item.id, &created.id);
        Ok(true)
    }
}
