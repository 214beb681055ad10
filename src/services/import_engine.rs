//! Bulk import pipeline.
//!
//! request -> collection resolution -> folders, depth by depth -> bookmarks.
//!
//! One limiter is shared by the folder and bookmark phases. The whole run is
//! bounded by `import.timeout_secs`. Nothing is rolled back on failure: the
//! remap table is the recovery path, and a caller that replays it (as
//! `folderMap`, or by passing the same [`IdRemapTable`]) resumes the import.

use std::sync::Arc;
use std::time::Duration;

use super::bookmark_materializer::BookmarkMaterializer;
use super::collection_resolver::CollectionResolver;
use super::concurrency_limiter::ConcurrencyLimiter;
use super::folder_materializer::{bucket_by_depth, FolderMaterializer};
use super::icon_normalizer::IconNormalizer;
use super::id_remap::IdRemapTable;
use crate::database::LibraryStore;
use crate::types::errors::EngineError;
use crate::types::import::{FolderMapEntry, ImportItem, ImportOutcome, ImportRequest};
use crate::types::settings::{EngineSettings, ImportSettings};

pub struct ImportEngine {
    store: Arc<dyn LibraryStore>,
    settings: ImportSettings,
    icons: IconNormalizer,
}

impl ImportEngine {
    pub fn new(store: Arc<dyn LibraryStore>, settings: &EngineSettings) -> Self {
        Self {
            store,
            settings: settings.import.clone(),
            icons: IconNormalizer::new(settings.icons.replacement_token.clone()),
        }
    }

    /// Imports `request` using a remap table seeded from its `folderMap`.
    pub async fn import(&self, request: ImportRequest) -> Result<ImportOutcome, EngineError> {
        let table = IdRemapTable::new();
        self.import_with_table(request, &table).await
    }

    /// Imports `request`, recording folder mappings in `table`.
    ///
    /// `folderMap` entries of the request are added to `table` once the target
    /// collection is resolved; each must name a folder of that collection. If
    /// the run fails, `table` still holds every folder created so far.
    pub async fn import_with_table(
        &self,
        request: ImportRequest,
        table: &IdRemapTable,
    ) -> Result<ImportOutcome, EngineError> {
        let budget = Duration::from_secs(self.settings.timeout_secs);
        match tokio::time::timeout(budget, self.run(request, table)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    timeout_secs = self.settings.timeout_secs,
                    mapped_folders = table.len(),
                    "import exceeded its time budget"
                );
                Err(EngineError::Timeout(budget))
            }
        }
    }

    async fn run(
        &self,
        request: ImportRequest,
        table: &IdRemapTable,
    ) -> Result<ImportOutcome, EngineError> {
        let ImportRequest {
            name,
            description,
            bookmarks,
            collection_id,
            folder_map,
        } = request;
        let items = validate(bookmarks.as_deref(), collection_id.as_deref(), name.as_deref())?;
        // Cycles and repeated folder ids are rejected before anything is written.
        let buckets = bucket_by_depth(items)?;
        let folder_map = folder_map.unwrap_or_default();
        // A fresh collection has no folders a map could point at.
        if collection_id.is_none() && !folder_map.is_empty() {
            return Err(EngineError::validation(
                "folderMap requires a target collection",
            ));
        }

        let resolved = CollectionResolver::new(self.store.clone())
            .resolve(
                collection_id.as_deref(),
                name.as_deref().unwrap_or_default(),
                description.as_deref().unwrap_or_default(),
            )
            .await?;
        let collection_id = resolved.collection().id.clone();

        self.seed(&collection_id, folder_map, table).await?;

        tracing::info!(
            collection_id = %collection_id,
            items = items.len(),
            seeded = table.len(),
            reused = resolved.is_reused(),
            "starting bookmark import"
        );

        let limiter = ConcurrencyLimiter::new(self.settings.max_concurrent_creates);

        let folders = FolderMaterializer::new(self.store.clone(), limiter.clone())
            .materialize(&collection_id, &buckets, table)
            .await?;

        let bookmarks = BookmarkMaterializer::new(self.store.clone(), limiter, self.icons.clone())
            .skip_existing(resolved.is_reused())
            .materialize(&collection_id, items, table)
            .await?;

        tracing::info!(
            collection_id = %collection_id,
            folders_created = folders.created,
            folders_skipped = folders.skipped,
            bookmarks_created = bookmarks.created,
            bookmarks_skipped = bookmarks.skipped,
            "import finished"
        );

        Ok(ImportOutcome {
            collection_id,
            inside_folder_map: table.entries(),
            items_imported: items.len(),
        })
    }

    /// Adds replayed `folderMap` entries to `table` once each storage id is
    /// known to be a folder of `collection_id`.
    async fn seed(
        &self,
        collection_id: &str,
        folder_map: Vec<FolderMapEntry>,
        table: &IdRemapTable,
    ) -> Result<(), EngineError> {
        for entry in &folder_map {
            if self
                .store
                .find_folder(collection_id, &entry.storage_id)
                .await?
                .is_none()
            {
                tracing::warn!(
                    collection_id = %collection_id,
                    process_id = %entry.process_id,
                    storage_id = %entry.storage_id,
                    "folderMap entry outside the target collection"
                );
                return Err(EngineError::validation(format!(
                    "folderMap entry {} does not belong to the collection",
                    entry.process_id
                )));
            }
        }
        for entry in folder_map {
            table.insert(&entry.process_id, &entry.storage_id);
        }
        Ok(())
    }
}

fn validate<'a>(
    bookmarks: Option<&'a [ImportItem]>,
    collection_id: Option<&str>,
    name: Option<&str>,
) -> Result<&'a [ImportItem], EngineError> {
    let items = bookmarks.ok_or_else(|| EngineError::validation("missing bookmarks"))?;

    if collection_id.is_none() && name.map_or(true, |n| n.trim().is_empty()) {
        return Err(EngineError::validation("missing collection name"));
    }

    if let Some(pos) = items.iter().position(|i| i.id.is_empty()) {
        return Err(EngineError::validation(format!(
            "item {} has an empty id",
            pos
        )));
    }

    Ok(items)
}
