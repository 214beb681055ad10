//! Collection Manager for Linkshelf.
//!
//! Implements `CollectionManagerTrait`: reading, updating and deleting
//! collections on top of a [`LibraryStore`], with every call passing through
//! the access guard first.

use std::sync::Arc;

use async_trait::async_trait;

use crate::database::LibraryStore;
use crate::services::access_guard::{authorize_collection, authorize_mutation};
use crate::types::collection::{slugify, Collection, CollectionSummary, CollectionUpdate};
use crate::types::errors::EngineError;
use crate::types::folder::Folder;
use crate::types::query::{BookmarkQuery, FolderQuery, FolderScope};
use crate::types::session::SessionOracle;

/// Which folders of a collection `list_folders` returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderListing {
    /// Every folder, regardless of nesting.
    All,
    /// Direct children of a folder, or root folders for `None`.
    ChildrenOf(Option<String>),
}

#[async_trait]
pub trait CollectionManagerTrait {
    async fn get(&self, id: &str, session: &dyn SessionOracle) -> Result<CollectionSummary, EngineError>;
    async fn get_by_slug(&self, slug: &str, session: &dyn SessionOracle) -> Result<Collection, EngineError>;
    async fn list_folders(
        &self,
        id: &str,
        listing: FolderListing,
        session: &dyn SessionOracle,
    ) -> Result<Vec<Folder>, EngineError>;
    async fn update(
        &self,
        id: &str,
        update: CollectionUpdate,
        session: &dyn SessionOracle,
    ) -> Result<Collection, EngineError>;
    async fn delete(&self, id: &str, session: &dyn SessionOracle) -> Result<(), EngineError>;
}

pub struct CollectionManager {
    store: Arc<dyn LibraryStore>,
}

impl CollectionManager {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CollectionManagerTrait for CollectionManager {
    /// Returns the collection with its bookmark and folder counts.
    async fn get(&self, id: &str, session: &dyn SessionOracle) -> Result<CollectionSummary, EngineError> {
        let collection = authorize_collection(self.store.as_ref(), id, session).await?;

        let bookmark_count = self
            .store
            .count_bookmarks(&BookmarkQuery::whole_collection(id))
            .await?;
        let folder_count = self
            .store
            .count_folders(&FolderQuery {
                parent: FolderScope::All,
                ..FolderQuery::children_of(id, None)
            })
            .await?;

        Ok(CollectionSummary {
            collection,
            bookmark_count,
            folder_count,
        })
    }

    /// Anonymous callers only find public collections.
    async fn get_by_slug(&self, slug: &str, session: &dyn SessionOracle) -> Result<Collection, EngineError> {
        match self.store.find_collection_by_slug(slug).await? {
            Some(c) if c.is_public || session.is_authenticated() => Ok(c),
            _ => Err(EngineError::not_found("Collection not found")),
        }
    }

    /// Folders ordered by their sort order.
    async fn list_folders(
        &self,
        id: &str,
        listing: FolderListing,
        session: &dyn SessionOracle,
    ) -> Result<Vec<Folder>, EngineError> {
        authorize_collection(self.store.as_ref(), id, session).await?;

        let parent = match listing {
            FolderListing::All => FolderScope::All,
            FolderListing::ChildrenOf(parent) => FolderScope::from_parent(parent.as_deref()),
        };
        let folders = self
            .store
            .find_folders(&FolderQuery {
                parent,
                ..FolderQuery::children_of(id, None)
            })
            .await?;
        Ok(folders)
    }

    /// Applies `update`. A new name replaces the slug with one derived from it.
    ///
    /// # Errors
    /// `Conflict` if another collection already uses the resulting slug.
    async fn update(
        &self,
        id: &str,
        mut update: CollectionUpdate,
        session: &dyn SessionOracle,
    ) -> Result<Collection, EngineError> {
        authorize_mutation(self.store.as_ref(), id, session).await?;

        if let Some(name) = &update.name {
            update.slug = Some(slugify(name));
        }
        if let Some(slug) = &update.slug {
            if let Some(other) = self.store.find_collection_by_slug(slug).await? {
                if other.id != id {
                    return Err(EngineError::Conflict(
                        "The name or slug is already in use".to_string(),
                    ));
                }
            }
        }

        let updated = self.store.update_collection(id, update).await?;
        tracing::info!(collection_id = id, slug = ?updated.slug, "collection updated");
        Ok(updated)
    }

    /// Deletes the bookmarks, then the folders, then the collection.
    async fn delete(&self, id: &str, session: &dyn SessionOracle) -> Result<(), EngineError> {
        authorize_mutation(self.store.as_ref(), id, session).await?;

        let bookmarks = self.store.delete_bookmarks(id).await?;
        let folders = self.store.delete_folders(id).await?;
        self.store.delete_collection(id).await?;

        tracing::info!(collection_id = id, bookmarks, folders, "collection deleted");
        Ok(())
    }
}
