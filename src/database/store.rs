//! Storage abstraction for collections, folders and bookmarks.
//!
//! The import and retrieval engines only talk to [`LibraryStore`]. Every
//! method is async: each call is a point where the calling task may yield, so
//! many creations can be in flight while one of them waits on storage.

use async_trait::async_trait;

use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::collection::{Collection, CollectionUpdate, NewCollection};
use crate::types::errors::StoreError;
use crate::types::folder::{Folder, NewFolder};
use crate::types::query::{BookmarkQuery, FolderQuery};

/// Create/find/count/update/delete over the three entities.
///
/// Implementations must be `Send + Sync` so one store can back every
/// concurrent unit of an import.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    // Collections

    async fn create_collection(&self, new: NewCollection) -> Result<Collection, StoreError>;

    async fn find_collection(&self, id: &str) -> Result<Option<Collection>, StoreError>;

    async fn find_collection_by_slug(&self, slug: &str) -> Result<Option<Collection>, StoreError>;

    /// First collection whose name equals `name` or whose slug equals `slug`.
    async fn find_collection_by_name_or_slug(
        &self,
        name: &str,
        slug: &str,
    ) -> Result<Option<Collection>, StoreError>;

    /// Applies `update` and returns the updated row.
    ///
    /// # Errors
    /// `StoreError::NotFound` if no collection has this id.
    async fn update_collection(
        &self,
        id: &str,
        update: CollectionUpdate,
    ) -> Result<Collection, StoreError>;

    /// Deletes a collection row. Does not cascade.
    async fn delete_collection(&self, id: &str) -> Result<(), StoreError>;

    // Folders

    async fn create_folder(&self, new: NewFolder) -> Result<Folder, StoreError>;

    /// Looks a folder up by id, scoped to one collection.
    async fn find_folder(&self, collection_id: &str, id: &str) -> Result<Option<Folder>, StoreError>;

    async fn find_folders(&self, query: &FolderQuery) -> Result<Vec<Folder>, StoreError>;

    async fn count_folders(&self, query: &FolderQuery) -> Result<u64, StoreError>;

    /// Deletes every folder of a collection and returns how many were removed.
    async fn delete_folders(&self, collection_id: &str) -> Result<u64, StoreError>;

    // Bookmarks

    async fn create_bookmark(&self, new: NewBookmark) -> Result<Bookmark, StoreError>;

    async fn find_bookmarks(&self, query: &BookmarkQuery) -> Result<Vec<Bookmark>, StoreError>;

    async fn count_bookmarks(&self, query: &BookmarkQuery) -> Result<u64, StoreError>;

    /// Deletes every bookmark of a collection and returns how many were removed.
    async fn delete_bookmarks(&self, collection_id: &str) -> Result<u64, StoreError>;
}
