//! Tree Retrieval Engine.
//!
//! Reads one level of a collection (bookmarks and subfolders of a folder, or
//! of the root) and prefetches the subfolders' own contents up to a bounded
//! depth. Also resolves breadcrumb paths from a folder up to the root.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::{join_all, BoxFuture, FutureExt};

use super::access_guard::authorize_collection;
use crate::database::LibraryStore;
use crate::types::errors::EngineError;
use crate::types::folder::{Folder, PathSegment};
use crate::types::query::{BookmarkQuery, FolderQuery, SortSpec};
use crate::types::session::SessionOracle;
use crate::types::settings::RetrievalSettings;
use crate::types::tree::{FolderContents, FolderNode, TreeItem};

/// A contents listing. Unset options fall back to the retrieval settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentsQuery {
    pub collection_id: String,
    /// `None` lists the collection root.
    pub folder_id: Option<String>,
    pub sort: Option<SortSpec>,
    /// Bookmarks listed per expanded subfolder. `0` lists all of them.
    pub page_size: Option<u32>,
    /// Levels of subfolders expanded below the listed folder.
    pub expand_depth: Option<u32>,
}

impl ContentsQuery {
    pub fn new(collection_id: &str, folder_id: Option<&str>) -> Self {
        Self {
            collection_id: collection_id.to_string(),
            folder_id: folder_id.map(str::to_string),
            ..Self::default()
        }
    }
}

/// Options of one listing after defaults are applied.
#[derive(Debug, Clone, Copy)]
struct Expansion {
    sort: SortSpec,
    page_size: Option<u32>,
}

pub struct TreeRetrieval {
    store: Arc<dyn LibraryStore>,
    settings: RetrievalSettings,
}

impl TreeRetrieval {
    pub fn new(store: Arc<dyn LibraryStore>, settings: RetrievalSettings) -> Self {
        Self { store, settings }
    }

    /// Lists the contents of a folder (or the root) of a collection.
    ///
    /// Does not check visibility; see [`TreeRetrieval::list_contents_guarded`].
    pub async fn list_contents(&self, query: &ContentsQuery) -> Result<FolderContents, EngineError> {
        let expansion = Expansion {
            sort: query.sort.unwrap_or_else(|| self.settings.sort()),
            page_size: match query.page_size.unwrap_or(self.settings.page_size) {
                0 => None,
                n => Some(n),
            },
        };
        let levels = query.expand_depth.unwrap_or(self.settings.expand_depth);
        let cid = query.collection_id.as_str();
        let folder_id = query.folder_id.as_deref();

        let bookmark_query = BookmarkQuery {
            sort: expansion.sort,
            ..BookmarkQuery::in_folder(cid, folder_id)
        };
        let folder_query = FolderQuery {
            sort: expansion.sort,
            ..FolderQuery::children_of(cid, folder_id)
        };

        let (current_bookmarks, folders) = futures::try_join!(
            self.store.find_bookmarks(&bookmark_query),
            self.store.find_folders(&folder_query),
        )?;

        let subfolders = self.expand_all(cid, folders, levels, expansion).await?;

        tracing::debug!(
            collection_id = cid,
            folder_id = ?folder_id,
            bookmarks = current_bookmarks.len(),
            subfolders = subfolders.len(),
            levels,
            "listed folder contents"
        );

        Ok(FolderContents {
            current_bookmarks,
            subfolders,
        })
    }

    /// [`TreeRetrieval::list_contents`] behind the access guard.
    pub async fn list_contents_guarded(
        &self,
        query: &ContentsQuery,
        session: &dyn SessionOracle,
    ) -> Result<FolderContents, EngineError> {
        authorize_collection(self.store.as_ref(), &query.collection_id, session).await?;
        self.list_contents(query).await
    }

    /// Breadcrumb from the collection root down to `folder_id`, root first.
    ///
    /// The walk stops at a folder without parent, at a parent that cannot be
    /// found in the collection, or when a folder repeats.
    ///
    /// # Errors
    /// `NotFound` if `folder_id` is not a folder of `collection_id`.
    pub async fn folder_path(
        &self,
        collection_id: &str,
        folder_id: &str,
    ) -> Result<Vec<PathSegment>, EngineError> {
        let mut current = self
            .store
            .find_folder(collection_id, folder_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Folder not found"))?;

        let mut path = Vec::new();
        let mut seen = HashSet::new();
        loop {
            seen.insert(current.id.clone());
            let parent_id = current.parent_id.clone();
            path.push(PathSegment {
                id: current.id,
                name: current.name,
            });

            let Some(parent_id) = parent_id else { break };
            if seen.contains(&parent_id) {
                tracing::warn!(collection_id, folder_id = %parent_id, "folder parent cycle, path truncated");
                break;
            }
            match self.store.find_folder(collection_id, &parent_id).await? {
                Some(parent) => current = parent,
                None => {
                    tracing::warn!(collection_id, folder_id = %parent_id, "broken folder chain, path truncated");
                    break;
                }
            }
        }

        path.reverse();
        Ok(path)
    }

    /// [`TreeRetrieval::folder_path`] behind the access guard.
    pub async fn folder_path_guarded(
        &self,
        collection_id: &str,
        folder_id: &str,
        session: &dyn SessionOracle,
    ) -> Result<Vec<PathSegment>, EngineError> {
        authorize_collection(self.store.as_ref(), collection_id, session).await?;
        self.folder_path(collection_id, folder_id).await
    }

    async fn expand_all(
        &self,
        collection_id: &str,
        folders: Vec<Folder>,
        levels: u32,
        expansion: Expansion,
    ) -> Result<Vec<FolderNode>, EngineError> {
        let nodes = join_all(
            folders
                .into_iter()
                .map(|folder| self.expand(collection_id, folder, levels, expansion)),
        )
        .await;
        nodes.into_iter().collect()
    }

    fn expand<'a>(
        &'a self,
        collection_id: &'a str,
        folder: Folder,
        levels: u32,
        expansion: Expansion,
    ) -> BoxFuture<'a, Result<FolderNode, EngineError>> {
        async move {
            if levels == 0 {
                return Ok(FolderNode::bare(folder));
            }

            let bookmark_query = BookmarkQuery {
                sort: expansion.sort,
                limit: expansion.page_size,
                ..BookmarkQuery::in_folder(collection_id, Some(folder.id.as_str()))
            };
            let folder_query = FolderQuery {
                sort: expansion.sort,
                ..FolderQuery::children_of(collection_id, Some(folder.id.as_str()))
            };
            let count_query = BookmarkQuery::in_folder(collection_id, Some(folder.id.as_str()));

            let (bookmarks, children, bookmark_count) = futures::try_join!(
                self.store.find_bookmarks(&bookmark_query),
                self.store.find_folders(&folder_query),
                self.store.count_bookmarks(&count_query),
            )?;

            let children = self
                .expand_all(collection_id, children, levels - 1, expansion)
                .await?;

            let mut items: Vec<TreeItem> = children.into_iter().map(TreeItem::Folder).collect();
            items.extend(bookmarks.into_iter().map(TreeItem::Bookmark));

            Ok(FolderNode {
                folder,
                items: Some(items),
                bookmark_count: Some(bookmark_count),
            })
        }
        .boxed()
    }
}
