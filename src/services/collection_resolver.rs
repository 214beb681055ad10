//! Collection Resolver.
//!
//! Picks the collection an import writes into: an existing one addressed by
//! id, or a brand-new one whose name and derived slug are not taken yet.

use std::sync::Arc;

use crate::database::LibraryStore;
use crate::types::collection::{slugify, Collection, CollectionUpdate, NewCollection};
use crate::types::errors::EngineError;

/// Whether the import targets a collection that already existed.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedCollection {
    Reused(Collection),
    Created(Collection),
}

impl ResolvedCollection {
    pub fn collection(&self) -> &Collection {
        match self {
            ResolvedCollection::Reused(c) | ResolvedCollection::Created(c) => c,
        }
    }

    pub fn is_reused(&self) -> bool {
        matches!(self, ResolvedCollection::Reused(_))
    }
}

pub struct CollectionResolver {
    store: Arc<dyn LibraryStore>,
}

impl CollectionResolver {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }

    /// Resolves the import target.
    ///
    /// # Errors
    /// - `NotFound` if `target_id` is given but no such collection exists.
    /// - `Conflict` if a collection already uses `name` or its slug.
    pub async fn resolve(
        &self,
        target_id: Option<&str>,
        name: &str,
        description: &str,
    ) -> Result<ResolvedCollection, EngineError> {
        if let Some(id) = target_id {
            return match self.store.find_collection(id).await? {
                Some(existing) => Ok(ResolvedCollection::Reused(existing)),
                None => Err(EngineError::not_found("Specified collection does not exist")),
            };
        }

        let slug = slugify(name);
        if self
            .store
            .find_collection_by_name_or_slug(name, &slug)
            .await?
            .is_some()
        {
            return Err(EngineError::Conflict(
                "Collection name or slug already exists".to_string(),
            ));
        }

        let created = self
            .store
            .create_collection(NewCollection::with_defaults(name, description))
            .await?;

        // Fresh imports are addressed by their own id until the owner picks a slug.
        let update = CollectionUpdate {
            slug: Some(created.id.clone()),
            ..CollectionUpdate::default()
        };
        let created = self.store.update_collection(&created.id, update).await?;
        tracing::info!(collection_id = %created.id, name, "created import collection");

        Ok(ResolvedCollection::Created(created))
    }
}
