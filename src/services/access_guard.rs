//! Access Guard.
//!
//! A collection is visible when it is public or the caller is authenticated.
//! Callers that fail the check get `NotFound`, exactly as if the collection did
//! not exist, so anonymous callers cannot discover private collections.

use crate::database::LibraryStore;
use crate::types::collection::Collection;
use crate::types::errors::EngineError;
use crate::types::session::SessionOracle;

pub fn is_visible(is_public: bool, authenticated: bool) -> bool {
    is_public || authenticated
}

/// Loads a collection the caller is allowed to see.
pub async fn authorize_collection(
    store: &dyn LibraryStore,
    collection_id: &str,
    session: &dyn SessionOracle,
) -> Result<Collection, EngineError> {
    match store.find_collection(collection_id).await? {
        Some(c) if is_visible(c.is_public, session.is_authenticated()) => Ok(c),
        _ => {
            tracing::debug!(collection_id, "collection hidden or missing");
            Err(EngineError::not_found("Collection not found"))
        }
    }
}

/// Like [`authorize_collection`], but the operation also needs a session.
///
/// Private collections still answer `NotFound` to anonymous callers; public
/// ones answer `Unauthorized`.
pub async fn authorize_mutation(
    store: &dyn LibraryStore,
    collection_id: &str,
    session: &dyn SessionOracle,
) -> Result<Collection, EngineError> {
    let collection = authorize_collection(store, collection_id, session).await?;
    require_session(session)?;
    Ok(collection)
}

pub fn require_session(session: &dyn SessionOracle) -> Result<(), EngineError> {
    if session.is_authenticated() {
        Ok(())
    } else {
        Err(EngineError::Unauthorized("Unauthorized access".to_string()))
    }
}
