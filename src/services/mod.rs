// Linkshelf services
// The import and retrieval engine, plus settings.

pub mod access_guard;
pub mod bookmark_materializer;
pub mod collection_resolver;
pub mod concurrency_limiter;
pub mod folder_materializer;
pub mod icon_normalizer;
pub mod id_remap;
pub mod import_engine;
pub mod settings_engine;
pub mod tree_retrieval;
