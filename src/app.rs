//! App Core for Linkshelf.
//!
//! Holds the shared store and the settings engine, and builds the engines the
//! RPC layer dispatches to.

use std::sync::Arc;

use crate::database::{Database, LibraryStore, SqliteStore};
use crate::managers::collection_manager::CollectionManager;
use crate::services::import_engine::ImportEngine;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::tree_retrieval::TreeRetrieval;

pub struct App {
    pub store: Arc<SqliteStore>,
    pub settings_engine: SettingsEngine,
}

impl App {
    /// Opens the database at `db_path` and loads settings from `settings_path`
    /// (the platform config file when `None`).
    ///
    /// An unreadable settings file is logged and replaced by defaults.
    pub fn new(db_path: &str, settings_path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Database::open(db_path)?;
        Ok(Self::with_store(SqliteStore::new(db), settings_path))
    }

    /// Like [`App::new`] with an in-memory database.
    pub fn in_memory(settings_path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::with_store(SqliteStore::in_memory()?, settings_path))
    }

    fn with_store(store: SqliteStore, settings_path: Option<String>) -> Self {
        let mut settings_engine = SettingsEngine::new(settings_path);
        if let Err(e) = settings_engine.load() {
            tracing::warn!(
                path = settings_engine.get_config_path(),
                error = %e,
                "settings not loaded, using defaults"
            );
        }
        Self {
            store: Arc::new(store),
            settings_engine,
        }
    }

    fn shared_store(&self) -> Arc<dyn LibraryStore> {
        self.store.clone()
    }

    pub fn import_engine(&self) -> ImportEngine {
        ImportEngine::new(self.shared_store(), self.settings_engine.get_settings())
    }

    pub fn tree_retrieval(&self) -> TreeRetrieval {
        TreeRetrieval::new(
            self.shared_store(),
            self.settings_engine.get_settings().retrieval.clone(),
        )
    }

    pub fn collection_manager(&self) -> CollectionManager {
        CollectionManager::new(self.shared_store())
    }
}
