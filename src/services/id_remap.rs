//! Id Remap Table: import-time process ids to storage ids.
//!
//! Entries keep their insertion order so the table can be handed back to the
//! caller and replayed into a later run. Every operation takes the lock for a
//! single lookup or append; nothing holds it across an `.await`.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::types::import::FolderMapEntry;

#[derive(Debug, Default)]
struct RemapInner {
    order: Vec<FolderMapEntry>,
    index: HashMap<String, String>,
}

#[derive(Debug, Default)]
pub struct IdRemapTable {
    inner: Mutex<RemapInner>,
}

impl IdRemapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the table from a previous run. When a process id repeats, the
    /// first mapping wins.
    pub fn from_entries(entries: impl IntoIterator<Item = FolderMapEntry>) -> Self {
        let table = Self::new();
        for entry in entries {
            table.insert(&entry.process_id, &entry.storage_id);
        }
        table
    }

    fn with_inner<T>(&self, f: impl FnOnce(&mut RemapInner) -> T) -> T {
        // Appends are single steps, so a poisoned table is still consistent.
        let mut guard = match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    /// Storage id recorded for `process_id`, if any.
    pub fn resolve(&self, process_id: &str) -> Option<String> {
        self.with_inner(|inner| inner.index.get(process_id).cloned())
    }

    /// Resolves an optional parent reference. `None` stays `None`, and so does a
    /// reference that was never materialized.
    pub fn resolve_parent(&self, parent: Option<&str>) -> Option<String> {
        parent.and_then(|p| self.resolve(p))
    }

    pub fn contains(&self, process_id: &str) -> bool {
        self.with_inner(|inner| inner.index.contains_key(process_id))
    }

    /// Records a mapping. Returns `false` and leaves the table untouched if the
    /// process id is already mapped.
    pub fn insert(&self, process_id: &str, storage_id: &str) -> bool {
        self.with_inner(|inner| {
            if inner.index.contains_key(process_id) {
                return false;
            }
            inner
                .index
                .insert(process_id.to_string(), storage_id.to_string());
            inner.order.push(FolderMapEntry {
                process_id: process_id.to_string(),
                storage_id: storage_id.to_string(),
            });
            true
        })
    }

    pub fn len(&self) -> usize {
        self.with_inner(|inner| inner.order.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the entries in insertion order.
    pub fn entries(&self) -> Vec<FolderMapEntry> {
        self.with_inner(|inner| inner.order.clone())
    }
}
