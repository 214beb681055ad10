//! `LibraryStore` backed by a single SQLite connection.
//!
//! The connection lives behind a `std::sync::Mutex`; every method takes the
//! lock for the duration of its statements only, never across an `.await`.

use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rusqlite::{params, params_from_iter, OptionalExtension};
use uuid::Uuid;

use super::connection::Database;
use super::store::LibraryStore;
use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::collection::{Collection, CollectionUpdate, NewCollection, SortStyle, ViewStyle};
use crate::types::errors::StoreError;
use crate::types::folder::{Folder, NewFolder};
use crate::types::query::{BookmarkQuery, FolderQuery, FolderScope};

const COLLECTION_COLUMNS: &str =
    "id, name, slug, description, is_public, view_style, sort_style, sort_order, created_at, updated_at";
const FOLDER_COLUMNS: &str =
    "id, name, icon, collection_id, parent_id, sort_order, created_at, updated_at";
const BOOKMARK_COLUMNS: &str = "id, title, url, icon, description, is_featured, view_count, \
     sort_order, collection_id, folder_id, created_at, updated_at";

/// SQLite implementation of [`LibraryStore`].
pub struct SqliteStore {
    db: Mutex<Database>,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// Opens a fresh in-memory database.
    pub fn in_memory() -> Result<Self, StoreError> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>, StoreError> {
        self.db
            .lock()
            .map_err(|e| StoreError::Database(format!("connection lock poisoned: {}", e)))
    }

    /// Runs `f` against the locked connection. Used by tests and maintenance code
    /// that needs raw SQL.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&rusqlite::Connection) -> Result<T, rusqlite::Error>,
    ) -> Result<T, StoreError> {
        let db = self.lock()?;
        Ok(f(db.connection())?)
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn row_to_collection(row: &rusqlite::Row) -> rusqlite::Result<Collection> {
        let view_style: String = row.get(5)?;
        let sort_style: String = row.get(6)?;
        Ok(Collection {
            id: row.get(0)?,
            name: row.get(1)?,
            slug: row.get(2)?,
            description: row.get(3)?,
            is_public: row.get(4)?,
            view_style: ViewStyle::parse(&view_style),
            sort_style: SortStyle::parse(&sort_style),
            sort_order: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn row_to_folder(row: &rusqlite::Row) -> rusqlite::Result<Folder> {
        Ok(Folder {
            id: row.get(0)?,
            name: row.get(1)?,
            icon: row.get(2)?,
            collection_id: row.get(3)?,
            parent_id: row.get(4)?,
            sort_order: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            icon: row.get(3)?,
            description: row.get(4)?,
            is_featured: row.get(5)?,
            view_count: row.get(6)?,
            sort_order: row.get(7)?,
            collection_id: row.get(8)?,
            folder_id: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    fn find_collection_where(
        &self,
        clause: &str,
        args: &[&str],
    ) -> Result<Option<Collection>, StoreError> {
        let db = self.lock()?;
        let sql = format!(
            "SELECT {} FROM collections WHERE {} ORDER BY created_at, rowid LIMIT 1",
            COLLECTION_COLUMNS, clause
        );
        let found = db
            .connection()
            .query_row(&sql, params_from_iter(args.iter()), Self::row_to_collection)
            .optional()?;
        Ok(found)
    }
}

/// Appends the parent/folder restriction of `scope` to a WHERE clause.
fn push_scope(column: &str, scope: &FolderScope, clauses: &mut Vec<String>, args: &mut Vec<String>) {
    match scope {
        FolderScope::All => {}
        FolderScope::Root => clauses.push(format!("{} IS NULL", column)),
        FolderScope::In(id) => {
            clauses.push(format!("{} = ?", column));
            args.push(id.clone());
        }
    }
}

fn folder_filter(query: &FolderQuery) -> (String, Vec<String>) {
    let mut clauses = vec!["collection_id = ?".to_string()];
    let mut args = vec![query.collection_id.clone()];
    push_scope("parent_id", &query.parent, &mut clauses, &mut args);
    (clauses.join(" AND "), args)
}

fn bookmark_filter(query: &BookmarkQuery) -> (String, Vec<String>) {
    let mut clauses = vec!["collection_id = ?".to_string()];
    let mut args = vec![query.collection_id.clone()];
    push_scope("folder_id", &query.folder, &mut clauses, &mut args);
    if let Some(url) = &query.url {
        clauses.push("url = ?".to_string());
        args.push(url.clone());
    }
    if let Some(title) = &query.title {
        clauses.push("title = ?".to_string());
        args.push(title.clone());
    }
    (clauses.join(" AND "), args)
}

fn limit_clause(limit: Option<u32>) -> String {
    match limit {
        Some(n) => format!(" LIMIT {}", n),
        None => String::new(),
    }
}

#[async_trait]
impl LibraryStore for SqliteStore {
    async fn create_collection(&self, new: NewCollection) -> Result<Collection, StoreError> {
        let collection = Collection {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            slug: None,
            description: new.description,
            is_public: new.is_public,
            view_style: new.view_style,
            sort_style: new.sort_style,
            sort_order: new.sort_order,
            created_at: Self::now(),
            updated_at: Self::now(),
        };

        let db = self.lock()?;
        db.connection().execute(
            "INSERT INTO collections (id, name, slug, description, is_public, view_style, sort_style, sort_order, created_at, updated_at) \
             VALUES (?1, ?2, NULL, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                collection.id,
                collection.name,
                collection.description,
                collection.is_public,
                collection.view_style.as_str(),
                collection.sort_style.as_str(),
                collection.sort_order,
                collection.created_at,
                collection.updated_at
            ],
        )?;
        Ok(collection)
    }

    async fn find_collection(&self, id: &str) -> Result<Option<Collection>, StoreError> {
        self.find_collection_where("id = ?", &[id])
    }

    async fn find_collection_by_slug(&self, slug: &str) -> Result<Option<Collection>, StoreError> {
        self.find_collection_where("slug = ?", &[slug])
    }

    async fn find_collection_by_name_or_slug(
        &self,
        name: &str,
        slug: &str,
    ) -> Result<Option<Collection>, StoreError> {
        self.find_collection_where("name = ? OR slug = ?", &[name, slug])
    }

    async fn update_collection(
        &self,
        id: &str,
        update: CollectionUpdate,
    ) -> Result<Collection, StoreError> {
        let db = self.lock()?;
        let conn = db.connection();
        let affected = conn.execute(
            "UPDATE collections SET \
                 name = COALESCE(?1, name), \
                 slug = COALESCE(?2, slug), \
                 description = COALESCE(?3, description), \
                 is_public = COALESCE(?4, is_public), \
                 sort_order = COALESCE(?5, sort_order), \
                 updated_at = ?6 \
             WHERE id = ?7",
            params![
                update.name,
                update.slug,
                update.description,
                update.is_public,
                update.sort_order,
                Self::now(),
                id
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound(format!("collection {}", id)));
        }

        let sql = format!("SELECT {} FROM collections WHERE id = ?1", COLLECTION_COLUMNS);
        Ok(conn.query_row(&sql, params![id], Self::row_to_collection)?)
    }

    async fn delete_collection(&self, id: &str) -> Result<(), StoreError> {
        let db = self.lock()?;
        let affected = db
            .connection()
            .execute("DELETE FROM collections WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StoreError::NotFound(format!("collection {}", id)));
        }
        Ok(())
    }

    async fn create_folder(&self, new: NewFolder) -> Result<Folder, StoreError> {
        // Other in-flight creations get a turn before this one takes the connection.
        tokio::task::yield_now().await;

        let now = Self::now();
        let folder = Folder {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            icon: new.icon,
            collection_id: new.collection_id,
            parent_id: new.parent_id,
            sort_order: new.sort_order,
            created_at: now,
            updated_at: now,
        };

        let db = self.lock()?;
        db.connection().execute(
            "INSERT INTO folders (id, name, icon, collection_id, parent_id, sort_order, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                folder.id,
                folder.name,
                folder.icon,
                folder.collection_id,
                folder.parent_id,
                folder.sort_order,
                folder.created_at,
                folder.updated_at
            ],
        )?;
        Ok(folder)
    }

    async fn find_folder(&self, collection_id: &str, id: &str) -> Result<Option<Folder>, StoreError> {
        let db = self.lock()?;
        let sql = format!(
            "SELECT {} FROM folders WHERE id = ?1 AND collection_id = ?2",
            FOLDER_COLUMNS
        );
        let found = db
            .connection()
            .query_row(&sql, params![id, collection_id], Self::row_to_folder)
            .optional()?;
        Ok(found)
    }

    async fn find_folders(&self, query: &FolderQuery) -> Result<Vec<Folder>, StoreError> {
        let (filter, args) = folder_filter(query);
        let sql = format!(
            "SELECT {} FROM folders WHERE {} ORDER BY {} {}, rowid ASC{}",
            FOLDER_COLUMNS,
            filter,
            query.sort.field.folder_column(),
            query.sort.direction.as_sql(),
            limit_clause(query.limit)
        );

        let db = self.lock()?;
        let mut stmt = db.connection().prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), Self::row_to_folder)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    async fn count_folders(&self, query: &FolderQuery) -> Result<u64, StoreError> {
        let (filter, args) = folder_filter(query);
        let sql = format!("SELECT COUNT(*) FROM folders WHERE {}", filter);
        let db = self.lock()?;
        let count: i64 = db
            .connection()
            .query_row(&sql, params_from_iter(args.iter()), |row| row.get(0))?;
        Ok(count as u64)
    }

    async fn delete_folders(&self, collection_id: &str) -> Result<u64, StoreError> {
        let db = self.lock()?;
        let affected = db
            .connection()
            .execute("DELETE FROM folders WHERE collection_id = ?1", params![collection_id])?;
        Ok(affected as u64)
    }

    async fn create_bookmark(&self, new: NewBookmark) -> Result<Bookmark, StoreError> {
        tokio::task::yield_now().await;

        let now = Self::now();
        let bookmark = Bookmark {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            url: new.url,
            icon: new.icon,
            description: new.description,
            is_featured: false,
            view_count: 0,
            sort_order: new.sort_order,
            collection_id: new.collection_id,
            folder_id: new.folder_id,
            created_at: now,
            updated_at: now,
        };

        let db = self.lock()?;
        db.connection().execute(
            "INSERT INTO bookmarks (id, title, url, icon, description, is_featured, view_count, sort_order, collection_id, folder_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, ?6, ?7, ?8, ?9, ?10)",
            params![
                bookmark.id,
                bookmark.title,
                bookmark.url,
                bookmark.icon,
                bookmark.description,
                bookmark.sort_order,
                bookmark.collection_id,
                bookmark.folder_id,
                bookmark.created_at,
                bookmark.updated_at
            ],
        )?;
        Ok(bookmark)
    }

    async fn find_bookmarks(&self, query: &BookmarkQuery) -> Result<Vec<Bookmark>, StoreError> {
        let (filter, args) = bookmark_filter(query);
        let sql = format!(
            "SELECT {} FROM bookmarks WHERE {} ORDER BY {} {}, rowid ASC{}",
            BOOKMARK_COLUMNS,
            filter,
            query.sort.field.bookmark_column(),
            query.sort.direction.as_sql(),
            limit_clause(query.limit)
        );

        let db = self.lock()?;
        let mut stmt = db.connection().prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), Self::row_to_bookmark)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    async fn count_bookmarks(&self, query: &BookmarkQuery) -> Result<u64, StoreError> {
        let (filter, args) = bookmark_filter(query);
        let sql = format!("SELECT COUNT(*) FROM bookmarks WHERE {}", filter);
        let db = self.lock()?;
        let count: i64 = db
            .connection()
            .query_row(&sql, params_from_iter(args.iter()), |row| row.get(0))?;
        Ok(count as u64)
    }

    async fn delete_bookmarks(&self, collection_id: &str) -> Result<u64, StoreError> {
        let db = self.lock()?;
        let affected = db
            .connection()
            .execute("DELETE FROM bookmarks WHERE collection_id = ?1", params![collection_id])?;
        Ok(affected as u64)
    }
}
