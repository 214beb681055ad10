//! Linkshelf database layer.
//!
//! Provides SQLite connection management, schema migrations, and the
//! [`LibraryStore`] abstraction the engines are written against.
//!
//! # Usage
//!
//! ```no_run
//! use linkshelf::database::{Database, SqliteStore};
//!
//! // Open a persistent database
//! let db = Database::open("linkshelf.db").expect("failed to open database");
//!
//! // Share it with the engines
//! let store = SqliteStore::new(db);
//! ```

pub mod connection;
pub mod migrations;
pub mod sqlite_store;
pub mod store;

pub use connection::Database;
pub use sqlite_store::SqliteStore;
pub use store::LibraryStore;
