//! Linkshelf: bookmark collections with bulk import and tree retrieval.
//!
//! The library holds the import engine (collection resolution, depth-ordered
//! folder creation, bookmark creation with id remapping), the tree retrieval
//! engine and the SQLite store behind them. `linkshelf-rpc` exposes both over
//! newline-delimited JSON-RPC.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
