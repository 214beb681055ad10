// Linkshelf shared type definitions
// Each submodule defines types used across the store, the engines and the RPC layer.

pub mod bookmark;
pub mod collection;
pub mod errors;
pub mod folder;
pub mod import;
pub mod query;
pub mod session;
pub mod settings;
pub mod tree;
