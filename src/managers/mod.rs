// Linkshelf managers
// Collection CRUD built on the store and the access guard.

pub mod collection_manager;
