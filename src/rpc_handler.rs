//! RPC method handler for the Linkshelf JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be tested without stdin/stdout.
//! `handle_method` dispatches one call to the engines built by [`App`]. The
//! app lock is only held while an engine is built, never across an await.

use std::sync::{Mutex, MutexGuard};

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::collection_manager::{CollectionManagerTrait, FolderListing};
use crate::services::access_guard::require_session;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::services::tree_retrieval::ContentsQuery;
use crate::types::collection::CollectionUpdate;
use crate::types::import::ImportRequest;
use crate::types::query::{SortDirection, SortField, SortSpec};
use crate::types::session::SessionOracle;

fn lock(app: &Mutex<App>) -> Result<MutexGuard<'_, App>, String> {
    app.lock().map_err(|e| e.to_string())
}

fn str_param<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

fn u32_param(params: &Value, key: &str) -> Result<Option<u32>, String> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| format!("invalid {}", key)),
    }
}

/// `sortField` / `sortOrder` as sent by the listing UI. Either may be absent.
fn sort_param(params: &Value, defaults: SortSpec) -> Result<SortSpec, String> {
    let field = match str_param(params, "sortField") {
        Some(s) => SortField::parse(s).ok_or_else(|| format!("invalid sortField: {}", s))?,
        None => defaults.field,
    };
    let direction = match str_param(params, "sortOrder") {
        Some(s) => SortDirection::parse(s).ok_or_else(|| format!("invalid sortOrder: {}", s))?,
        None => defaults.direction,
    };
    Ok(SortSpec::new(field, direction))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

/// Dispatch a JSON-RPC method call.
///
/// `session` answers whether the caller is authenticated for this request.
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(
    app: &Mutex<App>,
    session: &dyn SessionOracle,
    method: &str,
    params: &Value,
) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Import ───
        "collection.import" => {
            require_session(session).map_err(|e| e.to_string())?;
            let request: ImportRequest = serde_json::from_value(params.clone())
                .map_err(|e| format!("invalid import request: {}", e))?;
            let engine = lock(app)?.import_engine();
            let outcome = engine.import(request).await.map_err(|e| e.to_string())?;
            to_json(&outcome)
        }

        // ─── Collections ───
        "collection.get" => {
            let id = str_param(params, "id").ok_or("missing id")?;
            let mgr = lock(app)?.collection_manager();
            let summary = mgr.get(id, session).await.map_err(|e| e.to_string())?;
            to_json(&summary)
        }
        "collection.get_by_slug" => {
            let slug = str_param(params, "slug").ok_or("missing slug")?;
            let mgr = lock(app)?.collection_manager();
            let collection = mgr.get_by_slug(slug, session).await.map_err(|e| e.to_string())?;
            to_json(&collection)
        }
        "collection.update" => {
            let id = str_param(params, "id").ok_or("missing id")?;
            let update: CollectionUpdate = serde_json::from_value(params.clone())
                .map_err(|e| format!("invalid update: {}", e))?;
            let mgr = lock(app)?.collection_manager();
            let updated = mgr.update(id, update, session).await.map_err(|e| e.to_string())?;
            to_json(&updated)
        }
        "collection.delete" => {
            let id = str_param(params, "id").ok_or("missing id")?;
            let mgr = lock(app)?.collection_manager();
            mgr.delete(id, session).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "collection.contents" => {
            let collection_id = str_param(params, "collectionId").ok_or("missing collectionId")?;
            let (retrieval, defaults) = {
                let a = lock(app)?;
                (a.tree_retrieval(), a.settings_engine.get_settings().retrieval.sort())
            };
            let query = ContentsQuery {
                sort: Some(sort_param(params, defaults)?),
                page_size: u32_param(params, "pageSize")?,
                expand_depth: u32_param(params, "expandDepth")?,
                ..ContentsQuery::new(collection_id, str_param(params, "folderId"))
            };
            let contents = retrieval
                .list_contents_guarded(&query, session)
                .await
                .map_err(|e| e.to_string())?;
            to_json(&contents)
        }

        // ─── Folders ───
        "folder.list" => {
            let collection_id = str_param(params, "collectionId").ok_or("missing collectionId")?;
            let all = params.get("all").and_then(|v| v.as_bool()).unwrap_or(false);
            let listing = if all {
                FolderListing::All
            } else {
                FolderListing::ChildrenOf(str_param(params, "parentId").map(str::to_string))
            };
            let mgr = lock(app)?.collection_manager();
            let folders = mgr
                .list_folders(collection_id, listing, session)
                .await
                .map_err(|e| e.to_string())?;
            to_json(&folders)
        }
        "folder.path" => {
            let collection_id = str_param(params, "collectionId").ok_or("missing collectionId")?;
            let folder_id = str_param(params, "folderId").ok_or("missing folderId")?;
            let retrieval = lock(app)?.tree_retrieval();
            let path = retrieval
                .folder_path_guarded(collection_id, folder_id, session)
                .await
                .map_err(|e| e.to_string())?;
            to_json(&path)
        }

        // ─── Settings ───
        "settings.get" => {
            let a = lock(app)?;
            to_json(a.settings_engine.get_settings())
        }
        "settings.set" => {
            require_session(session).map_err(|e| e.to_string())?;
            let key = str_param(params, "key").ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = lock(app)?;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
