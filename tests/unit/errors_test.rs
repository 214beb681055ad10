use std::time::Duration;

use linkshelf::types::errors::*;

// === StoreError Tests ===

#[test]
fn store_error_display_variants() {
    assert_eq!(
        StoreError::Database("disk I/O error".to_string()).to_string(),
        "Store database error: disk I/O error"
    );
    assert_eq!(
        StoreError::NotFound("collection c-1".to_string()).to_string(),
        "Store record not found: collection c-1"
    );
    assert_eq!(
        StoreError::Constraint("UNIQUE constraint failed: collections.slug".to_string()).to_string(),
        "Store constraint violated: UNIQUE constraint failed: collections.slug"
    );
}

#[test]
fn store_error_from_rusqlite_constraint() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE t (k TEXT UNIQUE); INSERT INTO t VALUES ('a');")
        .unwrap();
    let err = conn.execute("INSERT INTO t VALUES ('a')", []).unwrap_err();
    assert!(matches!(StoreError::from(err), StoreError::Constraint(_)));
}

#[test]
fn store_error_from_rusqlite_other() {
    let err = rusqlite::Error::QueryReturnedNoRows;
    assert!(matches!(StoreError::from(err), StoreError::Database(_)));
}

// === EngineError Tests ===

#[test]
fn engine_error_display_variants() {
    assert_eq!(
        EngineError::Conflict("Collection name or slug already exists".to_string()).to_string(),
        "Conflict: Collection name or slug already exists"
    );
    assert_eq!(
        EngineError::not_found("Collection not found").to_string(),
        "Not found: Collection not found"
    );
    assert_eq!(
        EngineError::validation("missing bookmarks").to_string(),
        "Validation error: missing bookmarks"
    );
    assert_eq!(
        EngineError::Unauthorized("Unauthorized access".to_string()).to_string(),
        "Unauthorized: Unauthorized access"
    );
    assert_eq!(
        EngineError::Timeout(Duration::from_secs(60)).to_string(),
        "Import timed out after 60s"
    );
}

#[test]
fn engine_error_wraps_store_error() {
    let err: EngineError = StoreError::Database("locked".to_string()).into();
    assert!(matches!(err, EngineError::Transient(StoreError::Database(_))));
    assert_eq!(err.to_string(), "Transient failure: Store database error: locked");
}

#[test]
fn engine_error_transient_exposes_source() {
    use std::error::Error;
    let err = EngineError::Transient(StoreError::NotFound("x".to_string()));
    assert!(err.source().is_some());
    assert!(EngineError::not_found("x").source().is_none());
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::IoError("permission denied".to_string()).to_string(),
        "Settings I/O error: permission denied"
    );
    assert_eq!(
        SettingsError::SerializationError("invalid json".to_string()).to_string(),
        "Settings serialization error: invalid json"
    );
    assert_eq!(
        SettingsError::InvalidKey("foo.bar".to_string()).to_string(),
        "Invalid settings key: foo.bar"
    );
    assert_eq!(
        SettingsError::InvalidValue("expected integer".to_string()).to_string(),
        "Invalid settings value: expected integer"
    );
}

#[test]
fn errors_implement_error_trait() {
    let errors: Vec<Box<dyn std::error::Error>> = vec![
        Box::new(StoreError::Database("e".to_string())),
        Box::new(EngineError::Conflict("e".to_string())),
        Box::new(SettingsError::IoError("e".to_string())),
    ];
    for err in &errors {
        assert!(!err.to_string().is_empty());
    }
}
