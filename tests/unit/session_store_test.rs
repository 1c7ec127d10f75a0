use std::sync::Arc;

use shopfront::database::connection::Database;
use shopfront::services::session_store::{SessionStore, SessionStoreTrait};
use shopfront::types::errors::SessionError;
use shopfront::types::session::SessionRecord;

fn store() -> SessionStore {
    let db = Arc::new(Database::open_in_memory().unwrap());
    SessionStore::new(db)
}

fn record(id: &str, expires_at: i64) -> SessionRecord {
    SessionRecord {
        id: id.to_string(),
        user_id: "user-1".to_string(),
        created_at: 1_000,
        expires_at,
        last_seen_at: 1_000,
    }
}

#[test]
fn test_upsert_then_get() {
    let store = store();
    let rec = record("sess-1", 2_000);
    store.upsert(&rec).unwrap();

    let loaded = store.get("sess-1").unwrap().unwrap();
    assert_eq!(loaded, rec);
}

#[test]
fn test_get_missing_returns_none() {
    let store = store();
    assert!(store.get("sess-missing").unwrap().is_none());
}

#[test]
fn test_upsert_replaces_existing_row() {
    let store = store();
    store.upsert(&record("sess-1", 2_000)).unwrap();

    let mut updated = record("sess-1", 9_000);
    updated.last_seen_at = 8_000;
    store.upsert(&updated).unwrap();

    let loaded = store.get("sess-1").unwrap().unwrap();
    assert_eq!(loaded.expires_at, 9_000);
    assert_eq!(loaded.last_seen_at, 8_000);
    // created_at from the original insert survives the upsert
    assert_eq!(loaded.created_at, 1_000);
}

#[test]
fn test_touch_refreshes_expiry_and_last_seen() {
    let store = store();
    store.upsert(&record("sess-1", 2_000)).unwrap();

    store.touch("sess-1", 1_500, 3_000).unwrap();
    let loaded = store.get("sess-1").unwrap().unwrap();
    assert_eq!(loaded.last_seen_at, 1_500);
    assert_eq!(loaded.expires_at, 3_000);
}

#[test]
fn test_touch_missing_row_is_not_found() {
    let store = store();
    let err = store.touch("sess-missing", 1_500, 3_000).unwrap_err();
    assert!(matches!(err, SessionError::NotFound(id) if id == "sess-missing"));
}

#[test]
fn test_delete_removes_row() {
    let store = store();
    store.upsert(&record("sess-1", 2_000)).unwrap();
    store.delete("sess-1").unwrap();
    assert!(store.get("sess-1").unwrap().is_none());
}

#[test]
fn test_delete_missing_row_is_ok() {
    let store = store();
    store.delete("sess-missing").unwrap();
}

#[test]
fn test_prune_expired_removes_only_past_rows() {
    let store = store();
    store.upsert(&record("sess-old", 1_500)).unwrap();
    store.upsert(&record("sess-edge", 2_000)).unwrap();
    store.upsert(&record("sess-live", 3_000)).unwrap();

    // expires_at <= now is expired, so the edge row goes too
    let removed = store.prune_expired(2_000).unwrap();
    assert_eq!(removed, 2);
    assert!(store.get("sess-old").unwrap().is_none());
    assert!(store.get("sess-edge").unwrap().is_none());
    assert!(store.get("sess-live").unwrap().is_some());
}

#[test]
fn test_record_validity_boundary() {
    let rec = record("sess-1", 2_000);
    assert!(rec.is_valid_at(1_999));
    assert!(!rec.is_valid_at(2_000));
    assert!(!rec.is_valid_at(2_001));
}
