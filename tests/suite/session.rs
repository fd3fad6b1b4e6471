//! Session snapshot persistence tests

use std::fs;

use notepad_session::{SessionData, SessionStore};
use notepad_types::CursorIndex;
use notepad_utils::backup_path;

#[test]
fn snapshot_round_trips_through_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SessionStore::new(dir.path());
    let doc = dir.path().join("notes.md");

    let saved = store
        .save("hello\nworld", Some(&doc), CursorIndex::new(2, 3), 0.61)
        .expect("save");
    let loaded = store.load().expect("load");

    assert_eq!(loaded, saved);
    assert_eq!(loaded.cursor, Some(CursorIndex::new(2, 3)));
    assert_eq!(loaded.version, SessionData::CURRENT_VERSION);
}

#[test]
fn snapshot_uses_documented_field_names() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SessionStore::new(dir.path());
    store
        .save("text", None, CursorIndex::new(1, 4), 0.5)
        .expect("save");

    let raw = fs::read_to_string(store.session_path()).expect("read");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(json["text"], "text");
    assert_eq!(json["cursor_index"], "1.4");
    assert!(json["current_file"].is_null());
    assert!(json["updated_at_utc"].as_str().is_some_and(|s| !s.is_empty()));
}

#[test]
fn legacy_snapshot_without_version_loads() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SessionStore::new(dir.path());
    fs::write(
        store.session_path(),
        r#"{"text":"old","current_file":null,"cursor_index":"garbage","last_harmony":0.55,"updated_at_utc":"2024-01-01T00:00:00+00:00"}"#,
    )
    .expect("write");

    let loaded = store.load().expect("load");
    assert_eq!(loaded.text, "old");
    assert_eq!(loaded.cursor, None);
    assert_eq!(loaded.version, SessionData::CURRENT_VERSION);
}

#[test]
fn corrupt_or_future_snapshots_are_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SessionStore::new(dir.path());

    fs::write(store.session_path(), "{ not json").expect("write");
    assert!(store.load().is_none());

    fs::write(store.session_path(), r#"{"text":"x","version":99}"#).expect("write");
    assert!(store.load().is_none());
}

#[test]
fn leftover_backup_is_recovered() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SessionStore::new(dir.path());
    store.save("kept", None, CursorIndex::START, 0.5).expect("save");

    let bak = backup_path(store.session_path());
    fs::rename(store.session_path(), &bak).expect("rename");

    let loaded = store.load().expect("recovered");
    assert_eq!(loaded.text, "kept");
    assert!(store.session_path().exists());
    assert!(!bak.exists());
}
