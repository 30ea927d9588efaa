//! Persistence through a real database file.

use tableau::db::Database;
use tableau::store::{TaskChanges, TaskStore};
use tableau::types::{Category, Priority, ViewMode};

#[test]
fn collection_survives_a_reopen_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("tasks.db");

    let created_id = {
        let db = Database::open(&db_path).expect("open database");
        let mut store = TaskStore::open(db).expect("open store");
        let outcome = store
            .create(
                "Relire le rapport",
                "avant vendredi",
                Some(Category::AFinir),
                Some(Priority::High),
            )
            .expect("create");
        assert!(outcome.persist_warning.is_none());
        outcome.task_id
    };

    let db = Database::open(&db_path).expect("reopen database");
    let store = TaskStore::open(db).expect("reopen store");
    assert_eq!(store.len(), 1);

    let task = store.get(&created_id).expect("task survived");
    assert_eq!(task.title, "Relire le rapport");
    assert_eq!(task.description, "avant vendredi");
    assert_eq!(task.category, Category::AFinir);
    assert_eq!(task.priority, Priority::High);
}

#[test]
fn stored_blob_uses_the_documented_wire_format() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("tasks.db");

    let db = Database::open(&db_path).expect("open database");
    let mut store = TaskStore::open(db.clone()).expect("open store");
    store
        .create("Wire check", "", Some(Category::EnCours), None)
        .expect("create");

    let raw = db.load_raw_tasks().expect("raw records");
    assert_eq!(raw.len(), 1);
    let record = raw[0].as_object().expect("record is an object");
    assert!(record.contains_key("id"));
    assert!(record.contains_key("createdAt"));
    assert_eq!(record["category"], "en-cours");
    assert_eq!(record["priority"], "none");
    assert!(!record.contains_key("text"));
}

#[test]
fn view_mode_is_an_independent_scalar() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("tasks.db");

    {
        let db = Database::open(&db_path).expect("open database");
        let mut store = TaskStore::open(db).expect("open store");
        assert_eq!(store.view_mode(), ViewMode::Columns);
        assert_eq!(store.toggle_view(), ViewMode::Table);
    }

    let db = Database::open(&db_path).expect("reopen database");

    // Toggling the view never touched the task blob.
    assert!(db.load_raw_tasks().expect("raw records").is_empty());

    let store = TaskStore::open(db).expect("reopen store");
    assert_eq!(store.view_mode(), ViewMode::Table);
}

#[test]
fn fresh_database_starts_empty_with_default_view() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = Database::open(dir.path().join("tasks.db")).expect("open database");
    let store = TaskStore::open(db).expect("open store");

    assert!(store.is_empty());
    assert_eq!(store.view_mode(), ViewMode::Columns);
}

#[test]
fn open_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("state").join("deep").join("tasks.db");

    let db = Database::open(&nested).expect("open database in nested dir");
    let mut store = TaskStore::open(db).expect("open store");
    store.create("nested", "", None, None).expect("create");
    assert!(nested.exists());
}

#[test]
fn edits_reach_disk_without_explicit_flush() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("tasks.db");

    let id = {
        let db = Database::open(&db_path).expect("open database");
        let mut store = TaskStore::open(db).expect("open store");
        let id = store.create("v1", "", None, None).expect("create").task_id;
        store
            .update(
                &id,
                TaskChanges {
                    title: Some("v2".to_string()),
                    ..TaskChanges::default()
                },
            )
            .expect("update");
        id
    };

    let db = Database::open(&db_path).expect("reopen database");
    let store = TaskStore::open(db).expect("reopen store");
    assert_eq!(store.get(&id).expect("task").title, "v2");
}
