//! Store mutation behavior: validation, identity, persistence policy.

use std::collections::HashSet;

use tableau::db::Database;
use tableau::error::ErrorCode;
use tableau::store::{TaskChanges, TaskStore};
use tableau::types::{Category, Priority};

/// Helper to create a store over a fresh in-memory database.
fn setup_store() -> TaskStore {
    TaskStore::open(Database::open_in_memory().expect("in-memory database"))
        .expect("empty store opens")
}

#[test]
fn created_ids_are_unique() {
    let mut store = setup_store();
    let mut seen = HashSet::new();

    for i in 0..25 {
        let outcome = store
            .create(&format!("task {}", i), "", None, None)
            .expect("create succeeds");
        assert!(seen.insert(outcome.task_id), "duplicate id handed out");
    }
    assert_eq!(store.len(), 25);
}

#[test]
fn create_applies_defaults() {
    let mut store = setup_store();
    let outcome = store.create("defaults", "", None, None).unwrap();

    let task = store.get(&outcome.task_id).unwrap();
    assert_eq!(task.category, Category::ALancer);
    assert_eq!(task.priority, Priority::None);
    assert!(!task.created_at.is_empty());
}

#[test]
fn create_rejects_whitespace_title() {
    let mut store = setup_store();
    let err = store.create("   ", "desc", None, None).unwrap_err();
    assert_eq!(err.code, ErrorCode::EmptyTitle);
    assert!(store.is_empty(), "collection must be untouched");
}

#[test]
fn update_rejects_whitespace_title_without_touching_other_fields() {
    let mut store = setup_store();
    let id = store
        .create("Original", "original desc", None, None)
        .unwrap()
        .task_id;

    let err = store
        .update(
            &id,
            TaskChanges {
                title: Some("   ".to_string()),
                description: Some("new desc".to_string()),
                ..TaskChanges::default()
            },
        )
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::EmptyTitle);

    // The whole update was rejected, not just the title.
    let task = store.get(&id).unwrap();
    assert_eq!(task.title, "Original");
    assert_eq!(task.description, "original desc");
}

#[test]
fn update_applies_only_supplied_fields() {
    let mut store = setup_store();
    let id = store
        .create("Title", "desc", Some(Category::EnCours), Some(Priority::High))
        .unwrap()
        .task_id;
    let before = store.get(&id).unwrap().clone();

    store
        .update(
            &id,
            TaskChanges {
                priority: Some(Priority::Urgent),
                ..TaskChanges::default()
            },
        )
        .unwrap();

    let after = store.get(&id).unwrap();
    assert_eq!(after.priority, Priority::Urgent);
    assert_eq!(after.title, before.title);
    assert_eq!(after.description, before.description);
    assert_eq!(after.category, before.category);
    assert_eq!(after.id, before.id);
    assert_eq!(after.created_at, before.created_at);
}

#[test]
fn update_unknown_id_is_not_found() {
    let mut store = setup_store();
    let err = store
        .update("missing", TaskChanges::default())
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::TaskNotFound);
}

#[test]
fn move_changes_only_category() {
    let mut store = setup_store();
    let id = store
        .create("Movable", "notes", None, Some(Priority::Low))
        .unwrap()
        .task_id;
    let before = store.get(&id).unwrap().clone();

    store.move_task(&id, Category::EnCours).unwrap();

    let after = store.get(&id).unwrap();
    assert_eq!(after.category, Category::EnCours);
    assert_eq!(after.title, before.title);
    assert_eq!(after.description, before.description);
    assert_eq!(after.priority, before.priority);
    assert_eq!(after.id, before.id);
    assert_eq!(after.created_at, before.created_at);
}

#[test]
fn delete_is_terminal() {
    let mut store = setup_store();
    let id = store.create("Doomed", "", None, None).unwrap().task_id;

    store.delete(&id).unwrap();
    assert!(store.get(&id).is_none());

    let err = store.update(&id, TaskChanges::default()).unwrap_err();
    assert_eq!(err.code, ErrorCode::TaskNotFound);

    let err = store.move_task(&id, Category::EnCours).unwrap_err();
    assert_eq!(err.code, ErrorCode::TaskNotFound);

    let err = store.delete(&id).unwrap_err();
    assert_eq!(err.code, ErrorCode::TaskNotFound);
}

#[test]
fn delete_unknown_id_is_not_found() {
    let mut store = setup_store();
    store.create("Survivor", "", None, None).unwrap();

    let err = store.delete("missing").unwrap_err();
    assert_eq!(err.code, ErrorCode::TaskNotFound);
    assert_eq!(store.len(), 1);
}

#[test]
fn every_mutation_is_persisted_immediately() {
    let db = Database::open_in_memory().expect("in-memory database");
    let mut store = TaskStore::open(db.clone()).unwrap();

    let kept = store.create("kept", "", None, None).unwrap().task_id;
    let dropped = store.create("dropped", "", None, None).unwrap().task_id;
    store
        .update(
            &kept,
            TaskChanges {
                title: Some("kept, renamed".to_string()),
                ..TaskChanges::default()
            },
        )
        .unwrap();
    store.delete(&dropped).unwrap();

    // A second store over the same database sees the final state without
    // any explicit flush.
    let reopened = TaskStore::open(db).unwrap();
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.get(&kept).unwrap().title, "kept, renamed");
}
