//! One-time normalization of persisted records to the current schema.
//!
//! Runs synchronously at startup, between the adapter load and the first
//! render. The caller writes the collection back through the adapter exactly
//! when `changed` is reported, so a legacy store is rewritten at most once.
//! Running the step again over its own output reports no change and produces
//! identical records.

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::types::{Category, Priority, Task, new_task_id, now_rfc3339};

/// Fields the current schema understands.
const KNOWN_FIELDS: [&str; 6] = [
    "id",
    "title",
    "description",
    "category",
    "priority",
    "createdAt",
];

/// Result of normalizing a raw record sequence.
pub struct MigrationOutcome {
    pub tasks: Vec<Task>,
    /// Whether any record differed from the current schema. Triggers the
    /// persistence write-back.
    pub changed: bool,
}

/// Normalize raw stored records into schema-conformant tasks.
///
/// Per record, in order: a legacy `text` field stands in for a missing
/// title; `description`, `createdAt` and `priority` are backfilled with
/// their defaults when absent; `text` is removed regardless of whether it
/// was used. Records the schema cannot represent at all (non-objects,
/// records with no usable title) are dropped, and unrecognized `category`
/// or `priority` values fall back to their defaults, so every surviving
/// task satisfies the data-model invariants unconditionally.
pub fn migrate_records(records: Vec<Value>) -> MigrationOutcome {
    let mut tasks = Vec::with_capacity(records.len());
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut changed = false;

    for record in records {
        let Value::Object(mut fields) = record else {
            changed = true;
            continue;
        };

        // 1. Legacy `text` stands in for a missing or empty title.
        if str_field(&fields, "title").is_none() {
            if let Some(text) = str_field(&fields, "text").map(str::to_string) {
                fields.insert("title".to_string(), Value::String(text));
                changed = true;
            }
        }

        // 2. Description is always present, possibly empty.
        if !fields.get("description").is_some_and(Value::is_string) {
            fields.insert("description".to_string(), Value::String(String::new()));
            changed = true;
        }

        // 3. Best-effort creation-time backfill; not historically accurate.
        if str_field(&fields, "createdAt").is_none() {
            fields.insert("createdAt".to_string(), Value::String(now_rfc3339()));
            changed = true;
        }

        // 4. Unprioritized until told otherwise.
        let priority_ok = str_field(&fields, "priority")
            .and_then(Priority::from_str)
            .is_some();
        if !priority_ok {
            fields.insert(
                "priority".to_string(),
                Value::String(Priority::None.as_str().to_string()),
            );
            changed = true;
        }

        // 5. The legacy field is gone either way.
        if fields.remove("text").is_some() {
            changed = true;
        }

        // A stage value the schema no longer knows falls back to the entry
        // stage rather than leaving the record unreachable from every view.
        let category_ok = str_field(&fields, "category")
            .and_then(Category::from_str)
            .is_some();
        if !category_ok {
            fields.insert(
                "category".to_string(),
                Value::String(Category::default().as_str().to_string()),
            );
            changed = true;
        }

        // Ids must be present and unique across the live collection.
        let id = match str_field(&fields, "id") {
            Some(id) if !seen_ids.contains(id) => id.to_string(),
            _ => {
                changed = true;
                new_task_id()
            }
        };
        seen_ids.insert(id.clone());
        fields.insert("id".to_string(), Value::String(id));

        // A record with no title and no legacy text cannot satisfy the
        // non-empty-title invariant.
        if str_field(&fields, "title").is_none() {
            changed = true;
            continue;
        }

        if strip_unknown_fields(&mut fields) {
            changed = true;
        }

        match serde_json::from_value::<Task>(Value::Object(fields)) {
            Ok(task) => tasks.push(task),
            Err(_) => changed = true,
        }
    }

    MigrationOutcome { tasks, changed }
}

/// Drop fields the schema does not carry, so the stored blob converges on
/// the documented layout. Returns whether anything was removed.
fn strip_unknown_fields(fields: &mut Map<String, Value>) -> bool {
    let unknown: Vec<String> = fields
        .keys()
        .filter(|k| !KNOWN_FIELDS.contains(&k.as_str()))
        .cloned()
        .collect();
    for key in &unknown {
        fields.remove(key);
    }
    !unknown.is_empty()
}

/// A present, non-empty string field.
fn str_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
