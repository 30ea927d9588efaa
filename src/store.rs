//! The task state engine: authoritative collection, mutations, derived views.
//!
//! The store owns the in-memory task list, the table sort state and the
//! current view mode. Every successful mutation is followed by a synchronous
//! save of the full collection; a failed save never rolls the mutation back,
//! it is reported on the outcome and the in-memory state stays authoritative
//! for the rest of the session.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::db::Database;
use crate::error::{StoreError, StoreResult};
use crate::migrate;
use crate::types::{
    Category, Priority, SortDirection, SortKey, Task, ViewMode, new_task_id, now_rfc3339,
};

/// Optional field updates for [`TaskStore::update`]. `id` and `createdAt`
/// are immutable and deliberately absent.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
}

/// Outcome of a mutation that was applied in memory.
#[derive(Debug)]
pub struct MutationOutcome {
    pub task_id: String,
    /// Set when the follow-up save failed. The mutation stands regardless.
    pub persist_warning: Option<StoreError>,
}

/// One column of the board view, in board order.
#[derive(Debug, Clone)]
pub struct BoardColumn {
    pub category: Category,
    pub tasks: Vec<Task>,
}

/// The task store. Single-threaded, synchronous: every operation runs to
/// completion before the next external event is processed.
pub struct TaskStore {
    db: Database,
    tasks: Vec<Task>,
    sort_key: SortKey,
    sort_direction: SortDirection,
    view_mode: ViewMode,
}

impl TaskStore {
    /// Load the persisted collection, migrating legacy records first.
    ///
    /// Migration runs exactly once, here, before anything can observe the
    /// collection. A migration that changed records is written back
    /// immediately; if that write fails the migrated in-memory state still
    /// wins, matching the persist-after-mutate policy.
    pub fn open(db: Database) -> Result<Self> {
        let raw = db.load_raw_tasks().context("failed to load task list")?;
        let outcome = migrate::migrate_records(raw);
        if outcome.changed {
            debug!(count = outcome.tasks.len(), "migrated legacy task records");
            if let Err(err) = db.save_tasks(&outcome.tasks) {
                warn!(error = %err, "migrated task list not persisted");
            }
        }
        let view_mode = db.load_view_mode()?.unwrap_or_default();

        Ok(Self {
            db,
            tasks: outcome.tasks,
            sort_key: SortKey::default(),
            sort_direction: SortDirection::default(),
            view_mode,
        })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a task. Rejects a title that trims to empty; everything else
    /// gets defaults.
    pub fn create(
        &mut self,
        title: &str,
        description: &str,
        category: Option<Category>,
        priority: Option<Priority>,
    ) -> StoreResult<MutationOutcome> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::empty_title());
        }

        let task = Task {
            id: new_task_id(),
            title: title.to_string(),
            description: description.trim().to_string(),
            category: category.unwrap_or_default(),
            priority: priority.unwrap_or_default(),
            created_at: now_rfc3339(),
        };
        let task_id = task.id.clone();
        self.tasks.push(task);

        Ok(self.persist_after_mutate(task_id))
    }

    /// Apply the supplied fields to an existing task. The whole update is
    /// rejected before any field is touched if the new title trims to empty.
    pub fn update(&mut self, id: &str, changes: TaskChanges) -> StoreResult<MutationOutcome> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::task_not_found(id))?;

        let title = match changes.title {
            Some(title) => {
                let title = title.trim().to_string();
                if title.is_empty() {
                    return Err(StoreError::empty_title());
                }
                Some(title)
            }
            None => None,
        };

        let task = &mut self.tasks[index];
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = description.trim().to_string();
        }
        if let Some(category) = changes.category {
            task.category = category;
        }
        if let Some(priority) = changes.priority {
            task.priority = priority;
        }

        Ok(self.persist_after_mutate(id.to_string()))
    }

    /// Move a task to another stage. Shorthand for an update touching only
    /// `category`.
    pub fn move_task(&mut self, id: &str, category: Category) -> StoreResult<MutationOutcome> {
        self.update(
            id,
            TaskChanges {
                category: Some(category),
                ..TaskChanges::default()
            },
        )
    }

    /// Remove a task. Unconditional once called: any confirmation dialog
    /// belongs to the presentation layer, before it gets here.
    pub fn delete(&mut self, id: &str) -> StoreResult<MutationOutcome> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::task_not_found(id))?;
        self.tasks.remove(index);

        Ok(self.persist_after_mutate(id.to_string()))
    }

    fn persist_after_mutate(&self, task_id: String) -> MutationOutcome {
        let persist_warning = match self.db.save_tasks(&self.tasks) {
            Ok(()) => None,
            Err(err) => {
                warn!(
                    task_id = %task_id,
                    error = %err,
                    "save failed; in-memory state remains authoritative"
                );
                Some(StoreError::persistence(err))
            }
        };
        MutationOutcome {
            task_id,
            persist_warning,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The board view: four fixed columns, each ordered by priority rank
    /// then newest-first. Not user-controllable.
    pub fn board(&self) -> Vec<BoardColumn> {
        Category::BOARD_ORDER
            .iter()
            .map(|&category| {
                let mut tasks: Vec<Task> = self
                    .tasks
                    .iter()
                    .filter(|t| t.category == category)
                    .cloned()
                    .collect();
                tasks.sort_by(|a, b| {
                    a.priority
                        .urgency_rank()
                        .cmp(&b.priority.urgency_rank())
                        .then_with(|| created_at_key(b).cmp(&created_at_key(a)))
                });
                BoardColumn { category, tasks }
            })
            .collect()
    }

    /// The table view: one total order over all tasks per the current sort
    /// key and direction, recomputed on demand.
    pub fn table(&self) -> Vec<Task> {
        let mut tasks = self.tasks.clone();
        match self.sort_key {
            // Stage order is fixed by policy; the direction toggle is
            // accepted but has no effect here.
            SortKey::Category => tasks.sort_by(|a, b| {
                a.category
                    .stage_rank()
                    .cmp(&b.category.stage_rank())
                    .then_with(|| a.priority.urgency_rank().cmp(&b.priority.urgency_rank()))
                    .then_with(|| created_at_key(b).cmp(&created_at_key(a)))
            }),
            SortKey::Date => tasks.sort_by(|a, b| {
                let oldest_first = created_at_key(a).cmp(&created_at_key(b));
                self.sort_direction.apply(oldest_first)
            }),
            SortKey::Name => {
                tasks.sort_by(|a, b| self.sort_direction.apply(compare_titles(a, b)))
            }
        }
        tasks
    }

    /// Select a table sort key: reselecting the current key flips the
    /// direction, a new key resets it to ascending.
    pub fn select_sort_key(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_key = key;
            self.sort_direction = SortDirection::Ascending;
        }
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    // =========================================================================
    // View mode
    // =========================================================================

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Flip between board and table presentation, persisting the choice.
    pub fn toggle_view(&mut self) -> ViewMode {
        self.view_mode = self.view_mode.toggled();
        if let Err(err) = self.db.save_view_mode(self.view_mode) {
            warn!(error = %err, "view mode not persisted");
        }
        self.view_mode
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The live collection, in storage order. Storage order carries no
    /// meaning; display order comes from [`board`](Self::board) and
    /// [`table`](Self::table).
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Comparable creation time. Records carry the timestamp as a string; one
/// that fails to parse sorts before everything else.
fn created_at_key(task: &Task) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&task.created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Case-folded title comparison, raw ordering as tie-break.
fn compare_titles(a: &Task, b: &Task) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TaskStore {
        TaskStore::open(Database::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn migration_write_back_happens_once() {
        let db = Database::open_in_memory().unwrap();
        db.put("tasks", r#"[{"text": "Buy milk"}]"#).unwrap();

        let store = TaskStore::open(db.clone()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].title, "Buy milk");

        // The stored blob was rewritten in the current schema.
        let raw = db.load_raw_tasks().unwrap();
        assert_eq!(raw[0]["title"], "Buy milk");
        assert!(raw[0].get("text").is_none());
        assert_eq!(raw[0]["priority"], "none");

        // Reopening finds nothing left to migrate and the same records.
        let reopened = TaskStore::open(db.clone()).unwrap();
        assert_eq!(reopened.tasks(), store.tasks());
        assert_eq!(db.load_raw_tasks().unwrap(), raw);
    }

    #[test]
    fn corrupt_store_fails_open() {
        let db = Database::open_in_memory().unwrap();
        db.put("tasks", "{{{").unwrap();
        assert!(TaskStore::open(db).is_err());
    }

    #[test]
    fn view_mode_survives_reopen() {
        let db = Database::open_in_memory().unwrap();
        let mut store = TaskStore::open(db.clone()).unwrap();
        assert_eq!(store.view_mode(), ViewMode::Columns);

        assert_eq!(store.toggle_view(), ViewMode::Table);
        let reopened = TaskStore::open(db).unwrap();
        assert_eq!(reopened.view_mode(), ViewMode::Table);
    }

    #[test]
    fn sort_state_is_per_session() {
        let db = Database::open_in_memory().unwrap();
        let mut store = TaskStore::open(db.clone()).unwrap();
        store.select_sort_key(SortKey::Name);
        store.select_sort_key(SortKey::Name);
        assert_eq!(store.sort_direction(), SortDirection::Descending);

        let reopened = TaskStore::open(db).unwrap();
        assert_eq!(reopened.sort_key(), SortKey::Category);
        assert_eq!(reopened.sort_direction(), SortDirection::Ascending);
    }

    #[test]
    fn create_trims_title_and_description() {
        let mut store = store();
        let outcome = store
            .create("  Fix login  ", "  flaky on Safari  ", None, None)
            .unwrap();
        assert!(outcome.persist_warning.is_none());

        let task = store.get(&outcome.task_id).unwrap();
        assert_eq!(task.title, "Fix login");
        assert_eq!(task.description, "flaky on Safari");
        assert_eq!(task.category, Category::ALancer);
        assert_eq!(task.priority, Priority::None);
    }
}
