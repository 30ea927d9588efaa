//! Core types for the task tracker.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// Workflow stage a task occupies.
///
/// The serialized names are the persisted wire format and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// To start.
    #[default]
    ALancer,
    /// In progress.
    EnCours,
    /// To finish.
    AFinir,
    /// Done.
    Complet,
}

impl Category {
    /// Column order of the board presentation.
    pub const BOARD_ORDER: [Category; 4] = [
        Category::ALancer,
        Category::EnCours,
        Category::AFinir,
        Category::Complet,
    ];

    /// Stage rank used by the table's category sort: most-done first.
    pub fn stage_rank(self) -> u8 {
        match self {
            Category::Complet => 0,
            Category::AFinir => 1,
            Category::EnCours => 2,
            Category::ALancer => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::ALancer => "a-lancer",
            Category::EnCours => "en-cours",
            Category::AFinir => "a-finir",
            Category::Complet => "complet",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "a-lancer" => Some(Category::ALancer),
            "en-cours" => Some(Category::EnCours),
            "a-finir" => Some(Category::AFinir),
            "complet" => Some(Category::Complet),
            _ => None,
        }
    }
}

/// Task priority. `None` is the unprioritized default and sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
    #[default]
    None,
}

impl Priority {
    /// Urgency rank: urgent sorts first, unprioritized last.
    pub fn urgency_rank(self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
            Priority::None => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::None => "none",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "urgent" => Some(Priority::Urgent),
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            "none" => Some(Priority::None),
            _ => None,
        }
    }
}

/// A tracked task.
///
/// The serde field names are the persisted layout: `id`, `title`,
/// `description`, `category`, `priority`, `createdAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique token, stable for the task's lifetime.
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    /// ISO-8601 creation timestamp. Set once, used only for sort tie-breaks.
    pub created_at: String,
}

/// Which presentation the tasks were last shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Columns,
    Table,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Columns => ViewMode::Table,
            ViewMode::Table => ViewMode::Columns,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Columns => "columns",
            ViewMode::Table => "table",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "columns" => Some(ViewMode::Columns),
            "table" => Some(ViewMode::Table),
            _ => None,
        }
    }
}

/// Sort key for the table presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Category,
    Date,
    Name,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Category => "category",
            SortKey::Date => "date",
            SortKey::Name => "name",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "category" => Some(SortKey::Category),
            "date" => Some(SortKey::Date),
            "name" => Some(SortKey::Name),
            _ => None,
        }
    }
}

/// Direction of the table sort. Flips on reselection of the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Apply the direction to an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Allocate a fresh task id. UUIDv7 is timestamp-derived; uniqueness, not
/// ordering, is the contract.
pub fn new_task_id() -> String {
    Uuid::now_v7().to_string()
}

/// Current time in the persisted timestamp format.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
