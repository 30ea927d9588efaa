//! Discriminated error results for store operations.
//!
//! No error here is fatal: the store stays usable after any failure, and the
//! presentation layer decides how each code is shown to the user.

use serde::Serialize;
use std::fmt;

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A title trimmed to the empty string on create or update.
    EmptyTitle,
    /// An operation referenced an id not present in the collection.
    TaskNotFound,
    /// The save step failed; the in-memory mutation stands.
    Persistence,
}

/// Structured error returned by store operations.
#[derive(Debug, Clone, Serialize)]
pub struct StoreError {
    pub code: ErrorCode,
    pub message: String,
}

impl StoreError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    // Convenience constructors

    pub fn empty_title() -> Self {
        Self::new(ErrorCode::EmptyTitle, "title must not be empty")
    }

    pub fn task_not_found(task_id: &str) -> Self {
        Self::new(
            ErrorCode::TaskNotFound,
            format!("Task not found: {}", task_id),
        )
    }

    pub fn persistence(err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::Persistence,
            format!("Task list not persisted: {}", err),
        )
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StoreError {}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
