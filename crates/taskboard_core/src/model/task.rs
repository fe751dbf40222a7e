//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record shared by the tasks and stats services.
//! - Own title validation rules used by every write path.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is non-empty and at most `MAX_TITLE_CHARS` characters for any
//!   persisted instance.
//! - `created_at` is set once at creation and never rewritten.
//! - `status` is a closed set; unknown values are rejected on decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for every task.
pub type TaskId = Uuid;

/// Maximum title length, counted in characters before trimming.
pub const MAX_TITLE_CHARS: usize = 100;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Open work item. Every task starts here.
    Todo,
    /// Completed work item.
    Done,
}

impl TaskStatus {
    /// Stable string id used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Done => "done",
        }
    }

    /// Returns the opposite status.
    pub fn toggled(self) -> Self {
        match self {
            Self::Todo => Self::Done,
            Self::Done => Self::Todo,
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not `todo` or `done`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTaskStatusError(pub String);

impl Display for ParseTaskStatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported task status `{}`; expected todo|done", self.0)
    }
}

impl Error for ParseTaskStatusError {}

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "todo" => Ok(Self::Todo),
            "done" => Ok(Self::Done),
            other => Err(ParseTaskStatusError(other.to_string())),
        }
    }
}

/// Validation failures for task write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Title exceeds `MAX_TITLE_CHARS`; `length` is the untrimmed char count.
    TitleTooLong { length: usize },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Title cannot be empty"),
            Self::TitleTooLong { length } => write!(
                f,
                "Title must be at most {MAX_TITLE_CHARS} characters (got {length})"
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// Checks a raw title against the title rules.
///
/// The empty check runs first, so a long run of spaces reports `EmptyTitle`.
/// Length is measured on the untrimmed input.
pub fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }

    let length = title.chars().count();
    if length > MAX_TITLE_CHARS {
        return Err(TaskValidationError::TitleTooLong { length });
    }

    Ok(())
}

/// Canonical task record.
///
/// Serialized in the camelCase shape the tasks service answers with;
/// `description` is omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Checks the persisted-state invariants of this record.
    ///
    /// Used by repositories before writes and after reads.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_title(&self.title)
    }

    /// Returns whether this task is completed.
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}
