//! Pure task lifecycle operations.
//!
//! # Responsibility
//! - Build, update and toggle task values.
//! - Filter and order task collections for list views.
//!
//! # Invariants
//! - No operation mutates its input; every transform returns a new value.
//! - `create_task` is the only function that reads the clock or the RNG.
//! - Supplied titles are validated before any field is applied.

use crate::model::task::{validate_title, Task, TaskStatus, TaskValidationError};
use chrono::{SubsecRound, Utc};
use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use uuid::Uuid;

/// Input for creating a task.
///
/// A missing `title` decodes as empty and fails validation as `EmptyTitle`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update for an existing task.
///
/// `description` distinguishes an omitted key (`None`) from an explicit clear
/// (`Some(None)`). An explicit `"title": null` decodes as an empty title, so
/// it fails validation instead of being ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub description: Option<Option<String>>,
}

fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|value| Some(value.unwrap_or_default()))
}

/// Creates a new `todo` task from request input.
///
/// # Contract
/// - Rejects invalid titles without producing a task.
/// - Trims `title` and a present `description`; an absent description stays
///   absent.
/// - `created_at` is truncated to millisecond precision so it survives storage
///   and JSON round-trips unchanged.
pub fn create_task(request: &CreateTaskRequest) -> Result<Task, TaskValidationError> {
    validate_title(&request.title)?;

    Ok(Task {
        id: Uuid::new_v4(),
        title: request.title.trim().to_string(),
        description: request
            .description
            .as_deref()
            .map(|value| value.trim().to_string()),
        status: TaskStatus::Todo,
        created_at: Utc::now().trunc_subsecs(3),
    })
}

/// Applies a partial update and returns the updated copy.
///
/// On validation failure the caller keeps `task` untouched and must treat the
/// call as failed.
pub fn update_task(task: &Task, updates: &UpdateTaskRequest) -> Result<Task, TaskValidationError> {
    if let Some(title) = updates.title.as_deref() {
        validate_title(title)?;
    }

    let mut updated = task.clone();
    if let Some(title) = updates.title.as_deref() {
        updated.title = title.trim().to_string();
    }
    if let Some(description) = &updates.description {
        updated.description = description.as_deref().map(|value| value.trim().to_string());
    }

    Ok(updated)
}

/// Returns a copy with `todo` and `done` swapped.
pub fn toggle_task_status(task: &Task) -> Task {
    Task {
        status: task.status.toggled(),
        ..task.clone()
    }
}

/// Keeps tasks whose status matches `status`, preserving relative order.
///
/// Without a filter the input slice is handed back as-is (`Cow::Borrowed`).
pub fn filter_tasks_by_status(tasks: &[Task], status: Option<TaskStatus>) -> Cow<'_, [Task]> {
    match status {
        None => Cow::Borrowed(tasks),
        Some(status) => Cow::Owned(
            tasks
                .iter()
                .filter(|task| task.status == status)
                .cloned()
                .collect(),
        ),
    }
}

/// Returns a newest-first copy ordered by `created_at`.
///
/// The sort is stable: tasks with equal timestamps keep their input order.
pub fn sort_tasks_by_date(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

#[cfg(test)]
mod tests {
    use super::{
        create_task, deserialize_present, update_task, CreateTaskRequest, UpdateTaskRequest,
    };
    use crate::model::task::TaskValidationError;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "deserialize_present")]
        value: Option<Option<u32>>,
    }

    #[test]
    fn deserialize_present_distinguishes_missing_null_and_value() {
        let missing: Probe = serde_json::from_str("{}").unwrap();
        let null: Probe = serde_json::from_str(r#"{"value": null}"#).unwrap();
        let set: Probe = serde_json::from_str(r#"{"value": 7}"#).unwrap();

        assert_eq!(missing.value, None);
        assert_eq!(null.value, Some(None));
        assert_eq!(set.value, Some(Some(7)));
    }

    #[test]
    fn update_request_decodes_partial_body() {
        let request: UpdateTaskRequest = serde_json::from_str(r#"{"title": "Renamed"}"#).unwrap();
        assert_eq!(request.title.as_deref(), Some("Renamed"));
        assert_eq!(request.description, None);
    }

    #[test]
    fn update_request_null_title_fails_validation() {
        let request: UpdateTaskRequest = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert_eq!(request.title.as_deref(), Some(""));

        let task = create_task(&CreateTaskRequest {
            title: "Keep".to_string(),
            description: None,
        })
        .unwrap();
        assert_eq!(
            update_task(&task, &request),
            Err(TaskValidationError::EmptyTitle)
        );
    }
}
