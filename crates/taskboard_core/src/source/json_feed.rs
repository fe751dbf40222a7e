//! JSON task list feed.
//!
//! Decodes the list payload answered by the tasks service
//! (`{"tasks": [...], "total": n}`), turning each `createdAt` string into a
//! UTC timestamp.

use super::{FetchError, TaskSource};
use crate::model::task::Task;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Wire shape of a task list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListPayload {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub total: usize,
}

/// Parses a task list payload into domain tasks.
///
/// `total` is informational; the decoded `tasks` array is authoritative.
pub fn parse_task_list(body: &str) -> Result<Vec<Task>, FetchError> {
    let payload: TaskListPayload = serde_json::from_str(body)?;
    Ok(payload.tasks)
}

/// Task source backed by an exported list payload on disk.
#[derive(Debug, Clone)]
pub struct JsonFileTaskSource {
    path: PathBuf,
}

impl JsonFileTaskSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TaskSource for JsonFileTaskSource {
    fn fetch_all(&self) -> Result<Vec<Task>, FetchError> {
        let body = std::fs::read_to_string(&self.path).map_err(|err| {
            error!(
                "event=tasks_fetch module=source status=error error_code=feed_read_failed error={err}"
            );
            FetchError::from(err)
        })?;

        let tasks = parse_task_list(&body).inspect_err(|err| {
            error!(
                "event=tasks_fetch module=source status=error error_code=feed_decode_failed error={err}"
            );
        })?;
        info!(
            "event=tasks_fetch module=source status=ok count={}",
            tasks.len()
        );
        Ok(tasks)
    }

    fn describe(&self) -> String {
        format!("json feed {}", self.path.display())
    }
}
