//! Task use-case service.
//!
//! # Responsibility
//! - Combine pure task operations with repository persistence.
//! - Translate missing records into `NotFound`.
//!
//! # Invariants
//! - Every write goes through a pure domain transform and then `save`.
//! - A failed validation never reaches the repository.
//! - List results are newest-first.

use crate::domain::task::{
    create_task, filter_tasks_by_status, sort_tasks_by_date, toggle_task_status, update_task,
    CreateTaskRequest, UpdateTaskRequest,
};
use crate::model::task::{Task, TaskId, TaskStatus, TaskValidationError};
use crate::repo::task_repo::{RepoError, TaskRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Client input failed title rules.
    Validation(TaskValidationError),
    /// Target task does not exist.
    NotFound(TaskId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task service facade over repository implementations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists tasks newest-first, optionally restricted to one status.
    pub fn list_tasks(&self, status: Option<TaskStatus>) -> TaskServiceResult<Vec<Task>> {
        let tasks = self.repo.find_all()?;
        let filtered = filter_tasks_by_status(&tasks, status);
        Ok(sort_tasks_by_date(&filtered))
    }

    /// Gets one task by ID.
    pub fn get_task(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.repo
            .find_by_id(id)?
            .ok_or(TaskServiceError::NotFound(id))
    }

    /// Validates, builds and stores a new task.
    pub fn create_task(&self, request: &CreateTaskRequest) -> TaskServiceResult<Task> {
        let task = create_task(request).inspect_err(|err| {
            warn!("event=task_create module=service status=rejected reason={err:?}");
        })?;
        let saved = self.repo.save(&task)?;
        info!(
            "event=task_create module=service status=ok task_id={}",
            saved.id
        );
        Ok(saved)
    }

    /// Applies a partial update to an existing task.
    pub fn update_task(&self, id: TaskId, updates: &UpdateTaskRequest) -> TaskServiceResult<Task> {
        let existing = self.get_task(id)?;
        let updated = update_task(&existing, updates).inspect_err(|err| {
            warn!("event=task_update module=service status=rejected task_id={id} reason={err:?}");
        })?;
        let saved = self.repo.save(&updated)?;
        info!("event=task_update module=service status=ok task_id={id}");
        Ok(saved)
    }

    /// Flips an existing task between `todo` and `done`.
    pub fn toggle_task(&self, id: TaskId) -> TaskServiceResult<Task> {
        let existing = self.get_task(id)?;
        let saved = self.repo.save(&toggle_task_status(&existing))?;
        info!(
            "event=task_toggle module=service status=ok task_id={id} task_status={}",
            saved.status
        );
        Ok(saved)
    }

    /// Deletes a task; missing IDs are reported as `NotFound`.
    pub fn delete_task(&self, id: TaskId) -> TaskServiceResult<()> {
        if !self.repo.delete(id)? {
            return Err(TaskServiceError::NotFound(id));
        }
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }

    /// Returns the number of stored tasks.
    pub fn count_tasks(&self) -> TaskServiceResult<usize> {
        Ok(self.repo.count()?)
    }
}
