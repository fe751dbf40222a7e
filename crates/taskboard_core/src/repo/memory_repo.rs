//! In-memory task repository.
//!
//! # Responsibility
//! - Serve the `TaskRepository` contract without a database, for tests and
//!   throwaway sessions.
//!
//! # Invariants
//! - `find_all` returns tasks in first-insertion order.
//! - Writes validate exactly like the SQLite repository.
//! - Stored values are cloned in and out; callers never share backing state.

use crate::model::task::{Task, TaskId, TaskStatus};
use crate::repo::task_repo::{RepoError, RepoResult, TaskRepository};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-local task store guarded by a read/write lock.
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, Vec<Task>>> {
        self.tasks
            .read()
            .map_err(|_| RepoError::Unavailable("in-memory task lock poisoned".to_string()))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, Vec<Task>>> {
        self.tasks
            .write()
            .map_err(|_| RepoError::Unavailable("in-memory task lock poisoned".to_string()))
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn find_all(&self) -> RepoResult<Vec<Task>> {
        Ok(self.read()?.clone())
    }

    fn find_by_id(&self, id: TaskId) -> RepoResult<Option<Task>> {
        Ok(self.read()?.iter().find(|task| task.id == id).cloned())
    }

    fn find_by_status(&self, status: TaskStatus) -> RepoResult<Vec<Task>> {
        Ok(self
            .read()?
            .iter()
            .filter(|task| task.status == status)
            .cloned()
            .collect())
    }

    fn save(&self, task: &Task) -> RepoResult<Task> {
        task.validate()?;

        let mut tasks = self.write()?;
        match tasks.iter_mut().find(|stored| stored.id == task.id) {
            Some(stored) => {
                stored.title = task.title.clone();
                stored.description = task.description.clone();
                stored.status = task.status;
                Ok(stored.clone())
            }
            None => {
                tasks.push(task.clone());
                Ok(task.clone())
            }
        }
    }

    fn delete(&self, id: TaskId) -> RepoResult<bool> {
        let mut tasks = self.write()?;
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        Ok(tasks.len() != before)
    }

    fn count(&self) -> RepoResult<usize> {
        Ok(self.read()?.len())
    }
}
