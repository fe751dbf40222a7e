//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the six-operation storage capability used by the services.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Task::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - `save` never rewrites `created_at` of an existing row.

use crate::db::DbError;
use crate::model::task::{Task, TaskId, TaskStatus, TaskValidationError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    status,
    created_at
FROM tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    InvalidData(String),
    /// Store cannot serve requests (for example a poisoned lock).
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::Unavailable(message) => write!(f, "task store unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage capability set for task records.
pub trait TaskRepository {
    fn find_all(&self) -> RepoResult<Vec<Task>>;
    fn find_by_id(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn find_by_status(&self, status: TaskStatus) -> RepoResult<Vec<Task>>;
    /// Inserts `task` when its id is unknown, otherwise replaces the mutable
    /// fields (`title`, `description`, `status`).
    ///
    /// Returns the record as stored, which keeps the original `created_at`
    /// on updates.
    fn save(&self, task: &Task) -> RepoResult<Task>;
    /// Returns `true` iff a record existed and was removed.
    fn delete(&self, id: TaskId) -> RepoResult<bool>;
    fn count(&self) -> RepoResult<usize>;
}

impl<T: TaskRepository + ?Sized> TaskRepository for &T {
    fn find_all(&self) -> RepoResult<Vec<Task>> {
        (**self).find_all()
    }

    fn find_by_id(&self, id: TaskId) -> RepoResult<Option<Task>> {
        (**self).find_by_id(id)
    }

    fn find_by_status(&self, status: TaskStatus) -> RepoResult<Vec<Task>> {
        (**self).find_by_status(status)
    }

    fn save(&self, task: &Task) -> RepoResult<Task> {
        (**self).save(task)
    }

    fn delete(&self, id: TaskId) -> RepoResult<bool> {
        (**self).delete(id)
    }

    fn count(&self) -> RepoResult<usize> {
        (**self).count()
    }
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn find_all(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY created_at DESC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn find_by_id(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn find_by_status(&self, status: TaskStatus) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} WHERE status = ?1 ORDER BY created_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([status.as_str()])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn save(&self, task: &Task) -> RepoResult<Task> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (id, title, description, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                status = excluded.status;",
            params![
                task.id.to_string(),
                task.title.as_str(),
                task.description.as_deref(),
                task.status.as_str(),
                task.created_at.timestamp_millis(),
            ],
        )?;

        self.find_by_id(task.id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("task `{}` missing right after save", task.id))
        })
    }

    fn delete(&self, id: TaskId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }

    fn count(&self) -> RepoResult<usize> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get::<_, i64>(0))?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative task count `{count}`")))
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{id_text}` in tasks.id")))?;

    let status_text: String = row.get("status")?;
    let status = status_text.parse::<TaskStatus>().map_err(|_| {
        RepoError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
    })?;

    let created_at_ms: i64 = row.get("created_at")?;
    let created_at = DateTime::<Utc>::from_timestamp_millis(created_at_ms).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid timestamp `{created_at_ms}` in tasks.created_at"
        ))
    })?;

    let task = Task {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        status,
        created_at,
    };
    task.validate()?;
    Ok(task)
}
