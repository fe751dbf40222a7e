//! Task snapshot sources for the stats service.
//!
//! # Responsibility
//! - Define how the stats side obtains the current task collection.
//! - Keep transport details out of stats aggregation.
//!
//! # Invariants
//! - A fetched collection is a complete, consistent snapshot.
//! - Fetch failures are propagated unchanged; sources never retry.

use crate::model::task::Task;
use crate::repo::task_repo::{RepoError, TaskRepository};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod json_feed;

pub use json_feed::{parse_task_list, JsonFileTaskSource, TaskListPayload};

/// Failure while fetching a task snapshot.
#[derive(Debug)]
pub enum FetchError {
    /// Local task store failed.
    Repo(RepoError),
    /// Reading the feed failed.
    Io(std::io::Error),
    /// Feed payload was not a valid task list.
    Decode(serde_json::Error),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "failed to fetch tasks: {err}"),
            Self::Io(err) => write!(f, "failed to fetch tasks: {err}"),
            Self::Decode(err) => write!(f, "failed to decode task list: {err}"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Decode(err) => Some(err),
        }
    }
}

impl From<RepoError> for FetchError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<std::io::Error> for FetchError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

/// Supplier of the full current task collection.
pub trait TaskSource {
    fn fetch_all(&self) -> Result<Vec<Task>, FetchError>;

    /// Human-readable origin, reported by health checks.
    fn describe(&self) -> String;
}

/// Reads tasks straight from a repository living in the same process.
pub struct RepositoryTaskSource<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> RepositoryTaskSource<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

impl<R: TaskRepository> TaskSource for RepositoryTaskSource<R> {
    fn fetch_all(&self) -> Result<Vec<Task>, FetchError> {
        Ok(self.repo.find_all()?)
    }

    fn describe(&self) -> String {
        "local task store".to_string()
    }
}
