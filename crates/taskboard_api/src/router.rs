//! Method/path dispatch over the task and stats handlers.
//!
//! # Invariants
//! - Unknown paths answer 404; known paths with an unsupported method
//!   answer 405.
//! - Query strings are split on `&`/`=` without percent-decoding; only
//!   `status` is read.

use crate::response::ApiResponse;
use crate::stats::StatsApi;
use crate::tasks::TasksApi;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use taskboard_core::{TaskRepository, TaskSource};

/// Request methods understood by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        })
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            other => Err(format!("unsupported method `{other}`")),
        }
    }
}

/// Both services behind one dispatch entry point.
pub struct Taskboard<R: TaskRepository, S: TaskSource> {
    pub tasks: TasksApi<R>,
    pub stats: StatsApi<S>,
}

impl<R: TaskRepository, S: TaskSource> Taskboard<R, S> {
    pub fn new(repo: R, source: S) -> Self {
        Self {
            tasks: TasksApi::new(repo),
            stats: StatsApi::new(source),
        }
    }

    /// Dispatches one request. `target` is the path plus optional query.
    pub fn handle(&self, method: Method, target: &str, body: &str) -> ApiResponse {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        let segments: Vec<&str> = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match (method, segments.as_slice()) {
            (Method::Get, ["health"]) => self.tasks.health(),
            (Method::Get, ["stats", "health"]) => self.stats.health(),

            (Method::Get, ["api", "tasks"]) => {
                self.tasks.list_tasks(query_param(query, "status"))
            }
            (Method::Post, ["api", "tasks"]) => self.tasks.create_task(body),
            (Method::Get, ["api", "tasks", id]) => self.tasks.get_task(id),
            (Method::Patch, ["api", "tasks", id]) => self.tasks.update_task(id, body),
            (Method::Delete, ["api", "tasks", id]) => self.tasks.delete_task(id),
            (Method::Patch, ["api", "tasks", id, "toggle"]) => self.tasks.toggle_task(id),

            (Method::Get, ["api", "stats"]) => self.stats.stats(),
            (Method::Get, ["api", "stats", "summary"]) => self.stats.summary(),

            (_, ["health"] | ["stats", "health"])
            | (_, ["api", "tasks"] | ["api", "tasks", _] | ["api", "tasks", _, "toggle"])
            | (_, ["api", "stats"] | ["api", "stats", "summary"]) => {
                ApiResponse::error(405, format!("Method {method} not allowed"))
            }
            _ => ApiResponse::error(404, "Not found"),
        }
    }
}

fn query_param<'q>(query: &'q str, key: &str) -> Option<&'q str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(name, _)| *name == key)
        .map(|(_, value)| value)
}
