//! Core domain logic for the task board.
//! This crate is the single source of truth for task and stats invariants.

pub mod config;
pub mod db;
pub mod domain;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod source;

pub use config::{ConfigError, CoreConfig, StorageBackend};
pub use domain::stats::{
    compute_average_completion_rate, compute_daily_stats, compute_stats,
    find_most_productive_day, DailyStats, TaskStats,
};
pub use domain::task::{
    create_task, filter_tasks_by_status, sort_tasks_by_date, toggle_task_status, update_task,
    CreateTaskRequest, UpdateTaskRequest,
};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::task::{
    validate_title, ParseTaskStatusError, Task, TaskId, TaskStatus, TaskValidationError,
    MAX_TITLE_CHARS,
};
pub use repo::memory_repo::InMemoryTaskRepository;
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use service::stats_service::{StatsOverview, StatsService};
pub use service::task_service::{TaskService, TaskServiceError, TaskServiceResult};
pub use source::{
    parse_task_list, FetchError, JsonFileTaskSource, RepositoryTaskSource, TaskListPayload,
    TaskSource,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
