//! Runtime configuration resolved from environment variables.
//!
//! # Responsibility
//! - Decide storage backend, database location, logging and stats source.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Invalid values are reported, never replaced by defaults.

use crate::db::DbLocation;
use crate::logging::{default_log_level, LogLevel};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_STORAGE: &str = "TASKBOARD_STORAGE";
pub const ENV_DB_PATH: &str = "TASKBOARD_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "TASKBOARD_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASKBOARD_LOG_DIR";
pub const ENV_TASKS_FEED: &str = "TASKBOARD_TASKS_FEED";

const DEFAULT_DB_FILE_NAME: &str = "taskboard.sqlite3";

/// Which task repository implementation backs the services.
///
/// `Memory` selects `InMemoryTaskRepository`, whose tasks live only as long
/// as the process; `Sqlite` selects `SqliteTaskRepository` over `db_path`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

/// Configuration failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
    RelativePath {
        key: &'static str,
        value: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "invalid {key} `{value}`; expected {expected}"),
            Self::RelativePath { key, value } => {
                write!(f, "{key} must be an absolute path, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub storage: StorageBackend,
    pub db_path: PathBuf,
    pub log_level: LogLevel,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
    /// Exported task list read by the stats service instead of the store.
    pub tasks_feed: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::Sqlite,
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            tasks_feed: None,
        }
    }
}

impl CoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, one call per variable name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(value) = read(ENV_STORAGE) {
            config.storage = match value.to_ascii_lowercase().as_str() {
                "memory" => StorageBackend::Memory,
                "sqlite" => StorageBackend::Sqlite,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_STORAGE,
                        value,
                        expected: "memory|sqlite",
                    })
                }
            };
        }

        if let Some(value) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(value);
        }

        if let Some(value) = read(ENV_LOG_LEVEL) {
            config.log_level = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_LOG_LEVEL,
                value: value.clone(),
                expected: "trace|debug|info|warn|error",
            })?;
        }

        if let Some(value) = read(ENV_LOG_DIR) {
            let path = PathBuf::from(&value);
            if !path.is_absolute() {
                return Err(ConfigError::RelativePath {
                    key: ENV_LOG_DIR,
                    value,
                });
            }
            config.log_dir = Some(path);
        }

        config.tasks_feed = read(ENV_TASKS_FEED).map(PathBuf::from);

        Ok(config)
    }

    /// Database file to open, or `None` when the backend needs no database.
    pub fn db_location(&self) -> Option<DbLocation> {
        match self.storage {
            StorageBackend::Memory => None,
            StorageBackend::Sqlite => Some(DbLocation::File(self.db_path.clone())),
        }
    }
}
