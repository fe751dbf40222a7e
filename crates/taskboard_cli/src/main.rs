//! Command-line front end for the task board.
//!
//! # Responsibility
//! - Resolve configuration from the environment and build the configured
//!   task repository (SQLite file or process-local memory).
//! - Route each subcommand through the same handlers an HTTP host would use,
//!   printing the JSON answer.
//!
//! # Invariants
//! - Exit status is non-zero whenever the handler answers with a 4xx/5xx.
//! - Startup failures (config, logging, database) are reported once on
//!   stderr with their cause chain.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::process::ExitCode;
use taskboard_api::{ApiResponse, StatsApi, TasksApi};
use taskboard_core::db::open_db_at;
use taskboard_core::{
    core_version, init_logging, CoreConfig, InMemoryTaskRepository, JsonFileTaskSource,
    RepositoryTaskSource, SqliteTaskRepository, StorageBackend, TaskRepository, TaskSource,
};

#[derive(Debug, Parser)]
#[command(name = "taskboard")]
#[command(version, about = "Track tasks and report completion statistics")]
#[command(propagate_version = true)]
struct Cli {
    /// SQLite file to use instead of TASKBOARD_DB_PATH
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a task
    Add {
        title: String,
        #[arg(long, short)]
        description: Option<String>,
    },

    /// List tasks, newest first
    List {
        /// Only tasks with this status (todo|done)
        #[arg(long, short)]
        status: Option<String>,
    },

    /// Show one task
    Show { id: String },

    /// Change title and/or description
    Edit {
        id: String,
        #[arg(long, short)]
        title: Option<String>,
        #[arg(long, short, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description
        #[arg(long)]
        clear_description: bool,
    },

    /// Flip a task between todo and done
    Toggle { id: String },

    /// Delete a task
    Rm { id: String },

    /// Show completion statistics
    Stats {
        /// Counters only, without the daily breakdown
        #[arg(long)]
        summary: bool,
    },

    /// Report store and stats source health
    Health,

    /// Print crate versions
    Version,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every printed answer was a success.
fn run(cli: Cli) -> Result<bool> {
    if let Command::Version = cli.command {
        println!("taskboard {}", env!("CARGO_PKG_VERSION"));
        println!("taskboard_core {}", core_version());
        return Ok(true);
    }

    let mut config = CoreConfig::from_env().context("invalid configuration")?;
    if let Some(db) = cli.db {
        config.storage = StorageBackend::Sqlite;
        config.db_path = db;
    }
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir).context("failed to initialize logging")?;
    }

    let responses = match config.db_location() {
        None => {
            info!("event=cli_start module=cli status=ok storage=memory");
            execute(cli.command, &InMemoryTaskRepository::new(), &config)
        }
        Some(location) => {
            let conn = open_db_at(&location).with_context(|| {
                format!("failed to open task store ({})", location.mode_label())
            })?;
            info!("event=cli_start module=cli status=ok storage=sqlite");
            execute(cli.command, &SqliteTaskRepository::new(&conn), &config)
        }
    };

    let mut all_ok = true;
    for response in &responses {
        print_response(response)?;
        all_ok &= response.is_success();
    }
    Ok(all_ok)
}

/// Runs one subcommand against `repo`; the stats side reads the configured
/// feed when one is set, otherwise the same repository.
fn execute<R: TaskRepository>(
    command: Command,
    repo: &R,
    config: &CoreConfig,
) -> Vec<ApiResponse> {
    let tasks = TasksApi::new(repo);
    match command {
        Command::Add { title, description } => {
            let mut body = Map::new();
            body.insert("title".to_string(), Value::String(title));
            if let Some(description) = description {
                body.insert("description".to_string(), Value::String(description));
            }
            vec![tasks.create_task(&Value::Object(body).to_string())]
        }
        Command::List { status } => vec![tasks.list_tasks(status.as_deref())],
        Command::Show { id } => vec![tasks.get_task(&id)],
        Command::Edit {
            id,
            title,
            description,
            clear_description,
        } => {
            let body = edit_body(title, description, clear_description);
            vec![tasks.update_task(&id, &body.to_string())]
        }
        Command::Toggle { id } => vec![tasks.toggle_task(&id)],
        Command::Rm { id } => vec![tasks.delete_task(&id)],
        Command::Stats { summary } => match &config.tasks_feed {
            Some(feed) => vec![stats_answer(JsonFileTaskSource::new(feed), summary)],
            None => vec![stats_answer(RepositoryTaskSource::new(repo), summary)],
        },
        Command::Health => {
            let stats_health = match &config.tasks_feed {
                Some(feed) => StatsApi::new(JsonFileTaskSource::new(feed)).health(),
                None => StatsApi::new(RepositoryTaskSource::new(repo)).health(),
            };
            vec![tasks.health(), stats_health]
        }
        Command::Version => Vec::new(),
    }
}

fn stats_answer<S: TaskSource>(source: S, summary: bool) -> ApiResponse {
    let api = StatsApi::new(source);
    if summary {
        api.summary()
    } else {
        api.stats()
    }
}

/// Only supplied fields are sent, so omitted ones stay untouched.
fn edit_body(title: Option<String>, description: Option<String>, clear: bool) -> Value {
    let mut body = Map::new();
    if let Some(title) = title {
        body.insert("title".to_string(), Value::String(title));
    }
    if clear {
        body.insert("description".to_string(), Value::Null);
    } else if let Some(description) = description {
        body.insert("description".to_string(), Value::String(description));
    }
    Value::Object(body)
}

fn print_response(response: &ApiResponse) -> Result<()> {
    match &response.body {
        Some(body) => {
            let rendered = serde_json::to_string_pretty(body).context("failed to render answer")?;
            if response.is_success() {
                println!("{rendered}");
            } else {
                eprintln!("[{}] {rendered}", response.status);
            }
        }
        None => println!("[{}]", response.status),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{edit_body, execute, Cli, Command};
    use clap::{CommandFactory, Parser};
    use serde_json::json;
    use taskboard_core::{CoreConfig, InMemoryTaskRepository, StorageBackend, TaskRepository};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_list_with_status_filter() {
        let cli = Cli::try_parse_from(["taskboard", "list", "--status", "done"]).unwrap();
        match cli.command {
            Command::List { status } => assert_eq!(status.as_deref(), Some("done")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn edit_rejects_description_with_clear() {
        let parsed = Cli::try_parse_from([
            "taskboard",
            "edit",
            "id",
            "--description",
            "x",
            "--clear-description",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn edit_body_only_carries_supplied_fields() {
        assert_eq!(edit_body(None, None, false), json!({}));
        assert_eq!(
            edit_body(Some("New".to_string()), None, false),
            json!({"title": "New"})
        );
        assert_eq!(edit_body(None, None, true), json!({"description": null}));
        assert_eq!(
            edit_body(None, Some("d".to_string()), false),
            json!({"description": "d"})
        );
    }

    #[test]
    fn global_db_flag_is_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["taskboard", "health", "--db", "/tmp/x.sqlite3"]).unwrap();
        assert_eq!(cli.db.unwrap().to_str(), Some("/tmp/x.sqlite3"));
    }

    #[test]
    fn execute_runs_commands_against_in_memory_store() {
        let repo = InMemoryTaskRepository::new();
        let config = CoreConfig {
            storage: StorageBackend::Memory,
            ..CoreConfig::default()
        };
        assert_eq!(config.db_location(), None);

        let added = execute(
            Command::Add {
                title: "  Write notes ".to_string(),
                description: None,
            },
            &repo,
            &config,
        );
        assert_eq!(added[0].status, 201);
        let id = added[0].body.as_ref().unwrap()["id"]
            .as_str()
            .unwrap()
            .to_string();
        assert_eq!(repo.count().unwrap(), 1);

        let toggled = execute(Command::Toggle { id }, &repo, &config);
        assert_eq!(toggled[0].body.as_ref().unwrap()["status"], "done");

        let summary = execute(Command::Stats { summary: true }, &repo, &config);
        assert_eq!(summary[0].body.as_ref().unwrap()["completionRate"], 100);

        let health = execute(Command::Health, &repo, &config);
        assert_eq!(health.len(), 2);
        assert!(health.iter().all(|response| response.is_success()));

        let missing = execute(Command::Show { id: "nope".to_string() }, &repo, &config);
        assert_eq!(missing[0].status, 404);
    }
}
