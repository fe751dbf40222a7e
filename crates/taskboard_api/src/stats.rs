//! Stats request handlers.
//!
//! Fetch failures answer 503 with the upstream message; stats computation
//! itself cannot fail.

use crate::response::ApiResponse;
use chrono::{SecondsFormat, Utc};
use log::error;
use serde_json::json;
use taskboard_core::{FetchError, StatsService, TaskSource};

/// Handlers for `/api/stats`.
pub struct StatsApi<S: TaskSource> {
    service: StatsService<S>,
}

impl<S: TaskSource> StatsApi<S> {
    pub fn new(source: S) -> Self {
        Self {
            service: StatsService::new(source),
        }
    }

    /// `GET /api/stats`
    pub fn stats(&self) -> ApiResponse {
        match self.service.overview() {
            Ok(overview) => ApiResponse::ok(&overview),
            Err(err) => fetch_error_response("Failed to compute statistics", &err),
        }
    }

    /// `GET /api/stats/summary`
    pub fn summary(&self) -> ApiResponse {
        match self.service.summary() {
            Ok(stats) => ApiResponse::ok(&stats),
            Err(err) => fetch_error_response("Failed to compute summary", &err),
        }
    }

    /// `GET /health` for the stats side.
    pub fn health(&self) -> ApiResponse {
        ApiResponse::ok(&json!({
            "status": "healthy",
            "service": "stats-service",
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "tasksSource": self.service.source_description(),
        }))
    }
}

fn fetch_error_response(error: &str, err: &FetchError) -> ApiResponse {
    error!("event=stats_request module=api status=error error_code=fetch_failed error={err}");
    ApiResponse::error_with_message(503, error, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::StatsApi;
    use taskboard_core::{
        FetchError, InMemoryTaskRepository, RepositoryTaskSource, Task, TaskRepository,
        TaskSource, TaskStatus,
    };
    use uuid::Uuid;

    struct DownSource;

    impl TaskSource for DownSource {
        fn fetch_all(&self) -> Result<Vec<Task>, FetchError> {
            Err(FetchError::Io(std::io::Error::other("connection refused")))
        }

        fn describe(&self) -> String {
            "down".to_string()
        }
    }

    fn seeded_repo() -> InMemoryTaskRepository {
        let repo = InMemoryTaskRepository::new();
        let rows = [
            (TaskStatus::Done, "2024-01-01T10:00:00Z"),
            (TaskStatus::Todo, "2024-01-01T12:00:00Z"),
            (TaskStatus::Done, "2024-01-02T10:00:00Z"),
            (TaskStatus::Done, "2024-01-02T11:00:00Z"),
        ];
        for (status, created_at) in rows {
            repo.save(&Task {
                id: Uuid::new_v4(),
                title: "seeded".to_string(),
                description: None,
                status,
                created_at: created_at.parse().unwrap(),
            })
            .unwrap();
        }
        repo
    }

    #[test]
    fn stats_answers_full_overview() {
        let api = StatsApi::new(RepositoryTaskSource::new(seeded_repo()));

        let response = api.stats();

        assert_eq!(response.status, 200);
        let body = response.body.unwrap();
        assert_eq!(body["stats"]["total"], 4);
        assert_eq!(body["stats"]["completionRate"], 75);
        assert_eq!(body["dailyStats"][0]["date"], "2024-01-01");
        assert_eq!(body["dailyStats"][0]["created"], 2);
        assert_eq!(body["mostProductiveDay"]["date"], "2024-01-02");
        assert_eq!(body["mostProductiveDay"]["completed"], 2);
    }

    #[test]
    fn summary_answers_counters_only() {
        let api = StatsApi::new(RepositoryTaskSource::new(seeded_repo()));

        let body = api.summary().body.unwrap();

        assert_eq!(
            body,
            serde_json::json!({"total": 4, "todo": 1, "done": 3, "completionRate": 75})
        );
    }

    #[test]
    fn fetch_failures_answer_503() {
        let api = StatsApi::new(DownSource);

        let stats = api.stats();
        assert_eq!(stats.status, 503);
        let body = stats.body.unwrap();
        assert_eq!(body["error"], "Failed to compute statistics");
        assert!(body["message"].as_str().unwrap().contains("connection refused"));

        assert_eq!(api.summary().status, 503);
    }

    #[test]
    fn health_names_the_source() {
        let api = StatsApi::new(DownSource);

        let body = api.health().body.unwrap();

        assert_eq!(body["service"], "stats-service");
        assert_eq!(body["tasksSource"], "down");
    }
}
