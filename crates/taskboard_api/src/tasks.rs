//! Task request handlers.
//!
//! # Responsibility
//! - Translate raw request parts (path ids, query, JSON bodies) into task
//!   service calls.
//! - Map service errors onto status categories.
//!
//! # Invariants
//! - Title validation failures answer 400, never 5xx.
//! - Unknown or malformed ids answer 404.
//! - Storage failures answer 503.
//! - Handlers never panic.

use crate::response::ApiResponse;
use chrono::{SecondsFormat, Utc};
use log::{error, warn};
use serde::Serialize;
use serde_json::json;
use taskboard_core::{
    CreateTaskRequest, Task, TaskId, TaskRepository, TaskService, TaskServiceError, TaskStatus,
    UpdateTaskRequest,
};

const TASK_NOT_FOUND: &str = "Task not found";

/// List answer: `{"tasks": [...], "total": n}`.
#[derive(Debug, Serialize)]
struct TaskListBody<'a> {
    tasks: &'a [Task],
    total: usize,
}

/// Handlers for `/api/tasks`.
pub struct TasksApi<R: TaskRepository> {
    service: TaskService<R>,
}

impl<R: TaskRepository> TasksApi<R> {
    pub fn new(repo: R) -> Self {
        Self {
            service: TaskService::new(repo),
        }
    }

    /// `GET /api/tasks[?status=todo|done]`
    pub fn list_tasks(&self, status: Option<&str>) -> ApiResponse {
        let status = match parse_status_filter(status) {
            Ok(status) => status,
            Err(response) => return response,
        };

        match self.service.list_tasks(status) {
            Ok(tasks) => ApiResponse::ok(&TaskListBody {
                tasks: &tasks,
                total: tasks.len(),
            }),
            Err(err) => task_error_response(err),
        }
    }

    /// `GET /api/tasks/:id`
    pub fn get_task(&self, id: &str) -> ApiResponse {
        let Some(id) = parse_task_id(id) else {
            return ApiResponse::error(404, TASK_NOT_FOUND);
        };
        match self.service.get_task(id) {
            Ok(task) => ApiResponse::ok(&task),
            Err(err) => task_error_response(err),
        }
    }

    /// `POST /api/tasks` with body `{title, description?}`.
    pub fn create_task(&self, body: &str) -> ApiResponse {
        let request: CreateTaskRequest = match decode_body(body) {
            Ok(request) => request,
            Err(response) => return response,
        };
        match self.service.create_task(&request) {
            Ok(task) => ApiResponse::created(&task),
            Err(err) => task_error_response(err),
        }
    }

    /// `PATCH /api/tasks/:id` with body `{title?, description?}`.
    pub fn update_task(&self, id: &str, body: &str) -> ApiResponse {
        let Some(id) = parse_task_id(id) else {
            return ApiResponse::error(404, TASK_NOT_FOUND);
        };
        let updates: UpdateTaskRequest = match decode_body(body) {
            Ok(updates) => updates,
            Err(response) => return response,
        };
        match self.service.update_task(id, &updates) {
            Ok(task) => ApiResponse::ok(&task),
            Err(err) => task_error_response(err),
        }
    }

    /// `PATCH /api/tasks/:id/toggle`
    pub fn toggle_task(&self, id: &str) -> ApiResponse {
        let Some(id) = parse_task_id(id) else {
            return ApiResponse::error(404, TASK_NOT_FOUND);
        };
        match self.service.toggle_task(id) {
            Ok(task) => ApiResponse::ok(&task),
            Err(err) => task_error_response(err),
        }
    }

    /// `DELETE /api/tasks/:id`
    pub fn delete_task(&self, id: &str) -> ApiResponse {
        let Some(id) = parse_task_id(id) else {
            return ApiResponse::error(404, TASK_NOT_FOUND);
        };
        match self.service.delete_task(id) {
            Ok(()) => ApiResponse::no_content(),
            Err(err) => task_error_response(err),
        }
    }

    /// `GET /health` for the tasks side; probes storage with a count.
    pub fn health(&self) -> ApiResponse {
        let healthy = self.service.count_tasks().is_ok();
        let body = json!({
            "status": if healthy { "healthy" } else { "unhealthy" },
            "service": "tasks-service",
            "database": if healthy { "connected" } else { "disconnected" },
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        ApiResponse {
            status: if healthy { 200 } else { 503 },
            body: Some(body),
        }
    }
}

fn parse_status_filter(raw: Option<&str>) -> Result<Option<TaskStatus>, ApiResponse> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse::<TaskStatus>().map(Some).map_err(|err| {
            warn!("event=tasks_list module=api status=rejected reason=invalid_status_filter");
            ApiResponse::error(400, err.to_string())
        }),
    }
}

fn parse_task_id(raw: &str) -> Option<TaskId> {
    TaskId::parse_str(raw.trim()).ok()
}

fn decode_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiResponse> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(|err| {
        warn!("event=request_decode module=api status=rejected error={err}");
        ApiResponse::error_with_message(400, "Invalid request body", err.to_string())
    })
}

fn task_error_response(err: TaskServiceError) -> ApiResponse {
    match err {
        TaskServiceError::Validation(err) => ApiResponse::error(400, err.to_string()),
        TaskServiceError::NotFound(_) => ApiResponse::error(404, TASK_NOT_FOUND),
        TaskServiceError::Repo(err) => {
            error!("event=task_request module=api status=error error_code=storage_failed error={err}");
            ApiResponse::error_with_message(503, "Task storage unavailable", err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TasksApi;
    use serde_json::{json, Value};
    use taskboard_core::db::open_db_in_memory;
    use taskboard_core::{
        InMemoryTaskRepository, RepoError, RepoResult, SqliteTaskRepository, Task, TaskId,
        TaskRepository, TaskStatus,
    };

    struct BrokenRepository;

    impl TaskRepository for BrokenRepository {
        fn find_all(&self) -> RepoResult<Vec<Task>> {
            Err(RepoError::Unavailable("offline".to_string()))
        }
        fn find_by_id(&self, _id: TaskId) -> RepoResult<Option<Task>> {
            Err(RepoError::Unavailable("offline".to_string()))
        }
        fn find_by_status(&self, _status: TaskStatus) -> RepoResult<Vec<Task>> {
            Err(RepoError::Unavailable("offline".to_string()))
        }
        fn save(&self, _task: &Task) -> RepoResult<Task> {
            Err(RepoError::Unavailable("offline".to_string()))
        }
        fn delete(&self, _id: TaskId) -> RepoResult<bool> {
            Err(RepoError::Unavailable("offline".to_string()))
        }
        fn count(&self) -> RepoResult<usize> {
            Err(RepoError::Unavailable("offline".to_string()))
        }
    }

    fn body(response: &super::ApiResponse) -> &Value {
        response.body.as_ref().expect("response should carry a body")
    }

    fn created_id(api: &TasksApi<InMemoryTaskRepository>, payload: Value) -> String {
        let response = api.create_task(&payload.to_string());
        assert_eq!(response.status, 201, "{:?}", response.body);
        body(&response)["id"].as_str().unwrap().to_string()
    }

    #[test]
    fn create_answers_201_with_trimmed_task() {
        let api = TasksApi::new(InMemoryTaskRepository::new());

        let response = api.create_task(r#"{"title": "  Spaces  ", "description": "  Desc  "}"#);

        assert_eq!(response.status, 201);
        let task = body(&response);
        assert_eq!(task["title"], "Spaces");
        assert_eq!(task["description"], "Desc");
        assert_eq!(task["status"], "todo");
        assert!(task["createdAt"].is_string());
    }

    #[test]
    fn create_maps_validation_errors_to_400() {
        let api = TasksApi::new(InMemoryTaskRepository::new());

        let empty = api.create_task(r#"{"title": "   "}"#);
        assert_eq!(empty.status, 400);
        assert_eq!(body(&empty)["error"], "Title cannot be empty");

        let missing = api.create_task("{}");
        assert_eq!(missing.status, 400);

        let long = api.create_task(&json!({ "title": "z".repeat(101) }).to_string());
        assert_eq!(long.status, 400);
        assert!(body(&long)["error"].as_str().unwrap().contains("100"));

        let malformed = api.create_task("{not json");
        assert_eq!(malformed.status, 400);
        assert_eq!(body(&malformed)["error"], "Invalid request body");
    }

    #[test]
    fn list_wraps_tasks_and_filters_by_status() {
        let api = TasksApi::new(InMemoryTaskRepository::new());
        let first = created_id(&api, json!({"title": "first"}));
        created_id(&api, json!({"title": "second"}));
        assert_eq!(api.toggle_task(&first).status, 200);

        let all = api.list_tasks(None);
        assert_eq!(all.status, 200);
        assert_eq!(body(&all)["total"], 2);

        let done = api.list_tasks(Some("done"));
        assert_eq!(body(&done)["total"], 1);
        assert_eq!(body(&done)["tasks"][0]["id"], first.as_str());

        let blank = api.list_tasks(Some(""));
        assert_eq!(body(&blank)["total"], 2);

        let invalid = api.list_tasks(Some("archived"));
        assert_eq!(invalid.status, 400);
    }

    #[test]
    fn get_update_toggle_delete_flow() {
        let conn = open_db_in_memory().unwrap();
        let api = TasksApi::new(SqliteTaskRepository::new(&conn));
        let created = api.create_task(r#"{"title": "Flow", "description": "first"}"#);
        let id = body(&created)["id"].as_str().unwrap().to_string();

        let fetched = api.get_task(&id);
        assert_eq!(fetched.status, 200);
        assert_eq!(body(&fetched)["title"], "Flow");

        let updated = api.update_task(&id, r#"{"title": " Flow v2 "}"#);
        assert_eq!(updated.status, 200);
        assert_eq!(body(&updated)["title"], "Flow v2");
        assert_eq!(body(&updated)["description"], "first");

        let cleared = api.update_task(&id, r#"{"description": null}"#);
        assert!(body(&cleared).get("description").is_none());

        let rejected = api.update_task(&id, r#"{"title": ""}"#);
        assert_eq!(rejected.status, 400);
        let null_title = api.update_task(&id, r#"{"title": null}"#);
        assert_eq!(null_title.status, 400);
        assert_eq!(body(&null_title)["error"], "Title cannot be empty");
        assert_eq!(body(&api.get_task(&id))["title"], "Flow v2");

        let toggled = api.toggle_task(&id);
        assert_eq!(body(&toggled)["status"], "done");

        let deleted = api.delete_task(&id);
        assert_eq!(deleted.status, 204);
        assert_eq!(deleted.body, None);
        assert_eq!(api.delete_task(&id).status, 404);
        assert_eq!(api.get_task(&id).status, 404);
    }

    #[test]
    fn malformed_ids_answer_404() {
        let api = TasksApi::new(InMemoryTaskRepository::new());

        assert_eq!(api.get_task("not-a-uuid").status, 404);
        assert_eq!(api.toggle_task("42").status, 404);
        assert_eq!(api.update_task("", "{}").status, 404);
        assert_eq!(api.delete_task("nope").status, 404);
    }

    #[test]
    fn storage_failures_answer_503() {
        let api = TasksApi::new(BrokenRepository);

        assert_eq!(api.list_tasks(None).status, 503);
        assert_eq!(api.create_task(r#"{"title": "x"}"#).status, 503);
        assert_eq!(api.health().status, 503);
        assert_eq!(body(&api.health())["status"], "unhealthy");
    }

    #[test]
    fn health_reports_connected_store() {
        let api = TasksApi::new(InMemoryTaskRepository::new());

        let response = api.health();

        assert_eq!(response.status, 200);
        assert_eq!(body(&response)["database"], "connected");
        assert_eq!(body(&response)["service"], "tasks-service");
    }
}
