//! Response envelope shared by all handlers.

use log::error;
use serde::Serialize;
use serde_json::{json, Value};

/// Transport-agnostic response: an HTTP status code plus optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// `None` for bodiless answers such as `204 No Content`.
    pub body: Option<Value>,
}

impl ApiResponse {
    /// `200 OK` with `payload` as body.
    pub fn ok(payload: &impl Serialize) -> Self {
        Self::with_payload(200, payload)
    }

    /// `201 Created` with `payload` as body.
    pub fn created(payload: &impl Serialize) -> Self {
        Self::with_payload(201, payload)
    }

    /// `204 No Content`.
    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }

    /// Error answer shaped `{"error": ...}`.
    pub fn error(status: u16, error: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(json!({ "error": error.into() })),
        }
    }

    /// Error answer shaped `{"error": ..., "message": ...}`.
    pub fn error_with_message(
        status: u16,
        error: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            body: Some(json!({ "error": error.into(), "message": message.into() })),
        }
    }

    /// Whether the status is a 2xx code.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn with_payload(status: u16, payload: &impl Serialize) -> Self {
        match serde_json::to_value(payload) {
            Ok(body) => Self {
                status,
                body: Some(body),
            },
            Err(err) => {
                error!("event=response_encode module=api status=error error={err}");
                Self::error(500, "Internal server error")
            }
        }
    }
}
