//! Request handlers for the task board.
//!
//! # Responsibility
//! - Expose the task and stats use cases as status-plus-JSON answers.
//! - Stay transport-agnostic: callers pass raw path ids, query values and
//!   bodies, and serve the returned [`ApiResponse`] however they like.
//!
//! # Invariants
//! - Handlers never panic and never return `Result`; every failure becomes
//!   an error status with an `{"error": ...}` body.

pub mod response;
pub mod router;
pub mod stats;
pub mod tasks;

pub use response::ApiResponse;
pub use router::{Method, Taskboard};
pub use stats::StatsApi;
pub use tasks::TasksApi;
