//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and source calls into use-case level APIs.
//! - Keep request handlers decoupled from storage details.

pub mod stats_service;
pub mod task_service;
