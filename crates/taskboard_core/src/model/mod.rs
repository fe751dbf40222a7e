//! Domain model for the task board.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Status values outside `todo|done` cannot be represented.

pub mod task;
