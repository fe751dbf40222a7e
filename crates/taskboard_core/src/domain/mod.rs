//! Pure domain operations.
//!
//! # Responsibility
//! - Task lifecycle transforms (`task`).
//! - Statistics aggregation (`stats`).
//!
//! # Invariants
//! - Nothing in this module performs I/O.
//! - `stats` depends only on the `Task` shape, never on `task` functions.

pub mod stats;
pub mod task;
