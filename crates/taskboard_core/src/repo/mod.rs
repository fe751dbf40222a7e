//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the task storage capability set consumed by services.
//! - Provide interchangeable in-memory and SQLite implementations.
//!
//! # Invariants
//! - Repository writes must enforce `Task::validate()` before persistence.
//! - Callers depend on `TaskRepository` only, never on a concrete store.

pub mod memory_repo;
pub mod task_repo;
