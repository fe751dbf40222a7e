//! Pure statistics aggregation over task snapshots.
//!
//! # Responsibility
//! - Derive totals and completion rate from a task collection.
//! - Group tasks by UTC creation day.
//!
//! # Invariants
//! - Functions are deterministic and never fail; empty input yields zero or
//!   empty results.
//! - The only time dependency is each task's `created_at`.

use crate::model::task::{Task, TaskStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate counters for a task collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub todo: usize,
    pub done: usize,
    /// Integer percentage of `done` among `total`, 0 when `total` is 0.
    pub completion_rate: u32,
}

/// Created/completed counters for one UTC calendar day.
///
/// `date` serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub created: usize,
    pub completed: usize,
}

/// Counts tasks by status and derives the completion rate.
pub fn compute_stats(tasks: &[Task]) -> TaskStats {
    let done = tasks.iter().filter(|task| task.status == TaskStatus::Done).count();
    let todo = tasks.iter().filter(|task| task.status == TaskStatus::Todo).count();

    TaskStats {
        total: tasks.len(),
        todo,
        done,
        completion_rate: completion_rate(done, tasks.len()),
    }
}

/// Groups tasks by the UTC date of `created_at`, ascending by date.
pub fn compute_daily_stats(tasks: &[Task]) -> Vec<DailyStats> {
    let mut by_day: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();

    for task in tasks {
        let counters = by_day.entry(task.created_at.date_naive()).or_default();
        counters.0 += 1;
        if task.is_done() {
            counters.1 += 1;
        }
    }

    by_day
        .into_iter()
        .map(|(date, (created, completed))| DailyStats {
            date,
            created,
            completed,
        })
        .collect()
}

/// Same value as `compute_stats(tasks).completion_rate`.
pub fn compute_average_completion_rate(tasks: &[Task]) -> u32 {
    compute_stats(tasks).completion_rate
}

/// Returns the day with the most completions; the earliest entry wins ties.
pub fn find_most_productive_day(daily_stats: &[DailyStats]) -> Option<&DailyStats> {
    daily_stats.iter().fold(None, |best: Option<&DailyStats>, day| match best {
        Some(current) if day.completed <= current.completed => Some(current),
        _ => Some(day),
    })
}

/// Round-half-up of `done / total * 100` in integer arithmetic.
fn completion_rate(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rate = (done * 200 + total) / (total * 2);
    u32::try_from(rate).unwrap_or(100)
}
