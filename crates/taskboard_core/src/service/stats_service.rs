//! Stats use-case service.
//!
//! Fetches one task snapshot per call and runs it through the stats domain.
//! Fetch failures are returned as-is.

use crate::domain::stats::{
    compute_daily_stats, compute_stats, find_most_productive_day, DailyStats, TaskStats,
};
use crate::source::{FetchError, TaskSource};
use log::info;
use serde::Serialize;
use std::time::Instant;

/// Full statistics report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub stats: TaskStats,
    pub daily_stats: Vec<DailyStats>,
    pub most_productive_day: Option<DailyStats>,
}

/// Stats service facade over a task source.
pub struct StatsService<S: TaskSource> {
    source: S,
}

impl<S: TaskSource> StatsService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Computes totals, per-day counters and the most productive day.
    pub fn overview(&self) -> Result<StatsOverview, FetchError> {
        let started_at = Instant::now();
        let tasks = self.source.fetch_all()?;

        let stats = compute_stats(&tasks);
        let daily_stats = compute_daily_stats(&tasks);
        let most_productive_day = find_most_productive_day(&daily_stats).copied();

        info!(
            "event=stats_overview module=service status=ok task_count={} day_count={} duration_ms={}",
            stats.total,
            daily_stats.len(),
            started_at.elapsed().as_millis()
        );
        Ok(StatsOverview {
            stats,
            daily_stats,
            most_productive_day,
        })
    }

    /// Computes totals only.
    pub fn summary(&self) -> Result<TaskStats, FetchError> {
        let tasks = self.source.fetch_all()?;
        Ok(compute_stats(&tasks))
    }

    /// Describes where tasks are fetched from.
    pub fn source_description(&self) -> String {
        self.source.describe()
    }
}
