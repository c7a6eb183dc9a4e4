/// Dashboard statistics operation
///
/// Thin entry point over the pure aggregator in `analytics`: fetch the
/// active habit views and today's tasks, compute, return. No caching across
/// completion or uncompletion operations.

use crate::analytics::DashboardStats;
use crate::coach::{Coach, CoachEvent};
use crate::domain::dates;
use crate::ops::habits::list_habits;
use crate::storage::Store;
use crate::TrackerError;

/// Compute today's dashboard summary
pub fn get_stats<S: Store>(store: &S) -> Result<DashboardStats, TrackerError> {
    let today = dates::today();
    let habits = list_habits(store, today)?;
    let tasks = store.list_tasks_on(today)?;

    Ok(DashboardStats::compute(&habits, &tasks, today))
}

/// Compose the dashboard greeting over today's numbers
pub fn daily_greeting<S: Store>(store: &S, coach: &dyn Coach) -> Result<String, TrackerError> {
    let stats = get_stats(store)?;
    Ok(coach.compose(CoachEvent::DailyGreeting { stats: &stats }))
}
