/// Daily dashboard statistics
///
/// Pure read-side computation over the current entity set. Holds no state
/// of its own and is recomputed on every call; nothing here survives a
/// completion or uncompletion, so the numbers can never go stale.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::Task;
use crate::ops::habits::HabitView;

/// Habit counters for today
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitStats {
    pub total: u32,
    pub done_today: u32,
    pub completion_rate: f64,
}

/// Task counters for today
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskStats {
    pub total_today: u32,
    pub done_today: u32,
    pub completion_rate: f64,
}

/// Streak counters across active habits
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakStats {
    pub best_streak: u32,
    pub active_streaks: u32,
}

/// The dashboard summary payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub habits: HabitStats,
    pub tasks: TaskStats,
    pub streaks: StreakStats,
}

impl DashboardStats {
    /// Compute the summary from the habit views, the task set, and today's date
    ///
    /// Archived habits are skipped even if passed in, so a stale caller can
    /// never leak an archived streak into `best_streak`. Tasks count only
    /// when their day equals `today`.
    pub fn compute(habits: &[HabitView], tasks: &[Task], today: NaiveDate) -> Self {
        let active: Vec<&HabitView> = habits.iter().filter(|h| !h.archived).collect();
        let habits_total = active.len() as u32;
        let habits_done = active.iter().filter(|h| h.done_today).count() as u32;

        let todays: Vec<&Task> = tasks.iter().filter(|t| t.date == today).collect();
        let tasks_total = todays.len() as u32;
        let tasks_done = todays.iter().filter(|t| t.done).count() as u32;

        let best_streak = active.iter().map(|h| h.streak).max().unwrap_or(0);
        let active_streaks = active.iter().filter(|h| h.streak > 0).count() as u32;

        Self {
            habits: HabitStats {
                total: habits_total,
                done_today: habits_done,
                completion_rate: rate(habits_done, habits_total),
            },
            tasks: TaskStats {
                total_today: tasks_total,
                done_today: tasks_done,
                completion_rate: rate(tasks_done, tasks_total),
            },
            streaks: StreakStats {
                best_streak,
                active_streaks,
            },
        }
    }
}

/// Percentage of done over total, rounded to one decimal place
fn rate(done: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (done as f64 / total as f64 * 1000.0).round() / 10.0
}
