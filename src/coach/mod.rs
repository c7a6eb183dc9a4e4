/// Motivational text capability
///
/// Completion responses and the dashboard greeting carry an opaque message
/// produced by a `Coach`. The trait has a single method so an AI-backed
/// implementation can be swapped in by the outer layers; the deterministic
/// `FallbackCoach` keeps the engine fully functional when no such
/// implementation is available. Coach output is best-effort decoration and
/// is never on the critical path of a completion transaction.

use crate::analytics::DashboardStats;

/// Something that can happen in the tracker worth commenting on
#[derive(Debug, Clone, Copy)]
pub enum CoachEvent<'a> {
    /// A habit was just completed, carrying its new streak value
    HabitCompleted { name: &'a str, streak: u32 },
    /// A completion landed after a gap, restarting the streak at 1
    StreakRestarted { name: &'a str },
    /// Dashboard greeting over today's numbers
    DailyGreeting { stats: &'a DashboardStats },
}

/// Produce text for an event
pub trait Coach {
    fn compose(&self, event: CoachEvent<'_>) -> String;
}

/// Deterministic fallback with no external dependencies
pub struct FallbackCoach;

impl Coach for FallbackCoach {
    fn compose(&self, event: CoachEvent<'_>) -> String {
        match event {
            CoachEvent::HabitCompleted { name, streak } => match streak {
                0 | 1 => format!("Great start on '{}'! One day down, keep the momentum going.", name),
                2..=6 => format!("Nice work! {} days in a row on '{}'. You're building a strong habit.", streak, name),
                7..=29 => format!("Excellent! {} days straight on '{}'. You're in the groove now!", streak, name),
                _ => format!("Incredible! {} days of '{}' without a miss. You're a habit master!", streak, name),
            },
            CoachEvent::StreakRestarted { name } => format!(
                "Back at it with '{}'! Every streak starts with day one.",
                name
            ),
            CoachEvent::DailyGreeting { stats } => format!(
                "You've completed {} of {} habits and {} of {} tasks today. Best streak: {} days. Keep going!",
                stats.habits.done_today,
                stats.habits.total,
                stats.tasks.done_today,
                stats.tasks.total_today,
                stats.streaks.best_streak,
            ),
        }
    }
}
