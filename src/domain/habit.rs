/// Habit entity and streak bookkeeping
///
/// A habit is something the user wants to do once per calendar day. The
/// entity carries the denormalized `streak`/`last_done` pair derived from
/// the completion ledger, plus archival state and an optional reminder time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, HabitId, ReminderTime};

/// Maximum length accepted for habit and task names
pub const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier, assigned at creation, immutable
    pub id: HabitId,
    /// Display name (e.g., "Drink Water", "Morning Run")
    pub name: String,
    /// Consecutive-day run ending at `last_done`; 0 iff never completed
    pub streak: u32,
    /// Most recent completion date, `None` if the ledger is empty
    pub last_done: Option<NaiveDate>,
    /// Archived habits keep their history but drop out of active listings and stats
    pub archived: bool,
    /// Optional time-of-day reminder, scheduled client-side
    pub reminder_time: Option<ReminderTime>,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new habit with a validated name
    ///
    /// New habits start with an empty ledger: streak 0, no `last_done`,
    /// not archived.
    pub fn new(name: String, reminder_time: Option<ReminderTime>) -> Result<Self, DomainError> {
        let name = validate_name(name)?;
        Ok(Self {
            id: HabitId::new(),
            name,
            streak: 0,
            last_done: None,
            archived: false,
            reminder_time,
            created_at: Utc::now(),
        })
    }

    /// Rebuild a habit from stored fields (used by the storage layer)
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: HabitId,
        name: String,
        streak: u32,
        last_done: Option<NaiveDate>,
        archived: bool,
        reminder_time: Option<ReminderTime>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            streak,
            last_done,
            archived,
            reminder_time,
            created_at,
        }
    }

    /// Rename the habit, rejecting blank names
    pub fn rename(&mut self, name: String) -> Result<(), DomainError> {
        self.name = validate_name(name)?;
        Ok(())
    }

    /// Replace the reminder time (`None` clears it)
    pub fn set_reminder(&mut self, reminder_time: Option<ReminderTime>) {
        self.reminder_time = reminder_time;
    }

    /// Overwrite the cached streak fields with values derived from the ledger
    ///
    /// Upholds the invariant that `streak == 0` iff `last_done` is absent.
    pub fn apply_streak(&mut self, streak: u32, last_done: Option<NaiveDate>) {
        debug_assert_eq!(streak == 0, last_done.is_none());
        self.streak = streak;
        self.last_done = last_done;
    }
}

/// Validate and normalize an entity name
pub(crate) fn validate_name(name: String) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidName("name cannot be empty".to_string()));
    }
    if trimmed.len() > MAX_NAME_LEN {
        return Err(DomainError::InvalidName(format!(
            "name cannot be longer than {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}
