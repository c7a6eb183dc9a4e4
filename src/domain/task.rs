/// Task entity
///
/// A task is a single-occurrence unit scoped to exactly one calendar date.
/// No streak concept applies; completion is a plain idempotent flag.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::habit::validate_name;
use crate::domain::{DomainError, ReminderTime, TaskId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned at creation
    pub id: TaskId,
    /// Display name (e.g., "Buy milk")
    pub name: String,
    /// The task's day, fixed at creation and never changed afterwards
    pub date: NaiveDate,
    /// Completion flag
    pub done: bool,
    /// Optional time-of-day reminder, scheduled client-side
    pub reminder_time: Option<ReminderTime>,
    /// When this task was created
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task for the given day with a validated name
    pub fn new(
        name: String,
        date: NaiveDate,
        reminder_time: Option<ReminderTime>,
    ) -> Result<Self, DomainError> {
        let name = validate_name(name)?;
        Ok(Self {
            id: TaskId::new(),
            name,
            date,
            done: false,
            reminder_time,
            created_at: Utc::now(),
        })
    }

    /// Rebuild a task from stored fields (used by the storage layer)
    pub fn from_existing(
        id: TaskId,
        name: String,
        date: NaiveDate,
        done: bool,
        reminder_time: Option<ReminderTime>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            date,
            done,
            reminder_time,
            created_at,
        }
    }
}
