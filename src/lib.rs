/// Streak and completion engine for a personal habit/task dashboard
///
/// The library exposes the `Tracker` facade plus the underlying operation
/// functions. Habits are daily: at most one completion per calendar day,
/// recorded in an append-only ledger that is the authoritative history.
/// `streak` and `last_done` on the habit row are denormalized caches
/// rewritten from the ledger on every mutating operation.

use std::path::PathBuf;

use thiserror::Error;

pub mod analytics;
pub mod coach;
pub mod domain;
pub mod ops;
pub mod storage;

// Re-export the types the route layer needs most
pub use analytics::DashboardStats;
pub use coach::{Coach, CoachEvent, FallbackCoach};
pub use domain::{DomainError, Habit, HabitId, ReminderTime, Task, TaskId};
pub use ops::{CompletionOutcome, CreateHabitParams, CreateTaskParams, EditHabitParams, HabitView};
pub use storage::{SqliteStore, StorageError, Store};

/// Errors surfaced to the route layer
///
/// All variants are recoverable at the boundary; the route layer translates
/// them to user-facing responses. Storage failures propagate as-is - retry
/// policy belongs to the storage collaborator.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("storage error: {0}")]
    Storage(StorageError),
}

impl From<DomainError> for TrackerError {
    fn from(err: DomainError) -> Self {
        TrackerError::Validation(err.to_string())
    }
}

impl From<StorageError> for TrackerError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::HabitNotFound { habit_id } => TrackerError::NotFound {
                kind: "habit",
                id: habit_id,
            },
            StorageError::TaskNotFound { task_id } => TrackerError::NotFound {
                kind: "task",
                id: task_id,
            },
            other => TrackerError::Storage(other),
        }
    }
}

/// Facade over the store and the coach capability
///
/// One instance per process; each method is a single atomic operation
/// against the store. The coach is swappable - an AI-backed implementation
/// can be plugged in by the outer layers, and the deterministic fallback
/// keeps everything working when it isn't.
pub struct Tracker {
    store: SqliteStore,
    coach: Box<dyn Coach + Send>,
}

impl Tracker {
    /// Open (or create) the database at `db_path` with the fallback coach
    pub fn open(db_path: PathBuf) -> Result<Self, TrackerError> {
        Self::with_coach(db_path, Box::new(FallbackCoach))
    }

    /// Open with a custom coach implementation
    pub fn with_coach(db_path: PathBuf, coach: Box<dyn Coach + Send>) -> Result<Self, TrackerError> {
        tracing::info!("initializing tracker with database: {:?}", db_path);
        let store = SqliteStore::new(db_path)?;
        Ok(Self { store, coach })
    }

    /// In-memory tracker, used by tests
    pub fn open_in_memory() -> Result<Self, TrackerError> {
        Ok(Self {
            store: SqliteStore::open_in_memory()?,
            coach: Box::new(FallbackCoach),
        })
    }

    // --- habits ---

    pub fn habits(&self) -> Result<Vec<HabitView>, TrackerError> {
        ops::habits::list_habits(&self.store, domain::dates::today())
    }

    pub fn archived_habits(&self) -> Result<Vec<HabitView>, TrackerError> {
        ops::habits::list_archived_habits(&self.store, domain::dates::today())
    }

    pub fn create_habit(&mut self, params: CreateHabitParams) -> Result<HabitView, TrackerError> {
        ops::habits::create_habit(&mut self.store, params)
    }

    pub fn complete_habit(&mut self, id: HabitId) -> Result<CompletionOutcome, TrackerError> {
        ops::habits::complete_habit(&mut self.store, self.coach.as_ref(), id)
    }

    pub fn uncomplete_habit(&mut self, id: HabitId) -> Result<HabitView, TrackerError> {
        ops::habits::uncomplete_habit(&mut self.store, id)
    }

    pub fn edit_habit(&mut self, id: HabitId, params: EditHabitParams) -> Result<HabitView, TrackerError> {
        ops::habits::edit_habit(&mut self.store, id, params)
    }

    pub fn archive_habit(&mut self, id: HabitId) -> Result<HabitView, TrackerError> {
        ops::habits::set_archived(&mut self.store, id, true)
    }

    pub fn unarchive_habit(&mut self, id: HabitId) -> Result<HabitView, TrackerError> {
        ops::habits::set_archived(&mut self.store, id, false)
    }

    pub fn delete_habit(&mut self, id: HabitId) -> Result<(), TrackerError> {
        ops::habits::delete_habit(&mut self.store, id)
    }

    // --- tasks ---

    pub fn tasks_today(&self) -> Result<Vec<Task>, TrackerError> {
        ops::tasks::list_tasks_today(&self.store)
    }

    pub fn create_task(&mut self, params: CreateTaskParams) -> Result<Task, TrackerError> {
        ops::tasks::create_task(&mut self.store, params)
    }

    pub fn complete_task(&mut self, id: TaskId) -> Result<Task, TrackerError> {
        ops::tasks::complete_task(&mut self.store, id)
    }

    pub fn uncomplete_task(&mut self, id: TaskId) -> Result<Task, TrackerError> {
        ops::tasks::uncomplete_task(&mut self.store, id)
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<(), TrackerError> {
        ops::tasks::delete_task(&mut self.store, id)
    }

    // --- dashboard ---

    pub fn stats(&self) -> Result<DashboardStats, TrackerError> {
        ops::stats::get_stats(&self.store)
    }

    pub fn greeting(&self) -> Result<String, TrackerError> {
        ops::stats::daily_greeting(&self.store, self.coach.as_ref())
    }
}
