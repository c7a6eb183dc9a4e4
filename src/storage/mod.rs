/// Storage layer for persisting habit and task data
///
/// This module handles all database operations using SQLite. The `Store`
/// trait is the seam between the streak engine and the persistence
/// mechanism; the engine never caches authoritative state beyond the scope
/// of one operation.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::SqliteStore;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Habit, HabitId, Task, TaskId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("task not found: {task_id}")]
    TaskNotFound { task_id: String },

    #[error("duplicate completion: habit {habit_id} already completed on {date}")]
    DuplicateCompletion { habit_id: String, date: NaiveDate },

    #[error("migration error: {0}")]
    Migration(String),
}

/// Persistence interface for habits, tasks, and the completion ledger
///
/// Multi-step mutations (`record_completion`, `remove_completion`,
/// `delete_habit`) must execute atomically: either every write lands or
/// none does, so a failure partway through can never leave the cached
/// streak fields inconsistent with the ledger.
pub trait Store {
    // --- habits ---

    fn insert_habit(&mut self, habit: &Habit) -> Result<(), StorageError>;

    fn get_habit(&self, id: HabitId) -> Result<Habit, StorageError>;

    /// Case-insensitive name lookup, used for duplicate-name rejection
    fn find_habit_by_name(&self, name: &str) -> Result<Option<Habit>, StorageError>;

    /// Persist name / reminder / archived changes for an existing habit
    fn update_habit(&mut self, habit: &Habit) -> Result<(), StorageError>;

    /// List habits by archival state, in insertion order
    fn list_habits(&self, archived: bool) -> Result<Vec<Habit>, StorageError>;

    /// Delete a habit and all of its ledger entries
    fn delete_habit(&mut self, id: HabitId) -> Result<(), StorageError>;

    // --- completion ledger ---

    fn has_completion(&self, id: HabitId, date: NaiveDate) -> Result<bool, StorageError>;

    /// All completion dates for a habit, newest first
    fn completion_dates(&self, id: HabitId) -> Result<Vec<NaiveDate>, StorageError>;

    /// Atomically insert a ledger entry for (habit, date) and write the new
    /// streak fields. `last_done` may differ from `date` when an earlier day
    /// is being backfilled into an existing run. Fails with
    /// `DuplicateCompletion` if an entry already exists for that day.
    fn record_completion(
        &mut self,
        id: HabitId,
        date: NaiveDate,
        streak: u32,
        last_done: NaiveDate,
    ) -> Result<(), StorageError>;

    /// Atomically remove the (habit, date) ledger entry and write the
    /// recomputed streak fields.
    fn remove_completion(
        &mut self,
        id: HabitId,
        date: NaiveDate,
        streak: u32,
        last_done: Option<NaiveDate>,
    ) -> Result<(), StorageError>;

    // --- tasks ---

    fn insert_task(&mut self, task: &Task) -> Result<(), StorageError>;

    fn get_task(&self, id: TaskId) -> Result<Task, StorageError>;

    /// List tasks whose day equals `date`, in insertion order
    fn list_tasks_on(&self, date: NaiveDate) -> Result<Vec<Task>, StorageError>;

    fn set_task_done(&mut self, id: TaskId, done: bool) -> Result<(), StorageError>;

    fn delete_task(&mut self, id: TaskId) -> Result<(), StorageError>;
}
