/// Task operations exposed to the route layer
///
/// Tasks are day-scoped and have no streak concept; completion is an
/// idempotent flag write.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{dates, Task, TaskId};
use crate::ops::habits::parse_reminder_str;
use crate::storage::Store;
use crate::TrackerError;

/// Parameters for creating a new task
#[derive(Debug, Deserialize)]
pub struct CreateTaskParams {
    pub name: String,
    /// The task's day; defaults to today and never changes afterwards
    pub date: Option<NaiveDate>,
    /// "HH:MM", omitted for no reminder
    pub reminder_time: Option<String>,
}

/// List today's tasks in insertion order
pub fn list_tasks_today<S: Store>(store: &S) -> Result<Vec<Task>, TrackerError> {
    list_tasks_on(store, dates::today())
}

/// List tasks for a specific day in insertion order
pub fn list_tasks_on<S: Store>(store: &S, date: NaiveDate) -> Result<Vec<Task>, TrackerError> {
    Ok(store.list_tasks_on(date)?)
}

/// Create a new task
pub fn create_task<S: Store>(store: &mut S, params: CreateTaskParams) -> Result<Task, TrackerError> {
    let reminder_time = parse_reminder_str(params.reminder_time.as_deref())?;
    let date = params.date.unwrap_or_else(dates::today);
    let task = Task::new(params.name, date, reminder_time)?;

    store.insert_task(&task)?;
    tracing::info!("created task '{}' for {}", task.name, task.date);
    Ok(task)
}

/// Mark a task done; calling on an already-done task is a no-op
pub fn complete_task<S: Store>(store: &mut S, id: TaskId) -> Result<Task, TrackerError> {
    store.set_task_done(id, true)?;
    Ok(store.get_task(id)?)
}

/// Mark a task not done; idempotent
pub fn uncomplete_task<S: Store>(store: &mut S, id: TaskId) -> Result<Task, TrackerError> {
    store.set_task_done(id, false)?;
    Ok(store.get_task(id)?)
}

/// Delete a task permanently
pub fn delete_task<S: Store>(store: &mut S, id: TaskId) -> Result<(), TrackerError> {
    store.delete_task(id)?;
    tracing::info!("deleted task {}", id);
    Ok(())
}
