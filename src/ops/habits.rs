/// Habit operations exposed to the route layer
///
/// Each function is one operation contract from the dashboard API: typed
/// input, serializable output, and the Validation / NotFound / InvalidState
/// error set. All figures are derived fresh from the store on every call;
/// nothing is cached across requests.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::coach::{Coach, CoachEvent};
use crate::domain::{dates, streak, Habit, HabitId, ReminderTime};
use crate::storage::{StorageError, Store};
use crate::TrackerError;

/// A habit as the dashboard sees it: entity fields plus the derived
/// `done_today` flag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitView {
    pub id: HabitId,
    pub name: String,
    pub streak: u32,
    pub last_done: Option<NaiveDate>,
    pub done_today: bool,
    pub archived: bool,
    pub reminder_time: Option<ReminderTime>,
    pub created_at: DateTime<Utc>,
}

impl HabitView {
    pub fn from_habit(habit: &Habit, done_today: bool) -> Self {
        Self {
            id: habit.id,
            name: habit.name.clone(),
            streak: habit.streak,
            last_done: habit.last_done,
            done_today,
            archived: habit.archived,
            reminder_time: habit.reminder_time,
            created_at: habit.created_at,
        }
    }

    #[cfg(test)]
    pub fn with_streak(mut self, streak: u32) -> Self {
        self.streak = streak;
        self
    }
}

/// Result of completing a habit: the updated view plus an opaque
/// motivational message
#[derive(Debug, Clone, Serialize)]
pub struct CompletionOutcome {
    pub habit: HabitView,
    pub message: String,
}

/// Parameters for creating a new habit
#[derive(Debug, Deserialize)]
pub struct CreateHabitParams {
    pub name: String,
    /// "HH:MM", omitted for no reminder
    pub reminder_time: Option<String>,
}

/// Parameters for editing a habit
///
/// `None` leaves a field unchanged; an empty `reminder_time` string clears
/// the reminder.
#[derive(Debug, Default, Deserialize)]
pub struct EditHabitParams {
    pub name: Option<String>,
    pub reminder_time: Option<String>,
}

pub(crate) fn parse_reminder_str(value: Option<&str>) -> Result<Option<ReminderTime>, TrackerError> {
    match value {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => Ok(Some(s.parse::<ReminderTime>()?)),
    }
}

fn view<S: Store>(store: &S, habit: &Habit, today: NaiveDate) -> Result<HabitView, TrackerError> {
    let done_today = store.has_completion(habit.id, today)?;
    Ok(HabitView::from_habit(habit, done_today))
}

/// List active habits in insertion order, with today's completion status
pub fn list_habits<S: Store>(store: &S, today: NaiveDate) -> Result<Vec<HabitView>, TrackerError> {
    let habits = store.list_habits(false)?;
    habits.iter().map(|h| view(store, h, today)).collect()
}

/// List archived habits in insertion order
pub fn list_archived_habits<S: Store>(
    store: &S,
    today: NaiveDate,
) -> Result<Vec<HabitView>, TrackerError> {
    let habits = store.list_habits(true)?;
    habits.iter().map(|h| view(store, h, today)).collect()
}

/// Create a new habit with streak 0 and an empty ledger
pub fn create_habit<S: Store>(
    store: &mut S,
    params: CreateHabitParams,
) -> Result<HabitView, TrackerError> {
    let reminder_time = parse_reminder_str(params.reminder_time.as_deref())?;
    let habit = Habit::new(params.name, reminder_time)?;

    if store.find_habit_by_name(&habit.name)?.is_some() {
        return Err(TrackerError::Validation(format!(
            "habit '{}' already exists",
            habit.name
        )));
    }

    store.insert_habit(&habit)?;
    tracing::info!("created habit '{}'", habit.name);
    Ok(HabitView::from_habit(&habit, false))
}

/// Mark a habit complete for today
pub fn complete_habit<S: Store>(
    store: &mut S,
    coach: &dyn Coach,
    id: HabitId,
) -> Result<CompletionOutcome, TrackerError> {
    complete_habit_on(store, coach, id, dates::today())
}

/// Mark a habit complete for a specific day
///
/// Completion is idempotent per day, not per call: if the ledger already
/// holds an entry for (habit, day) the current state is returned unchanged.
/// A streak continues only when the previous completion was the day before;
/// any larger gap (or a future `last_done` from clock skew) restarts the
/// streak at 1 rather than rejecting the completion. Backfilling a day
/// earlier than `last_done` rederives `streak`/`last_done` from the full
/// ledger, so an earlier entry can close a gap without regressing the cache.
pub fn complete_habit_on<S: Store>(
    store: &mut S,
    coach: &dyn Coach,
    id: HabitId,
    day: NaiveDate,
) -> Result<CompletionOutcome, TrackerError> {
    let habit = store.get_habit(id)?;

    if habit.archived {
        return Err(TrackerError::InvalidState(format!(
            "habit '{}' is archived and cannot be completed",
            habit.name
        )));
    }

    if day > dates::today() {
        return Err(TrackerError::Validation(
            "cannot complete a habit for a future date".to_string(),
        ));
    }

    if store.has_completion(id, day)? {
        let message = coach.compose(CoachEvent::HabitCompleted {
            name: &habit.name,
            streak: habit.streak,
        });
        return Ok(CompletionOutcome {
            habit: view(store, &habit, dates::today())?,
            message,
        });
    }

    let (new_streak, new_last_done) = match habit.last_done {
        // Backfill: the run ending at last_done stays authoritative, so the
        // streak must come from the ledger with the new day merged in
        Some(last) if day < last => {
            let mut ledger = store.completion_dates(id)?;
            let pos = ledger.iter().position(|d| *d < day).unwrap_or(ledger.len());
            ledger.insert(pos, day);
            streak::recompute(&ledger)
        }
        _ => (streak::advance(habit.streak, habit.last_done, day), Some(day)),
    };
    // The ledger is non-empty after the insert
    let new_last_done = new_last_done.unwrap_or(day);
    let had_streak = habit.last_done.is_some();

    match store.record_completion(id, day, new_streak, new_last_done) {
        Ok(()) => {}
        // Lost a same-day race: the other writer's completion stands and
        // this call degrades to the idempotent no-op
        Err(StorageError::DuplicateCompletion { .. }) => {
            let current = store.get_habit(id)?;
            let message = coach.compose(CoachEvent::HabitCompleted {
                name: &current.name,
                streak: current.streak,
            });
            return Ok(CompletionOutcome {
                habit: view(store, &current, dates::today())?,
                message,
            });
        }
        Err(e) => return Err(e.into()),
    }

    let mut updated = habit;
    updated.apply_streak(new_streak, Some(new_last_done));

    let event = if new_streak == 1 && had_streak {
        CoachEvent::StreakRestarted { name: &updated.name }
    } else {
        CoachEvent::HabitCompleted {
            name: &updated.name,
            streak: new_streak,
        }
    };
    let message = coach.compose(event);

    tracing::info!("habit '{}' completed on {} (streak {})", updated.name, day, new_streak);
    Ok(CompletionOutcome {
        habit: view(store, &updated, dates::today())?,
        message,
    })
}

/// Undo today's completion for a habit
pub fn uncomplete_habit<S: Store>(store: &mut S, id: HabitId) -> Result<HabitView, TrackerError> {
    uncomplete_habit_on(store, id, dates::today())
}

/// Undo a habit's completion for a specific day
///
/// No-op if the ledger holds no entry for (habit, day). Otherwise the entry
/// is removed and `streak`/`last_done` are recomputed from the remaining
/// ledger dates rather than decremented, so the result is correct even when
/// the removed day was not the terminal day of an unbroken run.
pub fn uncomplete_habit_on<S: Store>(
    store: &mut S,
    id: HabitId,
    day: NaiveDate,
) -> Result<HabitView, TrackerError> {
    let habit = store.get_habit(id)?;

    if !store.has_completion(id, day)? {
        return view(store, &habit, dates::today());
    }

    let remaining: Vec<NaiveDate> = store
        .completion_dates(id)?
        .into_iter()
        .filter(|d| *d != day)
        .collect();
    let (new_streak, new_last_done) = streak::recompute(&remaining);

    store.remove_completion(id, day, new_streak, new_last_done)?;

    let mut updated = habit;
    updated.apply_streak(new_streak, new_last_done);

    tracing::info!("habit '{}' uncompleted on {} (streak {})", updated.name, day, new_streak);
    view(store, &updated, dates::today())
}

/// Update a habit's name and/or reminder time
pub fn edit_habit<S: Store>(
    store: &mut S,
    id: HabitId,
    params: EditHabitParams,
) -> Result<HabitView, TrackerError> {
    let mut habit = store.get_habit(id)?;

    if let Some(name) = params.name {
        if let Some(existing) = store.find_habit_by_name(name.trim())? {
            if existing.id != id {
                return Err(TrackerError::Validation(format!(
                    "habit '{}' already exists",
                    name.trim()
                )));
            }
        }
        habit.rename(name)?;
    }

    if let Some(reminder) = params.reminder_time {
        habit.set_reminder(parse_reminder_str(Some(&reminder))?);
    }

    store.update_habit(&habit)?;
    view(store, &habit, dates::today())
}

/// Set a habit's archival state
///
/// Pure flag toggle: the ledger and streak fields are untouched, so an
/// unarchived habit picks its history back up.
pub fn set_archived<S: Store>(
    store: &mut S,
    id: HabitId,
    archived: bool,
) -> Result<HabitView, TrackerError> {
    let mut habit = store.get_habit(id)?;
    habit.archived = archived;
    store.update_habit(&habit)?;

    tracing::info!(
        "habit '{}' {}",
        habit.name,
        if archived { "archived" } else { "unarchived" }
    );
    view(store, &habit, dates::today())
}

/// Delete a habit and all of its ledger entries. Irreversible.
pub fn delete_habit<S: Store>(store: &mut S, id: HabitId) -> Result<(), TrackerError> {
    store.delete_habit(id)?;
    tracing::info!("deleted habit {}", id);
    Ok(())
}
