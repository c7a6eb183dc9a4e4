/// SQLite implementation of the store interface
///
/// This module provides the concrete SQLite implementation for persisting
/// habits, tasks, and the completion ledger. Dates are stored as ISO-8601
/// text; the (habit_id, date) primary key on the ledger table backs the
/// per-day idempotence rule.

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, ErrorCode, Row};

use crate::domain::{Habit, HabitId, ReminderTime, Task, TaskId};
use crate::storage::{migrations, StorageError, Store};

/// SQLite-backed storage
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file and run pending migrations
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("failed to open database: {}", e)))?;

        Self::initialize(conn, Some(&db_path))
    }

    /// In-memory database, used by tests
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("failed to open database: {}", e)))?;

        Self::initialize(conn, None)
    }

    fn initialize(conn: Connection, db_path: Option<&PathBuf>) -> Result<Self, StorageError> {
        // Ledger cascade on habit deletion relies on foreign keys being on
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        match db_path {
            Some(path) => tracing::info!("SQLite store initialized at: {:?}", path),
            None => tracing::debug!("in-memory SQLite store initialized"),
        }

        Ok(Self { conn })
    }

    fn map_habit_row(row: &Row<'_>) -> Result<Habit, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = HabitId::parse(&id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let reminder_str: Option<String> = row.get(5)?;
        let reminder_time = reminder_str
            .map(|s| {
                s.parse::<ReminderTime>().map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        5,
                        "invalid reminder time".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })
            })
            .transpose()?;

        let created_at_str: String = row.get(6)?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|_| {
                rusqlite::Error::InvalidColumnType(
                    6,
                    "invalid datetime".to_string(),
                    rusqlite::types::Type::Text,
                )
            })?
            .with_timezone(&Utc);

        Ok(Habit::from_existing(
            id,
            row.get(1)?, // name
            row.get(2)?, // streak
            row.get(3)?, // last_done
            row.get(4)?, // archived
            reminder_time,
            created_at,
        ))
    }

    fn map_task_row(row: &Row<'_>) -> Result<Task, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = TaskId::parse(&id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let reminder_str: Option<String> = row.get(4)?;
        let reminder_time = reminder_str
            .map(|s| {
                s.parse::<ReminderTime>().map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        4,
                        "invalid reminder time".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })
            })
            .transpose()?;

        let created_at_str: String = row.get(5)?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|_| {
                rusqlite::Error::InvalidColumnType(
                    5,
                    "invalid datetime".to_string(),
                    rusqlite::types::Type::Text,
                )
            })?
            .with_timezone(&Utc);

        Ok(Task::from_existing(
            id,
            row.get(1)?, // name
            row.get(2)?, // date
            row.get(3)?, // done
            reminder_time,
            created_at,
        ))
    }

    fn is_unique_violation(err: &rusqlite::Error) -> bool {
        matches!(
            err,
            rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
        )
    }
}

const HABIT_COLUMNS: &str = "id, name, streak, last_done, archived, reminder_time, created_at";
const TASK_COLUMNS: &str = "id, name, date, done, reminder_time, created_at";

impl Store for SqliteStore {
    fn insert_habit(&mut self, habit: &Habit) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO habits (id, name, streak, last_done, archived, reminder_time, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                habit.id.to_string(),
                habit.name,
                habit.streak,
                habit.last_done,
                habit.archived,
                habit.reminder_time.map(|r| r.to_string()),
                habit.created_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!("created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn get_habit(&self, id: HabitId) -> Result<Habit, StorageError> {
        let sql = format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS);
        let result = self
            .conn
            .query_row(&sql, params![id.to_string()], Self::map_habit_row);

        match result {
            Ok(habit) => Ok(habit),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::HabitNotFound {
                habit_id: id.to_string(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn find_habit_by_name(&self, name: &str) -> Result<Option<Habit>, StorageError> {
        let sql = format!(
            "SELECT {} FROM habits WHERE LOWER(name) = LOWER(?1)",
            HABIT_COLUMNS
        );
        let result = self.conn.query_row(&sql, params![name], Self::map_habit_row);

        match result {
            Ok(habit) => Ok(Some(habit)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn update_habit(&mut self, habit: &Habit) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET name = ?2, streak = ?3, last_done = ?4, archived = ?5, reminder_time = ?6
             WHERE id = ?1",
            params![
                habit.id.to_string(),
                habit.name,
                habit.streak,
                habit.last_done,
                habit.archived,
                habit.reminder_time.map(|r| r.to_string()),
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        tracing::debug!("updated habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn list_habits(&self, archived: bool) -> Result<Vec<Habit>, StorageError> {
        let sql = format!(
            "SELECT {} FROM habits WHERE archived = ?1 ORDER BY created_at ASC, id ASC",
            HABIT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let habit_iter = stmt.query_map(params![archived], Self::map_habit_row)?;

        let mut habits = Vec::new();
        for habit in habit_iter {
            habits.push(habit?);
        }

        Ok(habits)
    }

    fn delete_habit(&mut self, id: HabitId) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;

        // Explicit ledger delete alongside the FK cascade keeps the history
        // removal visible in one place
        tx.execute(
            "DELETE FROM habit_completions WHERE habit_id = ?1",
            params![id.to_string()],
        )?;

        let rows_affected = tx.execute("DELETE FROM habits WHERE id = ?1", params![id.to_string()])?;
        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: id.to_string(),
            });
        }

        tx.commit()?;
        tracing::debug!("deleted habit and its ledger entries: {}", id);
        Ok(())
    }

    fn has_completion(&self, id: HabitId, date: NaiveDate) -> Result<bool, StorageError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM habit_completions WHERE habit_id = ?1 AND date = ?2",
            params![id.to_string(), date],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn completion_dates(&self, id: HabitId) -> Result<Vec<NaiveDate>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT date FROM habit_completions WHERE habit_id = ?1 ORDER BY date DESC",
        )?;
        let date_iter = stmt.query_map(params![id.to_string()], |row| row.get(0))?;

        let mut dates = Vec::new();
        for date in date_iter {
            dates.push(date?);
        }

        Ok(dates)
    }

    fn record_completion(
        &mut self,
        id: HabitId,
        date: NaiveDate,
        streak: u32,
        last_done: NaiveDate,
    ) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;

        let inserted = tx.execute(
            "INSERT INTO habit_completions (habit_id, date, logged_at) VALUES (?1, ?2, ?3)",
            params![id.to_string(), date, Utc::now().to_rfc3339()],
        );

        if let Err(e) = inserted {
            // A concurrent completion for the same day hits the primary key;
            // the caller folds this into the idempotent no-op path
            if Self::is_unique_violation(&e) {
                return Err(StorageError::DuplicateCompletion {
                    habit_id: id.to_string(),
                    date,
                });
            }
            return Err(StorageError::Query(e));
        }

        let rows_affected = tx.execute(
            "UPDATE habits SET streak = ?2, last_done = ?3 WHERE id = ?1",
            params![id.to_string(), streak, last_done],
        )?;
        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: id.to_string(),
            });
        }

        tx.commit()?;
        tracing::debug!("recorded completion for habit {} on {} (streak {})", id, date, streak);
        Ok(())
    }

    fn remove_completion(
        &mut self,
        id: HabitId,
        date: NaiveDate,
        streak: u32,
        last_done: Option<NaiveDate>,
    ) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "DELETE FROM habit_completions WHERE habit_id = ?1 AND date = ?2",
            params![id.to_string(), date],
        )?;

        let rows_affected = tx.execute(
            "UPDATE habits SET streak = ?2, last_done = ?3 WHERE id = ?1",
            params![id.to_string(), streak, last_done],
        )?;
        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: id.to_string(),
            });
        }

        tx.commit()?;
        tracing::debug!("removed completion for habit {} on {} (streak {})", id, date, streak);
        Ok(())
    }

    fn insert_task(&mut self, task: &Task) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO tasks (id, name, date, done, reminder_time, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                task.id.to_string(),
                task.name,
                task.date,
                task.done,
                task.reminder_time.map(|r| r.to_string()),
                task.created_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!("created task: {} ({})", task.name, task.id);
        Ok(())
    }

    fn get_task(&self, id: TaskId) -> Result<Task, StorageError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS);
        let result = self
            .conn
            .query_row(&sql, params![id.to_string()], Self::map_task_row);

        match result {
            Ok(task) => Ok(task),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::TaskNotFound {
                task_id: id.to_string(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn list_tasks_on(&self, date: NaiveDate) -> Result<Vec<Task>, StorageError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE date = ?1 ORDER BY created_at ASC, id ASC",
            TASK_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let task_iter = stmt.query_map(params![date], Self::map_task_row)?;

        let mut tasks = Vec::new();
        for task in task_iter {
            tasks.push(task?);
        }

        Ok(tasks)
    }

    fn set_task_done(&mut self, id: TaskId, done: bool) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE tasks SET done = ?2 WHERE id = ?1",
            params![id.to_string(), done],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::TaskNotFound {
                task_id: id.to_string(),
            });
        }

        Ok(())
    }

    fn delete_task(&mut self, id: TaskId) -> Result<(), StorageError> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id.to_string()])?;

        if rows_affected == 0 {
            return Err(StorageError::TaskNotFound {
                task_id: id.to_string(),
            });
        }

        tracing::debug!("deleted task: {}", id);
        Ok(())
    }
}
