/// Database migration management
///
/// This module handles creating and updating the SQLite schema. It ensures
/// the database has the habits, tasks, and completion-ledger tables along
/// with the indexes the common queries rely on.

use rusqlite::Connection;

use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// Creates all required tables and indexes if they don't exist and records
/// the schema version for future migrations. Safe to call repeatedly.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;

    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

/// Get the current database schema version
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get::<_, i32>(0)
        })
        .unwrap_or(0); // No version record means a fresh database

    Ok(version)
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    // Future migrations would go here:
    // if from_version < 2 {
    //     migration_v2(conn)?;
    // }

    Ok(())
}

/// Migration to version 1: Create initial tables
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            streak INTEGER NOT NULL DEFAULT 0,
            last_done TEXT,
            archived INTEGER NOT NULL DEFAULT 0,
            reminder_time TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            date TEXT NOT NULL,
            done INTEGER NOT NULL DEFAULT 0,
            reminder_time TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    // Completion ledger: at most one entry per habit per calendar day.
    // The composite primary key enforces the per-day uniqueness invariant
    // even under concurrent completion attempts.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS habit_completions (
            habit_id TEXT NOT NULL,
            date TEXT NOT NULL,
            logged_at TEXT NOT NULL,
            PRIMARY KEY (habit_id, date),
            FOREIGN KEY (habit_id) REFERENCES habits (id) ON DELETE CASCADE
        )",
        [],
    )?;

    create_indexes_v1(conn)?;

    tracing::info!("Applied migration v1: created initial database schema");
    Ok(())
}

/// Create database indexes for version 1
fn create_indexes_v1(conn: &Connection) -> Result<(), StorageError> {
    // Daily stats count completions across habits for a single date
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habit_completions_date
         ON habit_completions (date)",
        [],
    )?;

    // Task listings are day-scoped
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_tasks_date
         ON tasks (date)",
        [],
    )?;

    // Active/archived listings filter on the flag
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habits_archived
         ON habits (archived)",
        [],
    )?;

    Ok(())
}
