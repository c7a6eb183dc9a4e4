/// Demo CLI frontend for the habit tracker core
///
/// The web route layer is a separate component; this binary exercises the
/// same operation contracts from the command line. It sets up logging,
/// resolves the database path, and maps subcommands onto the `Tracker`
/// facade.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use habit_tracker_core::{
    CreateHabitParams, CreateTaskParams, EditHabitParams, HabitId, HabitView, TaskId, Tracker,
    TrackerError,
};

/// Get the default database path with a fallback strategy
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    // Try various locations in order of preference
    let potential_paths = [
        dirs::home_dir().map(|mut p| {
            p.push(".habit_tracker");
            p
        }),
        dirs::data_dir().map(|mut p| {
            p.push("habit_tracker");
            p
        }),
        dirs::config_dir().map(|mut p| {
            p.push("habit_tracker");
            p
        }),
        std::env::current_dir().ok().map(|mut p| {
            p.push(".habit_tracker");
            p
        }),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(potential_path).is_ok() {
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file);
                let mut db_path = potential_path.clone();
                db_path.push("habits.db");
                return Ok(db_path);
            }
        }
    }

    // Last resort: a temporary directory
    let mut temp_path = std::env::temp_dir();
    temp_path.push("habit_tracker");
    std::fs::create_dir_all(&temp_path)?;
    temp_path.push("habits.db");

    tracing::warn!("using temporary directory for database: {}", temp_path.display());
    Ok(temp_path)
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List active habits
    List,
    /// List archived habits
    Archived,
    /// Add a new habit
    Add {
        name: String,
        /// Reminder time as HH:MM
        #[arg(long)]
        remind: Option<String>,
    },
    /// Mark a habit complete for today
    Done { id: String },
    /// Undo today's completion for a habit
    Undo { id: String },
    /// Rename a habit and/or change its reminder
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// New reminder as HH:MM; pass an empty string to clear
        #[arg(long)]
        remind: Option<String>,
    },
    /// Archive a habit
    Archive { id: String },
    /// Unarchive a habit
    Unarchive { id: String },
    /// Delete a habit and its history
    Remove { id: String },
    /// List today's tasks
    Tasks,
    /// Add a task for today
    AddTask {
        name: String,
        #[arg(long)]
        remind: Option<String>,
    },
    /// Mark a task done
    TaskDone { id: String },
    /// Mark a task not done
    TaskUndo { id: String },
    /// Delete a task
    RemoveTask { id: String },
    /// Show today's dashboard summary
    Stats {
        /// Emit the summary as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Show the daily greeting
    Greet,
}

fn parse_habit_id(s: &str) -> Result<HabitId, TrackerError> {
    HabitId::parse(s).map_err(|_| TrackerError::Validation(format!("invalid habit id: {}", s)))
}

fn parse_task_id(s: &str) -> Result<TaskId, TrackerError> {
    TaskId::parse(s).map_err(|_| TrackerError::Validation(format!("invalid task id: {}", s)))
}

fn print_habit(view: &HabitView) {
    let done = if view.done_today { "x" } else { " " };
    let reminder = view
        .reminder_time
        .map(|r| format!("  remind {}", r))
        .unwrap_or_default();
    println!(
        "[{}] {}  (streak {}{}){}  {}",
        done,
        view.name,
        view.streak,
        view.last_done
            .map(|d| format!(", last done {}", d))
            .unwrap_or_default(),
        reminder,
        view.id,
    );
}

fn run(args: Args) -> Result<(), TrackerError> {
    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| TrackerError::Validation(format!("cannot create {}: {}", parent.display(), e)))?;
                }
            }
            path
        }
        None => get_default_database_path()
            .map_err(|e| TrackerError::Validation(format!("cannot resolve database path: {}", e)))?,
    };

    info!("using database at: {}", db_path.display());
    let mut tracker = Tracker::open(db_path)?;

    match args.command {
        Command::List => {
            for view in tracker.habits()? {
                print_habit(&view);
            }
        }
        Command::Archived => {
            for view in tracker.archived_habits()? {
                print_habit(&view);
            }
        }
        Command::Add { name, remind } => {
            let view = tracker.create_habit(CreateHabitParams {
                name,
                reminder_time: remind,
            })?;
            println!("created habit '{}' ({})", view.name, view.id);
        }
        Command::Done { id } => {
            let outcome = tracker.complete_habit(parse_habit_id(&id)?)?;
            println!("{}", outcome.message);
            print_habit(&outcome.habit);
        }
        Command::Undo { id } => {
            let view = tracker.uncomplete_habit(parse_habit_id(&id)?)?;
            print_habit(&view);
        }
        Command::Edit { id, name, remind } => {
            let view = tracker.edit_habit(
                parse_habit_id(&id)?,
                EditHabitParams {
                    name,
                    reminder_time: remind,
                },
            )?;
            print_habit(&view);
        }
        Command::Archive { id } => {
            let view = tracker.archive_habit(parse_habit_id(&id)?)?;
            println!("archived '{}'", view.name);
        }
        Command::Unarchive { id } => {
            let view = tracker.unarchive_habit(parse_habit_id(&id)?)?;
            println!("unarchived '{}'", view.name);
        }
        Command::Remove { id } => {
            tracker.delete_habit(parse_habit_id(&id)?)?;
            println!("deleted habit {}", id);
        }
        Command::Tasks => {
            for task in tracker.tasks_today()? {
                let done = if task.done { "x" } else { " " };
                println!("[{}] {}  {}", done, task.name, task.id);
            }
        }
        Command::AddTask { name, remind } => {
            let task = tracker.create_task(CreateTaskParams {
                name,
                date: None,
                reminder_time: remind,
            })?;
            println!("created task '{}' for {} ({})", task.name, task.date, task.id);
        }
        Command::TaskDone { id } => {
            let task = tracker.complete_task(parse_task_id(&id)?)?;
            println!("done: {}", task.name);
        }
        Command::TaskUndo { id } => {
            let task = tracker.uncomplete_task(parse_task_id(&id)?)?;
            println!("pending: {}", task.name);
        }
        Command::RemoveTask { id } => {
            tracker.delete_task(parse_task_id(&id)?)?;
            println!("deleted task {}", id);
        }
        Command::Stats { json } => {
            let stats = tracker.stats()?;
            if json {
                let rendered = serde_json::to_string_pretty(&stats)
                    .map_err(|e| TrackerError::Validation(format!("cannot render JSON: {}", e)))?;
                println!("{}", rendered);
                return Ok(());
            }
            println!(
                "habits: {}/{} done today ({:.1}%)",
                stats.habits.done_today, stats.habits.total, stats.habits.completion_rate
            );
            println!(
                "tasks:  {}/{} done today ({:.1}%)",
                stats.tasks.done_today, stats.tasks.total_today, stats.tasks.completion_rate
            );
            println!(
                "streaks: best {}, active {}",
                stats.streaks.best_streak, stats.streaks.active_streaks
            );
        }
        Command::Greet => {
            println!("{}", tracker.greeting()?);
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_tracker_core={}", log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(args) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
