/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, Task) and the streak
/// engine, along with their validation rules. The completion ledger itself
/// lives in storage; the functions here only compute over it.

pub mod dates;
pub mod habit;
pub mod streak;
pub mod task;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use task::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain validation
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("invalid reminder time: {0}")]
    InvalidReminderTime(String),
}
