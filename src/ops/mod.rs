/// Operation layer for the dashboard route handlers
///
/// These functions are the contracts the (external) route layer calls:
/// habit lifecycle and completion, task lifecycle, and the daily stats
/// summary. They orchestrate the domain logic against a `Store` and never
/// hold state of their own.

pub mod habits;
pub mod stats;
pub mod tasks;

// Re-export operation functions and payload types for easy access
pub use habits::*;
pub use stats::*;
pub use tasks::*;
