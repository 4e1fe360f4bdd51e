//! Precondition failures reported by the strict store API.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LogError {
    #[error("No food selected for logging")]
    NoFoodSelected,

    #[error("No food log for {0}")]
    DayNotFound(String),

    #[error("Entry {entry_id} not found in the log for {date}")]
    EntryNotFound { date: String, entry_id: String },

    #[error("Invalid date '{0}'. Use YYYY-MM-DD.")]
    InvalidDate(String),
}

pub type LogResult<T> = Result<T, LogError>;
