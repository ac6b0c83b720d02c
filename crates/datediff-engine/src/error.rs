//! Error types for date difference calculations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    #[error("Invalid start date format. Use a valid datetime format (e.g., \"2023-01-01T00:00:00+00:00\").")]
    InvalidStartDate,

    #[error("Invalid end date format. Use a valid datetime format (e.g., \"2023-01-01T00:00:00+00:00\").")]
    InvalidEndDate,

    #[error("Invalid calculation type. Allowed types are: days, weekdays, weeks, seconds, minutes, hours, years.")]
    InvalidCalculationType,

    #[error("End date must be greater than or equal to start date.")]
    EndBeforeStart,

    /// The calendar arithmetic itself failed on inputs that already passed
    /// validation. Not caused by the caller.
    #[error("Calendar error: {0}")]
    Calendar(String),
}

impl DiffError {
    /// Whether this error was caused by the caller's input.
    ///
    /// Transport adapters map these to client errors; everything else is an
    /// internal failure.
    pub fn is_validation(&self) -> bool {
        !matches!(self, DiffError::Calendar(_))
    }
}

pub type Result<T> = std::result::Result<T, DiffError>;
