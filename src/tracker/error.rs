//! Error types for tracker commands.

use chrono::NaiveDate;
use thiserror::Error;

use crate::Days;
use crate::model::{EmployeeId, Month};

/// Top-level error returned by [`Tracker::apply`](super::Tracker::apply) and
/// the other tracker operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Target(#[from] TargetError),

    #[error("edit rejected: {0}")]
    Edit(#[from] EditError),

    #[error("not logged in, run `login` first")]
    NotLoggedIn,

    #[error("invalid username or password")]
    InvalidCredentials,
}

/// Draft refused before touching the store.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("employee name is required")]
    EmptyName,

    #[error("employee '{0}' already exists, update it instead")]
    DuplicateName(String),

    #[error("{0} must not be negative, got {1}")]
    NegativeAllowance(&'static str, Days),

    #[error("{0} {1} exceeds the maximum of {2} days")]
    AllowanceTooLarge(&'static str, Days, Days),

    #[error("special leave {0} exceeds the limit of {1} days")]
    SpecialLeaveOverCap(Days, Days),
}

/// Update or delete without a record to act on.
#[derive(Debug, Error, PartialEq)]
pub enum TargetError {
    #[error("employee {0} not found")]
    NotFound(EmployeeId),

    #[error("no employee named '{0}'")]
    UnknownName(String),
}

/// Error during a date-toggle edit.
#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("{date} is not in month {month}")]
    DateOutsideMonth { date: NaiveDate, month: Month },

    #[error("{date} is not in the tracked year {year}")]
    DateOutsideYear { date: NaiveDate, year: i32 },
}
