//! Application state and command processing.
//!
//! The tracker owns the leave record store, the operator preferences and the
//! settings. Every mutation is a [`Command`] that is validated, applied to the
//! store (which persists the whole collection) and logged. Also supports an
//! async stream of commands.

use chrono::{Datelike, NaiveDate};
use tokio_stream::{Stream, StreamExt};
use tracing::info;
use uuid::Uuid;

use crate::Days;
use crate::config::Settings;
use crate::metrics::{self, CalculatedEmployee};
use crate::model::{Employee, EmployeeId, LeaveDuration, LeaveType, Month};
use crate::store::{LeaveStore, Preferences, Storage, Theme};

mod draft;
pub use draft::{BucketEditor, Draft};

mod error;
pub use error::{EditError, TargetError, TrackerError, ValidationError};

/// Hint text of the empty name field; never accepted as a name.
pub const PLACEHOLDER_NAME: &str = "Employee name";

/// Upper bound for any single allowance.
pub const MAX_ALLOWANCE: Days = Days::whole(366);

/// A mutation of the leave records.
#[derive(Debug, Clone)]
pub enum Command {
    /// Store a new employee; a fresh id is assigned.
    AddEmployee(Employee),
    /// Replace the stored employee with the same id.
    UpdateEmployee(Employee),
    DeleteEmployee { id: EmployeeId },
    /// Select `date` if unselected, unselect it otherwise.
    ToggleLeave {
        name: String,
        leave_type: LeaveType,
        date: NaiveDate,
        duration: LeaveDuration,
    },
    /// Set `date` to `duration`, whether or not it was already recorded.
    RecordLeave {
        name: String,
        leave_type: LeaveType,
        date: NaiveDate,
        duration: LeaveDuration,
    },
}

impl Command {
    fn kind(&self) -> &'static str {
        match self {
            Command::AddEmployee(_) => "add",
            Command::UpdateEmployee(_) => "update",
            Command::DeleteEmployee { .. } => "delete",
            Command::ToggleLeave { .. } => "toggle",
            Command::RecordLeave { .. } => "record",
        }
    }

    fn subject(&self) -> String {
        match self {
            Command::AddEmployee(e) | Command::UpdateEmployee(e) => e.name.clone(),
            Command::DeleteEmployee { id } => id.to_string(),
            Command::ToggleLeave { name, .. } | Command::RecordLeave { name, .. } => name.clone(),
        }
    }
}

/// The leave tracker.
pub struct Tracker<S> {
    store: LeaveStore<S>,
    preferences: Preferences,
    settings: Settings,
}

/// Public API
impl<S: Storage> Tracker<S> {
    /// Load every persisted value from `storage`.
    pub fn open(storage: S, settings: Settings) -> Self {
        let preferences = Preferences::load(&storage);
        let store = LeaveStore::load(storage);
        Self {
            store,
            preferences,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn employees(&self) -> &[Employee] {
        self.store.list()
    }

    pub fn store(&self) -> &LeaveStore<S> {
        &self.store
    }

    /// Metrics of every employee whose name contains `filter`.
    pub fn calculated(&self, filter: &str) -> Vec<CalculatedEmployee<'_>> {
        metrics::calculate_all(self.store.list(), filter)
    }

    /// Draft preloaded with the employee named `name`, for editing.
    pub fn select(&self, name: &str) -> Result<Draft, TargetError> {
        self.store
            .find_by_name(name)
            .map(Draft::edit)
            .ok_or_else(|| TargetError::UnknownName(name.trim().to_string()))
    }

    /// Placeholder gate: a literal match against the configured credentials.
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), TrackerError> {
        if username != self.settings.username || password != self.settings.password {
            info!(username, "login refused");
            return Err(TrackerError::InvalidCredentials);
        }
        self.preferences
            .set_logged_in(self.store.storage_mut(), true);
        info!(username, "logged in");
        Ok(())
    }

    pub fn logout(&mut self) {
        self.preferences
            .set_logged_in(self.store.storage_mut(), false);
        info!("logged out");
    }

    pub fn require_login(&self) -> Result<(), TrackerError> {
        if self.preferences.logged_in {
            Ok(())
        } else {
            Err(TrackerError::NotLoggedIn)
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.preferences.set_theme(self.store.storage_mut(), theme);
    }

    /// Run the tracker with the given command stream
    pub async fn run(&mut self, mut stream: impl Stream<Item = Command> + Unpin) {
        while let Some(command) = stream.next().await {
            // a failed command never stops the stream, the outcome is logged by `apply`
            let _ = self.apply(command);
        }
    }

    /// Apply a single command on top of the current state
    pub fn apply(&mut self, command: Command) -> Result<(), TrackerError> {
        let kind = command.kind();
        let subject = command.subject();
        let result = match command {
            Command::AddEmployee(employee) => self.apply_add(employee),
            Command::UpdateEmployee(employee) => self.apply_update(employee),
            Command::DeleteEmployee { id } => self.apply_delete(id),
            Command::ToggleLeave {
                name,
                leave_type,
                date,
                duration,
            } => self.apply_toggle(&name, leave_type, date, duration),
            Command::RecordLeave {
                name,
                leave_type,
                date,
                duration,
            } => self.apply_record(&name, leave_type, date, duration),
        };
        Self::log_result(kind, &subject, &result);
        result
    }
}

/// Private API
impl<S: Storage> Tracker<S> {
    /// Small helper to log `apply` results
    fn log_result<E: std::fmt::Display>(kind: &str, subject: &str, result: &Result<(), E>) {
        match result {
            Ok(()) => info!(employee = %subject, "{kind} applied"),
            Err(e) => info!(employee = %subject, reason = %e, "{kind} skipped"),
        }
    }

    /// Check the fields shared by add and update:
    /// - Name is present and not the placeholder
    /// - No other employee (`except` excluded) carries the name
    /// - Allowances are within 0..=366 days and special leave is within the cap
    fn validate(&self, employee: &Employee, except: Option<EmployeeId>) -> Result<(), ValidationError> {
        let name = employee.name.trim();
        if name.is_empty() || name == PLACEHOLDER_NAME {
            return Err(ValidationError::EmptyName);
        }

        let taken = self
            .store
            .list()
            .iter()
            .any(|e| Some(e.id) != except && e.name.trim() == name);
        if taken {
            return Err(ValidationError::DuplicateName(name.to_string()));
        }

        for (field, value) in [
            ("previous year leave", employee.previous_year_leave),
            ("current year leave", employee.current_year_leave),
            ("special leave", employee.special_leave),
        ] {
            if value.is_negative() {
                return Err(ValidationError::NegativeAllowance(field, value));
            }
            if value > MAX_ALLOWANCE {
                return Err(ValidationError::AllowanceTooLarge(field, value, MAX_ALLOWANCE));
            }
        }

        let cap = self.settings.special_leave_cap;
        if employee.special_leave > cap {
            return Err(ValidationError::SpecialLeaveOverCap(employee.special_leave, cap));
        }

        Ok(())
    }

    /// Apply a `Command::AddEmployee`:
    /// - Validate the draft
    /// - Store it under a fresh id with its name trimmed
    fn apply_add(&mut self, employee: Employee) -> Result<(), TrackerError> {
        self.validate(&employee, None)?;
        let name = employee.name.trim().to_string();
        self.store.add(Employee {
            id: Uuid::new_v4(),
            name,
            ..employee
        });
        Ok(())
    }

    /// Apply a `Command::UpdateEmployee`:
    /// - Ensure the target exists
    /// - Validate the draft against every other employee
    /// - Replace the stored record wholesale
    fn apply_update(&mut self, employee: Employee) -> Result<(), TrackerError> {
        let id = employee.id;
        if self.store.get(id).is_none() {
            return Err(TargetError::NotFound(id).into());
        }
        self.validate(&employee, Some(id))?;
        let name = employee.name.trim().to_string();
        self.store.replace(id, Employee { name, ..employee });
        Ok(())
    }

    fn apply_delete(&mut self, id: EmployeeId) -> Result<(), TrackerError> {
        self.store
            .remove(id)
            .map(|_| ())
            .ok_or(TargetError::NotFound(id).into())
    }

    /// Apply a `Command::ToggleLeave` the way the form does it: open the cell
    /// of `date` in a draft, toggle, save the cell, then update the employee.
    fn apply_toggle(
        &mut self,
        name: &str,
        leave_type: LeaveType,
        date: NaiveDate,
        duration: LeaveDuration,
    ) -> Result<(), TrackerError> {
        let mut draft = self.select(name)?;
        let mut editor = draft.open_bucket(self.settings.year, Month::of(date), leave_type);
        editor.set_duration(duration);
        editor.toggle(date)?;
        editor.save(&mut draft);
        self.apply_update(draft.into_employee())
    }

    fn apply_record(
        &mut self,
        name: &str,
        leave_type: LeaveType,
        date: NaiveDate,
        duration: LeaveDuration,
    ) -> Result<(), TrackerError> {
        let year = self.settings.year;
        if date.year() != year {
            return Err(EditError::DateOutsideYear { date, year }.into());
        }
        let mut employee = self.select(name)?.into_employee();
        employee
            .leave_by_month
            .bucket_mut(Month::of(date), leave_type)
            .record(date, duration);
        self.apply_update(employee)
    }
}

impl<S: Storage + Default> Default for Tracker<S> {
    fn default() -> Self {
        Self::open(S::default(), Settings::default())
    }
}
