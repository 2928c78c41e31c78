use chrono::{Datelike, NaiveDate};

use super::EditError;
use crate::Days;
use crate::model::{Employee, LeaveBucket, LeaveDuration, LeaveType, Month};

/// An employee being edited. Changes reach the store only through an
/// explicit add or update command.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    employee: Employee,
}

impl Draft {
    /// Blank draft for a new employee.
    pub fn new() -> Self {
        Self {
            employee: Employee::new(""),
        }
    }

    /// Draft holding a deep copy of `employee`.
    pub fn edit(employee: &Employee) -> Self {
        Self {
            employee: employee.clone(),
        }
    }

    pub fn employee(&self) -> &Employee {
        &self.employee
    }

    pub fn into_employee(self) -> Employee {
        self.employee
    }

    /// Previous plus current year allowance, before the draft is saved.
    pub fn allowance(&self) -> Days {
        self.employee.previous_year_leave + self.employee.current_year_leave
    }

    /// Set the draft name.
    ///
    /// A name matching an existing employee loads that employee. A name
    /// matching nobody while an existing employee is loaded starts a fresh
    /// draft carrying only the new name.
    pub fn set_name(&mut self, name: &str, existing: &[Employee]) {
        if let Some(found) = existing.iter().find(|e| e.name.trim() == name.trim()) {
            self.employee = found.clone();
        } else if existing.iter().any(|e| e.id == self.employee.id) {
            self.employee = Employee::new(name);
        } else {
            self.employee.name = name.to_string();
        }
    }

    /// Rename the loaded employee, keeping everything else.
    pub fn rename(&mut self, name: &str) {
        self.employee.name = name.to_string();
    }

    pub fn set_allowances(&mut self, previous: Option<Days>, current: Option<Days>, special: Option<Days>) {
        if let Some(previous) = previous {
            self.employee.previous_year_leave = previous;
        }
        if let Some(current) = current {
            self.employee.current_year_leave = current;
        }
        if let Some(special) = special {
            self.employee.special_leave = special;
        }
    }

    /// Start editing the dates of one grid cell of `year`.
    pub fn open_bucket(&self, year: i32, month: Month, leave_type: LeaveType) -> BucketEditor {
        BucketEditor {
            year,
            month,
            leave_type,
            bucket: self.employee.leave_by_month.bucket(month, leave_type).clone(),
            duration: LeaveDuration::default(),
        }
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}

/// Date picker for one (month, leave type) cell of a [`Draft`].
#[derive(Debug, Clone)]
pub struct BucketEditor {
    year: i32,
    month: Month,
    leave_type: LeaveType,
    bucket: LeaveBucket,
    /// Duration given to newly selected dates.
    duration: LeaveDuration,
}

impl BucketEditor {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn leave_type(&self) -> LeaveType {
        self.leave_type
    }

    pub fn bucket(&self) -> &LeaveBucket {
        &self.bucket
    }

    pub fn duration(&self) -> LeaveDuration {
        self.duration
    }

    pub fn set_duration(&mut self, duration: LeaveDuration) {
        self.duration = duration;
    }

    /// Select `date` if unselected, unselect it otherwise.
    ///
    /// Returns `true` when the date was selected.
    pub fn toggle(&mut self, date: NaiveDate) -> Result<bool, EditError> {
        if date.year() != self.year {
            return Err(EditError::DateOutsideYear {
                date,
                year: self.year,
            });
        }
        if Month::of(date) != self.month {
            return Err(EditError::DateOutsideMonth {
                date,
                month: self.month,
            });
        }
        Ok(self.bucket.toggle(date, self.duration))
    }

    /// Sort the selection by date and write it into `draft`.
    pub fn save(mut self, draft: &mut Draft) {
        self.bucket.sort_by_date();
        draft
            .employee
            .leave_by_month
            .set_bucket(self.month, self.leave_type, self.bucket);
    }
}
