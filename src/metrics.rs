//! Leave metrics derived from an employee's grid.
//!
//! Nothing here is persisted: the view is recomputed from the [`Employee`]
//! every time it is read.

use std::fmt;

use crate::Days;
use crate::model::{Employee, LeaveType, Month};

/// Whether annual leave taken stays within the allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaveStatus {
    #[default]
    Normal,
    OverLimit,
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaveStatus::Normal => f.write_str("Normal"),
            LeaveStatus::OverLimit => f.write_str("Over limit"),
        }
    }
}

/// Read-only summary of one employee.
#[derive(Debug, Clone)]
pub struct CalculatedEmployee<'a> {
    pub employee: &'a Employee,
    /// Previous year plus current year allowance.
    pub total_annual_leave: Days,
    pub annual_leave_taken: Days,
    pub total_leave_taken: Days,
    /// Allowance minus annual leave taken; negative once over the limit.
    pub remaining_leave: Days,
    pub status: LeaveStatus,
    leave_type_data: [Days; LeaveType::COUNT],
    monthly_totals: [Days; Month::COUNT],
}

impl CalculatedEmployee<'_> {
    /// Days used of one leave type across the year.
    pub fn leave_type_total(&self, leave_type: LeaveType) -> Days {
        self.leave_type_data[leave_type.index()]
    }

    /// Per-type totals in [`LeaveType::ALL`] order.
    pub fn leave_type_data(&self) -> impl Iterator<Item = (LeaveType, Days)> + '_ {
        LeaveType::ALL
            .into_iter()
            .zip(self.leave_type_data.iter().copied())
    }

    pub fn monthly_total(&self, month: Month) -> Days {
        self.monthly_totals[month.index()]
    }

    /// Days used in each month, January first.
    pub fn monthly_totals(&self) -> &[Days; Month::COUNT] {
        &self.monthly_totals
    }
}

/// Fold every leave entry of `employee` into its summary metrics.
pub fn calculate(employee: &Employee) -> CalculatedEmployee<'_> {
    let mut leave_type_data = [Days::ZERO; LeaveType::COUNT];
    let mut monthly_totals = [Days::ZERO; Month::COUNT];
    let mut annual_leave_taken = Days::ZERO;

    for (month, leave_type, bucket) in employee.leave_by_month.iter() {
        let month_days = bucket.total();
        leave_type_data[leave_type.index()] += month_days;
        if leave_type.is_annual() {
            annual_leave_taken += month_days;
        }
        monthly_totals[month.index()] += month_days;
    }

    let total_leave_taken = leave_type_data.iter().sum();
    let total_annual_leave = employee.previous_year_leave + employee.current_year_leave;
    let remaining_leave = total_annual_leave - annual_leave_taken;
    let status = if remaining_leave.is_negative() {
        LeaveStatus::OverLimit
    } else {
        LeaveStatus::Normal
    };

    CalculatedEmployee {
        employee,
        total_annual_leave,
        annual_leave_taken,
        total_leave_taken,
        remaining_leave,
        status,
        leave_type_data,
        monthly_totals,
    }
}

/// Calculate every employee, keeping those whose name contains `filter`
/// (case-insensitive). An empty filter keeps everyone.
pub fn calculate_all<'a>(
    employees: impl IntoIterator<Item = &'a Employee>,
    filter: &str,
) -> Vec<CalculatedEmployee<'a>> {
    let needle = filter.trim().to_lowercase();
    employees
        .into_iter()
        .filter(|employee| employee.name.to_lowercase().contains(&needle))
        .map(calculate)
        .collect()
}
