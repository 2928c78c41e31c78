//! Tabular leave report shared by the CSV listing and the spreadsheet export.

use std::fmt;
use std::io;

use chrono::Datelike;

use crate::Days;
use crate::metrics::CalculatedEmployee;
use crate::model::{Employee, LeaveType, Month};

/// One report cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(Days),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Number(days) => fmt::Display::fmt(days, f),
        }
    }
}

/// Header row plus one row per employee.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Report {
    pub fn build(employees: &[CalculatedEmployee<'_>]) -> Self {
        Self {
            headers: headers(),
            rows: employees.iter().map(row).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of every column in characters: the widest cell plus 2.
    pub fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.to_string().chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
                    + 2
            })
            .collect()
    }

    /// Write the report as csv, header first.
    pub fn write_csv(&self, writer: impl io::Write) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn headers() -> Vec<String> {
    let mut headers: Vec<String> = [
        "Name",
        "Previous Year Leave",
        "Current Year Leave",
        "Total Annual Leave",
        "Special Leave",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    headers.extend(Month::all().map(|m| format!("Month {m}")));
    headers.push("Total Leave Taken".to_string());
    headers.push("Annual Leave Taken".to_string());
    headers.extend(LeaveType::ALL.iter().map(|lt| lt.label().to_string()));
    headers.push("Remaining Leave".to_string());
    headers.push("Status".to_string());
    headers
}

fn row(calc: &CalculatedEmployee<'_>) -> Vec<Cell> {
    let employee = calc.employee;
    let mut row = vec![
        Cell::Text(employee.name.clone()),
        Cell::Number(employee.previous_year_leave),
        Cell::Number(employee.current_year_leave),
        Cell::Number(calc.total_annual_leave),
        Cell::Number(employee.special_leave),
    ];
    row.extend(calc.monthly_totals().iter().copied().map(Cell::Number));
    row.push(Cell::Number(calc.total_leave_taken));
    row.push(Cell::Number(calc.annual_leave_taken));
    row.extend(calc.leave_type_data().map(|(_, days)| Cell::Number(days)));
    row.push(Cell::Number(calc.remaining_leave));
    row.push(Cell::Text(calc.status.to_string()));
    row
}

/// Leave recorded for one employee in one month, grouped by type.
///
/// Renders as `Annual Leave (1.5 days): 3 (1.0), 4 (0.5)`, one line per type
/// that has entries.
pub struct MonthDetails<'a> {
    employee: &'a Employee,
    month: Month,
}

impl<'a> MonthDetails<'a> {
    pub fn new(employee: &'a Employee, month: Month) -> Self {
        Self { employee, month }
    }
}

impl fmt::Display for MonthDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Month {} - {}", self.month, self.employee.name)?;

        let mut any = false;
        for (leave_type, bucket) in self.employee.leave_by_month.month(self.month) {
            if bucket.is_empty() {
                continue;
            }
            any = true;
            let dates: Vec<String> = bucket
                .entries()
                .iter()
                .map(|entry| format!("{} ({})", entry.date.day(), entry.duration))
                .collect();
            writeln!(f, "{leave_type} ({} days): {}", bucket.total(), dates.join(", "))?;
        }

        if !any {
            writeln!(f, "No leave recorded in month {}.", self.month)?;
        }
        Ok(())
    }
}
