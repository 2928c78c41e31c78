//! Core domain types for the leave tracker.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

use crate::Days;

/// Employee identifier.
pub type EmployeeId = Uuid;

/// Errors raised when turning user input into model values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("month {0} is out of range 1-12")]
    MonthOutOfRange(u32),
    #[error("'{0}' is not a month number")]
    InvalidMonth(String),
    #[error("unknown leave type '{0}'")]
    UnknownLeaveType(String),
    #[error("invalid leave duration '{0}', expected 0.5 or 1.0")]
    InvalidDuration(String),
}

/// Calendar month, 1 through 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(u8);

impl Month {
    pub const COUNT: usize = 12;

    pub fn new(month: u32) -> Result<Self, ParseError> {
        if (1..=12).contains(&month) {
            Ok(Month(month as u8))
        } else {
            Err(ParseError::MonthOutOfRange(month))
        }
    }

    /// Month the given date falls in.
    pub fn of(date: NaiveDate) -> Self {
        Month(date.month() as u8)
    }

    pub fn all() -> impl Iterator<Item = Month> {
        (1..=12).map(Month)
    }

    pub fn number(self) -> u32 {
        self.0 as u32
    }

    /// Zero-based position, used to index monthly tables.
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Month {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let month = raw
            .parse::<u32>()
            .map_err(|_| ParseError::InvalidMonth(raw.to_string()))?;
        Month::new(month)
    }
}

// Months are map keys in the stored grid, so they travel as strings.
impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Category of absence. `Annual` is the one deducted from the allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    Annual,
    Sick,
    Personal,
    Unpaid,
}

impl LeaveType {
    pub const COUNT: usize = 4;
    pub const ALL: [LeaveType; Self::COUNT] = [
        LeaveType::Annual,
        LeaveType::Sick,
        LeaveType::Personal,
        LeaveType::Unpaid,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether usage of this type is deducted from the annual allowance.
    pub fn is_annual(self) -> bool {
        matches!(self, LeaveType::Annual)
    }

    pub fn key(self) -> &'static str {
        match self {
            LeaveType::Annual => "annual",
            LeaveType::Sick => "sick",
            LeaveType::Personal => "personal",
            LeaveType::Unpaid => "unpaid",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LeaveType::Annual => "Annual Leave",
            LeaveType::Sick => "Sick Leave",
            LeaveType::Personal => "Personal Leave",
            LeaveType::Unpaid => "Unpaid Leave",
        }
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LeaveType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        LeaveType::ALL
            .into_iter()
            .find(|lt| lt.key().eq_ignore_ascii_case(needle) || lt.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseError::UnknownLeaveType(needle.to_string()))
    }
}

/// Length of one leave day: half or full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LeaveDuration {
    Half,
    #[default]
    Full,
}

impl LeaveDuration {
    pub fn days(self) -> Days {
        match self {
            LeaveDuration::Half => Days::HALF,
            LeaveDuration::Full => Days::ONE,
        }
    }

    /// Exact match against 0.5 and 1.0, with no rounding.
    pub fn from_float(value: f64) -> Option<Self> {
        if value == 0.5 {
            Some(LeaveDuration::Half)
        } else if value == 1.0 {
            Some(LeaveDuration::Full)
        } else {
            None
        }
    }
}

impl fmt::Display for LeaveDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.days(), f)
    }
}

impl FromStr for LeaveDuration {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        match value.to_ascii_lowercase().as_str() {
            "half" => return Ok(LeaveDuration::Half),
            "full" => return Ok(LeaveDuration::Full),
            _ => {}
        }
        value
            .parse::<f64>()
            .ok()
            .and_then(Self::from_float)
            .ok_or_else(|| ParseError::InvalidDuration(value.to_string()))
    }
}

impl Serialize for LeaveDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.days().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LeaveDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Self::from_float(value).ok_or_else(|| {
            serde::de::Error::custom(ParseError::InvalidDuration(value.to_string()))
        })
    }
}

/// One day (or half day) of leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveEntry {
    pub date: NaiveDate,
    pub duration: LeaveDuration,
}

impl LeaveEntry {
    pub fn new(date: NaiveDate, duration: LeaveDuration) -> Self {
        Self { date, duration }
    }
}

/// Leave entries of one employee for one (month, leave type) cell.
///
/// Dates are unique within a bucket; the editing operations keep it that way.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeaveBucket {
    #[serde(default)]
    dates: Vec<LeaveEntry>,
}

impl LeaveBucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LeaveEntry] {
        &self.dates
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.iter().any(|entry| entry.date == date)
    }

    /// Sum of the entry durations.
    pub fn total(&self) -> Days {
        self.dates.iter().map(|entry| entry.duration.days()).sum()
    }

    /// Remove the entry for `date` if there is one, otherwise append it.
    ///
    /// Returns `true` when the date was added.
    pub fn toggle(&mut self, date: NaiveDate, duration: LeaveDuration) -> bool {
        if let Some(pos) = self.dates.iter().position(|entry| entry.date == date) {
            self.dates.remove(pos);
            false
        } else {
            self.dates.push(LeaveEntry::new(date, duration));
            true
        }
    }

    /// Set `date` to `duration`, inserting or overwriting, and keep the bucket sorted.
    pub fn record(&mut self, date: NaiveDate, duration: LeaveDuration) {
        match self.dates.iter_mut().find(|entry| entry.date == date) {
            Some(entry) => entry.duration = duration,
            None => {
                self.dates.push(LeaveEntry::new(date, duration));
                self.sort_by_date();
            }
        }
    }

    pub fn sort_by_date(&mut self) {
        self.dates.sort_by_key(|entry| entry.date);
    }
}

/// Serialized shape of [`LeaveGrid`]: month number → leave type → bucket.
type GridRepr = BTreeMap<Month, BTreeMap<LeaveType, LeaveBucket>>;

/// Fixed 12 × [`LeaveType::COUNT`] table of leave buckets.
///
/// Every cell exists from construction on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "GridRepr", from = "GridRepr")]
pub struct LeaveGrid {
    cells: [[LeaveBucket; LeaveType::COUNT]; Month::COUNT],
}

impl LeaveGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket(&self, month: Month, leave_type: LeaveType) -> &LeaveBucket {
        &self.cells[month.index()][leave_type.index()]
    }

    pub fn bucket_mut(&mut self, month: Month, leave_type: LeaveType) -> &mut LeaveBucket {
        &mut self.cells[month.index()][leave_type.index()]
    }

    pub fn set_bucket(&mut self, month: Month, leave_type: LeaveType, bucket: LeaveBucket) {
        self.cells[month.index()][leave_type.index()] = bucket;
    }

    /// Buckets of one month, in [`LeaveType::ALL`] order.
    pub fn month(&self, month: Month) -> impl Iterator<Item = (LeaveType, &LeaveBucket)> {
        LeaveType::ALL
            .into_iter()
            .zip(self.cells[month.index()].iter())
    }

    /// Every cell, month-major.
    pub fn iter(&self) -> impl Iterator<Item = (Month, LeaveType, &LeaveBucket)> {
        Month::all().flat_map(move |month| {
            self.month(month)
                .map(move |(leave_type, bucket)| (month, leave_type, bucket))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, _, bucket)| bucket.is_empty())
    }
}

impl From<LeaveGrid> for GridRepr {
    fn from(grid: LeaveGrid) -> Self {
        Month::all()
            .zip(grid.cells)
            .map(|(month, row)| (month, LeaveType::ALL.into_iter().zip(row).collect()))
            .collect()
    }
}

impl From<GridRepr> for LeaveGrid {
    fn from(repr: GridRepr) -> Self {
        let mut grid = LeaveGrid::new();
        for (month, row) in repr {
            for (leave_type, bucket) in row {
                grid.set_bucket(month, leave_type, bucket);
            }
        }
        grid
    }
}

/// An employee with their allowances and recorded leave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    /// Annual leave carried over from last year.
    #[serde(default)]
    pub previous_year_leave: Days,
    /// Annual leave granted for this year.
    #[serde(default)]
    pub current_year_leave: Days,
    /// Paid statutory leave, capped by settings.
    #[serde(default)]
    pub special_leave: Days,
    #[serde(default)]
    pub leave_by_month: LeaveGrid,
}

impl Employee {
    /// Create an employee with a fresh id, zero allowances and an empty grid.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            previous_year_leave: Days::ZERO,
            current_year_leave: Days::ZERO,
            special_leave: Days::ZERO,
            leave_by_month: LeaveGrid::new(),
        }
    }

    pub fn with_allowances(mut self, previous: Days, current: Days, special: Days) -> Self {
        self.previous_year_leave = previous;
        self.current_year_leave = current;
        self.special_leave = special;
        self
    }
}
