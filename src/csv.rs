use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::model::{LeaveDuration, LeaveType, ParseError};
use crate::tracker::Command;

/// Errors that can occur when reading leave rows
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to open leave file: {0}")]
    Open(csv::Error),

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: {source}")]
    Invalid { line: usize, source: ParseError },
}

#[derive(Debug, Deserialize)]
struct InputRow {
    name: String,
    r#type: String,
    date: NaiveDate,
    duration: Option<String>,
}

/// Read leave days from a csv file with header `name,type,date,duration`.
///
/// Each row becomes a [`Command::RecordLeave`]; an empty duration means a
/// full day.
pub fn read_leave(
    path: &Path,
) -> Result<impl Iterator<Item = Result<Command, ImportError>> + use<>, ImportError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(ImportError::Open)?;

    Ok(reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| ImportError::Parse { line, source })?;
            let invalid = |source| ImportError::Invalid { line, source };

            let leave_type = row.r#type.parse::<LeaveType>().map_err(invalid)?;
            let duration = match row.duration.as_deref() {
                None | Some("") => LeaveDuration::Full,
                Some(raw) => raw.parse::<LeaveDuration>().map_err(invalid)?,
            };
            Ok(Command::RecordLeave {
                name: row.name,
                leave_type,
                date: row.date,
                duration,
            })
        }))
}
