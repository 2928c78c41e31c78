//! Runtime settings.
//!
//! Built-in defaults, overridden by an optional TOML file, overridden by
//! `LEAVE_TRACKER_*` environment variables.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};
use serde::Deserialize;
use thiserror::Error;

use crate::Days;

/// Default settings file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "leave-tracker.toml";

/// Prefix of the environment variables that override settings.
pub const ENV_PREFIX: &str = "LEAVE_TRACKER";

#[derive(Debug, Error)]
#[error("invalid settings: {0}")]
pub struct SettingsError(#[from] config::ConfigError);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the persisted state files.
    pub data_dir: PathBuf,
    /// Calendar year the leave grids hold; dates outside it are refused.
    pub year: i32,
    /// Upper bound for an employee's special leave.
    pub special_leave_cap: Days,
    /// Default destination of the spreadsheet export.
    pub export_path: PathBuf,
    /// Title merged across the first row of the export.
    pub report_title: String,
    pub sheet_name: String,
    /// Operator credentials for the login gate. Not a security boundary.
    pub username: String,
    pub password: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".leave-tracker"),
            year: Local::now().year(),
            special_leave_cap: Days::whole(14),
            export_path: PathBuf::from("leave_report.xlsx"),
            report_title: "ANNUAL LEAVE TRACKING".to_string(),
            sheet_name: "Leave Report".to_string(),
            username: "admin".to_string(),
            password: "admin".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `file` (optional on disk) and the environment.
    pub fn load(file: Option<&Path>) -> Result<Self, SettingsError> {
        let file = file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        let settings = config::Config::builder()
            .add_source(config::File::from(file).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
