//! `leave-tracker` — record employee leave and report leave balances.
//!
//! # Usage
//!
//! ```text
//! leave-tracker login --username admin --password admin
//! leave-tracker add --name "Lan" --previous 5 --current 12
//! leave-tracker toggle --name "Lan" --type annual --date 2026-02-03 --half
//! leave-tracker report
//! leave-tracker export --output leave_report.xlsx
//! ```

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use leave_tracker::config::Settings;
use leave_tracker::csv::read_leave;
use leave_tracker::export::{ExportOptions, write_xlsx};
use leave_tracker::report::{MonthDetails, Report};
use leave_tracker::store::{FileStorage, Theme};
use leave_tracker::tracker::Draft;
use leave_tracker::{Command, Days, LeaveDuration, LeaveType, Month, Tracker};
use tokio_stream::wrappers::ReceiverStream;
use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "leave-tracker", version, about = "Employee leave tracker")]
struct Cli {
    /// Path to a TOML settings file (default: leave-tracker.toml).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Unlock the data commands.
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    Logout,
    /// Show the theme, or set it to light, dark or toggle.
    Theme { value: Option<String> },
    /// Add a new employee.
    Add {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        allowances: AllowanceArgs,
    },
    /// Update the employee with the given name.
    Update {
        #[arg(long)]
        name: String,
        #[arg(long, value_name = "NAME")]
        rename: Option<String>,
        #[command(flatten)]
        allowances: AllowanceArgs,
    },
    Delete {
        #[arg(long)]
        name: String,
    },
    /// Select a leave day, or unselect it if already recorded.
    Toggle {
        #[arg(long)]
        name: String,
        #[arg(long = "type", value_name = "TYPE")]
        leave_type: LeaveType,
        #[arg(long)]
        date: NaiveDate,
        /// Record half a day instead of a full day.
        #[arg(long)]
        half: bool,
    },
    /// Print the leave report as csv.
    Report {
        /// Only employees whose name contains this text.
        #[arg(long, default_value = "")]
        filter: String,
    },
    /// Show the leave days of one employee in one month.
    Details {
        #[arg(long)]
        name: String,
        #[arg(long)]
        month: Month,
    },
    /// Write the leave report to a spreadsheet.
    Export {
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Record leave days from a csv file (name,type,date,duration).
    Import { path: PathBuf },
}

#[derive(clap::Args, Debug)]
struct AllowanceArgs {
    /// Leave carried over from last year.
    #[arg(long)]
    previous: Option<Days>,
    /// Leave granted this year.
    #[arg(long)]
    current: Option<Days>,
    #[arg(long)]
    special: Option<Days>,
}

impl Cmd {
    /// Everything but the session and theme commands sits behind the login gate.
    fn needs_login(&self) -> bool {
        !matches!(self, Cmd::Login { .. } | Cmd::Logout | Cmd::Theme { .. })
    }
}

impl AllowanceArgs {
    fn apply_to(&self, draft: &mut Draft) {
        draft.set_allowances(self.previous, self.current, self.special);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    let storage = FileStorage::new(&settings.data_dir);
    let mut tracker = Tracker::open(storage, settings);

    if cli.command.needs_login() {
        tracker.require_login()?;
    }
    run(&mut tracker, cli.command).await
}

async fn run(tracker: &mut Tracker<FileStorage>, command: Cmd) -> Result<()> {
    match command {
        Cmd::Login { username, password } => {
            tracker.login(&username, &password)?;
            println!("Logged in.");
        }
        Cmd::Logout => {
            tracker.logout();
            println!("Logged out.");
        }
        Cmd::Theme { value } => {
            let current = tracker.preferences().theme;
            let theme = match value.as_deref() {
                None => current,
                Some("toggle") => current.toggled(),
                Some(other) => other.parse::<Theme>().map_err(anyhow::Error::msg)?,
            };
            if theme != current {
                tracker.set_theme(theme);
            }
            println!("{theme}");
        }
        Cmd::Add { name, allowances } => {
            let mut draft = Draft::new();
            draft.set_name(&name, tracker.employees());
            allowances.apply_to(&mut draft);
            let allowance = draft.allowance();
            tracker.apply(Command::AddEmployee(draft.into_employee()))?;
            println!("Added employee '{}' (annual allowance {allowance}).", name.trim());
        }
        Cmd::Update {
            name,
            rename,
            allowances,
        } => {
            let mut draft = tracker.select(&name)?;
            if let Some(new_name) = &rename {
                draft.rename(new_name);
            }
            allowances.apply_to(&mut draft);
            let allowance = draft.allowance();
            tracker.apply(Command::UpdateEmployee(draft.into_employee()))?;
            println!("Updated employee '{}' (annual allowance {allowance}).", name.trim());
        }
        Cmd::Delete { name } => {
            let id = tracker.select(&name)?.employee().id;
            tracker.apply(Command::DeleteEmployee { id })?;
            println!("Deleted employee '{}'.", name.trim());
        }
        Cmd::Toggle {
            name,
            leave_type,
            date,
            half,
        } => {
            let duration = if half {
                LeaveDuration::Half
            } else {
                LeaveDuration::Full
            };
            tracker.apply(Command::ToggleLeave {
                name: name.clone(),
                leave_type,
                date,
                duration,
            })?;
            let draft = tracker.select(&name)?;
            let month = Month::of(date);
            let bucket = draft.employee().leave_by_month.bucket(month, leave_type);
            let state = if bucket.contains(date) { "selected" } else { "unselected" };
            println!(
                "{date} {state}; {leave_type} in month {month}: {} days.",
                bucket.total()
            );
        }
        Cmd::Report { filter } => {
            let calculated = tracker.calculated(&filter);
            Report::build(&calculated)
                .write_csv(io::stdout().lock())
                .context("failed to write report")?;
        }
        Cmd::Details { name, month } => {
            let draft = tracker.select(&name)?;
            print!("{}", MonthDetails::new(draft.employee(), month));
        }
        Cmd::Export { output } => {
            let settings = tracker.settings();
            let path = output.unwrap_or_else(|| settings.export_path.clone());
            let options = ExportOptions {
                title: &settings.report_title,
                sheet_name: &settings.sheet_name,
            };
            write_xlsx(&tracker.calculated(""), &options, &path)?;
            println!("Exported leave report to {}.", path.display());
        }
        Cmd::Import { path } => {
            let rows = read_leave(&path)?;
            let (command_sender, command_receiver) = tokio::sync::mpsc::channel(16);

            tokio::spawn(async move {
                for result in rows {
                    match result {
                        Ok(command) => {
                            if command_sender.send(command).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("{e}");
                        }
                    }
                }
            });

            tracker.run(ReceiverStream::new(command_receiver)).await;
            println!("Imported leave from {}.", path.display());
        }
    }
    Ok(())
}
