use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

/// A scratch working directory with its own data dir.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn logged_in() -> Self {
        let ws = Self::new();
        let (_, stderr, success) = ws.run(&["login", "-u", "admin", "-p", "admin"]);
        assert!(success, "login failed: {stderr}");
        ws
    }

    fn run(&self, args: &[&str]) -> (String, String, bool) {
        let output = Command::new(env!("CARGO_BIN_EXE_leave-tracker"))
            .args(args)
            .current_dir(self.dir.path())
            .env("LEAVE_TRACKER_DATA_DIR", self.dir.path().join("data"))
            .env("LEAVE_TRACKER_YEAR", "2026")
            .env("RUST_LOG", "warn")
            .output()
            .expect("failed to run binary");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        (stdout, stderr, output.status.success())
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn report_line<'a>(stdout: &'a str, name: &str) -> &'a str {
    stdout
        .lines()
        .find(|line| line.starts_with(&format!("{name},")))
        .unwrap_or_else(|| panic!("no report line for {name} in:\n{stdout}"))
}

#[test]
fn data_commands_require_login() {
    let ws = Workspace::new();

    let (_, stderr, success) = ws.run(&["report"]);
    assert!(!success);
    assert!(stderr.contains("not logged in"));

    let (_, stderr, success) = ws.run(&["login", "-u", "admin", "-p", "nope"]);
    assert!(!success);
    assert!(stderr.contains("invalid username or password"));
}

#[test]
fn logout_locks_again() {
    let ws = Workspace::logged_in();
    assert!(ws.run(&["report"]).2);

    let (stdout, _, success) = ws.run(&["logout"]);
    assert!(success);
    assert!(stdout.contains("Logged out."));
    assert!(!ws.run(&["report"]).2);
}

#[test]
fn import_and_toggle_produce_report() {
    let ws = Workspace::logged_in();
    assert!(ws.run(&["add", "--name", "Lan", "--previous", "5", "--current", "7"]).2);
    assert!(ws.run(&["add", "--name", "Binh", "--current", "2"]).2);

    let (stdout, stderr, success) = ws.run(&["import", &format!("{FIXTURES}/leave.csv")]);
    assert!(success, "{stderr}");
    assert!(stdout.contains("Imported leave"));
    assert!(stderr.contains("unknown leave type 'holiday'"));

    for day in ["2026-08-03", "2026-08-04", "2026-08-05"] {
        let (stdout, stderr, success) =
            ws.run(&["toggle", "--name", "Binh", "--type", "annual", "--date", day]);
        assert!(success, "{stderr}");
        assert!(stdout.contains("selected"));
    }

    let (stdout, stderr, success) = ws.run(&["report"]);
    assert!(success);
    assert!(stderr.is_empty(), "{stderr}");

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Name,Previous Year Leave,Current Year Leave,Total Annual Leave"));
    assert_eq!(
        report_line(&stdout, "Lan"),
        "Lan,5.0,7.0,12.0,0.0,0.0,3.0,0.0,0.0,2.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,5.0,5.0,5.0,0.0,0.0,0.0,7.0,Normal"
    );
    assert_eq!(
        report_line(&stdout, "Binh"),
        "Binh,0.0,2.0,2.0,0.0,0.0,0.0,0.5,0.0,0.0,0.0,0.0,3.0,0.0,0.0,0.0,0.0,3.5,3.0,3.0,0.5,0.0,0.0,-1.0,Over limit"
    );
}

#[test]
fn toggle_same_day_twice_unselects() {
    let ws = Workspace::logged_in();
    assert!(ws.run(&["add", "--name", "Lan", "--current", "12"]).2);

    let args = ["toggle", "--name", "Lan", "--type", "sick", "--date", "2026-04-07", "--half"];
    let (stdout, _, _) = ws.run(&args);
    assert!(stdout.contains("2026-04-07 selected"));
    assert!(stdout.contains("0.5 days"));

    let (stdout, _, _) = ws.run(&args);
    assert!(stdout.contains("2026-04-07 unselected"));

    let (stdout, _, _) = ws.run(&["report"]);
    assert!(report_line(&stdout, "Lan").ends_with(",12.0,Normal"));
}

#[test]
fn validation_errors_leave_state_untouched() {
    let ws = Workspace::logged_in();
    assert!(ws.run(&["add", "--name", "Lan", "--current", "12"]).2);

    let (_, stderr, success) = ws.run(&["add", "--name", "Lan", "--current", "1"]);
    assert!(!success);
    assert!(stderr.contains("already exists"));

    let (_, stderr, success) = ws.run(&["add", "--name", "Mai", "--special", "15"]);
    assert!(!success);
    assert!(stderr.contains("exceeds the limit of 14.0 days"));

    let (_, stderr, success) = ws.run(&["add", "--name", "Mai", "--current", "9e16"]);
    assert!(!success);
    assert!(stderr.contains("not a valid number of days"));

    let (_, stderr, success) = ws.run(&["add", "--name", "Mai", "--current", "400"]);
    assert!(!success);
    assert!(stderr.contains("exceeds the maximum of 366.0 days"));

    let (_, stderr, success) =
        ws.run(&["toggle", "--name", "Lan", "--type", "annual", "--date", "2019-02-03"]);
    assert!(!success);
    assert!(stderr.contains("not in the tracked year 2026"));

    let (_, stderr, success) = ws.run(&["details", "--name", "Lan", "--month", "abc"]);
    assert!(!success);
    assert!(stderr.contains("'abc' is not a month number"));

    let (_, stderr, success) = ws.run(&["update", "--name", "Nobody", "--current", "3"]);
    assert!(!success);
    assert!(stderr.contains("no employee named 'Nobody'"));

    let (stdout, _, _) = ws.run(&["report"]);
    assert_eq!(stdout.lines().count(), 2);
    assert!(report_line(&stdout, "Lan").starts_with("Lan,0.0,12.0,12.0,"));
    assert!(report_line(&stdout, "Lan").ends_with(",12.0,Normal"));
}

#[test]
fn update_rename_and_delete() {
    let ws = Workspace::logged_in();
    assert!(ws.run(&["add", "--name", "Lan", "--current", "12"]).2);

    let (_, stderr, success) =
        ws.run(&["update", "--name", "Lan", "--rename", "Lan Pham", "--previous", "2"]);
    assert!(success, "{stderr}");
    let (stdout, _, _) = ws.run(&["report", "--filter", "pham"]);
    assert!(report_line(&stdout, "Lan Pham").starts_with("Lan Pham,2.0,12.0,14.0,"));

    assert!(ws.run(&["delete", "--name", "Lan Pham"]).2);
    let (stdout, _, _) = ws.run(&["report"]);
    assert_eq!(stdout.lines().count(), 1);
}

#[test]
fn details_lists_month() {
    let ws = Workspace::logged_in();
    assert!(ws.run(&["add", "--name", "Lan", "--current", "12"]).2);
    ws.run(&["toggle", "--name", "Lan", "--type", "annual", "--date", "2026-02-10"]);
    ws.run(&["toggle", "--name", "Lan", "--type", "annual", "--date", "2026-02-03", "--half"]);

    let (stdout, _, success) = ws.run(&["details", "--name", "Lan", "--month", "2"]);
    assert!(success);
    assert!(stdout.contains("Annual Leave (1.5 days): 3 (0.5), 10 (1.0)"));

    let (stdout, _, _) = ws.run(&["details", "--name", "Lan", "--month", "9"]);
    assert!(stdout.contains("No leave recorded in month 9."));
}

#[test]
fn export_writes_spreadsheet() {
    let ws = Workspace::logged_in();

    let (_, stderr, success) = ws.run(&["export"]);
    assert!(!success);
    assert!(stderr.contains("no employees to export"));
    assert!(!ws.path("leave_report.xlsx").exists());

    assert!(ws.run(&["add", "--name", "Lan", "--current", "12"]).2);
    let (stdout, stderr, success) = ws.run(&["export", "--output", "out.xlsx"]);
    assert!(success, "{stderr}");
    assert!(stdout.contains("out.xlsx"));
    assert!(ws.path("out.xlsx").exists());
}

#[test]
fn theme_is_remembered() {
    let ws = Workspace::new();
    assert_eq!(ws.run(&["theme"]).0.trim(), "light");
    assert_eq!(ws.run(&["theme", "toggle"]).0.trim(), "dark");
    assert_eq!(ws.run(&["theme"]).0.trim(), "dark");
    assert_eq!(ws.run(&["theme", "light"]).0.trim(), "light");
    assert!(!ws.run(&["theme", "blue"]).2);
}

#[test]
fn corrupt_store_starts_empty() {
    let ws = Workspace::logged_in();
    std::fs::write(ws.path("data/employees.json"), "{broken").unwrap();

    let (stdout, stderr, success) = ws.run(&["report"]);
    assert!(success);
    assert_eq!(stdout.lines().count(), 1);
    assert!(stderr.contains("stored value is corrupt"));
}
