pub mod config;
pub mod csv;
pub mod days;
pub mod export;
pub mod metrics;
pub mod model;
pub mod report;
pub mod store;
pub mod tracker;

pub use days::Days;
pub use metrics::{CalculatedEmployee, LeaveStatus, calculate};
pub use model::{Employee, EmployeeId, LeaveBucket, LeaveDuration, LeaveEntry, LeaveGrid, LeaveType, Month};
pub use tracker::{Command, Tracker};
