//! Leave record store.
//!
//! The whole employee collection lives under a single storage key and is
//! rewritten on every mutation. Storage is treated as a best-effort cache: a
//! missing or corrupt blob loads as an empty collection and failed writes are
//! logged, never returned to the caller.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{Employee, EmployeeId};

mod preferences;
pub use preferences::{Preferences, Theme};

mod storage;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

/// Storage key of the employee collection.
pub const EMPLOYEES_KEY: &str = "employees";

/// Version written with every employee snapshot.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    employees: &'a [Employee],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Snapshot {
    Versioned {
        version: u32,
        employees: Vec<Employee>,
    },
    /// Bare array written before snapshots carried a version.
    Unversioned(Vec<Employee>),
}

/// Ordered collection of employees backed by a [`Storage`].
#[derive(Debug)]
pub struct LeaveStore<S> {
    storage: S,
    employees: Vec<Employee>,
}

/// Public API
impl<S: Storage> LeaveStore<S> {
    /// Load the collection from `storage`, falling back to an empty one.
    pub fn load(storage: S) -> Self {
        let employees = match read_json::<Snapshot>(&storage, EMPLOYEES_KEY) {
            Some(Snapshot::Versioned { version, employees }) if version == SCHEMA_VERSION => {
                employees
            }
            Some(Snapshot::Versioned { version, .. }) => {
                warn!(version, "unsupported employee snapshot version, starting empty");
                Vec::new()
            }
            Some(Snapshot::Unversioned(employees)) => {
                debug!("loaded unversioned employee snapshot");
                employees
            }
            None => Vec::new(),
        };
        Self { storage, employees }
    }

    pub fn list(&self) -> &[Employee] {
        &self.employees
    }

    pub fn get(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    /// Employee whose name equals `name` once both are trimmed.
    pub fn find_by_name(&self, name: &str) -> Option<&Employee> {
        let name = name.trim();
        self.employees.iter().find(|e| e.name.trim() == name)
    }

    /// Append `employee` and persist.
    pub fn add(&mut self, employee: Employee) {
        self.employees.push(employee);
        self.persist();
    }

    /// Replace the employee with `id` in place and persist.
    ///
    /// Returns `false` when there is no such employee.
    pub fn replace(&mut self, id: EmployeeId, employee: Employee) -> bool {
        let Some(slot) = self.employees.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        *slot = employee;
        self.persist();
        true
    }

    /// Remove the employee with `id` and persist.
    pub fn remove(&mut self, id: EmployeeId) -> Option<Employee> {
        let pos = self.employees.iter().position(|e| e.id == id)?;
        let removed = self.employees.remove(pos);
        self.persist();
        Some(removed)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

/// Private API
impl<S: Storage> LeaveStore<S> {
    fn persist(&mut self) {
        let snapshot = SnapshotRef {
            version: SCHEMA_VERSION,
            employees: &self.employees,
        };
        write_json(&mut self.storage, EMPLOYEES_KEY, &snapshot);
    }
}

/// Read and decode the value under `key`; absent, unreadable or corrupt values
/// are `None`.
pub(crate) fn read_json<T: DeserializeOwned>(storage: &impl Storage, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, reason = %e, "storage read failed, using default");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, reason = %e, "stored value is corrupt, using default");
            None
        }
    }
}

/// Encode and write `value` under `key`, logging failures.
pub(crate) fn write_json<T: Serialize + ?Sized>(storage: &mut impl Storage, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key, reason = %e, "failed to encode value, not persisted");
            return;
        }
    };
    if let Err(e) = storage.set(key, &raw) {
        warn!(key, reason = %e, "storage write failed, change kept in memory only");
    }
}
