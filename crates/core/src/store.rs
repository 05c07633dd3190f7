//! Transactional record store.
//!
//! Holds the users, patients, doctors, ambulances and appointments tables behind a mutex.
//! Every mutation goes through [`Database::transaction`], which runs the caller's closure
//! against a working copy of the tables and swaps the copy in only when the closure
//! succeeds. When a data directory is configured, the committed tables are also written to
//! a JSON snapshot before the swap, so the in-memory and on-disk views never diverge.
//!
//! ## Storage layout
//!
//! ```text
//! <data_dir>/
//!   database.json       # committed snapshot
//!   database.json.tmp   # present only while a commit is being written
//! ```
//!
//! ## Relations
//!
//! Each appointment stores only its own `related_to` id set. The inverse side
//! (`relatedAppointments`) is derived by scanning for appointments whose `related_to`
//! contains the id, see [`Tables::referencing_appointments`].

use crate::config::CoreConfig;
use crate::error::{EazydocError, EazydocResult};
use api_shared::{AppointmentStatus, UserRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Allocate a new opaque record identifier (32 lowercase hex characters).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub id: String,
    pub user_id: Option<String>,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRecord {
    pub id: String,
    pub name: String,
    pub specialization: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbulanceRecord {
    pub id: String,
    pub vehicle_number: String,
    pub driver_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRecord {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: Option<String>,
    pub ambulance_id: Option<String>,
    pub date_time: DateTime<Utc>,
    pub condition: Option<String>,
    pub specialization: Option<String>,
    pub status: AppointmentStatus,
    pub comments: Option<String>,
    pub description: Option<String>,
    pub prescriptions: Vec<String>,
    pub tests: Vec<String>,
    /// Ids of the appointments this one points at.
    pub related_to: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// All tables of the store. Cloned wholesale for each transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tables {
    #[serde(default)]
    pub users: BTreeMap<String, UserRecord>,
    #[serde(default)]
    pub patients: BTreeMap<String, PatientRecord>,
    #[serde(default)]
    pub doctors: BTreeMap<String, DoctorRecord>,
    #[serde(default)]
    pub ambulances: BTreeMap<String, AmbulanceRecord>,
    #[serde(default)]
    pub appointments: BTreeMap<String, AppointmentRecord>,
}

impl Tables {
    pub fn appointment(&self, id: &str) -> EazydocResult<&AppointmentRecord> {
        self.appointments
            .get(id)
            .ok_or_else(|| EazydocError::not_found("Appointment", id))
    }

    pub fn appointment_mut(&mut self, id: &str) -> EazydocResult<&mut AppointmentRecord> {
        self.appointments
            .get_mut(id)
            .ok_or_else(|| EazydocError::not_found("Appointment", id))
    }

    /// Ids of every appointment whose `related_to` contains `id`, in id order.
    pub fn referencing_appointments(&self, id: &str) -> Vec<String> {
        self.appointments
            .values()
            .filter(|a| a.related_to.contains(id))
            .map(|a| a.id.clone())
            .collect()
    }

    pub fn find_user_by_email(&self, normalised_email: &str) -> Option<&UserRecord> {
        self.users
            .values()
            .find(|u| u.email.to_lowercase() == normalised_email)
    }

    pub fn insert_patient(&mut self, name: impl Into<String>, user_id: Option<String>) -> String {
        let id = new_id();
        self.patients.insert(
            id.clone(),
            PatientRecord {
                id: id.clone(),
                user_id,
                name: name.into(),
            },
        );
        id
    }

    pub fn insert_doctor(
        &mut self,
        name: impl Into<String>,
        specialization: Option<String>,
    ) -> String {
        let id = new_id();
        self.doctors.insert(
            id.clone(),
            DoctorRecord {
                id: id.clone(),
                name: name.into(),
                specialization,
            },
        );
        id
    }

    pub fn insert_ambulance(
        &mut self,
        vehicle_number: impl Into<String>,
        driver_name: Option<String>,
    ) -> String {
        let id = new_id();
        self.ambulances.insert(
            id.clone(),
            AmbulanceRecord {
                id: id.clone(),
                vehicle_number: vehicle_number.into(),
                driver_name,
            },
        );
        id
    }
}

/// The record store shared by all services.
#[derive(Debug)]
pub struct Database {
    tables: Mutex<Tables>,
    file: Option<PathBuf>,
}

impl Database {
    /// A store with no persistence.
    pub fn in_memory() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            file: None,
        }
    }

    /// Open the store described by `cfg`.
    ///
    /// Creates the data directory if needed and loads the existing snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns `EazydocError` if the directory cannot be created or the snapshot cannot be
    /// read or parsed.
    pub fn open(cfg: &CoreConfig) -> EazydocResult<Self> {
        let Some(file) = cfg.database_file() else {
            return Ok(Self::in_memory());
        };

        if let Some(dir) = cfg.data_dir() {
            fs::create_dir_all(dir).map_err(EazydocError::DataDirCreation)?;
        }

        let tables = if file.is_file() {
            let raw = fs::read_to_string(&file).map_err(EazydocError::FileRead)?;
            serde_json::from_str(&raw).map_err(EazydocError::Deserialization)?
        } else {
            Tables::default()
        };

        tracing::info!(
            path = %file.display(),
            appointments = tables.appointments.len(),
            users = tables.users.len(),
            "opened database"
        );

        Ok(Self {
            tables: Mutex::new(tables),
            file: Some(file),
        })
    }

    /// Run a read-only closure against the committed tables.
    pub fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> EazydocResult<T> {
        let guard = self.tables.lock().map_err(|_| EazydocError::LockPoisoned)?;
        Ok(f(&guard))
    }

    /// Run `f` as an all-or-nothing transaction.
    ///
    /// `f` receives a working copy of the tables. If it returns `Err`, or persisting the
    /// result fails, the committed tables are left exactly as they were.
    pub fn transaction<T>(
        &self,
        f: impl FnOnce(&mut Tables) -> EazydocResult<T>,
    ) -> EazydocResult<T> {
        let mut guard = self.tables.lock().map_err(|_| EazydocError::LockPoisoned)?;
        let mut working = guard.clone();

        let out = f(&mut working)?;

        if let Some(file) = &self.file {
            persist(file, &working)?;
        }
        *guard = working;

        Ok(out)
    }
}

/// Write the snapshot via a temporary file and rename, so a crash never leaves a
/// half-written `database.json`.
fn persist(file: &Path, tables: &Tables) -> EazydocResult<()> {
    let raw = serde_json::to_string_pretty(tables).map_err(EazydocError::Serialization)?;
    let tmp = file.with_extension("json.tmp");
    fs::write(&tmp, raw).map_err(EazydocError::FileWrite)?;
    fs::rename(&tmp, file).map_err(EazydocError::FileWrite)?;
    Ok(())
}
