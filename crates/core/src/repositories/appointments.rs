//! Appointment management.
//!
//! This module provides the create/fetch/update/delete operations over appointments,
//! including the relation handling:
//!
//! - `doctorId` / `ambulanceId` in an update connect the appointment to an existing
//!   doctor or ambulance.
//! - `relatedAppointmentId` adds an existing appointment to the `relatedTo` set.
//! - Deleting an appointment first removes it from the `relatedTo` set of every
//!   appointment pointing at it, then removes the appointment itself. Both steps run in one
//!   store transaction, so either all of them happen or none do.
//!
//! ## Pure Data Operations
//!
//! This module contains **only** data operations. HTTP status mapping belongs in
//! `api-rest`.

use crate::error::{EazydocError, EazydocResult};
use crate::patch::AppointmentPatch;
use crate::store::{new_id, AppointmentRecord, Database, Tables};
use crate::validation::parse_appointment_update;
use api_shared::{
    AmbulanceSummary, AppointmentDetail, AppointmentStatus, AppointmentSummary, DoctorSummary,
    PatientSummary,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Input for booking a new appointment.
#[derive(Clone, Debug)]
pub struct NewAppointment {
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
}

impl NewAppointment {
    /// A `NEW` appointment for `patient_id` at `date_time` with every optional field empty.
    pub fn for_patient(patient_id: impl Into<String>, date_time: DateTime<Utc>) -> Self {
        Self {
            patient_id: patient_id.into(),
            doctor_id: None,
            ambulance_id: None,
            date_time,
            condition: None,
            specialization: None,
            status: AppointmentStatus::New,
            comments: None,
            description: None,
            prescriptions: Vec::new(),
            tests: Vec::new(),
        }
    }
}

/// Outcome of a delete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeletedAppointment {
    pub id: String,
    /// Appointments whose `relatedTo` set no longer contains the deleted id.
    pub detached_from: Vec<String>,
}

/// Service for appointment operations backed by the shared [`Database`].
#[derive(Clone, Debug)]
pub struct AppointmentService {
    db: Arc<Database>,
}

impl AppointmentService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Book a new appointment.
    ///
    /// # Errors
    ///
    /// Returns `EazydocError::NotFound` if the patient, doctor or ambulance does not exist.
    pub fn create(&self, new: NewAppointment) -> EazydocResult<AppointmentDetail> {
        self.db.transaction(|tables| {
            if !tables.patients.contains_key(&new.patient_id) {
                return Err(EazydocError::not_found("Patient", &new.patient_id));
            }
            if let Some(doctor_id) = &new.doctor_id {
                ensure_doctor(tables, doctor_id)?;
            }
            if let Some(ambulance_id) = &new.ambulance_id {
                ensure_ambulance(tables, ambulance_id)?;
            }

            let now = Utc::now();
            let record = AppointmentRecord {
                id: new_id(),
                patient_id: new.patient_id,
                doctor_id: new.doctor_id,
                ambulance_id: new.ambulance_id,
                date_time: new.date_time,
                condition: new.condition,
                specialization: new.specialization,
                status: new.status,
                comments: new.comments,
                description: new.description,
                prescriptions: new.prescriptions,
                tests: new.tests,
                related_to: BTreeSet::new(),
                created_at: now,
                updated_at: now,
            };
            let id = record.id.clone();
            tables.appointments.insert(id.clone(), record);

            tracing::info!(appointment_id = %id, "appointment created");
            join(tables, tables.appointment(&id)?, false)
        })
    }

    /// Fetch an appointment with patient, doctor, ambulance and both directions of the
    /// related-appointment relation.
    ///
    /// # Errors
    ///
    /// Returns `EazydocError::NotFound` when no appointment has this id.
    pub fn fetch(&self, id: &str) -> EazydocResult<AppointmentDetail> {
        self.db
            .read(|tables| join(tables, tables.appointment(id)?, true))?
    }

    /// Validate a raw JSON payload and apply it as a sparse patch.
    ///
    /// Validation runs before the store is touched.
    ///
    /// # Errors
    ///
    /// Returns `EazydocError::Validation` listing every schema violation, or any error of
    /// [`AppointmentService::update`].
    pub fn update_from_json(
        &self,
        id: &str,
        body: &serde_json::Value,
    ) -> EazydocResult<AppointmentDetail> {
        let patch = parse_appointment_update(body).map_err(EazydocError::Validation)?;
        self.update(id, patch)
    }

    /// Apply a validated sparse patch.
    ///
    /// Only present fields are written. The returned view is joined with patient, doctor
    /// and ambulance but not with related appointments.
    ///
    /// # Errors
    ///
    /// Returns `EazydocError::NotFound` if the appointment, or a doctor/ambulance/related
    /// appointment named in the patch, does not exist. Nothing is written in that case.
    pub fn update(&self, id: &str, patch: AppointmentPatch) -> EazydocResult<AppointmentDetail> {
        // Nothing to write: `updatedAt` stays put and the store is not persisted.
        if patch.is_empty() {
            return self
                .db
                .read(|tables| join(tables, tables.appointment(id)?, false))?;
        }

        self.db.transaction(|tables| {
            tables.appointment(id)?;

            if let Some(doctor_id) = patch.doctor_id.as_present() {
                ensure_doctor(tables, doctor_id)?;
            }
            if let Some(ambulance_id) = patch.ambulance_id.as_present() {
                ensure_ambulance(tables, ambulance_id)?;
            }
            if let Some(related_id) = patch.related_appointment_id.as_present() {
                if !tables.appointments.contains_key(related_id) {
                    return Err(EazydocError::not_found("Related appointment", related_id));
                }
            }

            let record = tables.appointment_mut(id)?;
            apply_patch(record, patch);
            record.updated_at = Utc::now();

            tracing::info!(appointment_id = %id, "appointment updated");
            join(tables, tables.appointment(id)?, false)
        })
    }

    /// Delete an appointment, first detaching it from every `relatedTo` set that
    /// references it.
    ///
    /// # Errors
    ///
    /// Returns `EazydocError::NotFound` when no appointment has this id. If any step fails
    /// the store is left unchanged.
    pub fn delete(&self, id: &str) -> EazydocResult<DeletedAppointment> {
        self.db.transaction(|tables| {
            tables.appointment(id)?;

            let referencing = tables.referencing_appointments(id);
            for other_id in &referencing {
                let other = tables.appointment_mut(other_id)?;
                other.related_to.remove(id);
                other.updated_at = Utc::now();
            }

            tables.appointments.remove(id);

            tracing::info!(
                appointment_id = %id,
                detached = referencing.len(),
                "appointment deleted"
            );
            Ok(DeletedAppointment {
                id: id.to_string(),
                detached_from: referencing,
            })
        })
    }
}

fn ensure_doctor(tables: &Tables, id: &str) -> EazydocResult<()> {
    if tables.doctors.contains_key(id) {
        Ok(())
    } else {
        Err(EazydocError::not_found("Doctor", id))
    }
}

fn ensure_ambulance(tables: &Tables, id: &str) -> EazydocResult<()> {
    if tables.ambulances.contains_key(id) {
        Ok(())
    } else {
        Err(EazydocError::not_found("Ambulance", id))
    }
}

fn apply_patch(record: &mut AppointmentRecord, patch: AppointmentPatch) {
    let AppointmentPatch {
        doctor_id,
        ambulance_id,
        related_appointment_id,
        date_time,
        condition,
        specialization,
        status,
        comments,
        description,
        prescriptions,
        tests,
    } = patch;

    if let Some(doctor_id) = doctor_id.into_option() {
        record.doctor_id = Some(doctor_id);
    }
    if let Some(ambulance_id) = ambulance_id.into_option() {
        record.ambulance_id = Some(ambulance_id);
    }
    if let Some(related_id) = related_appointment_id.into_option() {
        record.related_to.insert(related_id);
    }

    date_time.write_into(&mut record.date_time);
    condition.write_into_optional(&mut record.condition);
    specialization.write_into_optional(&mut record.specialization);
    status.write_into(&mut record.status);
    comments.write_into_optional(&mut record.comments);
    description.write_into_optional(&mut record.description);
    prescriptions.write_into(&mut record.prescriptions);
    tests.write_into(&mut record.tests);
}

fn summarise(record: &AppointmentRecord) -> AppointmentSummary {
    AppointmentSummary {
        id: record.id.clone(),
        patient_id: record.patient_id.clone(),
        doctor_id: record.doctor_id.clone(),
        ambulance_id: record.ambulance_id.clone(),
        date_time: record.date_time,
        condition: record.condition.clone(),
        specialization: record.specialization.clone(),
        status: record.status,
        comments: record.comments.clone(),
        description: record.description.clone(),
        prescriptions: record.prescriptions.clone(),
        tests: record.tests.clone(),
    }
}

/// Build the joined view of `record`.
fn join(
    tables: &Tables,
    record: &AppointmentRecord,
    with_related: bool,
) -> EazydocResult<AppointmentDetail> {
    let dangling = |entity: &'static str, id: &str| EazydocError::DanglingReference {
        appointment_id: record.id.clone(),
        entity,
        id: id.to_string(),
    };

    let patient = tables
        .patients
        .get(&record.patient_id)
        .map(|p| PatientSummary {
            id: p.id.clone(),
            name: p.name.clone(),
            user_id: p.user_id.clone(),
        })
        .ok_or_else(|| dangling("patient", &record.patient_id))?;

    let doctor = record
        .doctor_id
        .as_deref()
        .map(|id| {
            tables
                .doctors
                .get(id)
                .map(|d| DoctorSummary {
                    id: d.id.clone(),
                    name: d.name.clone(),
                    specialization: d.specialization.clone(),
                })
                .ok_or_else(|| dangling("doctor", id))
        })
        .transpose()?;

    let ambulance = record
        .ambulance_id
        .as_deref()
        .map(|id| {
            tables
                .ambulances
                .get(id)
                .map(|a| AmbulanceSummary {
                    id: a.id.clone(),
                    vehicle_number: a.vehicle_number.clone(),
                    driver_name: a.driver_name.clone(),
                })
                .ok_or_else(|| dangling("ambulance", id))
        })
        .transpose()?;

    let (related_appointments, related_to) = if with_related {
        let related_appointments: Vec<AppointmentSummary> = tables
            .referencing_appointments(&record.id)
            .iter()
            .filter_map(|id| tables.appointments.get(id))
            .map(summarise)
            .collect();
        let related_to = record
            .related_to
            .iter()
            .map(|id| {
                tables
                    .appointments
                    .get(id)
                    .map(summarise)
                    .ok_or_else(|| dangling("related appointment", id))
            })
            .collect::<EazydocResult<Vec<_>>>()?;
        (Some(related_appointments), Some(related_to))
    } else {
        (None, None)
    };

    Ok(AppointmentDetail {
        id: record.id.clone(),
        patient_id: record.patient_id.clone(),
        doctor_id: record.doctor_id.clone(),
        ambulance_id: record.ambulance_id.clone(),
        date_time: record.date_time,
        condition: record.condition.clone(),
        specialization: record.specialization.clone(),
        status: record.status,
        comments: record.comments.clone(),
        description: record.description.clone(),
        prescriptions: record.prescriptions.clone(),
        tests: record.tests.clone(),
        created_at: record.created_at,
        updated_at: record.updated_at,
        patient,
        doctor,
        ambulance,
        related_appointments,
        related_to,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use crate::patch::Field;
    use crate::seed::seed_demo;
    use chrono::TimeZone;
    use serde_json::json;

    struct Fixture {
        service: AppointmentService,
        db: Arc<Database>,
        patient_id: String,
        doctor_id: String,
        ambulance_id: String,
    }

    fn fixture() -> Fixture {
        let db = Arc::new(Database::in_memory());
        let (patient_id, doctor_id, ambulance_id) = db
            .transaction(|t| {
                Ok((
                    t.insert_patient("Ann Patient", None),
                    t.insert_doctor("Dr Who", Some("Cardiology".into())),
                    t.insert_ambulance("AMB-42", Some("Sam".into())),
                ))
            })
            .expect("seed should commit");
        Fixture {
            service: AppointmentService::new(db.clone()),
            db,
            patient_id,
            doctor_id,
            ambulance_id,
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    fn book(fx: &Fixture, hour: u32) -> AppointmentDetail {
        let mut new = NewAppointment::for_patient(&fx.patient_id, at(hour));
        new.condition = Some("chest pain".into());
        new.prescriptions = vec!["aspirin".into()];
        fx.service.create(new).expect("create should succeed")
    }

    #[test]
    fn fetch_missing_appointment_is_not_found() {
        let fx = fixture();
        let err = fx.service.fetch("nope").expect_err("should be missing");
        assert!(matches!(err, EazydocError::NotFound { entity: "Appointment", .. }));
        assert_eq!(err.to_string(), "Appointment not found");
    }

    #[test]
    fn fetch_includes_both_relation_directions() {
        let fx = fixture();
        let a = book(&fx, 9);
        let b = book(&fx, 10);

        let mut patch = AppointmentPatch::default();
        patch.related_appointment_id = Field::Present(b.id.clone());
        fx.service.update(&a.id, patch).expect("link should succeed");

        let a_view = fx.service.fetch(&a.id).unwrap();
        let b_view = fx.service.fetch(&b.id).unwrap();

        let a_related_to: Vec<_> = a_view.related_to.unwrap().into_iter().map(|s| s.id).collect();
        let b_related: Vec<_> = b_view
            .related_appointments
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(a_related_to, vec![b.id.clone()]);
        assert_eq!(b_related, vec![a.id.clone()]);
        assert!(b_view.related_to.unwrap().is_empty());
        assert_eq!(a_view.patient.name, "Ann Patient");
    }

    #[test]
    fn status_only_update_leaves_everything_else() {
        let fx = fixture();
        let before = book(&fx, 9);

        let after = fx
            .service
            .update_from_json(&before.id, &json!({ "status": "COMPLETED" }))
            .expect("update should succeed");

        assert_eq!(after.status, AppointmentStatus::Completed);
        assert_eq!(after.date_time, before.date_time);
        assert_eq!(after.condition, before.condition);
        assert_eq!(after.prescriptions, before.prescriptions);
        assert_eq!(after.doctor_id, None);
        assert!(after.related_appointments.is_none(), "update view is not joined with relations");
    }

    #[test]
    fn update_connects_doctor_and_ambulance() {
        let fx = fixture();
        let appt = book(&fx, 9);

        let updated = fx
            .service
            .update_from_json(
                &appt.id,
                &json!({
                    "doctorId": fx.doctor_id,
                    "ambulanceId": fx.ambulance_id,
                    "dateTime": "2026-04-02T14:15:00Z",
                    "tests": ["ECG", "troponin"]
                }),
            )
            .unwrap();

        assert_eq!(updated.doctor.as_ref().map(|d| d.name.as_str()), Some("Dr Who"));
        assert_eq!(
            updated.ambulance.as_ref().map(|a| a.vehicle_number.as_str()),
            Some("AMB-42")
        );
        assert_eq!(updated.date_time, Utc.with_ymd_and_hms(2026, 4, 2, 14, 15, 0).unwrap());
        assert_eq!(updated.tests, vec!["ECG".to_string(), "troponin".to_string()]);
    }

    #[test]
    fn empty_prescriptions_list_clears() {
        let fx = fixture();
        let appt = book(&fx, 9);

        let updated = fx
            .service
            .update_from_json(&appt.id, &json!({ "prescriptions": [] }))
            .unwrap();
        assert!(updated.prescriptions.is_empty());
    }

    #[test]
    fn invalid_payload_does_not_touch_store() {
        let fx = fixture();
        let appt = book(&fx, 9);
        let snapshot = fx.db.read(|t| t.clone()).unwrap();

        let err = fx
            .service
            .update_from_json(&appt.id, &json!({ "status": "DONE", "condition": "x" }))
            .expect_err("should fail validation");
        assert!(matches!(err, EazydocError::Validation(ref issues) if issues.len() == 1));

        // Validation happens before the id is even looked up.
        let err = fx
            .service
            .update_from_json("missing", &json!({ "tests": "ECG" }))
            .expect_err("should fail validation");
        assert!(matches!(err, EazydocError::Validation(_)));

        assert_eq!(fx.db.read(|t| t.clone()).unwrap(), snapshot);
    }

    #[test]
    fn unknown_doctor_is_not_found_and_writes_nothing() {
        let fx = fixture();
        let appt = book(&fx, 9);

        let err = fx
            .service
            .update_from_json(&appt.id, &json!({ "doctorId": "ghost", "condition": "changed" }))
            .expect_err("unknown doctor should fail");
        assert!(matches!(err, EazydocError::NotFound { entity: "Doctor", .. }));

        let stored = fx.service.fetch(&appt.id).unwrap();
        assert_eq!(stored.condition.as_deref(), Some("chest pain"));
        assert_eq!(stored.doctor_id, None);
    }

    #[test]
    fn update_missing_appointment_is_not_found() {
        let fx = fixture();
        let err = fx
            .service
            .update_from_json("missing", &json!({ "status": "NEW" }))
            .unwrap_err();
        assert!(matches!(err, EazydocError::NotFound { entity: "Appointment", .. }));
    }

    #[test]
    fn delete_detaches_every_referencer() {
        let fx = fixture();
        let target = book(&fx, 9);
        let b = book(&fx, 10);
        let c = book(&fx, 11);
        let unrelated = book(&fx, 12);

        for referencer in [&b, &c] {
            let mut patch = AppointmentPatch::default();
            patch.related_appointment_id = Field::Present(target.id.clone());
            fx.service.update(&referencer.id, patch).unwrap();
        }

        let deleted = fx.service.delete(&target.id).expect("delete should succeed");
        let mut expected = vec![b.id.clone(), c.id.clone()];
        expected.sort();
        assert_eq!(deleted.detached_from, expected);

        assert!(matches!(
            fx.service.fetch(&target.id),
            Err(EazydocError::NotFound { .. })
        ));
        for id in [&b.id, &c.id, &unrelated.id] {
            let view = fx.service.fetch(id).expect("survivor should remain");
            assert!(view.related_to.unwrap().iter().all(|s| s.id != target.id));
        }
    }

    #[test]
    fn delete_missing_appointment_is_not_found() {
        let fx = fixture();
        let err = fx.service.delete("missing").unwrap_err();
        assert!(matches!(err, EazydocError::NotFound { entity: "Appointment", .. }));
    }

    #[test]
    fn empty_patch_writes_nothing() {
        let fx = fixture();
        let appt = book(&fx, 9);

        let view = fx
            .service
            .update(&appt.id, AppointmentPatch::default())
            .expect("empty patch is accepted");
        assert_eq!(view.updated_at, appt.updated_at);
        assert!(matches!(
            fx.service.update("missing", AppointmentPatch::default()),
            Err(EazydocError::NotFound { entity: "Appointment", .. })
        ));
    }

    #[test]
    fn delete_that_fails_to_persist_changes_nothing() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let data_dir = dir.path().join("data");
        let cfg = CoreConfig::new(Some(data_dir.clone())).expect("config");
        let db = Arc::new(Database::open(&cfg).expect("open"));
        let seeded = seed_demo(db.clone()).expect("seed");
        let service = AppointmentService::new(db);
        let checkup = &seeded.appointment_ids[0];
        let follow_up = &seeded.appointment_ids[1];

        std::fs::remove_dir_all(&data_dir).expect("remove data dir");

        let err = service.delete(checkup).expect_err("persist should fail");
        assert!(matches!(err, EazydocError::FileWrite(_)), "got {err:?}");

        let still_there = service.fetch(checkup).expect("checkup survives");
        assert_eq!(still_there.id, *checkup);
        let follow = service.fetch(follow_up).expect("follow-up survives");
        let related_to: Vec<String> = follow
            .related_to
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(related_to, vec![checkup.clone()]);
    }

    #[test]
    fn create_requires_existing_patient() {
        let fx = fixture();
        let err = fx
            .service
            .create(NewAppointment::for_patient("ghost", at(9)))
            .unwrap_err();
        assert!(matches!(err, EazydocError::NotFound { entity: "Patient", .. }));
    }
}
