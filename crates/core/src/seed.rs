//! Demo data for local development.

use crate::error::EazydocResult;
use crate::patch::{AppointmentPatch, Field};
use crate::repositories::appointments::{AppointmentService, NewAppointment};
use crate::store::Database;
use api_shared::AppointmentStatus;
use chrono::{Duration, Utc};
use std::sync::Arc;

/// Ids of the records created by [`seed_demo`].
#[derive(Clone, Debug)]
pub struct SeedSummary {
    pub patient_id: String,
    pub doctor_id: String,
    pub ambulance_id: String,
    pub appointment_ids: Vec<String>,
}

/// Insert one patient, doctor and ambulance plus three appointments.
///
/// The follow-up appointment points at the check-up through `relatedTo`, so deleting the
/// check-up exercises relation cleanup.
pub fn seed_demo(db: Arc<Database>) -> EazydocResult<SeedSummary> {
    let (patient_id, doctor_id, ambulance_id) = db.transaction(|t| {
        Ok((
            t.insert_patient("Alex Morgan", None),
            t.insert_doctor("Dr Priya Shah", Some("Cardiology".into())),
            t.insert_ambulance("AMB-101", Some("Chris Lee".into())),
        ))
    })?;

    let service = AppointmentService::new(db);
    let now = Utc::now();

    let mut checkup = NewAppointment::for_patient(&patient_id, now + Duration::days(1));
    checkup.doctor_id = Some(doctor_id.clone());
    checkup.condition = Some("Palpitations".into());
    checkup.specialization = Some("Cardiology".into());
    checkup.tests = vec!["ECG".into()];
    let checkup = service.create(checkup)?;

    let mut follow_up = NewAppointment::for_patient(&patient_id, now + Duration::days(8));
    follow_up.doctor_id = Some(doctor_id.clone());
    follow_up.status = AppointmentStatus::Pending;
    follow_up.description = Some("Review ECG results".into());
    let follow_up = service.create(follow_up)?;

    let mut link = AppointmentPatch::default();
    link.related_appointment_id = Field::Present(checkup.id.clone());
    service.update(&follow_up.id, link)?;

    let mut emergency = NewAppointment::for_patient(&patient_id, now);
    emergency.ambulance_id = Some(ambulance_id.clone());
    emergency.status = AppointmentStatus::Emergency;
    emergency.condition = Some("Chest pain".into());
    let emergency = service.create(emergency)?;

    tracing::info!(patient_id = %patient_id, "seeded demo data");

    Ok(SeedSummary {
        patient_id,
        doctor_id,
        ambulance_id,
        appointment_ids: vec![checkup.id, follow_up.id, emergency.id],
    })
}
