//! Wire models for the Eazydoc REST surface.
//!
//! Field names are camelCase on the wire. These types are shared by the server (which
//! produces them) and the client crate (which consumes them).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle state of an appointment.
///
/// Any value may follow any other; there is no transition graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    #[default]
    New,
    Pending,
    Completed,
    Canceled,
    Emergency,
}

impl AppointmentStatus {
    /// Every status in declaration order.
    pub const ALL: [AppointmentStatus; 5] = [
        AppointmentStatus::New,
        AppointmentStatus::Pending,
        AppointmentStatus::Completed,
        AppointmentStatus::Canceled,
        AppointmentStatus::Emergency,
    ];

    /// Convert to the wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::New => "NEW",
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Canceled => "CANCELED",
            AppointmentStatus::Emergency => "EMERGENCY",
        }
    }

    /// Parse from the wire string. Matching is exact.
    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account role. Determines navigation and which dashboard routes a user may see.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Patient,
    Doctor,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Patient => "patient",
            UserRole::Doctor => "doctor",
            UserRole::Admin => "admin",
        }
    }

    /// Parse a role name. Unknown names yield `None` rather than an error.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "patient" => Some(UserRole::Patient),
            "doctor" => Some(UserRole::Doctor),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
    pub user_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSummary {
    pub id: String,
    pub name: String,
    pub specialization: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AmbulanceSummary {
    pub id: String,
    pub vehicle_number: String,
    pub driver_name: Option<String>,
}

/// Appointment scalars without joined relations.
///
/// Used for the entries of `relatedAppointments` and `relatedTo`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentSummary {
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
}

/// Appointment joined with its patient, doctor and ambulance.
///
/// `relatedAppointments` and `relatedTo` are only present on fetch responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetail {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub patient: PatientSummary,
    pub doctor: Option<DoctorSummary>,
    pub ambulance: Option<AmbulanceSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_appointments: Option<Vec<AppointmentSummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_to: Option<Vec<AppointmentSummary>>,
}

/// Request body for `PUT /api/appointments/{id}`.
///
/// Documentation only: the server validates the raw JSON so that it can report every
/// violation at once and tell an absent field from a present one.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentReq {
    pub doctor_id: Option<String>,
    pub ambulance_id: Option<String>,
    /// ISO-8601 UTC timestamp, e.g. `2026-03-01T09:30:00Z`.
    pub date_time: Option<String>,
    pub condition: Option<String>,
    pub specialization: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub comments: Option<String>,
    pub description: Option<String>,
    pub prescriptions: Option<Vec<String>>,
    pub tests: Option<Vec<String>>,
    pub related_appointment_id: Option<String>,
}

/// A single schema violation in a rejected payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationIssue {
    /// Machine-readable kind, e.g. `invalid_type`, `invalid_enum_value`.
    pub code: String,
    /// Path of the offending field from the payload root.
    pub path: Vec<String>,
    pub message: String,
}

/// `{ "error": "..." }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

/// `{ "error": [issues] }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorRes {
    pub error: Vec<ValidationIssue>,
}

/// `{ "message": "..." }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateUserReq {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRes {
    pub message: String,
    pub user: UserSummary,
}

/// Failure body of `POST /api/user`. `message` may be absent on unexpected errors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateUserFailure {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}
