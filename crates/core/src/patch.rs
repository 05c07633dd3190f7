//! Sparse-patch types for appointment updates.
//!
//! A payload field is either absent (leave the stored value alone) or present with a value
//! (write it). Presence is tracked explicitly rather than inferred from the value, so an
//! empty string or an empty list is a real write.

use api_shared::AppointmentStatus;
use chrono::{DateTime, Utc};

/// An updatable attribute in a sparse patch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field<T> {
    Absent,
    Present(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> Field<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }

    pub fn as_present(&self) -> Option<&T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Absent => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Absent => None,
        }
    }

    /// Overwrite `target` when present.
    pub fn write_into(self, target: &mut T) {
        if let Field::Present(value) = self {
            *target = value;
        }
    }
}

impl Field<String> {
    /// Overwrite a nullable column when present.
    pub fn write_into_optional(self, target: &mut Option<String>) {
        if let Field::Present(value) = self {
            *target = Some(value);
        }
    }
}

/// Validated update for a single appointment.
///
/// The three id fields connect relations; everything else overwrites a column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppointmentPatch {
    pub doctor_id: Field<String>,
    pub ambulance_id: Field<String>,
    pub related_appointment_id: Field<String>,
    pub date_time: Field<DateTime<Utc>>,
    pub condition: Field<String>,
    pub specialization: Field<String>,
    pub status: Field<AppointmentStatus>,
    pub comments: Field<String>,
    pub description: Field<String>,
    pub prescriptions: Field<Vec<String>>,
    pub tests: Field<Vec<String>>,
}

impl AppointmentPatch {
    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        !(self.doctor_id.is_present()
            || self.ambulance_id.is_present()
            || self.related_appointment_id.is_present()
            || self.date_time.is_present()
            || self.condition.is_present()
            || self.specialization.is_present()
            || self.status.is_present()
            || self.comments.is_present()
            || self.description.is_present()
            || self.prescriptions.is_present()
            || self.tests.is_present())
    }
}
