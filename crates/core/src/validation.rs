//! Input validation utilities.
//!
//! This module turns untrusted request payloads into typed values before any store access
//! happens. Appointment updates are checked field by field and every violation is collected,
//! so a client sees all problems with its payload at once.

use crate::patch::{AppointmentPatch, Field};
use crate::{EazydocError, EazydocResult};
use api_shared::{AppointmentStatus, ValidationIssue};
use chrono::{DateTime, Utc};
use eazydoc_types::{EmailAddress, NonEmptyText};
use serde_json::{Map, Value};

/// Validate a raw `PUT /api/appointments/{id}` body into an [`AppointmentPatch`].
///
/// Every key is optional. Unknown keys are ignored. `null` is not accepted for any field.
///
/// # Errors
///
/// Returns every [`ValidationIssue`] found when the payload does not match the schema.
pub fn parse_appointment_update(body: &Value) -> Result<AppointmentPatch, Vec<ValidationIssue>> {
    let Some(obj) = body.as_object() else {
        return Err(vec![invalid_type(&[], "object", body)]);
    };

    let mut issues = Vec::new();

    let patch = AppointmentPatch {
        doctor_id: id_field(obj, "doctorId", &mut issues),
        ambulance_id: id_field(obj, "ambulanceId", &mut issues),
        related_appointment_id: id_field(obj, "relatedAppointmentId", &mut issues),
        date_time: datetime_field(obj, "dateTime", &mut issues),
        condition: string_field(obj, "condition", &mut issues),
        specialization: string_field(obj, "specialization", &mut issues),
        status: status_field(obj, "status", &mut issues),
        comments: string_field(obj, "comments", &mut issues),
        description: string_field(obj, "description", &mut issues),
        prescriptions: string_list_field(obj, "prescriptions", &mut issues),
        tests: string_list_field(obj, "tests", &mut issues),
    };

    if issues.is_empty() {
        Ok(patch)
    } else {
        Err(issues)
    }
}

/// Parse an ISO-8601 UTC timestamp of the form `YYYY-MM-DDTHH:MM:SS[.fff]Z`.
pub fn parse_utc_timestamp(input: &str) -> Option<DateTime<Utc>> {
    if !input.ends_with('Z') || input.as_bytes().get(10) != Some(&b'T') {
        return None;
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// A registration request that passed validation.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: NonEmptyText,
    pub email: EmailAddress,
    pub password: String,
}

/// Validate the fields of a create-user request.
///
/// # Errors
///
/// Returns `EazydocError::InvalidInput` naming the first offending field.
pub fn validate_new_user(
    name: &str,
    email: &str,
    password: &str,
    min_password_len: usize,
) -> EazydocResult<NewUser> {
    let name =
        NonEmptyText::new(name).map_err(|_| EazydocError::InvalidInput("Name is required".into()))?;
    let email = EmailAddress::parse(email)
        .map_err(|_| EazydocError::InvalidInput("A valid email address is required".into()))?;

    if password.chars().count() < min_password_len {
        return Err(EazydocError::InvalidInput(format!(
            "Password must be at least {min_password_len} characters"
        )));
    }

    Ok(NewUser {
        name,
        email,
        password: password.to_owned(),
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn invalid_type(path: &[&str], expected: &str, received: &Value) -> ValidationIssue {
    ValidationIssue {
        code: "invalid_type".into(),
        path: path.iter().map(|p| p.to_string()).collect(),
        message: format!(
            "Expected {expected}, received {}",
            json_type_name(received)
        ),
    }
}

fn string_field(obj: &Map<String, Value>, key: &str, issues: &mut Vec<ValidationIssue>) -> Field<String> {
    match obj.get(key) {
        None => Field::Absent,
        Some(Value::String(s)) => Field::Present(s.clone()),
        Some(other) => {
            issues.push(invalid_type(&[key], "string", other));
            Field::Absent
        }
    }
}

fn id_field(obj: &Map<String, Value>, key: &str, issues: &mut Vec<ValidationIssue>) -> Field<String> {
    match string_field(obj, key, issues) {
        Field::Present(id) if id.trim().is_empty() => {
            issues.push(ValidationIssue {
                code: "too_small".into(),
                path: vec![key.to_string()],
                message: "String must contain at least 1 character(s)".into(),
            });
            Field::Absent
        }
        field => field,
    }
}

fn datetime_field(
    obj: &Map<String, Value>,
    key: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Field<DateTime<Utc>> {
    match string_field(obj, key, issues) {
        Field::Absent => Field::Absent,
        Field::Present(raw) => match parse_utc_timestamp(&raw) {
            Some(ts) => Field::Present(ts),
            None => {
                issues.push(ValidationIssue {
                    code: "invalid_string".into(),
                    path: vec![key.to_string()],
                    message: "Invalid datetime".into(),
                });
                Field::Absent
            }
        },
    }
}

fn status_field(
    obj: &Map<String, Value>,
    key: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Field<AppointmentStatus> {
    let Some(value) = obj.get(key) else {
        return Field::Absent;
    };

    if let Some(status) = value.as_str().and_then(AppointmentStatus::from_wire) {
        return Field::Present(status);
    }

    let expected = AppointmentStatus::ALL
        .iter()
        .map(|s| format!("'{s}'"))
        .collect::<Vec<_>>()
        .join(" | ");
    let received = match value {
        Value::String(s) => format!("'{s}'"),
        other => json_type_name(other).to_string(),
    };
    issues.push(ValidationIssue {
        code: "invalid_enum_value".into(),
        path: vec![key.to_string()],
        message: format!("Invalid enum value. Expected {expected}, received {received}"),
    });
    Field::Absent
}

fn string_list_field(
    obj: &Map<String, Value>,
    key: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Field<Vec<String>> {
    let items = match obj.get(key) {
        None => return Field::Absent,
        Some(Value::Array(items)) => items,
        Some(other) => {
            issues.push(invalid_type(&[key], "array", other));
            return Field::Absent;
        }
    };

    let mut out = Vec::with_capacity(items.len());
    let mut ok = true;
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::String(s) => out.push(s.clone()),
            other => {
                ok = false;
                let index = index.to_string();
                issues.push(invalid_type(&[key, index.as_str()], "string", other));
            }
        }
    }

    if ok {
        Field::Present(out)
    } else {
        Field::Absent
    }
}
