//! # API REST
//!
//! REST API implementation for Eazydoc.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! Uses `eazydoc-core` for all data operations and `api-shared` for wire types.

#![warn(rust_2018_idioms)]

use api_shared::{
    AmbulanceSummary, AppointmentDetail, AppointmentStatus, AppointmentSummary, CreateUserFailure,
    CreateUserReq, CreateUserRes, DoctorSummary, ErrorRes, HealthRes, HealthService, MessageRes,
    PatientSummary, UpdateAppointmentReq, UserRole, UserSummary, ValidationErrorRes,
    ValidationIssue,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use eazydoc_core::{
    config::{data_dir_from_env_values, flag_from_env_value},
    constants::{APPOINTMENT_DELETED_MESSAGE, USER_CREATED_MESSAGE},
    AppointmentService, CoreConfig, Database, EazydocError, EazydocResult, UserService,
    DEFAULT_DATA_DIR,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Opaque body for internal errors when detail exposure is disabled.
const INTERNAL_ERROR_MESSAGE: &str = "Internal error";

/// Settings for a REST server, resolved once at startup.
#[derive(Clone, Debug)]
pub struct RestConfig {
    pub addr: String,
    pub core: Arc<CoreConfig>,
    /// Whether 500 bodies carry the underlying error message.
    pub expose_internal_errors: bool,
}

impl RestConfig {
    /// Resolve settings from the process environment.
    ///
    /// # Environment Variables
    /// - `EAZYDOC_REST_ADDR`: Server address (default: "0.0.0.0:3000")
    /// - `EAZYDOC_DATA_DIR`: Directory for the persisted store (default: "eazydoc_data")
    /// - `EAZYDOC_IN_MEMORY`: When true, nothing is persisted
    /// - `EAZYDOC_EXPOSE_INTERNAL_ERRORS`: Include error detail in 500 bodies (default: true)
    ///
    /// # Errors
    /// Returns an error if a flag is not a boolean or the data directory is unusable.
    pub fn from_env() -> EazydocResult<Self> {
        let addr = std::env::var("EAZYDOC_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
        let data_dir = data_dir_from_env_values(
            std::env::var("EAZYDOC_DATA_DIR").ok(),
            std::env::var("EAZYDOC_IN_MEMORY").ok(),
            DEFAULT_DATA_DIR,
        )?;
        let expose_internal_errors = flag_from_env_value(
            "EAZYDOC_EXPOSE_INTERNAL_ERRORS",
            std::env::var("EAZYDOC_EXPOSE_INTERNAL_ERRORS").ok(),
            true,
        )?;

        Ok(Self {
            addr,
            core: Arc::new(CoreConfig::new(data_dir)?),
            expose_internal_errors,
        })
    }
}

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    appointments: AppointmentService,
    users: UserService,
    expose_internal_errors: bool,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>, db: Arc<Database>, expose_internal_errors: bool) -> Self {
        Self {
            appointments: AppointmentService::new(db.clone()),
            users: UserService::new(cfg, db),
            expose_internal_errors,
        }
    }

    fn internal_message(&self, err: &EazydocError) -> String {
        if self.expose_internal_errors {
            err.to_string()
        } else {
            INTERNAL_ERROR_MESSAGE.to_string()
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        fetch_appointment,
        update_appointment,
        delete_appointment,
        create_user,
    ),
    components(schemas(
        HealthRes,
        AppointmentStatus,
        AppointmentDetail,
        AppointmentSummary,
        PatientSummary,
        DoctorSummary,
        AmbulanceSummary,
        UpdateAppointmentReq,
        ValidationIssue,
        ValidationErrorRes,
        ErrorRes,
        MessageRes,
        CreateUserReq,
        CreateUserRes,
        CreateUserFailure,
        UserSummary,
        UserRole,
    ))
)]
pub struct ApiDoc;

/// Build the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/appointments/:id",
            get(fetch_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
        .route("/api/user", post(create_user))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Map a core error from an appointment operation to `{error}` bodies.
fn appointment_error(state: &AppState, context: &str, err: EazydocError) -> Response {
    match err {
        EazydocError::Validation(issues) => (
            StatusCode::BAD_REQUEST,
            Json(ValidationErrorRes { error: issues }),
        )
            .into_response(),
        err @ EazydocError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            Json(ErrorRes {
                error: err.to_string(),
            }),
        )
            .into_response(),
        other => {
            tracing::error!("{} error: {:?}", context, other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRes {
                    error: state.internal_message(&other),
                }),
            )
                .into_response()
        }
    }
}

/// Map a core error from user creation to `{message}` bodies.
fn user_error(state: &AppState, err: EazydocError) -> Response {
    let (status, message) = match err {
        EazydocError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        EazydocError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        other => {
            tracing::error!("Create user error: {:?}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                state.internal_message(&other),
            )
        }
    };
    (status, Json(MessageRes { message })).into_response()
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the Eazydoc REST API service.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment with patient, doctor, ambulance and related appointments", body = AppointmentDetail),
        (status = 404, description = "Appointment not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Fetch one appointment joined with all of its relations.
///
/// # Errors
/// Returns `404 Not Found` when no appointment has this id and `500 Internal Server Error`
/// when the store fails.
#[axum::debug_handler]
async fn fetch_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AppointmentDetail>, Response> {
    state
        .appointments
        .fetch(&id)
        .map(Json)
        .map_err(|e| appointment_error(&state, "Fetch appointment", e))
}

#[utoipa::path(
    put,
    path = "/api/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = UpdateAppointmentReq,
    responses(
        (status = 200, description = "Updated appointment with patient, doctor and ambulance", body = AppointmentDetail),
        (status = 400, description = "Payload failed validation", body = ValidationErrorRes),
        (status = 404, description = "Appointment or referenced record not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Apply a sparse update to an appointment.
///
/// The body is validated in full before anything is written; every violation is reported.
/// Only fields present in the body change.
///
/// # Errors
/// Returns `400 Bad Request` for malformed JSON or schema violations, `404 Not Found` when
/// the appointment or a referenced doctor/ambulance/appointment does not exist.
#[axum::debug_handler]
async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<AppointmentDetail>, Response> {
    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Rejected update body: {}", e);
            let issue = ValidationIssue {
                code: "invalid_json".into(),
                path: vec![],
                message: format!("Malformed JSON body: {e}"),
            };
            return Err(appointment_error(
                &state,
                "Update appointment",
                EazydocError::Validation(vec![issue]),
            ));
        }
    };

    state
        .appointments
        .update_from_json(&id, &payload)
        .map(Json)
        .map_err(|e| appointment_error(&state, "Update appointment", e))
}

#[utoipa::path(
    delete,
    path = "/api/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment deleted", body = MessageRes),
        (status = 404, description = "Appointment not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Delete an appointment after detaching it from every appointment that relates to it.
///
/// Detaching and deleting are committed together or not at all.
#[axum::debug_handler]
async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageRes>, Response> {
    state
        .appointments
        .delete(&id)
        .map(|_| {
            Json(MessageRes {
                message: APPOINTMENT_DELETED_MESSAGE.into(),
            })
        })
        .map_err(|e| appointment_error(&state, "Delete appointment", e))
}

#[utoipa::path(
    post,
    path = "/api/user",
    request_body = CreateUserReq,
    responses(
        (status = 201, description = "User created", body = CreateUserRes),
        (status = 400, description = "Bad request", body = MessageRes),
        (status = 409, description = "Email already registered", body = MessageRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
/// Register a new patient account.
///
/// Password hashing runs on the blocking pool.
#[axum::debug_handler]
async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateUserRes>), Response> {
    let req: CreateUserReq = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!("Rejected create user body: {}", e);
        (
            StatusCode::BAD_REQUEST,
            Json(MessageRes {
                message: "Request body must contain name, email and password".into(),
            }),
        )
            .into_response()
    })?;

    let users = state.users.clone();
    let created = tokio::task::spawn_blocking(move || users.create_user(req))
        .await
        .map_err(|e| {
            tracing::error!("Create user task failed: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageRes {
                    message: INTERNAL_ERROR_MESSAGE.into(),
                }),
            )
                .into_response()
        })?;

    match created {
        Ok(user) => Ok((
            StatusCode::CREATED,
            Json(CreateUserRes {
                message: USER_CREATED_MESSAGE.into(),
                user,
            }),
        )),
        Err(e) => Err(user_error(&state, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use eazydoc_core::seed::{seed_demo, SeedSummary};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> (Router, SeedSummary) {
        let db = Arc::new(Database::in_memory());
        let seeded = seed_demo(db.clone()).expect("seed should succeed");
        let state = AppState::new(Arc::new(CoreConfig::in_memory()), db, true);
        (router(state), seeded)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (app, _) = app();
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], json!(true));
    }

    #[tokio::test]
    async fn get_returns_joined_appointment() {
        let (app, seeded) = app();
        let checkup = &seeded.appointment_ids[0];

        let (status, body) = send(&app, Method::GET, &format!("/api/appointments/{checkup}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], json!(checkup));
        assert_eq!(body["patient"]["name"], json!("Alex Morgan"));
        assert_eq!(body["doctor"]["name"], json!("Dr Priya Shah"));
        assert_eq!(body["ambulance"], Value::Null);
        assert_eq!(body["relatedAppointments"][0]["id"], json!(seeded.appointment_ids[1]));
        assert_eq!(body["relatedTo"], json!([]));
    }

    #[tokio::test]
    async fn get_missing_is_404() {
        let (app, _) = app();
        let (status, body) = send(&app, Method::GET, "/api/appointments/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Appointment not found" }));
    }

    #[tokio::test]
    async fn put_status_only_changes_status() {
        let (app, seeded) = app();
        let id = &seeded.appointment_ids[0];
        let uri = format!("/api/appointments/{id}");

        let (_, before) = send(&app, Method::GET, &uri, None).await;
        let (status, after) =
            send(&app, Method::PUT, &uri, Some(json!({ "status": "COMPLETED" }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(after["status"], json!("COMPLETED"));
        for key in ["dateTime", "condition", "specialization", "tests", "prescriptions", "doctorId"] {
            assert_eq!(after[key], before[key], "{key} should be unchanged");
        }
        assert!(after.get("relatedAppointments").is_none());
    }

    #[tokio::test]
    async fn put_invalid_payload_is_400_with_issues() {
        let (app, seeded) = app();
        let uri = format!("/api/appointments/{}", seeded.appointment_ids[0]);

        let (status, body) = send(
            &app,
            Method::PUT,
            &uri,
            Some(json!({ "status": "FINISHED", "tests": "ECG" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"].as_array().map(Vec::len), Some(2));

        let (_, stored) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(stored["status"], json!("NEW"));
    }

    #[tokio::test]
    async fn put_malformed_json_is_400() {
        let (app, seeded) = app();
        let request = Request::builder()
            .method(Method::PUT)
            .uri(format!("/api/appointments/{}", seeded.appointment_ids[0]))
            .header("content-type", "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn put_unknown_doctor_is_404() {
        let (app, seeded) = app();
        let uri = format!("/api/appointments/{}", seeded.appointment_ids[0]);
        let (status, body) =
            send(&app, Method::PUT, &uri, Some(json!({ "doctorId": "ghost" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], json!("Doctor not found"));
    }

    #[tokio::test]
    async fn delete_cleans_relations_and_confirms() {
        let (app, seeded) = app();
        let checkup = &seeded.appointment_ids[0];
        let follow_up = &seeded.appointment_ids[1];

        let (status, body) =
            send(&app, Method::DELETE, &format!("/api/appointments/{checkup}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Appointment deleted successfully" }));

        let (status, _) = send(&app, Method::GET, &format!("/api/appointments/{checkup}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, follow) =
            send(&app, Method::GET, &format!("/api/appointments/{follow_up}"), None).await;
        assert_eq!(follow["relatedTo"], json!([]));
    }

    #[tokio::test]
    async fn delete_missing_is_404() {
        let (app, _) = app();
        let (status, _) = send(&app, Method::DELETE, "/api/appointments/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_user_then_duplicate_conflicts() {
        let (app, _) = app();
        let req = json!({ "name": "Jane", "email": "jane@example.com", "password": "longenough" });

        let (status, body) = send(&app, Method::POST, "/api/user", Some(req.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], json!("User created successfully"));
        assert_eq!(body["user"]["role"], json!("patient"));
        assert!(body["user"].get("passwordHash").is_none());

        let (status, body) = send(&app, Method::POST, "/api/user", Some(req)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "message": "User already exists" }));
    }

    #[tokio::test]
    async fn create_user_rejects_short_password() {
        let (app, _) = app();
        let req = json!({ "name": "Jane", "email": "jane@example.com", "password": "short" });
        let (status, body) = send(&app, Method::POST, "/api/user", Some(req)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("at least 8"));
    }

    #[test]
    fn internal_errors_can_be_opaque() {
        let state = AppState::new(
            Arc::new(CoreConfig::in_memory()),
            Arc::new(Database::in_memory()),
            false,
        );
        assert_eq!(
            state.internal_message(&EazydocError::LockPoisoned),
            INTERNAL_ERROR_MESSAGE
        );
    }
}
