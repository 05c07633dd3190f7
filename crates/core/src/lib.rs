//! # Eazydoc Core
//!
//! Core business logic for the Eazydoc scheduling service.
//!
//! This crate contains pure data operations:
//! - A transactional record store with optional JSON persistence under `EAZYDOC_DATA_DIR`
//! - Appointment fetch/update/delete with relation management
//! - Update-payload validation into sparse patches
//! - User registration with Argon2 password hashing
//!
//! **No API concerns**: HTTP servers, status codes and CORS belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod error;
pub mod password;
pub mod patch;
pub mod repositories;
pub mod seed;
pub mod store;
pub mod validation;

// Use the shared api-shared crate for wire types.
pub use api_shared as wire;

pub use config::CoreConfig;
pub use constants::DEFAULT_DATA_DIR;
pub use error::{EazydocError, EazydocResult};
pub use patch::{AppointmentPatch, Field};
pub use repositories::appointments::{AppointmentService, DeletedAppointment, NewAppointment};
pub use repositories::users::UserService;
pub use store::Database;
