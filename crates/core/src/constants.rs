//! Constants used throughout the Eazydoc core crate.
//!
//! This module contains filenames, defaults and user-facing messages so that the
//! server and tests agree on them.

/// Default directory for persisted data when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "eazydoc_data";

/// Filename of the JSON snapshot inside the data directory.
pub const DATABASE_FILENAME: &str = "database.json";

/// Minimum accepted password length for new accounts.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Confirmation returned by a successful appointment delete.
pub const APPOINTMENT_DELETED_MESSAGE: &str = "Appointment deleted successfully";

/// Confirmation returned by a successful user creation.
pub const USER_CREATED_MESSAGE: &str = "User created successfully";

/// Returned when registering an email that already has an account.
pub const USER_EXISTS_MESSAGE: &str = "User already exists";
