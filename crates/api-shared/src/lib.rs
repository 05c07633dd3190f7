//! # API Shared
//!
//! Shared definitions for the Eazydoc server and client.
//!
//! Contains:
//! - Wire models (`models` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `eazydoc-core`, `api-rest` and `eazydoc-client`.

pub mod health;
pub mod models;

pub use health::HealthService;
pub use models::*;
