//! Record services.
//!
//! Each service wraps the shared [`Database`](crate::store::Database) and exposes the
//! operations of one resource.

pub mod appointments;
pub mod users;
