//! User registration.
//!
//! Creates a user account together with its linked patient record. Self-registered
//! accounts always get the `patient` role; doctors and administrators are provisioned
//! out of band.

use crate::config::CoreConfig;
use crate::constants::USER_EXISTS_MESSAGE;
use crate::error::{EazydocError, EazydocResult};
use crate::password::hash_password;
use crate::store::{new_id, Database, UserRecord};
use crate::validation::validate_new_user;
use api_shared::{CreateUserReq, UserRole, UserSummary};
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct UserService {
    cfg: Arc<CoreConfig>,
    db: Arc<Database>,
}

impl UserService {
    pub fn new(cfg: Arc<CoreConfig>, db: Arc<Database>) -> Self {
        Self { cfg, db }
    }

    /// Register a new patient account.
    ///
    /// The password is hashed before the store is locked; the uniqueness check and both
    /// inserts then run in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns `EazydocError` if:
    /// - a field fails validation ([`EazydocError::InvalidInput`])
    /// - the email is already registered, compared case-insensitively
    ///   ([`EazydocError::Conflict`])
    /// - hashing or persisting fails
    pub fn create_user(&self, req: CreateUserReq) -> EazydocResult<UserSummary> {
        let new_user = validate_new_user(
            &req.name,
            &req.email,
            &req.password,
            self.cfg.min_password_len(),
        )?;
        let password_hash = hash_password(&new_user.password)?;
        let email_key = new_user.email.normalised();

        self.db.transaction(|tables| {
            if tables.find_user_by_email(&email_key).is_some() {
                return Err(EazydocError::Conflict(USER_EXISTS_MESSAGE.into()));
            }

            let user = UserRecord {
                id: new_id(),
                name: new_user.name.to_string(),
                email: new_user.email.to_string(),
                password_hash,
                role: UserRole::Patient,
                created_at: Utc::now(),
            };
            tables.insert_patient(user.name.clone(), Some(user.id.clone()));

            let summary = UserSummary {
                id: user.id.clone(),
                name: user.name.clone(),
                email: user.email.clone(),
                role: user.role,
            };
            tables.users.insert(user.id.clone(), user);

            tracing::info!(user_id = %summary.id, "user registered");
            Ok(summary)
        })
    }

    /// Number of registered users.
    pub fn count(&self) -> EazydocResult<usize> {
        self.db.read(|tables| tables.users.len())
    }
}
