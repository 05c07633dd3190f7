//! Authenticated identity.
//!
//! [`AuthContext`] is created once when the application loads and passed by reference to
//! whatever needs the current user. Components depend on the [`Session`] trait so they can
//! be exercised without a real login.

use api_shared::{UserRole, UserSummary};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Option<UserRole>,
}

impl From<UserSummary> for SessionUser {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: Some(user.role),
        }
    }
}

pub trait Session {
    fn user(&self) -> Option<&SessionUser>;

    fn role(&self) -> Option<UserRole> {
        self.user().and_then(|u| u.role)
    }

    /// End the session.
    fn logout(&mut self);
}

#[derive(Clone, Debug, Default)]
pub struct AuthContext {
    user: Option<SessionUser>,
}

impl AuthContext {
    /// Initialise with whatever identity was restored on load.
    pub fn init(user: Option<SessionUser>) -> Self {
        Self { user }
    }

    pub fn sign_in(&mut self, user: SessionUser) {
        tracing::debug!(user_id = %user.id, "session started");
        self.user = Some(user);
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl Session for AuthContext {
    fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::debug!(user_id = %user.id, "session ended");
        }
    }
}
