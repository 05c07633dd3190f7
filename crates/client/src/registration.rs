//! Login/registration dialog.
//!
//! The dialog has two tabs. Only the register tab submits anything: it checks that both
//! password fields agree, then calls [`UserApi::create_user`]. A successful registration
//! switches to the login tab; the user signs in separately.
//!
//! Submission is split into [`LoginDialog::begin_submit`] and
//! [`LoginDialog::complete_submit`] so a caller driving its own event loop can keep the
//! dialog interactive while the request is in flight. [`LoginDialog::submit`] runs both.

use crate::error::ClientResult;
use api_shared::{CreateUserFailure, CreateUserReq, CreateUserRes};
use async_trait::async_trait;

pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match";
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Server answer to a create-user request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreateUserResponse {
    Created(CreateUserRes),
    Failed { status: u16, body: CreateUserFailure },
}

/// Network seam for account creation.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// Returns `Err` only when no HTTP response was obtained.
    async fn create_user(&self, req: &CreateUserReq) -> ClientResult<CreateUserResponse>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Login,
    Register,
}

/// Register tab form fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterData {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Account created; the dialog is now on the login tab.
    Registered(CreateUserRes),
    /// Rejected locally or by the server; the message is in [`LoginDialog::error`].
    Rejected,
    /// A submission is already in flight.
    Busy,
}

#[derive(Clone, Debug, Default)]
pub struct LoginDialog {
    active_tab: Tab,
    pub register: RegisterData,
    loading: bool,
    error: Option<String>,
}

impl LoginDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the dialog on the register tab ("Sign up" link).
    pub fn for_registration() -> Self {
        Self {
            active_tab: Tab::Register,
            ..Self::default()
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start a register submission.
    ///
    /// Clears any previous error and sets the loading flag. Returns the request to send,
    /// or the outcome when nothing should be sent: [`SubmitOutcome::Busy`] while another
    /// submission is in flight, [`SubmitOutcome::Rejected`] when the passwords differ (the
    /// loading flag is cleared again in that case).
    pub fn begin_submit(&mut self) -> Result<CreateUserReq, SubmitOutcome> {
        if self.loading {
            return Err(SubmitOutcome::Busy);
        }
        self.error = None;
        self.loading = true;

        if self.register.password != self.register.confirm_password {
            self.error = Some(PASSWORD_MISMATCH_MESSAGE.to_string());
            self.loading = false;
            return Err(SubmitOutcome::Rejected);
        }

        Ok(CreateUserReq {
            name: self.register.name.clone(),
            email: self.register.email.clone(),
            password: self.register.password.clone(),
        })
    }

    /// Finish a submission started with [`begin_submit`](Self::begin_submit).
    pub fn complete_submit(&mut self, result: ClientResult<CreateUserResponse>) -> SubmitOutcome {
        self.loading = false;

        match result {
            Ok(CreateUserResponse::Created(res)) => {
                self.register = RegisterData::default();
                self.active_tab = Tab::Login;
                SubmitOutcome::Registered(res)
            }
            Ok(CreateUserResponse::Failed { status, body }) => {
                tracing::debug!(status, "registration rejected by server");
                self.error = Some(
                    body.message
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string()),
                );
                SubmitOutcome::Rejected
            }
            Err(e) => {
                tracing::error!("Registration request error: {:?}", e);
                self.error = Some(FALLBACK_ERROR_MESSAGE.to_string());
                SubmitOutcome::Rejected
            }
        }
    }

    /// Validate, send and apply the result of a register submission.
    pub async fn submit(&mut self, api: &dyn UserApi) -> SubmitOutcome {
        let req = match self.begin_submit() {
            Ok(req) => req,
            Err(outcome) => return outcome,
        };
        let result = api.create_user(&req).await;
        self.complete_submit(result)
    }
}
