//! # Eazydoc Client
//!
//! Client-side state for the Eazydoc web front end, expressed without any UI toolkit:
//! - [`registration`]: the login/register dialog and its submit flow
//! - [`session`]: the explicit authentication context handed to components
//! - [`navigation`]: per-role navigation tables and route access checks
//! - [`dashboard`]: the dashboard shell computing what the frame shows
//! - [`http`]: a `reqwest` implementation of the network seams
//!
//! Wire types come from `api-shared`, the same crate the server uses.

pub mod dashboard;
pub mod error;
pub mod http;
pub mod navigation;
pub mod registration;
pub mod session;

pub use dashboard::{DashboardFrame, DashboardShell};
pub use error::{ClientError, ClientResult};
pub use http::HttpUserApi;
pub use navigation::{navigation, Icon, NavItem, RouteGuard};
pub use registration::{LoginDialog, RegisterData, SubmitOutcome, Tab, UserApi};
pub use session::{AuthContext, Session, SessionUser};
