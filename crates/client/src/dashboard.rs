//! Dashboard shell.
//!
//! The shell wraps every dashboard page. Rendering produces a [`DashboardFrame`]: a header
//! with the user's avatar initial plus the same navigation list laid out twice, once as the
//! mobile off-canvas sheet and once as the desktop sidebar. Nothing is rendered until the
//! shell has been mounted, so the role is known before any navigation is shown.

use crate::navigation::{navigation, NavItem};
use crate::session::Session;

const DEFAULT_AVATAR_INITIAL: char = 'U';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelKind {
    MobileSheet,
    DesktopSidebar,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavEntry {
    pub item: &'static NavItem,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavPanel {
    pub kind: PanelKind,
    pub entries: Vec<NavEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardFrame {
    pub avatar_initial: char,
    pub user_name: Option<String>,
    pub mobile: NavPanel,
    pub desktop: NavPanel,
}

impl DashboardFrame {
    /// Label of the highlighted entry, if the current path is a navigation target.
    pub fn active_label(&self) -> Option<&'static str> {
        self.desktop
            .entries
            .iter()
            .find(|e| e.active)
            .map(|e| e.item.label)
    }
}

/// Uppercased first character of the name, or `U` when there is no usable name.
pub fn avatar_initial(name: Option<&str>) -> char {
    name.and_then(|n| n.trim().chars().next())
        .map(|c| c.to_uppercase().next().unwrap_or(c))
        .unwrap_or(DEFAULT_AVATAR_INITIAL)
}

#[derive(Clone, Debug, Default)]
pub struct DashboardShell {
    mounted: bool,
    current_path: String,
}

impl DashboardShell {
    pub fn new(current_path: impl Into<String>) -> Self {
        Self {
            mounted: false,
            current_path: current_path.into(),
        }
    }

    pub fn mount(&mut self) {
        self.mounted = true;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn navigate(&mut self, path: impl Into<String>) {
        self.current_path = path.into();
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn render(&self, session: &impl Session) -> Option<DashboardFrame> {
        if !self.mounted {
            return None;
        }

        let entries: Vec<NavEntry> = navigation(session.role())
            .iter()
            .map(|item| NavEntry {
                item,
                active: item.path == self.current_path,
            })
            .collect();

        let user_name = session.user().map(|u| u.name.clone());
        Some(DashboardFrame {
            avatar_initial: avatar_initial(user_name.as_deref()),
            user_name,
            mobile: NavPanel {
                kind: PanelKind::MobileSheet,
                entries: entries.clone(),
            },
            desktop: NavPanel {
                kind: PanelKind::DesktopSidebar,
                entries,
            },
        })
    }

    /// Sign out through the session. The shell keeps no state of its own to reset.
    pub fn logout(&self, session: &mut impl Session) {
        session.logout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{AuthContext, SessionUser};
    use api_shared::UserRole;

    fn session(name: &str, role: Option<UserRole>) -> AuthContext {
        AuthContext::init(Some(SessionUser {
            id: "u1".into(),
            name: name.into(),
            email: "u1@example.com".into(),
            role,
        }))
    }

    struct CountingSession {
        user: Option<SessionUser>,
        logouts: usize,
    }

    impl Session for CountingSession {
        fn user(&self) -> Option<&SessionUser> {
            self.user.as_ref()
        }

        fn logout(&mut self) {
            self.logouts += 1;
        }
    }

    #[test]
    fn nothing_renders_before_mount() {
        let shell = DashboardShell::new("/dashboard");
        assert!(shell.render(&session("Jane", Some(UserRole::Patient))).is_none());
    }

    #[test]
    fn both_panels_share_entries_and_highlight() {
        let mut shell = DashboardShell::new("/docs/appointments");
        shell.mount();

        let frame = shell
            .render(&session("Gregory", Some(UserRole::Doctor)))
            .expect("mounted shell renders");
        assert_eq!(frame.mobile.entries, frame.desktop.entries);
        assert_eq!(frame.mobile.kind, PanelKind::MobileSheet);
        assert_eq!(frame.active_label(), Some("Appointments"));
        assert_eq!(frame.desktop.entries.iter().filter(|e| e.active).count(), 1);
        assert_eq!(frame.avatar_initial, 'G');
    }

    #[test]
    fn unknown_path_highlights_nothing() {
        let mut shell = DashboardShell::new("/dashboard");
        shell.mount();
        shell.navigate("/elsewhere");

        let frame = shell.render(&session("Jane", Some(UserRole::Patient))).unwrap();
        assert_eq!(frame.active_label(), None);
    }

    #[test]
    fn missing_role_renders_empty_navigation() {
        let mut shell = DashboardShell::new("/dashboard");
        shell.mount();

        let frame = shell.render(&AuthContext::default()).unwrap();
        assert!(frame.desktop.entries.is_empty());
        assert_eq!(frame.avatar_initial, 'U');
        assert_eq!(frame.user_name, None);
    }

    #[test]
    fn avatar_initial_is_uppercased_with_fallback() {
        assert_eq!(avatar_initial(Some("  ")), 'U');
        assert_eq!(avatar_initial(Some("ana")), 'A');
        assert_eq!(avatar_initial(Some("élodie")), 'É');
        assert_eq!(avatar_initial(None), 'U');
    }

    #[test]
    fn logout_only_delegates() {
        let mut shell = DashboardShell::new("/admin/patients");
        shell.mount();
        let mut counting = CountingSession {
            user: None,
            logouts: 0,
        };

        shell.logout(&mut counting);
        assert_eq!(counting.logouts, 1);
        assert!(shell.is_mounted());
        assert_eq!(shell.current_path(), "/admin/patients");
    }
}
