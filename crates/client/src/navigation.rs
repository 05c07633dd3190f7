//! Role navigation tables.
//!
//! Each role maps to a fixed, ordered list of entries. A missing role has no navigation.

use api_shared::UserRole;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    LayoutDashboard,
    Calendar,
    ClipboardList,
    User,
    Settings,
    Shield,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
    pub icon: Icon,
}

const fn item(label: &'static str, path: &'static str, icon: Icon) -> NavItem {
    NavItem { label, path, icon }
}

const PATIENT_NAV: &[NavItem] = &[
    item("Overview", "/dashboard", Icon::LayoutDashboard),
    item("Appointments", "/dashboard/appointments", Icon::Calendar),
    item("Lab Results", "/dashboard/lab-results", Icon::ClipboardList),
    item("Profile", "/dashboard/profile", Icon::User),
    item("Settings", "/dashboard/settings", Icon::Settings),
];

const DOCTOR_NAV: &[NavItem] = &[
    item("Dashboard", "/docs", Icon::LayoutDashboard),
    item("Appointments", "/docs/appointments", Icon::Calendar),
    item("Status", "/docs/status", Icon::User),
    item("Settings", "/docs/settings", Icon::Settings),
];

const ADMIN_NAV: &[NavItem] = &[
    item("Patients", "/admin/patients", Icon::LayoutDashboard),
    item("Doctors", "/admin/doctors", Icon::Shield),
    item("Appointments", "/admin/appointments", Icon::ClipboardList),
    item("Ambulances", "/admin/ambulances", Icon::Settings),
];

pub fn navigation(role: Option<UserRole>) -> &'static [NavItem] {
    match role {
        Some(UserRole::Patient) => PATIENT_NAV,
        Some(UserRole::Doctor) => DOCTOR_NAV,
        Some(UserRole::Admin) => ADMIN_NAV,
        None => &[],
    }
}

/// Access check for a page restricted to some roles.
#[derive(Clone, Copy, Debug)]
pub struct RouteGuard {
    allowed: &'static [UserRole],
}

impl RouteGuard {
    pub const PATIENT: RouteGuard = RouteGuard::new(&[UserRole::Patient]);
    pub const DOCTOR: RouteGuard = RouteGuard::new(&[UserRole::Doctor]);
    pub const ADMIN: RouteGuard = RouteGuard::new(&[UserRole::Admin]);

    pub const fn new(allowed: &'static [UserRole]) -> Self {
        Self { allowed }
    }

    pub fn allows(&self, role: Option<UserRole>) -> bool {
        role.is_some_and(|r| self.allowed.contains(&r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(role: Option<UserRole>) -> Vec<&'static str> {
        navigation(role).iter().map(|i| i.label).collect()
    }

    #[test]
    fn tables_per_role() {
        assert_eq!(
            labels(Some(UserRole::Patient)),
            ["Overview", "Appointments", "Lab Results", "Profile", "Settings"]
        );
        assert_eq!(
            labels(Some(UserRole::Doctor)),
            ["Dashboard", "Appointments", "Status", "Settings"]
        );
        assert_eq!(
            labels(Some(UserRole::Admin)),
            ["Patients", "Doctors", "Appointments", "Ambulances"]
        );
    }

    #[test]
    fn no_role_means_no_navigation() {
        assert!(navigation(None).is_empty());
    }

    #[test]
    fn paths_are_scoped_by_role() {
        assert!(navigation(Some(UserRole::Doctor))
            .iter()
            .all(|i| i.path.starts_with("/docs")));
        assert!(navigation(Some(UserRole::Admin))
            .iter()
            .all(|i| i.path.starts_with("/admin/")));
    }

    #[test]
    fn guard_checks_membership() {
        let staff = RouteGuard::new(&[UserRole::Doctor, UserRole::Admin]);
        assert!(staff.allows(Some(UserRole::Admin)));
        assert!(!staff.allows(Some(UserRole::Patient)));
        assert!(!staff.allows(None));
        assert!(RouteGuard::PATIENT.allows(Some(UserRole::Patient)));
    }
}
