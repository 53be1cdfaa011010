//! Headless screens: the state and actions behind each back-office page.
//!
//! Screens never talk HTTP directly; they hold services and shared handles
//! from [`crate::Backoffice`] and expose plain state for a front end to render.

pub mod cascade;
pub mod confirm;
pub mod courses;
pub mod departments;
pub mod governing_bodies;
pub mod login;
pub mod members;
pub mod password_set;
pub mod person_form;
pub mod staff;
pub mod staff_edit;

use crate::error::{extract_api_error_message, ClientError};
use crate::models::Session;

pub use cascade::{DependentOptions, LazyOptions, LoadTicket};
pub use confirm::Confirmation;
pub use courses::CoursesScreen;
pub use departments::DepartmentsScreen;
pub use governing_bodies::GoverningBodiesScreen;
pub use login::LoginScreen;
pub use members::MembersScreen;
pub use password_set::PasswordSetScreen;
pub use person_form::PersonForm;
pub use staff::StaffScreen;
pub use staff_edit::{EditTab, PanelEvent, StaffEditPanel};

pub const ROLE_DIRETTIVO: &str = "DIRETTIVO";
pub const ROLE_DIRETTIVO_DIPARTIMENTALE: &str = "DIRETTIVO_DIPARTIMENTALE";

/// Full management rights on departments, courses and staff.
pub fn is_direttivo(session: Option<&Session>) -> bool {
    session.is_some_and(|s| s.has_role(ROLE_DIRETTIVO))
}

/// Either board role; enough to manage staff.
pub fn is_privileged(session: Option<&Session>) -> bool {
    session.is_some_and(|s| s.has_role(ROLE_DIRETTIVO) || s.has_role(ROLE_DIRETTIVO_DIPARTIMENTALE))
}

/// Message to show for a failed call; `None` for failures the session guard already handled.
pub(crate) fn failure_message(err: &ClientError, fallback: &str) -> Option<String> {
    if err.is_session_expired() {
        return None;
    }
    Some(extract_api_error_message(err, fallback))
}
