use std::fmt;

use super::guard::Guard;

/// Every location the back office can be at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Welcome,
    Login,
    /// Password link; both segments stay raw so the page can report what is wrong.
    PasswordSet { action: String, persona_id: String },
    Dashboard,
    Departments,
    Courses { department_id: i64 },
    Staff,
    GoverningBodies,
    GoverningBodyMembers { governing_body_id: i64 },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Welcome => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::PasswordSet { action, persona_id } => format!("/password/{action}/{persona_id}"),
            Route::Dashboard => "/backoffice/dashboard".to_string(),
            Route::Departments => "/backoffice/dipartimenti".to_string(),
            Route::Courses { department_id } => format!("/backoffice/dipartimenti/{department_id}/corsi"),
            Route::Staff => "/backoffice/staff".to_string(),
            Route::GoverningBodies => "/backoffice/direttivi".to_string(),
            Route::GoverningBodyMembers { governing_body_id } => {
                format!("/backoffice/direttivi/{governing_body_id}/membri")
            }
        }
    }

    /// Parse a path (query string ignored). Anything unknown, `index.html`
    /// included, lands on the welcome page.
    pub fn parse(path: &str) -> Route {
        Self::match_path(path).unwrap_or(Route::Welcome)
    }

    fn match_path(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::Welcome),
            ["login"] => Some(Route::Login),
            ["password", action, persona_id] => Some(Route::PasswordSet {
                action: action.to_string(),
                persona_id: persona_id.to_string(),
            }),
            ["backoffice"] | ["backoffice", "dashboard"] => Some(Route::Dashboard),
            ["backoffice", "dipartimenti"] => Some(Route::Departments),
            ["backoffice", "dipartimenti", id, "corsi"] => id
                .parse()
                .ok()
                .map(|department_id| Route::Courses { department_id }),
            ["backoffice", "staff"] => Some(Route::Staff),
            ["backoffice", "direttivi"] => Some(Route::GoverningBodies),
            ["backoffice", "direttivi", id, "membri"] => id
                .parse()
                .ok()
                .map(|governing_body_id| Route::GoverningBodyMembers { governing_body_id }),
            _ => None,
        }
    }

    pub fn guard(&self) -> Option<Guard> {
        match self {
            Route::PasswordSet { .. } => None,
            Route::Welcome | Route::Login => Some(Guard::PublicOnly),
            Route::Dashboard
            | Route::Departments
            | Route::Courses { .. }
            | Route::Staff
            | Route::GoverningBodies
            | Route::GoverningBodyMembers { .. } => Some(Guard::Protected),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
