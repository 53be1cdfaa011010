use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.to_string(),
        }
    }
}

/// Authenticated user as returned by login and as persisted on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "id")]
    pub user_id: i64,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "cognome", default)]
    pub surname: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "ruoli", default)]
    pub roles: Vec<String>,
    pub token: String,
}

impl Session {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }
}

/// Which password endpoint a link targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordAction {
    Create,
    Change,
}

impl PasswordAction {
    /// Accepts the link spellings in any case: crea/create/creapassword, modifica/update/modificapassword.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "crea" | "create" | "creapassword" => Some(PasswordAction::Create),
            "modifica" | "update" | "modificapassword" => Some(PasswordAction::Change),
            _ => None,
        }
    }

    pub fn segment(self) -> &'static str {
        match self {
            PasswordAction::Create => "crea",
            PasswordAction::Change => "modifica",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordSetRequest {
    pub password: String,
    pub token: String,
}
