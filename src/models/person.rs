use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{role_names, Keyed};

/// Application-level roles a person can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Direttivo,
    DirettivoDipartimentale,
    Staff,
    Rappresentante,
    ResponsabileUfficio,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Direttivo => "DIRETTIVO",
            Role::DirettivoDipartimentale => "DIRETTIVO_DIPARTIMENTALE",
            Role::Staff => "STAFF",
            Role::Rappresentante => "RAPPRESENTANTE",
            Role::ResponsabileUfficio => "RESPONSABILE_UFFICIO",
            Role::User => "USER",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Direttivo => "Direttivo",
            Role::DirettivoDipartimentale => "Direttivo Dipartimentale",
            Role::Staff => "Staff",
            Role::Rappresentante => "Rappresentante",
            Role::ResponsabileUfficio => "Responsabile Ufficio",
            Role::User => "Utente",
        }
    }
}

/// Person as returned inside memberships and candidate lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "cognome", default)]
    pub surname: String,
    #[serde(default, alias = "mail", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "ruoli", default, deserialize_with = "role_names::deserialize")]
    pub roles: Vec<String>,
    #[serde(rename = "corsoDiStudi", default, skip_serializing_if = "Option::is_none")]
    pub course: Option<Value>,
    #[serde(rename = "annoCorso", default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }
}

impl Keyed for Person {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Body of person create (admin) and personal-data update (staff).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "cognome")]
    pub surname: String,
    pub email: String,
    #[serde(rename = "corsoDiStudiId")]
    pub course_id: Option<i64>,
    #[serde(rename = "annoCorso")]
    pub year: Option<i32>,
    #[serde(rename = "ufficioId", skip_serializing_if = "Option::is_none")]
    pub office_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<bool>,
    #[serde(rename = "ruoli")]
    pub roles: Vec<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roles_accept_strings_and_objects() {
        let p: Person = serde_json::from_value(json!({
            "id": 1, "nome": "Anna", "cognome": "Neri",
            "ruoli": ["STAFF", {"nome": "DIRETTIVO"}, {"authority": "USER"}, " "]
        }))
        .unwrap();
        assert_eq!(p.roles, vec!["STAFF", "DIRETTIVO", "USER"]);
        assert_eq!(p.full_name(), "Anna Neri");
    }

    #[test]
    fn request_serializes_roles_as_codes() {
        let req = PersonRequest {
            id: None,
            name: "Anna".into(),
            surname: "Neri".into(),
            email: "anna@uni.it".into(),
            course_id: Some(2),
            year: None,
            office_id: None,
            staff: Some(true),
            roles: vec![Role::User, Role::Staff],
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["ruoli"], json!(["USER", "STAFF"]));
        assert_eq!(v["annoCorso"], Value::Null);
        assert!(v.get("ufficioId").is_none());
    }
}
