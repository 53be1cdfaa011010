use serde::{Deserialize, Serialize};

use super::Keyed;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "codice")]
    pub code: String,
}

impl Keyed for Department {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Body of department create, update and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "codice")]
    pub code: String,
}

impl DepartmentRequest {
    /// Name is trimmed, code is trimmed and uppercased.
    pub fn new(id: Option<i64>, name: &str, code: &str) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            code: code.trim().to_uppercase(),
        }
    }
}

impl From<&Department> for DepartmentRequest {
    fn from(d: &Department) -> Self {
        Self {
            id: Some(d.id),
            name: d.name.clone(),
            code: d.code.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_normalizes_name_and_code() {
        let req = DepartmentRequest::new(None, "  Ingegneria ", " ing ");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"nome": "Ingegneria", "codice": "ING"})
        );
    }

    #[test]
    fn decodes_wire_shape() {
        let d: Department =
            serde_json::from_value(json!({"id": 3, "nome": "Economia", "codice": "ECO"})).unwrap();
        assert_eq!(d.name, "Economia");
        assert_eq!(d.key(), 3);
    }
}
