use serde::{Deserialize, Serialize};

use super::{Department, Keyed};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseType {
    #[default]
    Triennale,
    Magistrale,
    CicloUnico,
    Altra,
}

impl CourseType {
    pub const ALL: [CourseType; 4] = [
        CourseType::Triennale,
        CourseType::Magistrale,
        CourseType::CicloUnico,
        CourseType::Altra,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CourseType::Triennale => "Triennale",
            CourseType::Magistrale => "Magistrale",
            CourseType::CicloUnico => "Ciclo Unico",
            CourseType::Altra => "Altra",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            CourseType::Triennale => "TRIENNALE",
            CourseType::Magistrale => "MAGISTRALE",
            CourseType::CicloUnico => "CICLO_UNICO",
            CourseType::Altra => "ALTRA",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(code))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipoCorso", default)]
    pub course_type: CourseType,
    #[serde(rename = "dipartimento", default, skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
}

impl Keyed for Course {
    fn key(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "dipartimentoId")]
    pub department_id: i64,
    #[serde(rename = "tipoCorso")]
    pub course_type: CourseType,
}

impl CourseRequest {
    pub fn new(id: Option<i64>, name: &str, department_id: i64, course_type: CourseType) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            department_id,
            course_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn course_type_wire_codes() {
        assert_eq!(serde_json::to_value(CourseType::CicloUnico).unwrap(), json!("CICLO_UNICO"));
        assert_eq!(CourseType::from_code("magistrale"), Some(CourseType::Magistrale));
        assert_eq!(CourseType::from_code("dottorato"), None);
    }

    #[test]
    fn request_payload() {
        let req = CourseRequest::new(None, " Informatica ", 4, CourseType::Triennale);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"nome": "Informatica", "dipartimentoId": 4, "tipoCorso": "TRIENNALE"})
        );
    }
}
