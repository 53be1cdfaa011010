use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{day, Person};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GoverningBodyKind {
    #[default]
    Generale,
    Dipartimentale,
}

impl GoverningBodyKind {
    pub fn label(self) -> &'static str {
        match self {
            GoverningBodyKind::Generale => "Generale",
            GoverningBodyKind::Dipartimentale => "Dipartimentale",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "GENERALE" => Some(GoverningBodyKind::Generale),
            "DIPARTIMENTALE" => Some(GoverningBodyKind::Dipartimentale),
            _ => None,
        }
    }
}

/// A term of office of the general board or of a departmental board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoverningBody {
    pub id: i64,
    #[serde(rename = "tipo")]
    pub kind: GoverningBodyKind,
    #[serde(rename = "dipartimentoId", default)]
    pub department_id: Option<i64>,
    #[serde(rename = "dipartimentoCodice", default)]
    pub department_code: Option<String>,
    #[serde(rename = "annoAccademico", default)]
    pub academic_year: Option<String>,
    #[serde(rename = "inizioMandato", deserialize_with = "day::deserialize")]
    pub term_start: NaiveDate,
    #[serde(rename = "fineMandato", default, deserialize_with = "day::option::deserialize")]
    pub term_end: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(rename = "attivo", default)]
    pub active: bool,
}

impl GoverningBody {
    /// Card heading: the department code for departmental boards, the kind label otherwise.
    pub fn title(&self) -> String {
        match (self.department_id, self.department_code.as_deref()) {
            (Some(_), Some(code)) if !code.trim().is_empty() => code.trim().to_string(),
            (Some(_), _) => String::new(),
            (None, _) => self.kind.label().to_string(),
        }
    }

    /// "Direttivo generale" / "Direttivo dipartimentale".
    pub fn header_label(&self) -> String {
        format!("Direttivo {}", self.kind.label().to_lowercase())
    }

    pub fn date_range(&self) -> String {
        let start = self.term_start.format("%d/%m/%Y");
        match self.term_end {
            Some(end) => format!("dal {start} al {}", end.format("%d/%m/%Y")),
            None => format!("dal {start}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoverningBodyRequest {
    pub id: Option<i64>,
    #[serde(rename = "tipo")]
    pub kind: GoverningBodyKind,
    #[serde(rename = "dipartimentoId")]
    pub department_id: Option<i64>,
    #[serde(rename = "inizioMandato")]
    pub term_start: NaiveDate,
    #[serde(rename = "fineMandato")]
    pub term_end: Option<NaiveDate>,
}

/// Body of membership create and role change; the role travels as its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipRequest {
    #[serde(rename = "personaId")]
    pub person_id: i64,
    #[serde(rename = "direttivoId")]
    pub governing_body_id: i64,
    #[serde(rename = "ruoloNelDirettivo")]
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    #[serde(rename = "personaResponseDTO")]
    pub person: Person,
    #[serde(rename = "direttivoId", default)]
    pub governing_body_id: Option<i64>,
    #[serde(rename = "ruoloNelDirettivo", default)]
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: serde_json::Value) -> GoverningBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn decodes_timestamps_as_days() {
        let b = body(json!({
            "id": 1, "tipo": "GENERALE",
            "inizioMandato": "2024-10-01T00:00:00", "fineMandato": "2025-09-30",
            "attivo": true
        }));
        assert_eq!(b.term_start, NaiveDate::from_ymd_opt(2024, 10, 1).unwrap());
        assert_eq!(b.term_end, NaiveDate::from_ymd_opt(2025, 9, 30));
        assert_eq!(b.title(), "Generale");
        assert_eq!(b.date_range(), "dal 01/10/2024 al 30/09/2025");
    }

    #[test]
    fn departmental_title_is_department_code() {
        let b = body(json!({
            "id": 2, "tipo": "DIPARTIMENTALE", "dipartimentoId": 7, "dipartimentoCodice": "ING",
            "inizioMandato": "2024-10-01", "attivo": false
        }));
        assert_eq!(b.title(), "ING");
        assert_eq!(b.header_label(), "Direttivo dipartimentale");
        assert_eq!(b.date_range(), "dal 01/10/2024");
    }

    #[test]
    fn request_keeps_null_department() {
        let req = GoverningBodyRequest {
            id: None,
            kind: GoverningBodyKind::Generale,
            department_id: None,
            term_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            term_end: None,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"id": null, "tipo": "GENERALE", "dipartimentoId": null,
                   "inizioMandato": "2024-01-01", "fineMandato": null})
        );
    }
}
