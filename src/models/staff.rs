use serde::{Deserialize, Serialize};

use super::{role_names, Course, Keyed, RepresentativeSource};

/// Staff directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffCard {
    pub id: i64,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "cognome", default)]
    pub surname: String,
    #[serde(rename = "mail", alias = "email", default)]
    pub email: Option<String>,
    #[serde(rename = "ruoli", default, deserialize_with = "role_names::deserialize")]
    pub roles: Vec<String>,
    #[serde(rename = "corsoDiStudi", default)]
    pub course: Option<Course>,
    #[serde(rename = "annoCorso", default)]
    pub year: Option<i32>,
    #[serde(rename = "fotoUrl", default)]
    pub photo_url: Option<String>,
    #[serde(rename = "fotoThumbnailUrl", default)]
    pub photo_thumbnail_url: Option<String>,
    #[serde(rename = "direttivoRuoli", default)]
    pub governing_roles: Option<Vec<String>>,
    #[serde(rename = "rappresentanze", default)]
    pub representatives: Option<RepresentativeSource>,
}

impl StaffCard {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    pub fn department(&self) -> Option<&super::Department> {
        self.course.as_ref().and_then(|c| c.department.as_ref())
    }

    /// Thumbnail when present, else the full photo.
    pub fn photo(&self) -> Option<&str> {
        self.photo_thumbnail_url
            .as_deref()
            .or(self.photo_url.as_deref())
            .filter(|u| !u.trim().is_empty())
    }
}

impl Keyed for StaffCard {
    fn key(&self) -> i64 {
        self.id
    }
}
