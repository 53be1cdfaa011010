//! Wire shapes of the remote API and their client-side views.

pub mod auth;
pub mod course;
pub mod department;
pub mod governing_body;
pub mod person;
pub mod representative;
pub mod roles;
pub mod staff;

pub use auth::{LoginRequest, PasswordAction, PasswordSetRequest, Session};
pub use course::{Course, CourseRequest, CourseType};
pub use department::{Department, DepartmentRequest};
pub use governing_body::{GoverningBody, GoverningBodyKind, GoverningBodyRequest, Membership, MembershipRequest};
pub use person::{Person, PersonRequest, Role};
pub use representative::{
    patch_views, RepresentativeAssignmentRequest, RepresentativeBody, RepresentativeRecord, RepresentativeSource,
    RepresentativeView,
};
pub use roles::{display_role_label, normalize_role_code, role_label, GoverningRole, GOVERNING_ROLES};
pub use staff::StaffCard;

/// Anything listed by numeric id.
pub trait Keyed {
    fn key(&self) -> i64;
}

/// Dates arrive either as `YYYY-MM-DD` or as a full timestamp; only the day is kept.
pub(crate) mod day {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer};

    fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
    }

    pub mod option {
        use super::*;

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
            let raw = Option::<String>::deserialize(d)?;
            Ok(raw.as_deref().and_then(parse))
        }
    }
}

/// Role lists come as plain strings or as objects carrying `nome`, `name` or `authority`.
pub(crate) mod role_names {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Name(String),
        Object {
            #[serde(alias = "name", alias = "authority")]
            nome: Option<String>,
        },
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        let entries = Option::<Vec<Entry>>::deserialize(d)?.unwrap_or_default();
        Ok(entries
            .into_iter()
            .filter_map(|e| match e {
                Entry::Name(n) => Some(n),
                Entry::Object { nome } => nome,
            })
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect())
    }
}
