//! Roles inside a governing body.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoverningRole {
    pub code: &'static str,
    pub label: &'static str,
    pub order: u8,
}

pub const GOVERNING_ROLES: &[GoverningRole] = &[
    GoverningRole { code: "PRESIDENTE", label: "Presidente", order: 1 },
    GoverningRole { code: "VICE_PRESIDENTE", label: "Vicepresidente", order: 2 },
    GoverningRole { code: "SEGRETARIO", label: "Segretario", order: 3 },
    GoverningRole { code: "VICE_SEGRETARIO", label: "Vicesegretario", order: 4 },
    GoverningRole { code: "TESORIERE", label: "Tesoriere", order: 5 },
    GoverningRole { code: "VICE_TESORIERE", label: "Vice tesoriere", order: 6 },
    GoverningRole { code: "RESPONSABILE_COMUNICAZIONE", label: "Responsabile comunicazione", order: 7 },
    GoverningRole { code: "VICE_RESPONSABILE_COMUNICAZIONE", label: "Vice responsabile comunicazione", order: 8 },
    GoverningRole { code: "RESPONSABILE_ORGANIZZAZIONE", label: "Responsabile organizzazione", order: 9 },
    GoverningRole { code: "VICE_RESPONSABILE_ORGANIZZAZIONE", label: "Vice responsabile organizzazione", order: 10 },
    GoverningRole { code: "SOCIO_CONSIGLIERE", label: "Socio Consigliere", order: 11 },
    GoverningRole { code: "PRESIDENTE_DIPARTIMENTALE", label: "Presidente dipartimentale", order: 1 },
];

/// Role preselected when adding a member.
pub const DEFAULT_ROLE_CODE: &str = "SOCIO_CONSIGLIERE";

fn fold(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn find(value: &str) -> Option<&'static GoverningRole> {
    let folded = fold(value);
    if folded.is_empty() {
        return None;
    }
    GOVERNING_ROLES
        .iter()
        .find(|r| r.code.to_lowercase() == folded)
        .or_else(|| GOVERNING_ROLES.iter().find(|r| fold(r.label) == folded))
}

/// Canonical code for either a code or a label; case and inner spacing are ignored.
pub fn normalize_role_code(value: &str) -> Option<&'static str> {
    find(value).map(|r| r.code)
}

pub fn role_label(code: &str) -> Option<&'static str> {
    find(code).map(|r| r.label)
}

/// Label for display; unknown values pass through unchanged, blanks become "-".
pub fn display_role_label(value: &str) -> String {
    if value.trim().is_empty() {
        return "-".to_string();
    }
    match find(value) {
        Some(role) => role.label.to_string(),
        None => value.to_string(),
    }
}

/// Roles in display order.
pub fn sorted_roles() -> Vec<&'static GoverningRole> {
    let mut roles: Vec<_> = GOVERNING_ROLES.iter().collect();
    roles.sort_by_key(|r| r.order);
    roles
}
