use super::{DependentOptions, LoadTicket};
use crate::forms::{validators, FormErrors};
use crate::models::{Course, PersonRequest, Role, StaffCard};

/// Personal data of a person, shared by staff creation and the edit panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonForm {
    pub id: Option<i64>,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub department_id: Option<i64>,
    pub course_id: Option<i64>,
    pub year: Option<i32>,
    pub staff: bool,
    pub touched: bool,
    /// Read-only view (a member looking at their own card).
    pub disabled: bool,
}

impl Default for PersonForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            surname: String::new(),
            email: String::new(),
            department_id: None,
            course_id: None,
            year: None,
            staff: true,
            touched: false,
            disabled: false,
        }
    }
}

/// `STAFF` also matches prefixed variants such as `ROLE_STAFF`.
fn has_role(card: &StaffCard, role: &str) -> bool {
    let target = role.to_uppercase();
    let suffix = format!("_{target}");
    card.roles.iter().any(|r| {
        let r = r.trim().to_uppercase();
        r == target || r.ends_with(&suffix)
    })
}

impl PersonForm {
    pub fn from_card(card: &StaffCard) -> Self {
        Self {
            id: Some(card.id),
            name: card.name.clone(),
            surname: card.surname.clone(),
            email: card.email.clone().unwrap_or_default(),
            department_id: card.department().map(|d| d.id),
            course_id: card.course.as_ref().map(|c| c.id),
            year: card.year,
            staff: has_role(card, "STAFF"),
            touched: false,
            disabled: false,
        }
    }

    /// The course is checked only while its field accepts input.
    pub fn validate(&self, course_enabled: bool) -> FormErrors {
        let mut errors = FormErrors::new();
        errors.check("nome", validators::required_min(&self.name, 2));
        errors.check("cognome", validators::required_min(&self.surname, 2));
        errors.check(
            "email",
            validators::required(&self.email).or_else(|| validators::email(self.email.trim())),
        );
        errors.check("dipartimentoId", validators::required_some(&self.department_id));
        if course_enabled {
            errors.check("corsoDiStudiId", validators::required_some(&self.course_id));
        }
        errors
    }

    /// New people are always USER, plus STAFF when flagged.
    pub fn create_request(&self) -> PersonRequest {
        let mut roles = vec![Role::User];
        if self.staff {
            roles.push(Role::Staff);
        }
        PersonRequest {
            id: None,
            name: self.name.trim().to_string(),
            surname: self.surname.trim().to_string(),
            email: self.email.trim().to_string(),
            course_id: self.course_id,
            year: self.year,
            office_id: None,
            staff: Some(self.staff),
            roles,
        }
    }

    /// Personal-data update; roles are left to the server.
    pub fn update_request(&self) -> PersonRequest {
        PersonRequest {
            id: self.id,
            name: self.name.trim().to_string(),
            surname: self.surname.trim().to_string(),
            email: self.email.trim().to_string(),
            course_id: self.course_id,
            year: self.year,
            office_id: None,
            staff: Some(self.staff),
            roles: Vec::new(),
        }
    }

    /// Pick a department: clears the course and starts a fresh course list.
    pub fn select_department(
        &mut self,
        courses: &mut DependentOptions<Course>,
        department_id: Option<i64>,
    ) -> Option<LoadTicket> {
        if department_id == self.department_id && courses.parent() == department_id {
            return None;
        }
        self.department_id = department_id;
        self.course_id = None;
        courses.select_parent(department_id)
    }

    /// Accepted only when the course is offered for the current department.
    pub fn select_course(&mut self, courses: &DependentOptions<Course>, course_id: Option<i64>) -> bool {
        match course_id {
            None => {
                self.course_id = None;
                true
            }
            Some(id) if courses.is_enabled() && courses.contains(id) => {
                self.course_id = Some(id);
                true
            }
            Some(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card() -> StaffCard {
        serde_json::from_value(json!({
            "id": 4, "nome": "Sara", "cognome": "Verdi", "mail": "sara@uni.it",
            "ruoli": ["USER", "ROLE_STAFF"],
            "corsoDiStudi": {"id": 8, "nome": "Fisica", "tipoCorso": "MAGISTRALE",
                             "dipartimento": {"id": 2, "nome": "Scienze", "codice": "SCI"}},
            "annoCorso": 1
        }))
        .unwrap()
    }

    #[test]
    fn populated_from_card() {
        let form = PersonForm::from_card(&card());
        assert_eq!(form.id, Some(4));
        assert_eq!(form.department_id, Some(2));
        assert_eq!(form.course_id, Some(8));
        assert!(form.staff);
    }

    #[test]
    fn create_roles_follow_staff_flag() {
        let mut form = PersonForm::default();
        assert_eq!(form.create_request().roles, vec![Role::User, Role::Staff]);
        form.staff = false;
        assert_eq!(form.create_request().roles, vec![Role::User]);
        assert!(PersonForm::from_card(&card()).update_request().roles.is_empty());
    }

    #[test]
    fn course_required_only_when_enabled() {
        let form = PersonForm {
            name: "Sara".into(),
            surname: "Verdi".into(),
            email: "sara@uni.it".into(),
            department_id: Some(2),
            ..Default::default()
        };
        assert!(form.validate(false).is_empty());
        assert!(!form.validate(true).is_empty());
    }

    #[test]
    fn department_change_clears_course() {
        let mut form = PersonForm::from_card(&card());
        let mut courses = DependentOptions::default();
        assert!(form.select_department(&mut courses, Some(3)).is_some());
        assert_eq!(form.course_id, None);
        assert!(!form.select_course(&courses, Some(8)));
    }
}
