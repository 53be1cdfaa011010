use std::sync::Arc;

use tracing::info;

use super::{failure_message, is_direttivo, Confirmation};
use crate::app::Backoffice;
use crate::forms::{validators, FieldError, FormErrors};
use crate::models::roles::DEFAULT_ROLE_CODE;
use crate::models::{
    display_role_label, normalize_role_code, role_label, GoverningBody, Membership, MembershipRequest, Person,
};
use crate::navigation::{NavigationState, Navigator, Route};
use crate::services::GoverningBodyService;
use crate::session::SessionStore;

/// Only people with this application role can join a board.
const CANDIDATE_ROLE: &str = "STAFF";

fn check_role(code: &str) -> Option<FieldError> {
    validators::required(code).or_else(|| normalize_role_code(code).is_none().then_some(FieldError::Invalid))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddMemberForm {
    pub person_id: Option<i64>,
    pub role_code: String,
    pub touched: bool,
}

impl Default for AddMemberForm {
    fn default() -> Self {
        Self {
            person_id: None,
            role_code: DEFAULT_ROLE_CODE.to_string(),
            touched: false,
        }
    }
}

impl AddMemberForm {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        errors.check("personaId", validators::required_some(&self.person_id));
        errors.check("ruoloDirettivo", check_role(&self.role_code));
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleForm {
    pub role_code: String,
    pub touched: bool,
}

impl Default for RoleForm {
    fn default() -> Self {
        Self {
            role_code: DEFAULT_ROLE_CODE.to_string(),
            touched: false,
        }
    }
}

/// Members of one governing body.
pub struct MembersScreen {
    service: GoverningBodyService,
    session: Arc<SessionStore>,
    navigator: Navigator,

    pub governing_body_id: i64,
    /// Handed over by the list page; absent on direct entry.
    pub governing_body: Option<GoverningBody>,
    pub members: Vec<Membership>,
    pub loading: bool,
    pub error_msg: Option<String>,

    pub add_modal_open: bool,
    pub available: Vec<Person>,
    pub loading_available: bool,
    pub add_form: AddMemberForm,

    pub remove: Confirmation<Membership>,

    pub role_change: Confirmation<Membership>,
    pub role_form: RoleForm,
}

impl MembersScreen {
    pub fn new(app: &Backoffice, governing_body_id: i64) -> Self {
        let governing_body = match app.navigator().location().state {
            Some(NavigationState::GoverningBody(body)) if body.id == governing_body_id => Some(*body),
            _ => None,
        };

        Self {
            service: app.governing_bodies(),
            session: app.session().clone(),
            navigator: app.navigator().clone(),
            governing_body_id,
            governing_body,
            members: Vec::new(),
            loading: false,
            error_msg: None,
            add_modal_open: false,
            available: Vec::new(),
            loading_available: false,
            add_form: AddMemberForm::default(),
            remove: Confirmation::default(),
            role_change: Confirmation::default(),
            role_form: RoleForm::default(),
        }
    }

    pub fn can_manage(&self) -> bool {
        is_direttivo(self.session.current().as_ref())
    }

    pub fn header_label(&self) -> String {
        self.governing_body
            .as_ref()
            .map(GoverningBody::header_label)
            .unwrap_or_else(|| "Direttivo".to_string())
    }

    pub fn role_label(value: &str) -> String {
        display_role_label(value)
    }

    pub async fn activate(&mut self) {
        self.load_members().await;
    }

    pub async fn back(&self) -> Route {
        self.navigator.navigate(Route::GoverningBodies).await
    }

    pub async fn load_members(&mut self) {
        self.loading = true;
        self.error_msg = None;

        match self.service.members(self.governing_body_id).await {
            Ok(list) => self.members = list,
            Err(e) => {
                self.members.clear();
                self.error_msg = failure_message(&e, "Recupero non riuscito.");
            }
        }
        self.loading = false;
    }

    fn membership_body_id(&self, member: &Membership) -> i64 {
        member.governing_body_id.unwrap_or(self.governing_body_id)
    }

    // role change

    /// Preselect the member's current role, or the default when it is unknown.
    pub fn open_role_modal(&mut self, member: &Membership) {
        self.role_form = RoleForm {
            role_code: normalize_role_code(&member.role)
                .unwrap_or(DEFAULT_ROLE_CODE)
                .to_string(),
            touched: false,
        };
        self.role_change.arm(member.clone());
    }

    pub fn close_role_modal(&mut self) {
        self.role_change.cancel();
    }

    pub async fn confirm_role_change(&mut self) {
        let Some(member) = self.role_change.pending().cloned() else {
            return;
        };
        let Some(label) = role_label(&self.role_form.role_code) else {
            self.role_form.touched = true;
            return;
        };

        let request = MembershipRequest {
            person_id: member.person.id,
            governing_body_id: self.membership_body_id(&member),
            role: label.to_string(),
        };

        self.loading = true;
        self.error_msg = None;
        let result = self.service.change_member_role(&request).await;
        self.loading = false;

        match result {
            Ok(()) => {
                info!("Member {} is now {}", member.person.id, label);
                self.close_role_modal();
                self.load_members().await;
            }
            Err(e) => self.error_msg = failure_message(&e, "Modifica non riuscita."),
        }
    }

    // add

    pub async fn open_add_modal(&mut self) {
        self.add_modal_open = true;
        self.error_msg = None;
        self.add_form = AddMemberForm::default();
        self.load_available().await;
    }

    pub fn close_add_modal(&mut self) {
        self.add_modal_open = false;
    }

    pub async fn load_available(&mut self) {
        self.loading_available = true;

        match self
            .service
            .available_persons(CANDIDATE_ROLE, self.governing_body_id)
            .await
        {
            Ok(list) => self.available = list,
            Err(e) => {
                self.available.clear();
                self.error_msg = failure_message(&e, "Recupero non riuscito");
            }
        }
        self.loading_available = false;
    }

    pub async fn add_member(&mut self) {
        if !self.add_form.validate().is_empty() {
            self.add_form.touched = true;
            return;
        }
        let (Some(person_id), Some(label)) = (self.add_form.person_id, role_label(&self.add_form.role_code)) else {
            return;
        };

        let request = MembershipRequest {
            person_id,
            governing_body_id: self.governing_body_id,
            role: label.to_string(),
        };

        self.loading = true;
        self.error_msg = None;
        let result = self.service.add_member(&request).await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.close_add_modal();
                self.load_members().await;
            }
            Err(e) => self.error_msg = failure_message(&e, "Assegnazione non riuscita."),
        }
    }

    // remove

    pub fn open_remove(&mut self, member: &Membership) {
        self.remove.arm(member.clone());
    }

    pub fn close_remove(&mut self) {
        self.remove.cancel();
    }

    pub async fn confirm_remove(&mut self) {
        let Some(member) = self.remove.take() else {
            return;
        };
        let body_id = self.membership_body_id(&member);

        self.loading = true;
        self.error_msg = None;
        let result = self.service.remove_member(member.person.id, body_id).await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.load_members().await;
                if self.add_modal_open {
                    self.load_available().await;
                }
            }
            Err(e) => self.error_msg = failure_message(&e, "Rimozione non riuscita."),
        }
    }

    /// Escape priority: role change, then remove, then add.
    pub fn escape(&mut self) {
        if self.role_change.is_armed() {
            self.close_role_modal();
        } else if self.remove.is_armed() {
            self.close_remove();
        } else if self.add_modal_open {
            self.close_add_modal();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_form_requires_person_and_known_role() {
        let mut form = AddMemberForm::default();
        assert!(form.validate().has("personaId", &FieldError::Required));
        assert!(form.validate().field("ruoloDirettivo").is_empty());

        form.person_id = Some(3);
        form.role_code = "CASSIERE".into();
        assert!(form.validate().has("ruoloDirettivo", &FieldError::Invalid));

        form.role_code = "Vice tesoriere".into();
        assert!(form.validate().is_empty());
    }
}
