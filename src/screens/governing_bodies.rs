use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use super::{failure_message, is_direttivo, Confirmation, LazyOptions};
use crate::app::Backoffice;
use crate::error::GENERIC_FAILURE;
use crate::forms::{validators, FormErrors};
use crate::models::{Department, GoverningBody, GoverningBodyKind, GoverningBodyRequest};
use crate::navigation::{NavigationState, Navigator, Route};
use crate::services::{DepartmentService, GoverningBodyService};
use crate::session::SessionStore;

const LOAD_FAILED: &str = "Errore durante il recupero dei direttivi";
const DEPARTMENTS_FAILED: &str = "Errore durante il recupero dei dipartimenti.";
const DELETE_FAILED: &str = "Eliminazione non riuscita.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GoverningBodyField {
    Kind,
    Department,
    TermStart,
}

impl GoverningBodyField {
    fn key(self) -> &'static str {
        match self {
            GoverningBodyField::Kind => "tipo",
            GoverningBodyField::Department => "dipartimentoId",
            GoverningBodyField::TermStart => "inizioMandato",
        }
    }
}

/// Create/edit form. Which fields are required follows from the kind alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoverningBodyForm {
    pub kind: GoverningBodyKind,
    pub department_id: Option<i64>,
    pub term_start: Option<NaiveDate>,
    pub term_end: Option<NaiveDate>,
    pub touched: bool,
}

impl GoverningBodyForm {
    pub fn required_fields(&self) -> BTreeSet<GoverningBodyField> {
        let mut fields = BTreeSet::from([GoverningBodyField::Kind, GoverningBodyField::TermStart]);
        if self.kind == GoverningBodyKind::Dipartimentale {
            fields.insert(GoverningBodyField::Department);
        }
        fields
    }

    pub fn department_enabled(&self) -> bool {
        self.kind == GoverningBodyKind::Dipartimentale
    }

    /// Switch kind. Leaving or entering departmental clears the department;
    /// general keeps it cleared. Returns whether department options are needed.
    pub fn set_kind(&mut self, kind: GoverningBodyKind) -> bool {
        if kind != self.kind || kind == GoverningBodyKind::Generale {
            self.department_id = None;
        }
        self.kind = kind;
        kind == GoverningBodyKind::Dipartimentale
    }

    /// Errors are computed from the current state only, never carried over.
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        for field in self.required_fields() {
            let missing = match field {
                GoverningBodyField::Kind => None,
                GoverningBodyField::Department => validators::required_some(&self.department_id),
                GoverningBodyField::TermStart => validators::required_some(&self.term_start),
            };
            errors.check(field.key(), missing);
        }
        errors
    }

    pub fn from_body(body: &GoverningBody) -> Self {
        Self {
            kind: body.kind,
            department_id: body.department_id,
            term_start: Some(body.term_start),
            term_end: body.term_end,
            touched: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoverningBodyFilters {
    pub only_active: bool,
    pub start_from: Option<NaiveDate>,
    pub end_to: Option<NaiveDate>,
}

impl Default for GoverningBodyFilters {
    fn default() -> Self {
        Self {
            only_active: true,
            start_from: None,
            end_to: None,
        }
    }
}

impl GoverningBodyFilters {
    /// Missing dates never exclude a body.
    pub fn matches(&self, body: &GoverningBody) -> bool {
        if self.only_active && !body.active {
            return false;
        }
        if let Some(from) = self.start_from {
            if body.term_start < from {
                return false;
            }
        }
        if let (Some(to), Some(end)) = (self.end_to, body.term_end) {
            if end > to {
                return false;
            }
        }
        true
    }
}

pub struct GoverningBodiesScreen {
    service: GoverningBodyService,
    departments: DepartmentService,
    session: Arc<SessionStore>,
    navigator: Navigator,

    pub bodies: Vec<GoverningBody>,
    pub filtered: Vec<GoverningBody>,
    pub filters: GoverningBodyFilters,
    pub loading: bool,
    pub error_msg: Option<String>,

    pub modal_open: bool,
    pub editing: Option<GoverningBody>,
    pub form: GoverningBodyForm,
    /// Sorted by code; fetched the first time a departmental body is edited.
    pub department_options: LazyOptions<Department>,

    pub delete: Confirmation<GoverningBody>,
}

impl GoverningBodiesScreen {
    pub fn new(app: &Backoffice) -> Self {
        Self {
            service: app.governing_bodies(),
            departments: app.departments(),
            session: app.session().clone(),
            navigator: app.navigator().clone(),
            bodies: Vec::new(),
            filtered: Vec::new(),
            filters: GoverningBodyFilters::default(),
            loading: false,
            error_msg: None,
            modal_open: false,
            editing: None,
            form: GoverningBodyForm::default(),
            department_options: LazyOptions::default(),
            delete: Confirmation::default(),
        }
    }

    pub fn can_manage(&self) -> bool {
        is_direttivo(self.session.current().as_ref())
    }

    pub async fn activate(&mut self) {
        self.load_all().await;
    }

    pub async fn load_all(&mut self) {
        self.loading = true;
        self.error_msg = None;

        match self.service.list().await {
            Ok(list) => {
                self.bodies = list;
                self.apply_filters();
            }
            Err(e) => self.error_msg = failure_message(&e, LOAD_FAILED),
        }
        self.loading = false;
    }

    pub fn set_filters(&mut self, filters: GoverningBodyFilters) {
        self.filters = filters;
        self.apply_filters();
    }

    fn apply_filters(&mut self) {
        self.filtered = self
            .bodies
            .iter()
            .filter(|b| self.filters.matches(b))
            .cloned()
            .collect();
    }

    /// Card text: heading, then the term of office.
    pub fn card_title(body: &GoverningBody) -> String {
        format!("{}\n{}", body.title(), body.date_range())
    }

    pub async fn open_members(&self, body: &GoverningBody) -> Route {
        self.navigator
            .navigate_with_state(
                Route::GoverningBodyMembers {
                    governing_body_id: body.id,
                },
                Some(NavigationState::GoverningBody(Box::new(body.clone()))),
            )
            .await
    }

    pub fn open_create(&mut self) {
        self.editing = None;
        self.form = GoverningBodyForm::default();
        self.modal_open = true;
    }

    pub async fn open_edit(&mut self, body: &GoverningBody) {
        self.editing = Some(body.clone());
        self.form = GoverningBodyForm::from_body(body);
        self.modal_open = true;
        if body.kind == GoverningBodyKind::Dipartimentale {
            self.load_departments().await;
        }
    }

    pub async fn set_kind(&mut self, kind: GoverningBodyKind) {
        if self.form.set_kind(kind) {
            self.load_departments().await;
        }
    }

    async fn load_departments(&mut self) {
        if !self.department_options.begin() {
            return;
        }
        debug!("Loading departments for governing body form");

        match self.departments.list().await {
            Ok(mut list) => {
                list.sort_by(|a, b| a.code.cmp(&b.code));
                self.department_options.finish(list);
            }
            Err(e) => {
                self.error_msg = failure_message(&e, DEPARTMENTS_FAILED);
                self.department_options.fail();
            }
        }
    }

    pub fn close_modal(&mut self) {
        self.modal_open = false;
        self.editing = None;
    }

    pub async fn save(&mut self) {
        if !self.form.validate().is_empty() {
            self.form.touched = true;
            return;
        }
        let Some(term_start) = self.form.term_start else {
            return;
        };

        let request = GoverningBodyRequest {
            id: self.editing.as_ref().map(|b| b.id),
            kind: self.form.kind,
            department_id: self
                .form
                .department_enabled()
                .then_some(self.form.department_id)
                .flatten(),
            term_start,
            term_end: self.form.term_end,
        };

        self.loading = true;
        self.error_msg = None;
        let result = if request.id.is_some() {
            self.service.update(&request).await
        } else {
            self.service.create(&request).await
        };
        self.loading = false;

        match result {
            Ok(()) => {
                self.close_modal();
                self.load_all().await;
            }
            Err(e) => self.error_msg = failure_message(&e, GENERIC_FAILURE),
        }
    }

    pub fn open_delete(&mut self, body: &GoverningBody) {
        self.delete.arm(body.clone());
    }

    pub fn close_delete(&mut self) {
        self.delete.cancel();
    }

    pub async fn confirm_delete(&mut self) {
        let Some(target) = self.delete.take() else {
            return;
        };

        self.loading = true;
        self.error_msg = None;
        let result = self.service.delete(target.id).await;
        self.loading = false;

        match result {
            Ok(()) => self.load_all().await,
            Err(e) => self.error_msg = failure_message(&e, DELETE_FAILED),
        }
    }

    pub fn escape(&mut self) {
        if self.delete.is_armed() {
            self.close_delete();
        } else if self.modal_open {
            self.close_modal();
        }
    }
}
