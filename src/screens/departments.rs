use std::sync::Arc;

use tracing::info;

use super::{failure_message, is_direttivo, Confirmation};
use crate::app::Backoffice;
use crate::error::GENERIC_FAILURE;
use crate::forms::{validators, FormErrors};
use crate::models::{Department, DepartmentRequest};
use crate::navigation::{NavigationState, Navigator, Route};
use crate::services::DepartmentService;
use crate::session::SessionStore;

const LOAD_FAILED: &str = "Errore nel recupero dei dipartimenti";
const DELETE_FAILED: &str = "Eliminazione non riuscita.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentForm {
    pub name: String,
    pub code: String,
    pub touched: bool,
}

impl DepartmentForm {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        errors.check("nome", validators::required_min(&self.name, 2));
        errors.check("codice", validators::required_min(&self.code, 2));
        errors
    }
}

pub struct DepartmentsScreen {
    service: DepartmentService,
    session: Arc<SessionStore>,
    navigator: Navigator,

    pub departments: Vec<Department>,
    pub loading: bool,
    pub error_msg: Option<String>,

    pub modal_open: bool,
    pub editing: Option<Department>,
    pub form: DepartmentForm,

    pub delete: Confirmation<Department>,
}

impl DepartmentsScreen {
    pub fn new(app: &Backoffice) -> Self {
        Self {
            service: app.departments(),
            session: app.session().clone(),
            navigator: app.navigator().clone(),
            departments: Vec::new(),
            loading: false,
            error_msg: None,
            modal_open: false,
            editing: None,
            form: DepartmentForm::default(),
            delete: Confirmation::default(),
        }
    }

    /// Only DIRETTIVO sees the create, edit and delete commands.
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
            Ok(list) => self.departments = list,
            Err(e) => self.error_msg = failure_message(&e, LOAD_FAILED),
        }
        self.loading = false;
    }

    pub fn open_create(&mut self) {
        self.editing = None;
        self.form = DepartmentForm::default();
        self.modal_open = true;
    }

    pub fn open_edit(&mut self, department: &Department) {
        self.form = DepartmentForm {
            name: department.name.clone(),
            code: department.code.clone(),
            touched: false,
        };
        self.editing = Some(department.clone());
        self.modal_open = true;
    }

    pub fn close_modal(&mut self) {
        self.modal_open = false;
        self.editing = None;
    }

    /// Submit the modal. Invalid forms are only marked touched.
    pub async fn save(&mut self) {
        if !self.form.validate().is_empty() {
            self.form.touched = true;
            return;
        }

        let request = DepartmentRequest::new(
            self.editing.as_ref().map(|d| d.id),
            &self.form.name,
            &self.form.code,
        );

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
                info!("Saved department {}", request.code);
                self.close_modal();
                self.load_all().await;
            }
            Err(e) => self.error_msg = failure_message(&e, GENERIC_FAILURE),
        }
    }

    pub fn open_delete(&mut self, department: &Department) {
        self.delete.arm(department.clone());
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
        let result = self.service.delete(&DepartmentRequest::from(&target)).await;
        self.loading = false;

        match result {
            Ok(()) => self.load_all().await,
            Err(e) => self.error_msg = failure_message(&e, DELETE_FAILED),
        }
    }

    /// Open the courses page, handing over name and code for its header.
    pub async fn open_courses(&self, department: &Department) -> Route {
        let state = NavigationState::Department {
            name: department.name.clone(),
            code: department.code.clone(),
        };
        self.navigator
            .navigate_with_state(
                Route::Courses {
                    department_id: department.id,
                },
                Some(state),
            )
            .await
    }

    /// Escape closes the topmost dialog.
    pub fn escape(&mut self) {
        if self.delete.is_armed() {
            self.close_delete();
        } else if self.modal_open {
            self.close_modal();
        }
    }
}
