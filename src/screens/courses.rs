use std::sync::Arc;

use super::{failure_message, is_direttivo, Confirmation};
use crate::app::Backoffice;
use crate::error::GENERIC_FAILURE;
use crate::forms::{validators, FormErrors};
use crate::models::{Course, CourseRequest, CourseType};
use crate::navigation::{NavigationState, Navigator, Route};
use crate::services::CourseService;
use crate::session::SessionStore;

const LOAD_FAILED: &str = "Errore nel recupero dei corsi";
const DELETE_FAILED: &str = "Eliminazione non riuscita.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseForm {
    pub name: String,
    pub course_type: CourseType,
    pub touched: bool,
}

impl CourseForm {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        errors.check("nome", validators::required_min(&self.name, 2));
        errors
    }
}

/// Courses of one department.
pub struct CoursesScreen {
    service: CourseService,
    session: Arc<SessionStore>,
    navigator: Navigator,

    pub department_id: i64,
    /// Header text handed over by the departments page; empty on direct entry.
    pub department_name: String,
    pub department_code: String,

    pub courses: Vec<Course>,
    pub loading: bool,
    pub error_msg: Option<String>,

    pub modal_open: bool,
    pub editing: Option<Course>,
    pub form: CourseForm,

    pub delete: Confirmation<Course>,
}

impl CoursesScreen {
    pub fn new(app: &Backoffice, department_id: i64) -> Self {
        let (department_name, department_code) = match app.navigator().location().state {
            Some(NavigationState::Department { name, code }) => (name, code),
            _ => (String::new(), String::new()),
        };

        Self {
            service: app.courses(),
            session: app.session().clone(),
            navigator: app.navigator().clone(),
            department_id,
            department_name,
            department_code,
            courses: Vec::new(),
            loading: false,
            error_msg: None,
            modal_open: false,
            editing: None,
            form: CourseForm::default(),
            delete: Confirmation::default(),
        }
    }

    pub fn can_manage(&self) -> bool {
        is_direttivo(self.session.current().as_ref())
    }

    pub async fn activate(&mut self) {
        self.reload().await;
    }

    pub async fn reload(&mut self) {
        self.loading = true;
        self.error_msg = None;

        match self.service.by_department(self.department_id).await {
            Ok(list) => self.courses = list,
            Err(e) => self.error_msg = failure_message(&e, LOAD_FAILED),
        }
        self.loading = false;
    }

    pub async fn back(&self) -> Route {
        self.navigator.navigate(Route::Departments).await
    }

    pub fn open_create(&mut self) {
        self.editing = None;
        self.form = CourseForm::default();
        self.modal_open = true;
    }

    pub fn open_edit(&mut self, course: &Course) {
        self.form = CourseForm {
            name: course.name.clone(),
            course_type: course.course_type,
            touched: false,
        };
        self.editing = Some(course.clone());
        self.modal_open = true;
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

        let request = CourseRequest::new(
            self.editing.as_ref().map(|c| c.id),
            &self.form.name,
            self.department_id,
            self.form.course_type,
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
                self.close_modal();
                self.reload().await;
            }
            Err(e) => self.error_msg = failure_message(&e, GENERIC_FAILURE),
        }
    }

    pub fn open_delete(&mut self, course: &Course) {
        self.delete.arm(course.clone());
    }

    pub fn close_delete(&mut self) {
        self.delete.cancel();
    }

    pub async fn confirm_delete(&mut self) {
        let Some(target) = self.delete.take() else {
            return;
        };
        let request = CourseRequest {
            id: Some(target.id),
            name: target.name,
            department_id: self.department_id,
            course_type: target.course_type,
        };

        self.loading = true;
        self.error_msg = None;
        let result = self.service.delete(&request).await;
        self.loading = false;

        match result {
            Ok(()) => self.reload().await,
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
