use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use tracing::{debug, info};

use super::{
    failure_message, is_privileged, Confirmation, DependentOptions, LoadTicket, PanelEvent, PersonForm,
    StaffEditPanel,
};
use crate::app::Backoffice;
use crate::error::ClientResult;
use crate::models::{Course, Department, StaffCard};
use crate::navigation::{Navigator, Route};
use crate::services::{AdminService, CourseService, DepartmentService, StaffService};
use crate::session::SessionStore;

const LOAD_FAILED: &str = "Errore durante il caricamento dello staff.";
const DEPARTMENTS_FAILED: &str = "Errore durante il caricamento dei dipartimenti.";
const COURSES_FAILED: &str = "Errore durante il caricamento dei corsi di studio.";
const CREATE_FAILED: &str = "Errore durante la creazione della persona.";
const DELETE_FAILED: &str = "Eliminazione non riuscita.";
const MISSING_PERSON_ID: &str = "Impossibile eliminare: manca l’id della persona.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffFilters {
    pub department_id: Option<i64>,
    pub course_id: Option<i64>,
    pub year: Option<i32>,
    pub search: String,
}

impl StaffFilters {
    pub fn matches(&self, card: &StaffCard) -> bool {
        if let Some(id) = self.department_id {
            if card.department().map(|d| d.id) != Some(id) {
                return false;
            }
        }
        if let Some(id) = self.course_id {
            if card.course.as_ref().map(|c| c.id) != Some(id) {
                return false;
            }
        }
        if let Some(year) = self.year {
            if card.year != Some(year) {
                return false;
            }
        }

        let query = self.search.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        search_fields(card).iter().any(|f| f.to_lowercase().contains(&query))
    }
}

/// Full name, board roles, representative bodies, course and department.
fn search_fields(card: &StaffCard) -> [String; 5] {
    let governing = card.governing_roles.as_deref().unwrap_or_default().join(" ");
    let representatives = card
        .representatives
        .as_ref()
        .map(|src| {
            src.to_views(&[])
                .into_iter()
                .map(|v| v.body_name)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();
    [
        format!("{} {}", card.name, card.surname),
        governing,
        representatives,
        card.course.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
        card.department().map(|d| d.name.clone()).unwrap_or_default(),
    ]
}

/// Choices of the filter bar, derived from the loaded cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub departments: Vec<Department>,
    pub courses: Vec<Course>,
    pub years: Vec<i32>,
}

impl FilterOptions {
    pub fn from_cards(cards: &[StaffCard]) -> Self {
        let mut departments = BTreeMap::new();
        let mut courses = BTreeMap::new();
        let mut years = BTreeSet::new();

        for card in cards {
            if let Some(course) = &card.course {
                if let Some(dept) = &course.department {
                    departments.entry(dept.id).or_insert_with(|| dept.clone());
                }
                courses.entry(course.id).or_insert_with(|| course.clone());
            }
            if let Some(year) = card.year {
                years.insert(year);
            }
        }

        let mut departments: Vec<Department> = departments.into_values().collect();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        let mut courses: Vec<Course> = courses.into_values().collect();
        courses.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            departments,
            courses,
            years: years.into_iter().collect(),
        }
    }
}

/// Staff directory.
pub struct StaffScreen {
    app: Backoffice,
    service: StaffService,
    admin: AdminService,
    departments: DepartmentService,
    courses: CourseService,
    session: Arc<SessionStore>,
    navigator: Navigator,

    pub cards: Vec<StaffCard>,
    pub loading: bool,
    pub error_msg: Option<String>,
    pub filters: StaffFilters,
    pub filter_options: FilterOptions,
    broken_photos: HashSet<i64>,

    pub create_open: bool,
    pub create_form: PersonForm,
    pub department_options: Vec<Department>,
    pub course_options: DependentOptions<Course>,
    pub saving: bool,

    pub edit: Option<StaffEditPanel>,

    pub delete: Confirmation<StaffCard>,
    pub deleting: bool,
}

impl StaffScreen {
    pub fn new(app: &Backoffice) -> Self {
        Self {
            app: app.clone(),
            service: app.staff(),
            admin: app.admin(),
            departments: app.departments(),
            courses: app.courses(),
            session: app.session().clone(),
            navigator: app.navigator().clone(),
            cards: Vec::new(),
            loading: false,
            error_msg: None,
            filters: StaffFilters::default(),
            filter_options: FilterOptions::default(),
            broken_photos: HashSet::new(),
            create_open: false,
            create_form: PersonForm::default(),
            department_options: Vec::new(),
            course_options: DependentOptions::default(),
            saving: false,
            edit: None,
            delete: Confirmation::default(),
            deleting: false,
        }
    }

    /// Either board role may create and delete people.
    pub fn can_manage(&self) -> bool {
        is_privileged(self.session.current().as_ref())
    }

    /// Privileged users manage every card; others only their own,
    /// recognised by id or by e-mail.
    pub fn can_manage_card(&self, card: &StaffCard) -> bool {
        let Some(me) = self.session.current() else {
            return false;
        };
        if is_privileged(Some(&me)) || me.user_id == card.id {
            return true;
        }
        let mine = me.email.trim();
        card.email
            .as_deref()
            .map(str::trim)
            .is_some_and(|theirs| !mine.is_empty() && theirs.eq_ignore_ascii_case(mine))
    }

    pub async fn activate(&mut self) {
        self.load().await;
    }

    pub async fn back(&self) -> Route {
        self.navigator.navigate(Route::Welcome).await
    }

    pub async fn load(&mut self) {
        self.loading = true;
        self.error_msg = None;

        match self.service.list().await {
            Ok(list) => {
                self.filter_options = FilterOptions::from_cards(&list);
                self.cards = list;
            }
            Err(e) => {
                self.cards.clear();
                self.error_msg = failure_message(&e, LOAD_FAILED);
            }
        }
        self.loading = false;
    }

    pub fn filtered(&self) -> Vec<&StaffCard> {
        self.cards.iter().filter(|c| self.filters.matches(c)).collect()
    }

    // photos

    /// Thumbnail first; nothing once the image failed to load.
    pub fn photo_src<'a>(&self, card: &'a StaffCard) -> Option<&'a str> {
        if self.broken_photos.contains(&card.id) {
            return None;
        }
        card.photo()
    }

    pub fn on_image_error(&mut self, card: &StaffCard) {
        self.broken_photos.insert(card.id);
    }

    // create

    pub async fn open_create(&mut self) {
        self.error_msg = None;
        self.edit = None;
        self.create_form = PersonForm::default();
        self.course_options.reset();
        self.saving = false;
        self.create_open = true;

        match self.departments.list().await {
            Ok(list) => self.department_options = list,
            Err(e) => self.error_msg = failure_message(&e, DEPARTMENTS_FAILED),
        }
    }

    pub fn close_create(&mut self) {
        self.create_open = false;
    }

    /// Start a department change. The returned ticket must accompany the courses fetched for it.
    pub fn begin_department_change(&mut self, department_id: Option<i64>) -> Option<LoadTicket> {
        self.create_form.select_department(&mut self.course_options, department_id)
    }

    pub async fn fetch_courses(&self, ticket: LoadTicket) -> ClientResult<Vec<Course>> {
        self.courses.by_department(ticket.parent()).await
    }

    /// Apply fetched courses; answers for a department no longer selected are dropped.
    pub fn finish_course_load(&mut self, ticket: LoadTicket, result: ClientResult<Vec<Course>>) {
        match result {
            Ok(list) => {
                self.course_options.apply(ticket, list);
            }
            Err(e) => {
                self.course_options.fail(ticket);
                self.error_msg = failure_message(&e, COURSES_FAILED);
            }
        }
    }

    pub async fn select_department(&mut self, department_id: Option<i64>) {
        if let Some(ticket) = self.begin_department_change(department_id) {
            let result = self.fetch_courses(ticket).await;
            self.finish_course_load(ticket, result);
        }
    }

    pub fn select_course(&mut self, course_id: Option<i64>) -> bool {
        self.create_form.select_course(&self.course_options, course_id)
    }

    pub async fn save_create(&mut self) {
        if !self.create_form.validate(self.course_options.is_enabled()).is_empty() {
            self.create_form.touched = true;
            return;
        }

        let request = self.create_form.create_request();
        self.saving = true;
        self.error_msg = None;
        let result = self.admin.create_person(&request).await;
        self.saving = false;

        match result {
            Ok(()) => {
                info!("Created person {}", request.email);
                self.close_create();
                self.load().await;
            }
            Err(e) => self.error_msg = failure_message(&e, CREATE_FAILED),
        }
    }

    // edit

    /// Open the edit panel; silently refused for cards the user may not manage.
    pub async fn open_edit(&mut self, card: &StaffCard) -> bool {
        if self.create_open {
            self.close_create();
        }
        self.edit = StaffEditPanel::open(&self.app, card.clone()).await;
        self.edit.is_some()
    }

    pub fn close_edit(&mut self) {
        self.edit = None;
    }

    /// React to what the edit panel reported.
    ///
    /// Representative changes are already patched into the panel's person;
    /// the matching card takes that copy and the panel stays open. Personal
    /// data and photo saves reload the directory and close the panel.
    pub async fn sync_edit_panel(&mut self) {
        let Some(panel) = self.edit.as_mut() else {
            return;
        };
        let events = panel.take_events();
        let persona = panel.persona.clone();

        for event in events {
            match event {
                PanelEvent::Closed => self.close_edit(),
                PanelEvent::RepresentativesChanged => {
                    if let Some(card) = self.cards.iter_mut().find(|c| c.id == persona.id) {
                        debug!("Patching representatives of {} locally", persona.id);
                        card.representatives = persona.representatives.clone();
                    }
                }
                PanelEvent::Saved => {
                    self.load().await;
                    self.close_edit();
                }
            }
        }
    }

    // delete

    pub fn open_delete(&mut self, card: &StaffCard) {
        self.error_msg = None;
        self.delete.arm(card.clone());
    }

    pub fn close_delete(&mut self) {
        self.delete.cancel();
    }

    pub async fn confirm_delete(&mut self) {
        self.error_msg = None;
        let Some(target) = self.delete.pending().cloned() else {
            return;
        };
        if target.id <= 0 {
            self.error_msg = Some(MISSING_PERSON_ID.to_string());
            return;
        }

        self.deleting = true;
        let result = self.service.delete_person(target.id).await;
        self.deleting = false;

        match result {
            Ok(()) => {
                self.close_delete();
                self.load().await;
                if self.edit.as_ref().is_some_and(|p| p.persona.id == target.id) {
                    self.close_edit();
                }
            }
            Err(e) => self.error_msg = failure_message(&e, DELETE_FAILED),
        }
    }

    /// Escape: delete confirmation, then the create modal, then the edit panel.
    pub fn escape(&mut self) {
        if self.delete.is_armed() {
            self.close_delete();
        } else if self.create_open {
            self.close_create();
        } else if self.edit.is_some() {
            self.close_edit();
        }
    }
}
