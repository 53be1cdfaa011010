use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::{failure_message, is_privileged, DependentOptions, LoadTicket, PersonForm};
use crate::app::Backoffice;
use crate::models::{
    patch_views, Course, Department, RepresentativeAssignmentRequest, RepresentativeBody, RepresentativeSource,
    RepresentativeView, StaffCard,
};
use crate::services::{AdminService, CourseService, DepartmentService, PhotoUpload, StaffService};
use crate::session::SessionStore;

const DEPARTMENTS_FAILED: &str = "Errore durante il caricamento dei dipartimenti.";
const COURSES_FAILED: &str = "Errore durante il caricamento dei corsi di studio.";
const PHOTO_FAILED: &str = "Errore durante l’upload della foto.";
const PERSONAL_DATA_FAILED: &str = "Errore durante il salvataggio anagrafica.";
const REPRESENTATIVE_SAVE_FAILED: &str = "Errore durante il salvataggio della rappresentanza.";
const REPRESENTATIVE_REMOVE_FAILED: &str = "Errore durante la rimozione della rappresentanza.";
const BODY_REQUIRED: &str = "Seleziona un organo valido.";
const END_BEFORE_START: &str = "La data fine non può essere precedente alla data inizio.";
const MISSING_ASSIGNMENT_ID: &str = "Impossibile eliminare: manca l’id della rappresentanza.";

const DEFAULT_PHOTO_NAME: &str = "photo.jpg";
const DEFAULT_PHOTO_MIME: &str = "image/jpeg";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditTab {
    #[default]
    PersonalData,
    Representatives,
}

/// What the panel asks of the page hosting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    /// Personal data or photo stored; the directory should refresh.
    Saved,
    /// Assignments changed; `persona` already carries the new list.
    RepresentativesChanged,
    Closed,
}

/// Output of the crop widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CroppedImage {
    pub bytes: Option<Vec<u8>>,
    pub mime: Option<String>,
    /// Data URL for the preview.
    pub preview: Option<String>,
}

/// A picked file and what the crop widget made of it.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoDraft {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    pub cropped: Option<Vec<u8>>,
    pub cropped_mime: Option<String>,
    pub preview: Option<String>,
    pub zoom: f32,
}

impl PhotoDraft {
    /// The cropped image under the original name, or the original file
    /// when the widget produced nothing.
    pub fn to_upload(&self) -> PhotoUpload {
        let file_name = if self.file_name.trim().is_empty() {
            DEFAULT_PHOTO_NAME.to_string()
        } else {
            self.file_name.clone()
        };

        match &self.cropped {
            None => PhotoUpload {
                file_name,
                mime: non_blank(&self.mime).unwrap_or(DEFAULT_PHOTO_MIME).to_string(),
                bytes: self.bytes.clone(),
            },
            Some(bytes) => {
                let mime = self
                    .cropped_mime
                    .as_deref()
                    .and_then(non_blank)
                    .or_else(|| non_blank(&self.mime))
                    .unwrap_or(DEFAULT_PHOTO_MIME);
                PhotoUpload {
                    file_name,
                    mime: mime.to_string(),
                    bytes: bytes.clone(),
                }
            }
        }
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepresentativeForm {
    pub assignment_id: Option<i64>,
    pub body_id: Option<i64>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Set while editing an existing assignment.
    pub editing: bool,
    pub touched: bool,
}

impl RepresentativeForm {
    /// The body can only be picked for new assignments.
    pub fn body_locked(&self) -> bool {
        self.editing
    }

    pub fn check(&self) -> Result<i64, &'static str> {
        let body_id = self.body_id.filter(|id| *id > 0).ok_or(BODY_REQUIRED)?;
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if end < start {
                return Err(END_BEFORE_START);
            }
        }
        Ok(body_id)
    }
}

/// Editing panel for one staff card: personal data, photo and representative assignments.
pub struct StaffEditPanel {
    staff: StaffService,
    admin: AdminService,
    departments: DepartmentService,
    courses: CourseService,
    session: Arc<SessionStore>,
    max_photo_bytes: u64,

    pub persona: StaffCard,
    pub privileged: bool,
    pub tab: EditTab,
    pub error_msg: Option<String>,

    pub form: PersonForm,
    pub department_options: Vec<Department>,
    pub course_options: DependentOptions<Course>,
    pub saving_personal: bool,

    pub photo: Option<PhotoDraft>,
    pub saving_photo: bool,

    pub bodies: Vec<RepresentativeBody>,
    pub representatives: Vec<RepresentativeView>,
    pub representative_form: RepresentativeForm,
    pub saving_representative: bool,
    pub deleting_representative: Option<i64>,

    events: Vec<PanelEvent>,
}

impl StaffEditPanel {
    /// Open the panel for `persona`. `None` when the viewer may not see it:
    /// only privileged users can open someone else's card.
    pub async fn open(app: &Backoffice, persona: StaffCard) -> Option<Self> {
        let session = app.session().clone();
        let current = session.current();
        let privileged = is_privileged(current.as_ref());
        let is_self = current.as_ref().is_some_and(|s| s.user_id == persona.id);
        if !privileged && !is_self {
            debug!("Staff card {} is not editable by this user", persona.id);
            return None;
        }

        let mut panel = Self {
            staff: app.staff(),
            admin: app.admin(),
            departments: app.departments(),
            courses: app.courses(),
            session,
            max_photo_bytes: app.max_photo_bytes(),
            persona: persona.clone(),
            privileged,
            tab: EditTab::PersonalData,
            error_msg: None,
            form: PersonForm::default(),
            department_options: Vec::new(),
            course_options: DependentOptions::default(),
            saving_personal: false,
            photo: None,
            saving_photo: false,
            bodies: Vec::new(),
            representatives: Vec::new(),
            representative_form: RepresentativeForm::default(),
            saving_representative: false,
            deleting_representative: None,
            events: Vec::new(),
        };
        panel.set_persona(persona).await;
        Some(panel)
    }

    /// Show another person: every piece of state is derived again.
    pub async fn set_persona(&mut self, persona: StaffCard) {
        self.persona = persona;
        self.error_msg = None;
        self.form = PersonForm::from_card(&self.persona);
        self.form.disabled = !self.privileged;
        self.course_options.reset();
        self.photo = None;
        self.representative_form = RepresentativeForm::default();
        if !self.privileged {
            self.tab = EditTab::PersonalData;
        }
        self.rebuild_representatives();

        self.load_departments().await;
        if let Some(ticket) = self.course_options.select_parent(self.form.department_id) {
            self.load_courses(ticket, true).await;
        }
        if self.privileged {
            self.load_bodies().await;
        }
    }

    pub fn is_self(&self) -> bool {
        self.session
            .current()
            .is_some_and(|s| s.user_id == self.persona.id)
    }

    /// Pending notifications for the hosting page.
    pub fn take_events(&mut self) -> Vec<PanelEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_tab(&mut self, tab: EditTab) {
        if tab == EditTab::Representatives && !self.privileged {
            return;
        }
        self.tab = tab;
    }

    pub fn close(&mut self) {
        self.events.push(PanelEvent::Closed);
    }

    // personal data

    async fn load_departments(&mut self) {
        match self.departments.list().await {
            Ok(list) => self.department_options = list,
            Err(e) => self.error_msg = failure_message(&e, DEPARTMENTS_FAILED),
        }
    }

    async fn load_courses(&mut self, ticket: LoadTicket, keep_selection: bool) {
        match self.courses.by_department(ticket.parent()).await {
            Ok(list) => {
                if self.course_options.apply(ticket, list) && !keep_selection {
                    self.form.course_id = None;
                }
            }
            Err(e) => {
                self.course_options.fail(ticket);
                self.error_msg = failure_message(&e, COURSES_FAILED);
            }
        }
    }

    pub async fn select_department(&mut self, department_id: Option<i64>) {
        if self.form.disabled {
            return;
        }
        if let Some(ticket) = self.form.select_department(&mut self.course_options, department_id) {
            self.load_courses(ticket, false).await;
        }
    }

    pub fn select_course(&mut self, course_id: Option<i64>) -> bool {
        !self.form.disabled && self.form.select_course(&self.course_options, course_id)
    }

    pub async fn save_personal_data(&mut self) {
        self.error_msg = None;
        if !self.privileged {
            return;
        }
        if !self.form.validate(self.course_options.is_enabled()).is_empty() {
            self.form.touched = true;
            return;
        }

        self.saving_personal = true;
        let result = self.staff.update_person(&self.form.update_request()).await;
        self.saving_personal = false;

        match result {
            Ok(()) => {
                info!("Updated personal data of {}", self.persona.id);
                self.form.touched = false;
                self.events.push(PanelEvent::Saved);
            }
            Err(e) => self.error_msg = failure_message(&e, PERSONAL_DATA_FAILED),
        }
    }

    // photo

    /// Take a file from the picker. Files over the size cap are refused.
    pub fn pick_photo(&mut self, file_name: &str, mime: &str, bytes: Vec<u8>) -> bool {
        self.error_msg = None;
        if bytes.len() as u64 > self.max_photo_bytes {
            let max_mb = self.max_photo_bytes / (1024 * 1024);
            self.error_msg = Some(format!("Il file è troppo grande. Max {max_mb}MB."));
            return false;
        }

        self.photo = Some(PhotoDraft {
            file_name: file_name.to_string(),
            mime: mime.to_string(),
            bytes,
            cropped: None,
            cropped_mime: None,
            preview: None,
            zoom: 1.0,
        });
        true
    }

    pub fn on_image_cropped(&mut self, image: CroppedImage) {
        let Some(draft) = self.photo.as_mut() else {
            return;
        };
        if let Some(bytes) = image.bytes {
            draft.cropped = Some(bytes);
            draft.cropped_mime = image.mime;
        }
        if image.preview.is_some() {
            draft.preview = image.preview;
        }
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if let Some(draft) = self.photo.as_mut() {
            draft.zoom = zoom;
        }
    }

    pub fn reset_crop(&mut self) {
        self.photo = None;
    }

    pub fn build_upload(&self) -> Option<PhotoUpload> {
        self.photo.as_ref().map(PhotoDraft::to_upload)
    }

    /// Upload the photo. Allowed to privileged users and to the person themselves.
    pub async fn save_photo(&mut self) {
        self.error_msg = None;
        if !self.privileged && !self.is_self() {
            return;
        }
        let Some(upload) = self.build_upload() else {
            return;
        };

        self.saving_photo = true;
        let result = self.staff.upload_photo(self.persona.id, upload).await;
        self.saving_photo = false;

        match result {
            Ok(()) => {
                self.reset_crop();
                self.events.push(PanelEvent::Saved);
            }
            Err(e) => self.error_msg = failure_message(&e, PHOTO_FAILED),
        }
    }

    // representatives

    async fn load_bodies(&mut self) {
        match self.admin.representative_bodies().await {
            Ok(list) => self.bodies = list,
            Err(e) => {
                debug!("Representative bodies unavailable: {}", e);
                self.bodies.clear();
            }
        }
        self.rebuild_representatives();
    }

    fn rebuild_representatives(&mut self) {
        self.representatives = self
            .persona
            .representatives
            .as_ref()
            .map(|src| src.to_views(&self.bodies))
            .unwrap_or_default();
    }

    pub fn edit_representative(&mut self, row: &RepresentativeView) {
        if !self.privileged {
            return;
        }
        self.representative_form = RepresentativeForm {
            assignment_id: row.id,
            body_id: row.body_id,
            start: row.start,
            end: row.end,
            editing: true,
            touched: false,
        };
    }

    pub fn reset_representative_form(&mut self) {
        self.representative_form = RepresentativeForm::default();
    }

    pub async fn save_representative(&mut self) {
        self.error_msg = None;
        if !self.privileged {
            return;
        }
        let body_id = match self.representative_form.check() {
            Ok(id) => id,
            Err(msg) => {
                self.representative_form.touched = true;
                self.error_msg = Some(msg.to_string());
                return;
            }
        };

        let form = self.representative_form.clone();
        let request = RepresentativeAssignmentRequest {
            id: form.assignment_id.filter(|_| form.editing),
            person_id: self.persona.id,
            body_id,
            start: form.start,
            end: form.end,
        };

        self.saving_representative = true;
        let result = if form.editing {
            self.admin.update_representative(&request).await.map(|()| None)
        } else {
            self.admin.assign_representative(&request).await
        };
        self.saving_representative = false;

        match result {
            Ok(created_id) => {
                let body_name = self
                    .bodies
                    .iter()
                    .find(|b| b.id == body_id)
                    .map(|b| b.name.clone())
                    .or_else(|| {
                        self.representatives
                            .iter()
                            .find(|r| r.body_id == Some(body_id))
                            .map(|r| r.body_name.clone())
                    })
                    .unwrap_or_default();
                let existing_id = self
                    .representatives
                    .iter()
                    .find(|r| r.body_id == Some(body_id))
                    .and_then(|r| r.id);

                let row = RepresentativeView {
                    id: form.assignment_id.or(created_id).or(existing_id),
                    body_id: Some(body_id),
                    body_name,
                    start: form.start,
                    end: form.end,
                };

                self.persona
                    .representatives
                    .get_or_insert_with(RepresentativeSource::default)
                    .upsert(&row);
                let edited = form.assignment_id.filter(|_| form.editing);
                patch_views(&mut self.representatives, edited, row);

                self.reset_representative_form();
                self.events.push(PanelEvent::RepresentativesChanged);
            }
            Err(e) => self.error_msg = failure_message(&e, REPRESENTATIVE_SAVE_FAILED),
        }
    }

    pub async fn delete_representative(&mut self, row: &RepresentativeView) {
        self.error_msg = None;
        if !self.privileged {
            return;
        }
        let Some(id) = row.id else {
            self.error_msg = Some(MISSING_ASSIGNMENT_ID.to_string());
            return;
        };

        self.deleting_representative = Some(id);
        let result = self.admin.remove_representative(id).await;
        self.deleting_representative = None;

        match result {
            Ok(()) => {
                self.representatives.retain(|r| r.id != Some(id));
                if let Some(src) = self.persona.representatives.as_mut() {
                    src.remove(row);
                }
                self.reset_representative_form();
                self.events.push(PanelEvent::RepresentativesChanged);
            }
            Err(e) => self.error_msg = failure_message(&e, REPRESENTATIVE_REMOVE_FAILED),
        }
    }
}
