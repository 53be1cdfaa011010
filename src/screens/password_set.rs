use url::Url;

use super::failure_message;
use crate::app::Backoffice;
use crate::forms::{validators, FieldError, FormErrors};
use crate::models::PasswordAction;
use crate::services::AuthService;

const SAVE_FAILED: &str = "Errore durante il salvataggio della password.";

/// Why a password link was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    Action,
    PersonaId,
    Token,
}

impl LinkError {
    pub fn message(self) -> &'static str {
        match self {
            LinkError::Action => "Link non valido: azione mancante o errata.",
            LinkError::PersonaId => "Link non valido: ID persona mancante o errato.",
            LinkError::Token => "Link non valido: token mancante o errato.",
        }
    }
}

/// A validated password link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordLink {
    pub action: PasswordAction,
    pub persona_id: i64,
    pub token: String,
}

impl PasswordLink {
    /// Accepts `/password/{action}/{personaId}?token=..` and the older
    /// `?azione=..&personaId=..&token=..` form. Path values win over query values.
    pub fn parse(link: &str) -> Result<Self, LinkError> {
        let url = Url::parse(link)
            .or_else(|_| Url::parse("http://localhost/").and_then(|base| base.join(link)))
            .map_err(|_| LinkError::Action)?;

        let query = |keys: &[&str]| {
            keys.iter().find_map(|key| {
                url.query_pairs()
                    .find(|(k, v)| k == key && !v.trim().is_empty())
                    .map(|(_, v)| v.trim().to_string())
            })
        };

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();
        let (path_action, path_id) = match segments.as_slice() {
            ["password", action, id, ..] => (Some(action.to_string()), Some(id.to_string())),
            ["password", action] => (Some(action.to_string()), None),
            _ => (None, None),
        };

        let raw_action = path_action
            .filter(|a| !a.trim().is_empty())
            .or_else(|| query(&["azione", "action"]))
            .unwrap_or_default();
        let action = PasswordAction::parse(&raw_action).ok_or(LinkError::Action)?;

        let raw_id = path_id
            .filter(|a| !a.trim().is_empty())
            .or_else(|| query(&["personaId"]))
            .unwrap_or_default();
        let persona_id = raw_id
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or(LinkError::PersonaId)?;

        let token = query(&["token"]).ok_or(LinkError::Token)?;

        Ok(Self {
            action,
            persona_id,
            token,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordForm {
    pub password: String,
    pub confirm: String,
    pub touched: bool,
}

fn check_password(value: &str) -> Option<FieldError> {
    validators::required(value)
        .or_else(|| validators::min_length(value, validators::PASSWORD_MIN_LENGTH))
        .or_else(|| validators::password_strength(value))
}

impl PasswordForm {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        errors.check("password", check_password(&self.password));
        errors.check("confirmPassword", check_password(&self.confirm));
        // Mismatch is reported only once both fields hold something.
        if !self.password.is_empty() && !self.confirm.is_empty() {
            if let Some(e) = validators::matches(&self.password, &self.confirm) {
                errors.add_form(e);
            }
        }
        errors
    }
}

pub struct PasswordSetScreen {
    auth: AuthService,

    pub link: Result<PasswordLink, LinkError>,
    pub form: PasswordForm,
    pub loading: bool,
    pub success: bool,
    pub error_msg: Option<String>,
    pub show_password: bool,
    pub show_confirm: bool,
}

impl PasswordSetScreen {
    pub fn new(app: &Backoffice, link: &str) -> Self {
        let link = PasswordLink::parse(link);
        let error_msg = link.as_ref().err().map(|e| e.message().to_string());
        Self {
            auth: app.auth(),
            link,
            form: PasswordForm::default(),
            loading: false,
            success: false,
            error_msg,
            show_password: false,
            show_confirm: false,
        }
    }

    pub fn invalid_link(&self) -> bool {
        self.link.is_err()
    }

    pub fn title(&self) -> &'static str {
        match &self.link {
            Ok(PasswordLink {
                action: PasswordAction::Create,
                ..
            }) => "Crea la tua password",
            _ => "Modifica la tua password",
        }
    }

    pub fn toggle_password(&mut self) {
        self.show_password = !self.show_password;
    }

    pub fn toggle_confirm(&mut self) {
        self.show_confirm = !self.show_confirm;
    }

    pub async fn submit(&mut self) {
        let Ok(link) = self.link.clone() else {
            return;
        };
        self.error_msg = None;
        self.success = false;
        if !self.form.validate().is_empty() {
            self.form.touched = true;
            return;
        }

        self.loading = true;
        let result = self
            .auth
            .set_password(link.action, link.persona_id, &self.form.password, &link.token)
            .await;
        self.loading = false;

        match result {
            Ok(()) => self.success = true,
            Err(e) => self.error_msg = failure_message(&e, SAVE_FAILED),
        }
    }
}
