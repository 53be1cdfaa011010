use super::failure_message;
use crate::app::Backoffice;
use crate::forms::{validators, FormErrors};
use crate::models::LoginRequest;
use crate::navigation::{Navigator, Route};
use crate::services::AuthService;

const LOGIN_FAILED: &str = "Credenziali errate.";
const FORGOT_FAILED: &str = "Errore durante la richiesta di modifica password.";
const PASSWORD_MIN: usize = 4;

fn check_email(value: &str) -> Option<crate::forms::FieldError> {
    validators::required(value).or_else(|| validators::email(value.trim()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub touched: bool,
}

impl LoginForm {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        errors.check("email", check_email(&self.email));
        errors.check(
            "password",
            validators::required(&self.password).or_else(|| validators::min_length(&self.password, PASSWORD_MIN)),
        );
        errors
    }
}

/// "Forgot password" dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForgotPassword {
    pub open: bool,
    pub email: String,
    pub touched: bool,
    pub loading: bool,
    /// Shown whether or not the address is known.
    pub success: bool,
    pub error_msg: Option<String>,
}

pub struct LoginScreen {
    auth: AuthService,
    navigator: Navigator,

    pub form: LoginForm,
    pub loading: bool,
    pub error_msg: Option<String>,
    pub forgot: ForgotPassword,
}

impl LoginScreen {
    pub fn new(app: &Backoffice) -> Self {
        Self {
            auth: app.auth(),
            navigator: app.navigator().clone(),
            form: LoginForm::default(),
            loading: false,
            error_msg: None,
            forgot: ForgotPassword::default(),
        }
    }

    /// Sign in and go to the dashboard. Returns whether it succeeded.
    pub async fn submit(&mut self) -> bool {
        self.error_msg = None;
        if !self.form.validate().is_empty() {
            self.form.touched = true;
            return false;
        }

        let credentials = LoginRequest::new(&self.form.email, &self.form.password);
        self.loading = true;
        let result = self.auth.login(&credentials).await;
        self.loading = false;

        match result {
            Ok(_) => {
                self.navigator.navigate(Route::Dashboard).await;
                true
            }
            Err(e) => {
                self.error_msg = failure_message(&e, LOGIN_FAILED);
                false
            }
        }
    }

    /// Open the dialog, prefilled with whatever was typed in the login form.
    pub fn open_forgot(&mut self) {
        self.forgot = ForgotPassword {
            open: true,
            email: self.form.email.trim().to_string(),
            ..Default::default()
        };
    }

    pub fn close_forgot(&mut self) {
        self.forgot.open = false;
    }

    pub async fn submit_forgot(&mut self) {
        self.forgot.error_msg = None;
        if check_email(&self.forgot.email).is_some() {
            self.forgot.touched = true;
            return;
        }

        self.forgot.loading = true;
        let result = self.auth.request_password_change(&self.forgot.email).await;
        self.forgot.loading = false;

        match result {
            Ok(()) => self.forgot.success = true,
            Err(e) => self.forgot.error_msg = failure_message(&e, FORGOT_FAILED),
        }
    }

    pub fn escape(&mut self) {
        if self.forgot.open {
            self.close_forgot();
        }
    }
}
