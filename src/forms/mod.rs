//! Form validation shared by every screen.

pub mod validators;

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Required,
    MinLength(usize),
    Email,
    /// Value outside the allowed set (unknown role, unknown body).
    Invalid,
    /// Fails a pattern; carries the message to show.
    Pattern(&'static str),
    /// Confirmation does not match.
    Mismatch,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required => f.write_str("Campo obbligatorio."),
            FieldError::MinLength(n) => write!(f, "Minimo {n} caratteri."),
            FieldError::Email => f.write_str("Email non valida."),
            FieldError::Invalid => f.write_str("Valore non valido."),
            FieldError::Pattern(msg) => f.write_str(msg),
            FieldError::Mismatch => f.write_str("Le password non coincidono."),
        }
    }
}

/// Per-field errors plus form-level errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, Vec<FieldError>>,
    form: Vec<FieldError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.form.is_empty()
    }

    pub fn add(&mut self, field: &'static str, error: FieldError) {
        self.fields.entry(field).or_default().push(error);
    }

    /// Add the error if `check` produced one.
    pub fn check(&mut self, field: &'static str, check: Option<FieldError>) {
        if let Some(error) = check {
            self.add(field, error);
        }
    }

    pub fn add_form(&mut self, error: FieldError) {
        self.form.push(error);
    }

    pub fn field(&self, field: &str) -> &[FieldError] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, field: &str, error: &FieldError) -> bool {
        self.field(field).contains(error)
    }

    pub fn form_errors(&self) -> &[FieldError] {
        &self.form
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        for (field, errors) in &self.fields {
            for e in errors {
                parts.push(format!("{field}: {e}"));
            }
        }
        for e in &self.form {
            parts.push(e.to_string());
        }
        f.write_str(&parts.join("; "))
    }
}
