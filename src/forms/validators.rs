use super::FieldError;

pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PASSWORD_RULE: &str = "La password deve contenere almeno un numero e un carattere speciale.";

pub fn required(value: &str) -> Option<FieldError> {
    value.trim().is_empty().then_some(FieldError::Required)
}

pub fn required_some<T>(value: &Option<T>) -> Option<FieldError> {
    value.is_none().then_some(FieldError::Required)
}

/// Empty values pass; pair with `required`.
pub fn min_length(value: &str, min: usize) -> Option<FieldError> {
    let len = value.chars().count();
    (len > 0 && len < min).then_some(FieldError::MinLength(min))
}

/// Required and at least `min` characters.
pub fn required_min(value: &str, min: usize) -> Option<FieldError> {
    required(value).or_else(|| min_length(value, min))
}

/// Loose address shape check; empty values pass.
pub fn email(value: &str) -> Option<FieldError> {
    if value.is_empty() {
        return None;
    }
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
                && domain.split('.').all(|label| !label.is_empty())
        }
        None => false,
    };
    (!valid).then_some(FieldError::Email)
}

/// At least one digit and one symbol (anything but ASCII letters, digits and whitespace).
pub fn password_strength(value: &str) -> Option<FieldError> {
    if value.is_empty() {
        return None;
    }
    let digit = value.chars().any(|c| c.is_ascii_digit());
    let symbol = value
        .chars()
        .any(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace());
    (!(digit && symbol)).then_some(FieldError::Pattern(PASSWORD_RULE))
}

pub fn matches(value: &str, confirmation: &str) -> Option<FieldError> {
    (value != confirmation).then_some(FieldError::Mismatch)
}
