// Client-side error types
use serde_json::Value;
use thiserror::Error;

/// Fallback shown when a failure carries no usable message.
pub const GENERIC_FAILURE: &str = "Operazione non riuscita.";

/// Failure of a remote call or of a local client concern.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Non-2xx response; `body` is the raw response text.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    /// A 401 consumed by the session guard. Screens show nothing for it.
    #[error("Session expired")]
    SessionExpired,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::SessionExpired)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

/// Best user-facing message for a failed call.
///
/// Looks at the response body first: a bare string, then `message`,
/// `error` and `detail`, then an `errors` list joined with ", ". Local
/// storage and config failures use their own text; everything else falls
/// back to `fallback`.
pub fn extract_api_error_message(err: &ClientError, fallback: &str) -> String {
    if let ClientError::Http { body, .. } = err {
        if let Some(msg) = message_from_body(body) {
            return msg;
        }
    }

    // transport failures carry no body worth showing
    let own = match err {
        ClientError::Storage(m) | ClientError::Config(m) => m.trim().to_string(),
        _ => String::new(),
    };

    if own.is_empty() {
        fallback.to_string()
    } else {
        own
    }
}

fn message_from_body(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(s)) => non_blank(&s),
        Ok(Value::Object(map)) => ["message", "error", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str).and_then(non_blank))
            .or_else(|| map.get("errors").and_then(Value::as_array).and_then(|e| joined(e))),
        Ok(_) => None,
        // plain-text body
        Err(_) => non_blank(body),
    }
}

// validation lists: [{"message": ..}, "text", ..]
fn joined(errors: &[Value]) -> Option<String> {
    let parts: Vec<String> = errors
        .iter()
        .map(|e| match e {
            Value::String(s) => s.clone(),
            other => other
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| other.to_string()),
        })
        .collect();
    non_blank(&parts.join(", "))
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, body: &str) -> ClientError {
        ClientError::Http {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn falls_back_to_detail_then_errors() {
        let err = http(400, r#"{"detail": "Dati non validi"}"#);
        assert_eq!(extract_api_error_message(&err, "x"), "Dati non validi");

        let err = http(
            422,
            r#"{"errors": [{"message": "Nome obbligatorio"}, "Codice troppo lungo"]}"#,
        );
        assert_eq!(
            extract_api_error_message(&err, "x"),
            "Nome obbligatorio, Codice troppo lungo"
        );

        let err = http(422, r#"{"errors": []}"#);
        assert_eq!(extract_api_error_message(&err, "x"), "x");
    }

    #[test]
    fn prefers_plain_string_body() {
        let err = http(400, "\"Codice già presente\"");
        assert_eq!(extract_api_error_message(&err, "x"), "Codice già presente");

        let err = http(400, "Codice già presente");
        assert_eq!(extract_api_error_message(&err, "x"), "Codice già presente");
    }

    #[test]
    fn message_field_wins_over_error_field() {
        let err = http(409, r#"{"message":"Duplicato","error":"Conflict"}"#);
        assert_eq!(extract_api_error_message(&err, "x"), "Duplicato");

        let err = http(409, r#"{"error":"Conflict"}"#);
        assert_eq!(extract_api_error_message(&err, "x"), "Conflict");
    }

    #[test]
    fn falls_back_when_nothing_usable() {
        let err = http(500, r#"{"status":500}"#);
        assert_eq!(extract_api_error_message(&err, GENERIC_FAILURE), GENERIC_FAILURE);

        let err = http(500, "   ");
        assert_eq!(extract_api_error_message(&err, "fallback"), "fallback");
    }

    #[test]
    fn transport_errors_use_the_fallback() {
        let err = ClientError::Transport("connection refused".to_string());
        assert_eq!(extract_api_error_message(&err, GENERIC_FAILURE), GENERIC_FAILURE);

        let err = ClientError::Storage("read-only file system".to_string());
        assert_eq!(extract_api_error_message(&err, "x"), "read-only file system");
    }

    #[test]
    fn status_helpers() {
        assert!(http(401, "").is_unauthorized());
        assert!(!http(403, "").is_unauthorized());
        assert_eq!(ClientError::SessionExpired.status(), None);
    }
}
