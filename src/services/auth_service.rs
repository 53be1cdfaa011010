use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::api::encode_segment;
use crate::error::ClientResult;
use crate::http::{ApiClient, ApiRequest};
use crate::models::{LoginRequest, PasswordAction, PasswordSetRequest, Session};
use crate::notify::Notifier;
use crate::session::SessionStore;

/// Login, logout and password flows; the session itself lives in `SessionStore`.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    session: Arc<SessionStore>,
    notifier: Arc<Notifier>,
}

impl AuthService {
    pub fn new(api: ApiClient, session: Arc<SessionStore>, notifier: Arc<Notifier>) -> Self {
        Self {
            api,
            session,
            notifier,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Authenticate and store the returned session. Failures leave state untouched.
    pub async fn login(&self, credentials: &LoginRequest) -> ClientResult<Session> {
        let auth = &self.api.paths().auth;
        let request = ApiRequest::post(self.api.url(&[auth, "login"])).json(credentials)?;

        let session: Session = self.api.send_json(request).await?;
        self.session.establish(session.clone())?;
        self.notifier.reset_session_expired();

        info!("Logged in as {}", session.email);
        Ok(session)
    }

    /// Tell the server, then drop the local session whatever it answered.
    pub async fn logout(&self) {
        let auth = &self.api.paths().auth;
        let request = ApiRequest::post(self.api.url(&[auth, "logout"]));
        let request = match request.json(&json!({})) {
            Ok(r) => r,
            Err(e) => {
                warn!("Failed to build logout request: {}", e);
                self.session.clear();
                return;
            }
        };

        if let Err(e) = self.api.send_unit(request).await {
            warn!("Server logout failed, clearing local session anyway: {}", e);
        }
        self.session.clear();
        info!("Logged out");
    }

    /// Ask the server to e-mail a password-change link.
    pub async fn request_password_change(&self, email: &str) -> ClientResult<()> {
        let auth = &self.api.paths().auth;
        let email = encode_segment(email.trim());
        let request = ApiRequest::get(self.api.url(&[auth, "richiesta", "modifica", "password", &email]));
        self.api.send_unit(request).await
    }

    /// Create or change a password with the token from an e-mailed link.
    pub async fn set_password(
        &self,
        action: PasswordAction,
        persona_id: i64,
        password: &str,
        token: &str,
    ) -> ClientResult<()> {
        let paths = self.api.paths();
        let id = persona_id.to_string();
        let url = self
            .api
            .url(&[&paths.auth, &paths.persona, &id, action.segment(), "password"]);
        let request = ApiRequest::post(url).json(&PasswordSetRequest {
            password: password.to_string(),
            token: token.to_string(),
        })?;
        self.api.send_unit(request).await
    }
}
