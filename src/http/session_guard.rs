use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{ApiRequest, ResponseMiddleware, ResponseOutcome};
use crate::error::ClientError;
use crate::navigation::{Navigator, Route};
use crate::notify::Notifier;
use crate::session::SessionStore;

/// Turns a 401 into a local logout, one notice and one redirect to login.
pub struct SessionGuard {
    session: Arc<SessionStore>,
    notifier: Arc<Notifier>,
    navigator: Navigator,
    login_marker: String,
}

impl SessionGuard {
    pub fn new(
        session: Arc<SessionStore>,
        notifier: Arc<Notifier>,
        navigator: Navigator,
        auth_path: &str,
    ) -> Self {
        Self {
            session,
            notifier,
            navigator,
            login_marker: format!("/{}/login", auth_path.trim_matches('/')),
        }
    }
}

#[async_trait]
impl ResponseMiddleware for SessionGuard {
    fn name(&self) -> &'static str {
        "session_guard"
    }

    async fn on_error(&self, request: &ApiRequest, error: ClientError) -> ResponseOutcome {
        // wrong credentials on login are not an expired session
        if !error.is_unauthorized() || request.url.contains(&self.login_marker) {
            return ResponseOutcome::Propagate(error);
        }

        if self.session.clear() {
            info!("Session rejected by server on {} {}", request.method, request.url);
            self.notifier.session_expired_once();
        }
        if self.navigator.current() != Route::Login {
            self.navigator.schedule_login_redirect();
        }
        ResponseOutcome::Handled
    }
}
