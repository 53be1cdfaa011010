use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use tracing::warn;

use super::{ApiRequest, RequestMiddleware};
use crate::session::SessionStore;

/// Attaches `Authorization: Bearer <token>` to every call except login.
pub struct BearerAuthenticator {
    session: Arc<SessionStore>,
    login_marker: String,
}

impl BearerAuthenticator {
    pub fn new(session: Arc<SessionStore>, auth_path: &str) -> Self {
        Self {
            session,
            login_marker: format!("/{}/login", auth_path.trim_matches('/')),
        }
    }

    pub fn is_login(&self, url: &str) -> bool {
        url.contains(&self.login_marker)
    }
}

impl RequestMiddleware for BearerAuthenticator {
    fn name(&self) -> &'static str {
        "bearer_authenticator"
    }

    fn on_request(&self, mut request: ApiRequest) -> ApiRequest {
        if self.is_login(&request.url) {
            return request;
        }
        let Some(token) = self.session.token() else {
            return request;
        };

        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(value) => {
                request.headers.insert(AUTHORIZATION, value);
            }
            Err(e) => warn!("Stored token is not a valid header value: {}", e),
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Session;
    use crate::session::MemorySessionStorage;

    fn store_with_token(token: Option<&str>) -> Arc<SessionStore> {
        let store = Arc::new(SessionStore::new(Box::new(MemorySessionStorage::new())));
        if let Some(token) = token {
            store
                .establish(Session {
                    user_id: 1,
                    name: String::new(),
                    surname: String::new(),
                    email: String::new(),
                    roles: vec![],
                    token: token.to_string(),
                })
                .unwrap();
        }
        store
    }

    #[test]
    fn attaches_token_except_on_login() {
        let auth = BearerAuthenticator::new(store_with_token(Some("abc")), "auth");

        let req = auth.on_request(ApiRequest::get("http://h/api/staff/all"));
        assert_eq!(req.authorization(), Some("Bearer abc"));

        let req = auth.on_request(ApiRequest::post("http://h/api/auth/login"));
        assert_eq!(req.authorization(), None);
    }

    #[test]
    fn no_session_no_header() {
        let auth = BearerAuthenticator::new(store_with_token(None), "auth");
        let req = auth.on_request(ApiRequest::get("http://h/api/staff/all"));
        assert_eq!(req.authorization(), None);
    }
}
