use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::error::ClientResult;
use crate::http::{ApiClient, BearerAuthenticator, Pipeline, SessionGuard};
use crate::navigation::{Navigator, Route};
use crate::notify::Notifier;
use crate::services::{
    AdminService, AuthService, CourseService, DepartmentService, GoverningBodyService, StaffService,
};
use crate::session::{SessionStorage, SessionStore};

/// Wires the session, notices, navigation and API client together.
#[derive(Clone)]
pub struct Backoffice {
    session: Arc<SessionStore>,
    notifier: Arc<Notifier>,
    navigator: Navigator,
    api: ApiClient,
    max_photo_bytes: u64,
}

impl Backoffice {
    pub fn new(config: &AppConfig, storage: Box<dyn SessionStorage>) -> ClientResult<Self> {
        let session = Arc::new(SessionStore::new(storage));
        let notifier = Arc::new(Notifier::new());
        let navigator = Navigator::new(session.clone());

        let auth_path = &config.api.paths.auth;
        let pipeline = Pipeline::new()
            .with_request(Arc::new(BearerAuthenticator::new(session.clone(), auth_path)))
            .with_response(Arc::new(SessionGuard::new(
                session.clone(),
                notifier.clone(),
                navigator.clone(),
                auth_path,
            )));
        let api = ApiClient::new(&config.api, pipeline)?;

        Ok(Self {
            session,
            notifier,
            navigator,
            api,
            max_photo_bytes: config.upload.max_photo_bytes(),
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn notifier(&self) -> &Arc<Notifier> {
        &self.notifier
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn max_photo_bytes(&self) -> u64 {
        self.max_photo_bytes
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone(), self.session.clone(), self.notifier.clone())
    }

    pub fn departments(&self) -> DepartmentService {
        DepartmentService::new(self.api.clone())
    }

    pub fn courses(&self) -> CourseService {
        CourseService::new(self.api.clone())
    }

    pub fn governing_bodies(&self) -> GoverningBodyService {
        GoverningBodyService::new(self.api.clone())
    }

    pub fn admin(&self) -> AdminService {
        AdminService::new(self.api.clone())
    }

    pub fn staff(&self) -> StaffService {
        StaffService::new(self.api.clone())
    }

    /// Header "logout": server logout, local cleanup, back to login.
    pub async fn sign_out(&self) -> Route {
        self.auth().logout().await;
        info!("Signed out");
        self.navigator.navigate(Route::Login).await
    }
}
