//! Headless router: current location, guards and the deferred login redirect.

pub mod guard;
pub mod route;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, info};

use crate::models::GoverningBody;
use crate::session::SessionStore;

pub use guard::{Guard, GuardDecision};
pub use route::Route;

/// Context carried along with a navigation, read by the target screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationState {
    Department { name: String, code: String },
    GoverningBody(Box<GoverningBody>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub route: Route,
    pub state: Option<NavigationState>,
}

#[derive(Clone)]
pub struct Navigator {
    inner: Arc<Inner>,
}

struct Inner {
    session: Arc<SessionStore>,
    location: watch::Sender<Location>,
    history: Mutex<Vec<Route>>,
    redirect_pending: AtomicBool,
}

impl Navigator {
    pub fn new(session: Arc<SessionStore>) -> Self {
        let (location, _rx) = watch::channel(Location {
            route: Route::Welcome,
            state: None,
        });
        Self {
            inner: Arc::new(Inner {
                session,
                location,
                history: Mutex::new(Vec::new()),
                redirect_pending: AtomicBool::new(false),
            }),
        }
    }

    pub fn current(&self) -> Route {
        self.inner.location.borrow().route.clone()
    }

    pub fn location(&self) -> Location {
        self.inner.location.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Location> {
        self.inner.location.subscribe()
    }

    /// Every route landed on, oldest first.
    pub fn history(&self) -> Vec<Route> {
        self.inner
            .history
            .lock()
            .map(|h| h.clone())
            .unwrap_or_default()
    }

    pub async fn navigate(&self, route: Route) -> Route {
        self.navigate_with_state(route, None).await
    }

    /// Run the target's guard and land on the target or its single redirect.
    pub async fn navigate_with_state(&self, route: Route, state: Option<NavigationState>) -> Route {
        let decision = match route.guard() {
            Some(guard) => guard.evaluate(&self.inner.session).await,
            None => GuardDecision::Allow,
        };

        let location = match decision {
            GuardDecision::Allow => Location { route, state },
            GuardDecision::Redirect(target) => {
                debug!("Navigation to {} redirected to {}", route, target);
                Location {
                    route: target,
                    state: None,
                }
            }
        };

        let landed = location.route.clone();
        if let Ok(mut history) = self.inner.history.lock() {
            history.push(landed.clone());
        }
        self.inner.location.send_replace(location);
        landed
    }

    /// Schedule one navigation to the login page after the current task yields.
    ///
    /// Returns `false` when already on the login page or when a redirect is
    /// already pending, so simultaneous failures navigate once.
    pub fn schedule_login_redirect(&self) -> bool {
        if self.current() == Route::Login {
            return false;
        }
        if self.inner.redirect_pending.swap(true, Ordering::SeqCst) {
            return false;
        }

        let navigator = self.clone();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            if navigator.current() != Route::Login {
                info!("Redirecting to login");
                navigator.navigate(Route::Login).await;
            }
            navigator.inner.redirect_pending.store(false, Ordering::SeqCst);
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Session;
    use crate::session::MemorySessionStorage;

    fn navigator(authenticated: bool) -> (Navigator, Arc<SessionStore>) {
        let store = Arc::new(SessionStore::new(Box::new(MemorySessionStorage::new())));
        if authenticated {
            store
                .establish(Session {
                    user_id: 1,
                    name: "A".into(),
                    surname: "B".into(),
                    email: "a@b.it".into(),
                    roles: vec![],
                    token: "tok".into(),
                })
                .unwrap();
        }
        (Navigator::new(store.clone()), store)
    }

    #[tokio::test]
    async fn protected_route_redirects_anonymous_to_welcome() {
        let (nav, _) = navigator(false);
        assert_eq!(nav.navigate(Route::Staff).await, Route::Welcome);
        assert_eq!(nav.navigate(Route::Login).await, Route::Login);
    }

    #[tokio::test]
    async fn login_redirects_authenticated_to_dashboard() {
        let (nav, _) = navigator(true);
        assert_eq!(nav.navigate(Route::Login).await, Route::Dashboard);
        assert_eq!(nav.navigate(Route::Departments).await, Route::Departments);
    }

    #[tokio::test]
    async fn state_is_dropped_on_redirect() {
        let (nav, _) = navigator(false);
        let state = NavigationState::Department { name: "Ing".into(), code: "ING".into() };
        nav.navigate_with_state(Route::Courses { department_id: 1 }, Some(state)).await;
        assert_eq!(nav.location().state, None);
    }

    #[tokio::test]
    async fn login_redirect_is_deduplicated() {
        let (nav, store) = navigator(true);
        nav.navigate(Route::Departments).await;
        store.clear();

        assert!(nav.schedule_login_redirect());
        assert!(!nav.schedule_login_redirect());
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(nav.current(), Route::Login);
        let logins = nav.history().iter().filter(|r| **r == Route::Login).count();
        assert_eq!(logins, 1);
        assert!(!nav.schedule_login_redirect());
    }
}
