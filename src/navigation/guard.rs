use futures::StreamExt;

use super::Route;
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Back-office pages; unauthenticated visitors go to the welcome page.
    Protected,
    /// Welcome and login; authenticated users go to the dashboard.
    PublicOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

impl Guard {
    pub fn decide(self, authenticated: bool) -> GuardDecision {
        match (self, authenticated) {
            (Guard::Protected, true) | (Guard::PublicOnly, false) => GuardDecision::Allow,
            (Guard::Protected, false) => GuardDecision::Redirect(Route::Welcome),
            (Guard::PublicOnly, true) => GuardDecision::Redirect(Route::Dashboard),
        }
    }

    /// Decide on the first value of the authentication stream.
    pub async fn evaluate(self, session: &SessionStore) -> GuardDecision {
        let authenticated = session
            .observe_authenticated()
            .next()
            .await
            .unwrap_or(false);
        self.decide(authenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_table() {
        assert_eq!(Guard::Protected.decide(true), GuardDecision::Allow);
        assert_eq!(Guard::Protected.decide(false), GuardDecision::Redirect(Route::Welcome));
        assert_eq!(Guard::PublicOnly.decide(false), GuardDecision::Allow);
        assert_eq!(Guard::PublicOnly.decide(true), GuardDecision::Redirect(Route::Dashboard));
    }
}
