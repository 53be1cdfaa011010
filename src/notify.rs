//! User-facing notices raised outside of any single screen.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;
use tracing::warn;

pub const SESSION_EXPIRED_MESSAGE: &str = "Sessione scaduta. Effettua di nuovo l'accesso.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    SessionExpired,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::SessionExpired => SESSION_EXPIRED_MESSAGE,
        }
    }
}

pub struct Notifier {
    session_expired_shown: AtomicBool,
    tx: broadcast::Sender<Notice>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(16);
        Self {
            session_expired_shown: AtomicBool::new(false),
            tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    /// Raise the session-expired notice unless it was already raised since the last login.
    pub fn session_expired_once(&self) -> bool {
        if self.session_expired_shown.swap(true, Ordering::SeqCst) {
            return false;
        }
        warn!("{}", SESSION_EXPIRED_MESSAGE);
        // no subscribers is fine
        let _ = self.tx.send(Notice::SessionExpired);
        true
    }

    pub fn reset_session_expired(&self) {
        self.session_expired_shown.store(false, Ordering::SeqCst);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_expired_is_raised_once_until_reset() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();

        assert!(notifier.session_expired_once());
        assert!(!notifier.session_expired_once());
        assert_eq!(rx.try_recv().ok(), Some(Notice::SessionExpired));
        assert!(rx.try_recv().is_err());

        notifier.reset_session_expired();
        assert!(notifier.session_expired_once());
    }
}
