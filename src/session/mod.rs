//! Authenticated-user state shared by the whole client.

pub mod storage;

use futures::stream::{self, Stream};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::ClientResult;
use crate::models::Session;

pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};

/// Single source of truth for the current session.
///
/// Memory and durable storage always agree after every transition; the
/// durable copy is only read back at construction.
pub struct SessionStore {
    tx: watch::Sender<Option<Session>>,
    storage: Box<dyn SessionStorage>,
}

impl SessionStore {
    pub fn new(storage: Box<dyn SessionStorage>) -> Self {
        let initial = restore(storage.as_ref());
        let (tx, _rx) = watch::channel(initial);
        Self { tx, storage }
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.tx
            .borrow()
            .as_ref()
            .map(|s| s.token.clone())
            .filter(|t| !t.is_empty())
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.tx.borrow().as_ref().is_some_and(|s| s.has_role(role))
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }

    /// Emits the current authentication state, then every later change.
    pub fn observe_authenticated(&self) -> impl Stream<Item = bool> + Send + Unpin + 'static {
        let rx = self.tx.subscribe();
        Box::pin(stream::unfold((rx, true), |(mut rx, first)| async move {
            if !first && rx.changed().await.is_err() {
                return None;
            }
            let authenticated = rx.borrow_and_update().is_some();
            Some((authenticated, (rx, false)))
        }))
    }

    /// Persist and publish a new session.
    pub fn establish(&self, session: Session) -> ClientResult<()> {
        let raw = serde_json::to_string(&session)?;
        self.storage.save(&raw)?;
        debug!("Session established for user {}", session.user_id);
        self.tx.send_replace(Some(session));
        Ok(())
    }

    /// Drop the session locally. Returns whether one was present.
    pub fn clear(&self) -> bool {
        if let Err(e) = self.storage.clear() {
            warn!("Failed to clear stored session: {}", e);
        }
        self.tx.send_replace(None).is_some()
    }
}

fn restore(storage: &dyn SessionStorage) -> Option<Session> {
    let raw = match storage.load() {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("Failed to read stored session: {}", e);
            return None;
        }
    };

    match serde_json::from_str::<Session>(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!("Discarding malformed stored session: {}", e);
            None
        }
    }
}
