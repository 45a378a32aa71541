//! Upstream credentials
//!
//! The current session is held by a `SessionStore` that is built once at
//! startup and handed to whoever needs it. Clients keep a
//! `watch::Receiver` and read the latest token on every call; dropping the
//! receiver is all it takes to stop observing.

use tokio::sync::watch;
use tracing::debug;

/// Credentials attached to rules/redirect service calls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
}

impl Session {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

pub struct SessionStore {
    sender: watch::Sender<Session>,
}

impl SessionStore {
    pub fn new(initial: Session) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Store seeded from a configured token, if any
    pub fn from_token(token: Option<&str>) -> Self {
        let session = match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => Session::with_token(t),
            None => Session::default(),
        };
        Self::new(session)
    }

    pub fn current(&self) -> Session {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.sender.subscribe()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        self.sender.send_replace(Session::with_token(token));
        debug!("Session token updated");
    }

    pub fn clear(&self) {
        self.sender.send_replace(Session::default());
        debug!("Session cleared");
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Session::default())
    }
}
