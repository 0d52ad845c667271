//! Process-wide authentication state.
//!
//! A [`SessionContext`] is created once at startup and handed to everything that needs to know
//! who is signed in. It starts out [`SessionState::Loading`] until [`SessionContext::init`] has
//! asked the collaborator for a surviving session.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

pub mod auth;

pub use auth::{Authenticator, RemoteAuth, Session, StaticAuth, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Unauthenticated,
    Authenticated(Session),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(session) => Some(&session.user),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionContext {
    auth: Arc<dyn Authenticator>,
    state: Arc<RwLock<SessionState>>,
}

impl SessionContext {
    pub fn new(auth: Arc<dyn Authenticator>) -> Self {
        Self {
            auth,
            state: Arc::new(RwLock::new(SessionState::Loading)),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    /// Resolve the initial state from a persisted session, if any.
    pub async fn init(&self) -> SessionState {
        let restored = self.auth.restore().await;

        let state = match restored {
            Some(session) => SessionState::Authenticated(session),
            None => SessionState::Unauthenticated,
        };
        *self.state.write() = state.clone();

        state
    }

    /// On rejection the state is left unchanged and the collaborator's message is returned.
    pub async fn sign_in(&self, email: &str, password: &str) -> auth::Result<User> {
        let session = self.auth.sign_in(email, password).await?;
        let user = session.user.clone();
        *self.state.write() = SessionState::Authenticated(session);

        Ok(user)
    }

    pub async fn sign_out(&self) {
        let current = self.state();
        *self.state.write() = SessionState::Unauthenticated;

        if let SessionState::Authenticated(session) = current
            && let Err(err) = self.auth.sign_out(&session).await
        {
            warn!("Remote sign out failed, local session cleared anyway: {err}");
        }
    }

    /// Drop the in-memory session when the application shuts down. The persisted session, if
    /// any, is kept for the next run.
    pub fn teardown(&self) {
        let mut state = self.state.write();
        if matches!(*state, SessionState::Authenticated(_)) {
            info!("Tearing down session");
        }
        *state = SessionState::Unauthenticated;
    }
}
