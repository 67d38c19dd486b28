use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

use crate::errors::CoreError;

/// An authenticated user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    identity: Option<Identity>,
    /// Set while a redirect sign-in is in flight. Never expires.
    redirect_pending: bool,
}

/// Shared sign-in state. Clones observe the same session, so the cloud
/// store and the UI layer agree on who is signed in.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    state: Arc<RwLock<SessionState>>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Identity) -> Self {
        let session = Self::new();
        session.sign_in(identity);
        session
    }

    pub fn identity(&self) -> Option<Identity> {
        self.read(|s| s.identity.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.read(|s| s.identity.is_some())
    }

    pub fn sign_in(&self, identity: Identity) {
        log::info!("signed in as {}", identity.user_id);
        self.write(|s| s.identity = Some(identity));
    }

    pub fn sign_out(&self) {
        if let Some(identity) = self.write(|s| s.identity.take()) {
            log::info!("signed out {}", identity.user_id);
        }
    }

    /// Record that a redirect sign-in was started, so the result can be
    /// picked up when control comes back.
    pub fn begin_redirect(&self) {
        self.write(|s| s.redirect_pending = true);
    }

    pub fn redirect_pending(&self) -> bool {
        self.read(|s| s.redirect_pending)
    }

    /// Resolve a redirect sign-in.
    ///
    /// Returns `Ok(None)` when no redirect was started (the result is
    /// ignored), the identity on success, and `CoreError::SignIn` on
    /// failure. The pending marker is cleared in every case.
    pub fn complete_redirect(
        &self,
        result: Result<Identity, String>,
    ) -> Result<Option<Identity>, CoreError> {
        let was_pending = self.write(|s| std::mem::take(&mut s.redirect_pending));
        if !was_pending {
            return Ok(None);
        }

        match result {
            Ok(identity) => {
                self.sign_in(identity.clone());
                Ok(Some(identity))
            }
            Err(message) => {
                log::warn!("redirect sign-in failed: {message}");
                Err(CoreError::SignIn(message))
            }
        }
    }

    fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        let guard = self
            .state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }

    fn write<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut guard = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}
