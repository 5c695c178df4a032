use std::sync::{Arc, Mutex};

use crate::api::auth::{AuthApi, NewAccount};
use crate::api::http::TokenStore;
use crate::errors::CoreError;
use crate::models::user::User;
use crate::subscribers::{Subscribers, SubscriptionId};

#[derive(Debug, Default)]
struct SessionState {
    user: Option<User>,
    loading: bool,
}

/// Holds the current authenticated identity (or none) and exposes the
/// login/register/logout operations. The cart store is gated on this.
///
/// Subscribers are notified only on identity *change* (login, logout,
/// restore), never on reads — downstream reactions such as the cart
/// store's sync run once per transition.
pub struct Session {
    api: Arc<dyn AuthApi>,
    tokens: Arc<dyn TokenStore>,
    state: Mutex<SessionState>,
    subscribers: Subscribers<Option<User>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().ok();
        f.debug_struct("Session")
            .field(
                "user",
                &state.as_ref().and_then(|s| s.user.as_ref().map(|u| &u.email)),
            )
            .field("loading", &state.as_ref().map(|s| s.loading))
            .finish()
    }
}

impl Session {
    pub fn new(api: Arc<dyn AuthApi>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            tokens,
            state: Mutex::new(SessionState::default()),
            subscribers: Subscribers::new(),
        }
    }

    // ── Reads ───────────────────────────────────────────────────────

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state.lock().ok().and_then(|s| s.user.clone())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state
            .lock()
            .map(|s| s.user.is_some())
            .unwrap_or(false)
    }

    /// True while an initial `restore` is resolving the stored token.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.lock().map(|s| s.loading).unwrap_or(false)
    }

    /// Register a callback invoked with the new identity after each
    /// identity change.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Option<User>) + Send + Sync + 'static,
    {
        self.subscribers.add(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    // ── Operations ──────────────────────────────────────────────────

    /// Resolve a previously stored token into an identity, if any.
    /// With no stored token this is a no-op returning `None`.
    pub async fn restore(&self) -> Result<Option<User>, CoreError> {
        if self.tokens.get().is_none() {
            return Ok(None);
        }
        self.set_loading(true);
        let result = self.api.me().await;
        self.set_loading(false);
        match result {
            Ok(user) => {
                self.replace_identity(Some(user.clone()));
                Ok(Some(user))
            }
            Err(e) => {
                // Stored token no longer valid; drop it.
                tracing::debug!("session restore failed, clearing token: {e}");
                self.tokens.clear();
                self.replace_identity(None);
                Err(e)
            }
        }
    }

    /// Log in, store the bearer token, and resolve the full profile.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, CoreError> {
        let resp = self.api.login(email, password).await?;
        self.tokens.set(&resp.token);
        // Re-fetch through /auth/me: the login payload is a trimmed user.
        let user = self.api.me().await.unwrap_or(resp.user);
        self.replace_identity(Some(user.clone()));
        Ok(user)
    }

    /// Create an account, then log straight into it.
    pub async fn register(&self, account: NewAccount) -> Result<User, CoreError> {
        let email = account.email.clone();
        let password = account.password.clone();
        self.api.register(&account).await?;
        self.login(&email, &password).await
    }

    /// Drop the token and the identity. Local only — no endpoint.
    pub fn logout(&self) {
        self.tokens.clear();
        self.replace_identity(None);
    }

    // ── Internal ────────────────────────────────────────────────────

    fn set_loading(&self, loading: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.loading = loading;
        }
    }

    /// Swap the identity and notify subscribers, but only if it actually
    /// changed (compared by user id).
    fn replace_identity(&self, user: Option<User>) {
        let changed = {
            let Ok(mut state) = self.state.lock() else {
                return;
            };
            let old_id = state.user.as_ref().map(|u| u.id.clone());
            let new_id = user.as_ref().map(|u| u.id.clone());
            state.user = user.clone();
            old_id != new_id
        };
        if changed {
            tracing::debug!(
                authenticated = user.is_some(),
                "session identity changed"
            );
            self.subscribers.notify(&user);
        }
    }
}
