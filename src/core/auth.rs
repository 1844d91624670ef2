//! Authentication boundary.
//!
//! The identity provider is external; the engine only needs the current user id and a
//! way to hear about sign-in/sign-out. Every user-scoped entry point resolves the user
//! through [`require_user`] and refuses to run without one.

use crate::errors::{Error, Result};
use std::sync::{Mutex, RwLock};
use tracing::{debug, warn};

/// Listener invoked with the new user id (or `None` after sign-out).
pub type AuthCallback = Box<dyn Fn(Option<&str>) + Send + Sync>;

/// Session provider consumed by the engine.
pub trait AuthProvider: Send + Sync {
    /// Id of the signed-in user, if any.
    fn current_user_id(&self) -> Option<String>;

    /// Registers a listener for session changes.
    fn on_auth_change(&self, callback: AuthCallback);

    /// Ends the current session.
    fn sign_out(&self);

    /// Whether a user is signed in.
    fn is_authenticated(&self) -> bool {
        self.current_user_id().is_some()
    }
}

/// Returns the signed-in user id or [`Error::NotAuthenticated`].
pub fn require_user(auth: &dyn AuthProvider) -> Result<String> {
    auth.current_user_id().ok_or_else(|| {
        warn!("Rejected request without an authenticated user");
        Error::NotAuthenticated
    })
}

/// In-process session holder, used by the binary (user from `BUDGET_USER_ID`) and tests.
#[derive(Default)]
pub struct StaticAuth {
    user_id: RwLock<Option<String>>,
    listeners: Mutex<Vec<AuthCallback>>,
}

impl StaticAuth {
    /// A provider with `user_id` already signed in.
    #[must_use]
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: RwLock::new(Some(user_id.into())),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// A provider with nobody signed in.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Signs `user_id` in and notifies listeners.
    pub fn sign_in(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        debug!("Signing in user {}", user_id);
        if let Ok(mut current) = self.user_id.write() {
            *current = Some(user_id.clone());
        }
        self.notify(Some(&user_id));
    }

    fn notify(&self, user_id: Option<&str>) {
        if let Ok(listeners) = self.listeners.lock() {
            for listener in listeners.iter() {
                listener(user_id);
            }
        }
    }
}

impl AuthProvider for StaticAuth {
    fn current_user_id(&self) -> Option<String> {
        self.user_id.read().ok().and_then(|current| current.clone())
    }

    fn on_auth_change(&self, callback: AuthCallback) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(callback);
        }
    }

    fn sign_out(&self) {
        debug!("Signing out");
        if let Ok(mut current) = self.user_id.write() {
            *current = None;
        }
        self.notify(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_require_user_without_session() {
        let auth = StaticAuth::anonymous();
        assert!(!auth.is_authenticated());
        assert!(matches!(require_user(&auth), Err(Error::NotAuthenticated)));
    }

    #[test]
    fn test_require_user_with_session() -> Result<()> {
        let auth = StaticAuth::signed_in("user-1");
        assert_eq!(require_user(&auth)?, "user-1");
        Ok(())
    }

    #[test]
    fn test_listeners_see_sign_in_and_sign_out() {
        let auth = StaticAuth::anonymous();
        let changes = Arc::new(AtomicUsize::new(0));
        let signed_in = Arc::new(AtomicUsize::new(0));

        let (c, s) = (Arc::clone(&changes), Arc::clone(&signed_in));
        auth.on_auth_change(Box::new(move |user| {
            c.fetch_add(1, Ordering::SeqCst);
            if user.is_some() {
                s.fetch_add(1, Ordering::SeqCst);
            }
        }));

        auth.sign_in("user-2");
        assert_eq!(auth.current_user_id().as_deref(), Some("user-2"));
        auth.sign_out();
        assert!(auth.current_user_id().is_none());

        assert_eq!(changes.load(Ordering::SeqCst), 2);
        assert_eq!(signed_in.load(Ordering::SeqCst), 1);
    }
}
