//! Session readiness signal
//!
//! Stores must not touch storage until the identity provider has settled and a
//! user is signed in. The provider owns a [`Session`] and publishes state
//! changes; every store holds a cloned [`SessionHandle`] and awaits readiness
//! with a timeout before each operation.

use std::time::Duration;

use tokio::sync::watch;

use crate::domain::result::{Error, Result};

/// Identity state as published by the identity provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// The provider has reported at least once
    pub ready: bool,
    pub user_id: Option<String>,
}

impl AuthState {
    fn signed_in_user(&self) -> Option<&str> {
        if self.ready {
            self.user_id.as_deref()
        } else {
            None
        }
    }
}

/// Publishing side, owned by whatever authenticates the user
#[derive(Debug)]
pub struct Session {
    tx: watch::Sender<AuthState>,
}

impl Session {
    /// A session that has not reported yet
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthState::default());
        Self { tx }
    }

    /// A session already signed in as `user_id`
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        let session = Self::new();
        session.sign_in(user_id);
        session
    }

    pub fn sign_in(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        tracing::info!(user_id = %user_id, "session signed in");
        self.tx.send_replace(AuthState {
            ready: true,
            user_id: Some(user_id),
        });
    }

    /// Provider settled with nobody signed in
    pub fn sign_out(&self) {
        tracing::info!("session signed out");
        self.tx.send_replace(AuthState {
            ready: true,
            user_id: None,
        });
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Read side handed to every store
#[derive(Debug, Clone)]
pub struct SessionHandle {
    rx: watch::Receiver<AuthState>,
}

impl SessionHandle {
    /// Current user id, if signed in right now
    pub fn current_user(&self) -> Option<String> {
        self.rx.borrow().signed_in_user().map(str::to_string)
    }

    /// Wait until a user is signed in and return their id
    ///
    /// Fails with `AuthTimeout` when nothing arrives in time and with
    /// `Unauthenticated` when the publishing side has gone away.
    pub async fn wait_ready(&self, timeout: Duration) -> Result<String> {
        let mut rx = self.rx.clone();
        let waited = tokio::time::timeout(timeout, async {
            rx.wait_for(|state| state.signed_in_user().is_some())
                .await
                .map(|state| state.user_id.clone().unwrap_or_default())
        })
        .await;

        match waited {
            Ok(Ok(user_id)) => Ok(user_id),
            Ok(Err(_closed)) => Err(Error::Unauthenticated),
            Err(_elapsed) => Err(Error::AuthTimeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ready_session_returns_immediately() {
        let session = Session::signed_in("user-1");
        let user = session.handle().wait_ready(Duration::from_millis(10)).await.unwrap();
        assert_eq!(user, "user-1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_times_out_without_sign_in() {
        let session = Session::new();
        let result = session.handle().wait_ready(Duration::from_secs(5)).await;
        assert!(matches!(result, Err(Error::AuthTimeout)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_signed_out_is_not_ready() {
        let session = Session::new();
        session.sign_out();
        let result = session.handle().wait_ready(Duration::from_secs(1)).await;
        assert!(matches!(result, Err(Error::AuthTimeout)));
    }

    #[tokio::test]
    async fn test_waiter_wakes_on_sign_in() {
        let session = Session::new();
        let handle = session.handle();
        let waiter = tokio::spawn(async move { handle.wait_ready(Duration::from_secs(5)).await });

        tokio::task::yield_now().await;
        session.sign_in("late-user");

        assert_eq!(waiter.await.unwrap().unwrap(), "late-user");
    }

    #[tokio::test]
    async fn test_dropped_session_is_unauthenticated() {
        let session = Session::new();
        let handle = session.handle();
        drop(session);
        let result = handle.wait_ready(Duration::from_secs(5)).await;
        assert!(matches!(result, Err(Error::Unauthenticated)));
    }
}
