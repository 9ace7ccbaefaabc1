//! # Session store and the authentication capability seam
//!
//! [`SessionStore`] owns the single process-wide [`Session`] record and
//! persists the `{user, isAuthenticated}` pair under the `auth-storage` key
//! after every mutation. Credential checks are delegated through the
//! [`AuthProvider`] trait, so the same store runs against the predefined
//! local directory or the hosted identity service.
//!
//! ## Failure semantics
//!
//! No provider or storage failure escapes a store method. Failures are
//! captured as one string on the `error` field and the method returns a
//! success/failure descriptor; [`SessionStore::clear_error`] resets it.
//!
//! ## Confirmed accounts
//!
//! Providers that answer `true` from [`AuthProvider::requires_confirmation`]
//! only yield usable sessions for confirmed accounts: when a login returns an
//! account without a confirmation timestamp, the store immediately signs the
//! provider back out (invalidating the session the service just created) and
//! reports the distinguished [`LoginOutcome::NeedsVerification`] instead of a
//! generic credential failure.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::models::{Session, User};
use crate::storage::KeyValueStorage;

/// Why an authentication call failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The identifier/credential pair matched no account.
    #[error("Credenciales inválidas")]
    InvalidCredentials,
    /// The account exists but has not confirmed its email address yet.
    #[error("Debes confirmar tu correo antes de iniciar sesión")]
    NeedsVerification,
    /// The active provider does not implement this operation.
    #[error("Esta operación requiere el servicio de identidad remoto")]
    Unsupported,
    /// Network or service failure, surfaced verbatim.
    #[error("{0}")]
    Service(String),
}

/// Registration request forwarded to the identity provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

/// Successful registration descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    /// True when the account must be confirmed before it can log in.
    pub needs_verification: bool,
}

/// Outcome of a [`SessionStore::login`] attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    /// The account exists but awaits email confirmation; any session the
    /// service created was invalidated.
    NeedsVerification,
    Failed,
}

impl LoginOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, LoginOutcome::Success)
    }
}

/// Capability seam for credential checks.
///
/// Implementations: the predefined-directory fallback and the hosted
/// identity service adapter (both in the `api` crate).
pub trait AuthProvider {
    fn login(
        &self,
        identifier: &str,
        credential: &str,
    ) -> impl Future<Output = Result<User, AuthError>>;

    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<Registration, AuthError>>;

    fn logout(&self) -> impl Future<Output = Result<(), AuthError>>;

    fn reset_password(&self, email: &str) -> impl Future<Output = Result<(), AuthError>>;

    /// Whether accounts from this provider must carry a confirmation
    /// timestamp before a session is accepted.
    fn requires_confirmation(&self) -> bool {
        false
    }
}

/// Holds the current user and authentication flag; delegates credential
/// checks to an [`AuthProvider`] and persists every change.
pub struct SessionStore<P: AuthProvider, S: KeyValueStorage> {
    provider: P,
    storage: S,
    session: Session,
    error: Option<String>,
}

impl<P: AuthProvider, S: KeyValueStorage> SessionStore<P, S> {
    /// Build a store, restoring the persisted session pair if one exists.
    pub fn new(provider: P, storage: S) -> Self {
        let session = storage
            .get(config::keys::AUTH)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            provider,
            storage,
            session,
            error: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn persist(&self) {
        match serde_json::to_string(&self.session) {
            Ok(raw) => {
                if !self.storage.set(config::keys::AUTH, &raw) {
                    tracing::warn!("session not persisted: storage rejected the write");
                }
            }
            Err(err) => tracing::warn!("session not persisted: {err}"),
        }
    }

    fn replace_session(&mut self, session: Session) {
        self.session = session;
        self.persist();
    }

    /// Attempt a login. On success the session is replaced and persisted; on
    /// failure the session stays signed out and `error` carries the message.
    pub async fn login(&mut self, identifier: &str, credential: &str) -> LoginOutcome {
        self.error = None;
        match self.provider.login(identifier, credential).await {
            Ok(user) => {
                if self.provider.requires_confirmation() && user.confirmed_at.is_none() {
                    // The service already opened a session for the
                    // unconfirmed account; invalidate it before reporting.
                    if let Err(err) = self.provider.logout().await {
                        tracing::warn!("sign-out after unconfirmed login failed: {err}");
                    }
                    self.replace_session(Session::default());
                    self.error = Some(AuthError::NeedsVerification.to_string());
                    return LoginOutcome::NeedsVerification;
                }
                self.replace_session(Session {
                    user: Some(user),
                    is_authenticated: true,
                });
                LoginOutcome::Success
            }
            Err(AuthError::NeedsVerification) => {
                self.replace_session(Session::default());
                self.error = Some(AuthError::NeedsVerification.to_string());
                LoginOutcome::NeedsVerification
            }
            Err(err) => {
                self.error = Some(err.to_string());
                LoginOutcome::Failed
            }
        }
    }

    /// Register a new account. Never leaves the store authenticated: the
    /// provider invalidates any session the service created implicitly.
    pub async fn register(&mut self, request: &RegisterRequest) -> Option<Registration> {
        self.error = None;
        match self.provider.register(request).await {
            Ok(registration) => {
                self.replace_session(Session::default());
                Some(registration)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                None
            }
        }
    }

    /// Sign out. The local session is cleared even when the provider call
    /// fails.
    pub async fn logout(&mut self) {
        if let Err(err) = self.provider.logout().await {
            tracing::warn!("provider sign-out failed: {err}");
        }
        self.error = None;
        self.replace_session(Session::default());
    }

    /// Ask the provider to start a password reset. No session change.
    pub async fn reset_password(&mut self, email: &str) -> bool {
        self.error = None;
        match self.provider.reset_password(email).await {
            Ok(()) => true,
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::MemoryStorage;

    /// Provider with a fixed credential list and a logout counter.
    #[derive(Clone, Default)]
    struct StubProvider {
        accounts: Vec<(String, String, User)>,
        confirmation_required: bool,
        logout_calls: Arc<AtomicUsize>,
    }

    impl StubProvider {
        fn with_account(identifier: &str, credential: &str, user: User) -> Self {
            Self {
                accounts: vec![(identifier.into(), credential.into(), user)],
                ..Self::default()
            }
        }
    }

    impl AuthProvider for StubProvider {
        async fn login(&self, identifier: &str, credential: &str) -> Result<User, AuthError> {
            self.accounts
                .iter()
                .find(|(id, cred, _)| id == identifier && cred == credential)
                .map(|(_, _, user)| user.clone())
                .ok_or(AuthError::InvalidCredentials)
        }

        async fn register(&self, _request: &RegisterRequest) -> Result<Registration, AuthError> {
            Ok(Registration {
                needs_verification: true,
            })
        }

        async fn logout(&self) -> Result<(), AuthError> {
            self.logout_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn reset_password(&self, _email: &str) -> Result<(), AuthError> {
            Ok(())
        }

        fn requires_confirmation(&self) -> bool {
            self.confirmation_required
        }
    }

    fn confirmed_user() -> User {
        User {
            id: "u1".into(),
            username: "maria".into(),
            name: Some("María García".into()),
            email: Some("maria@example.com".into()),
            confirmed_at: Some("2024-01-01T00:00:00Z".into()),
            role: None,
        }
    }

    fn unconfirmed_user() -> User {
        User {
            confirmed_at: None,
            ..confirmed_user()
        }
    }

    #[tokio::test]
    async fn test_login_unknown_credentials_fails() {
        let provider = StubProvider::with_account("maria", "secreta", confirmed_user());
        let mut store = SessionStore::new(provider, MemoryStorage::new());

        let outcome = store.login("maria", "wrong").await;

        assert_eq!(outcome, LoginOutcome::Failed);
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        assert_eq!(store.error(), Some("Credenciales inválidas"));
    }

    #[tokio::test]
    async fn test_login_persists_and_hydrates() {
        let storage = MemoryStorage::new();
        let provider = StubProvider::with_account("maria", "secreta", confirmed_user());
        let mut store = SessionStore::new(provider.clone(), storage.clone());

        assert!(store.login("maria", "secreta").await.is_success());
        assert!(store.is_authenticated());

        // A fresh store on the same storage restores the persisted pair.
        let restored = SessionStore::new(provider, storage);
        assert!(restored.is_authenticated());
        assert_eq!(restored.user().unwrap().username, "maria");
    }

    #[tokio::test]
    async fn test_unconfirmed_account_forces_sign_out() {
        let mut provider = StubProvider::with_account("nueva", "clave", unconfirmed_user());
        provider.confirmation_required = true;
        let logout_calls = provider.logout_calls.clone();
        let mut store = SessionStore::new(provider, MemoryStorage::new());

        let outcome = store.login("nueva", "clave").await;

        assert_eq!(outcome, LoginOutcome::NeedsVerification);
        assert_eq!(logout_calls.load(Ordering::SeqCst), 1);
        assert!(!store.is_authenticated());
        assert!(store.error().unwrap().contains("confirmar"));
    }

    #[tokio::test]
    async fn test_unconfirmed_check_skipped_for_local_provider() {
        // The predefined directory never sets confirmed_at; that must not
        // block local logins.
        let provider = StubProvider::with_account("maria", "secreta", unconfirmed_user());
        let mut store = SessionStore::new(provider, MemoryStorage::new());

        assert!(store.login("maria", "secreta").await.is_success());
        assert!(store.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_and_persists() {
        let storage = MemoryStorage::new();
        let provider = StubProvider::with_account("maria", "secreta", confirmed_user());
        let mut store = SessionStore::new(provider.clone(), storage.clone());

        store.login("maria", "secreta").await;
        store.logout().await;

        assert!(!store.is_authenticated());
        assert!(store.user().is_none());

        let restored = SessionStore::new(provider, storage);
        assert!(!restored.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_never_authenticates() {
        let provider = StubProvider::default();
        let mut store = SessionStore::new(provider, MemoryStorage::new());

        let registration = store
            .register(&RegisterRequest {
                email: "nueva@example.com".into(),
                password: "clave123".into(),
                username: "nueva".into(),
            })
            .await
            .unwrap();

        assert!(registration.needs_verification);
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_clear_error() {
        let provider = StubProvider::default();
        let mut store = SessionStore::new(provider, MemoryStorage::new());

        store.login("nadie", "nada").await;
        assert!(store.error().is_some());

        store.clear_error();
        assert!(store.error().is_none());
    }
}
