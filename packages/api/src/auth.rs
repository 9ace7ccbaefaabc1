//! # Hosted identity service client
//!
//! [`RemoteAuthClient`] consumes the identity endpoints of the hosted
//! service (`/auth/v1/...`): account creation, password sign-in, sign-out,
//! password recovery, and fetching/updating the account behind the current
//! session. The held access token lives in an `Arc<Mutex<…>>` shared by
//! every clone, so the session survives across cheaply constructed stores.
//!
//! [`RemoteAuthProvider`] adapts the client to [`store::AuthProvider`]. Two
//! rules live here rather than in the client:
//!
//! - **Registration never authenticates.** Some service policies open a
//!   session on sign-up; the adapter signs it out before reporting success.
//! - **Unconfirmed sessions are invalidated on sight.** The periodic
//!   re-check path ([`RemoteAuthProvider::current_user`]) signs out any
//!   session whose account carries no confirmation timestamp.

use std::sync::{Arc, Mutex};

use serde::Deserialize;
use serde_json::{json, Value};

use store::{AuthError, AuthProvider, RegisterRequest, Registration, User};

use crate::error::ApiError;
use crate::models::RemoteUser;

/// Connection settings for the hosted service.
#[derive(Clone, Debug)]
pub struct RemoteConfig {
    /// Service base URL, e.g. `https://<project>.supabase.co`.
    pub url: String,
    /// Public (anon) API key sent with every request.
    pub anon_key: String,
}

impl RemoteConfig {
    /// Connection settings compiled in at build time, if any.
    pub fn from_env() -> Option<Self> {
        let url = option_env!("VISUALLAB_SERVICE_URL")?;
        let anon_key = option_env!("VISUALLAB_SERVICE_KEY")?;
        Some(Self {
            url: url.to_string(),
            anon_key: anon_key.to_string(),
        })
    }
}

/// An authenticated service session.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: RemoteUser,
}

/// Response to a sign-up call. `session` is only present when the service
/// policy opens one immediately.
#[derive(Clone, Debug, Deserialize)]
pub struct SignUpResponse {
    #[serde(default)]
    pub user: Option<RemoteUser>,
    #[serde(default)]
    pub session: Option<AuthSession>,
}

/// One-shot HTTP client for the identity endpoints.
#[derive(Clone)]
pub struct RemoteAuthClient {
    config: RemoteConfig,
    http: reqwest::Client,
    session: Arc<Mutex<Option<AuthSession>>>,
}

impl RemoteAuthClient {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            session: Arc::new(Mutex::new(None)),
        }
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn config(&self) -> &RemoteConfig {
        &self.config
    }

    pub(crate) fn access_token(&self) -> Option<String> {
        self.session
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// The currently held session, if any.
    pub fn session(&self) -> Option<AuthSession> {
        self.session.lock().unwrap().clone()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1{path}", self.config.url.trim_end_matches('/'))
    }

    /// Extract the service's error message from a failed response.
    pub(crate) async fn service_error(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| {
                ["msg", "error_description", "message", "error"]
                    .iter()
                    .find_map(|field| body.get(*field).and_then(Value::as_str).map(str::to_string))
            })
            .unwrap_or_else(|| format!("Solicitud rechazada por el servicio ({status})"));
        ApiError::Service { status, message }
    }

    /// Create an account. Any session the policy opens is held like one
    /// obtained through [`sign_in`](Self::sign_in).
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Value,
    ) -> Result<SignUpResponse, ApiError> {
        let response = self
            .http
            .post(self.endpoint("/signup"))
            .header("apikey", &self.config.anon_key)
            .json(&json!({ "email": email, "password": password, "data": metadata }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        let payload: SignUpResponse = response.json().await?;
        if let Some(ref session) = payload.session {
            *self.session.lock().unwrap() = Some(session.clone());
        }
        Ok(payload)
    }

    /// Exchange credentials for a session (password grant).
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        let response = self
            .http
            .post(format!("{}?grant_type=password", self.endpoint("/token")))
            .header("apikey", &self.config.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        let session: AuthSession = response.json().await?;
        *self.session.lock().unwrap() = Some(session.clone());
        Ok(session)
    }

    /// Invalidate the current session, locally and on the service. A no-op
    /// when no session is held.
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        let token = self
            .session
            .lock()
            .unwrap()
            .take()
            .map(|s| s.access_token);
        if let Some(token) = token {
            let response = self
                .http
                .post(self.endpoint("/logout"))
                .header("apikey", &self.config.anon_key)
                .bearer_auth(token)
                .send()
                .await?;
            if !response.status().is_success() {
                return Err(Self::service_error(response).await);
            }
        }
        Ok(())
    }

    /// Ask the service to email password-reset instructions.
    pub async fn reset_password_for_email(&self, email: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.endpoint("/recover"))
            .header("apikey", &self.config.anon_key)
            .json(&json!({ "email": email }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        Ok(())
    }

    /// Fetch the account behind the current session. A rejected token
    /// degrades to signed-out rather than an error.
    pub async fn get_user(&self) -> Result<Option<RemoteUser>, ApiError> {
        let Some(token) = self.access_token() else {
            return Ok(None);
        };
        let response = self
            .http
            .get(self.endpoint("/user"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token)
            .send()
            .await?;
        if !response.status().is_success() {
            *self.session.lock().unwrap() = None;
            return Ok(None);
        }
        Ok(Some(response.json().await?))
    }

    /// Update fields of the current account (e.g. a new password).
    pub async fn update_user(&self, changes: Value) -> Result<RemoteUser, ApiError> {
        let Some(token) = self.access_token() else {
            return Err(ApiError::Service {
                status: 401,
                message: "No hay sesión activa".to_string(),
            });
        };
        let response = self
            .http
            .put(self.endpoint("/user"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token)
            .json(&changes)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        Ok(response.json().await?)
    }
}

/// [`AuthProvider`] adapter over the hosted identity service.
#[derive(Clone)]
pub struct RemoteAuthProvider {
    client: RemoteAuthClient,
}

impl RemoteAuthProvider {
    pub fn new(client: RemoteAuthClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RemoteAuthClient {
        &self.client
    }

    /// Re-check the account behind the held session, mirroring the
    /// confirmed/unconfirmed rule: an unconfirmed session is signed out on
    /// sight and reported as a needs-verification failure.
    pub async fn current_user(&self) -> Result<Option<User>, AuthError> {
        match self.client.get_user().await {
            Ok(Some(remote)) if remote.email_confirmed_at.is_none() => {
                if let Err(err) = self.client.sign_out().await {
                    tracing::warn!("sign-out of unconfirmed session failed: {err}");
                }
                Err(AuthError::NeedsVerification)
            }
            Ok(remote) => Ok(remote.map(|r| r.to_user())),
            Err(err) => Err(AuthError::Service(err.message())),
        }
    }
}

impl AuthProvider for RemoteAuthProvider {
    async fn login(&self, identifier: &str, credential: &str) -> Result<User, AuthError> {
        match self.client.sign_in(identifier, credential).await {
            Ok(session) => Ok(session.user.to_user()),
            Err(err) => Err(AuthError::Service(err.message())),
        }
    }

    async fn register(&self, request: &RegisterRequest) -> Result<Registration, AuthError> {
        let result = self
            .client
            .sign_up(
                &request.email,
                &request.password,
                json!({ "username": request.username }),
            )
            .await;
        // Never leave the implicit sign-up session behind, even on failure.
        if let Err(err) = self.client.sign_out().await {
            tracing::warn!("sign-out after registration failed: {err}");
        }
        match result {
            Ok(_) => Ok(Registration {
                needs_verification: true,
            }),
            Err(err) => Err(AuthError::Service(err.message())),
        }
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.client
            .sign_out()
            .await
            .map_err(|err| AuthError::Service(err.message()))
    }

    async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        self.client
            .reset_password_for_email(email)
            .await
            .map_err(|err| AuthError::Service(err.message()))
    }

    fn requires_confirmation(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_session_payload_parsing() {
        let session: AuthSession = serde_json::from_value(json!({
            "access_token": "mock-access-token",
            "refresh_token": "mock-refresh-token",
            "user": {
                "id": "test-user-id-123",
                "email": "test@example.com",
                "email_confirmed_at": "2024-01-01T00:00:00Z",
                "user_metadata": { "username": "testuser" }
            }
        }))
        .unwrap();

        assert_eq!(session.access_token, "mock-access-token");
        assert_eq!(session.user.to_user().username, "testuser");
    }

    #[test]
    fn test_sign_up_without_session() {
        let response: SignUpResponse = serde_json::from_value(json!({
            "user": { "id": "new-user-1", "email": "nueva@example.com" },
            "session": null
        }))
        .unwrap();
        assert!(response.user.is_some());
        assert!(response.session.is_none());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = RemoteAuthClient::new(RemoteConfig {
            url: "https://proyecto.supabase.co/".to_string(),
            anon_key: "anon".to_string(),
        });
        assert_eq!(
            client.endpoint("/token"),
            "https://proyecto.supabase.co/auth/v1/token"
        );
    }
}
