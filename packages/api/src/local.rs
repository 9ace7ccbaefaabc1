//! # Predefined-user fallback provider
//!
//! [`LocalAuthProvider`] is the [`AuthProvider`] used when no remote
//! identity service is configured. It keeps a small user directory in client
//! storage under `edu_platform_users`, seeded from a compiled-in list on
//! first use. Seeding merges by username: entries already in storage are
//! never overwritten, and any predefined entry missing from an existing
//! directory is added.
//!
//! Credentials are stored as Argon2 PHC strings — plaintext never reaches
//! durable storage — and the record returned on a successful login carries
//! no credential material at all.
//!
//! Registration and password reset belong to the remote service; here they
//! report an unsupported-operation failure.

use serde::{Deserialize, Serialize};

use store::config::keys;
use store::{AuthError, AuthProvider, KeyValueStorage, RegisterRequest, Registration, User};

use crate::password::{hash_password, verify_password};

/// Compiled-in fallback credential set: id, username, display name, role,
/// password (hashed before it is stored).
const PREDEFINED_USERS: [(&str, &str, &str, &str, &str); 3] = [
    ("local-1", "estudiante1", "María García", "student", "est123"),
    ("local-2", "estudiante2", "Carlos López", "student", "est456"),
    ("local-3", "profesor1", "Ana Martínez", "teacher", "prof123"),
];

/// Directory record persisted under `edu_platform_users`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectoryUser {
    id: String,
    username: String,
    name: String,
    role: String,
    password_hash: String,
}

impl DirectoryUser {
    /// Projection handed to the session store; the hash stays behind.
    fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            username: self.username.clone(),
            name: Some(self.name.clone()),
            email: None,
            confirmed_at: None,
            role: Some(self.role.clone()),
        }
    }
}

/// Credential checks against the seeded local directory.
pub struct LocalAuthProvider<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> LocalAuthProvider<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load the directory, adding any predefined entry missing from storage.
    fn seed_users(&self) -> Vec<DirectoryUser> {
        let mut users: Vec<DirectoryUser> = self
            .storage
            .get(keys::USERS)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        let mut changed = false;
        for (id, username, name, role, password) in PREDEFINED_USERS {
            if users.iter().any(|u| u.username == username) {
                continue;
            }
            match hash_password(password) {
                Ok(password_hash) => {
                    users.push(DirectoryUser {
                        id: id.to_string(),
                        username: username.to_string(),
                        name: name.to_string(),
                        role: role.to_string(),
                        password_hash,
                    });
                    changed = true;
                }
                Err(err) => tracing::warn!("predefined user {username} not seeded: {err}"),
            }
        }

        if changed {
            match serde_json::to_string(&users) {
                Ok(raw) => {
                    if !self.storage.set(keys::USERS, &raw) {
                        tracing::warn!("user directory not persisted: storage rejected the write");
                    }
                }
                Err(err) => tracing::warn!("user directory not persisted: {err}"),
            }
        }
        users
    }
}

impl<S: KeyValueStorage> AuthProvider for LocalAuthProvider<S> {
    async fn login(&self, identifier: &str, credential: &str) -> Result<User, AuthError> {
        let users = self.seed_users();
        let Some(record) = users.iter().find(|u| u.username == identifier) else {
            return Err(AuthError::InvalidCredentials);
        };
        match verify_password(credential, &record.password_hash) {
            Ok(true) => Ok(record.to_user()),
            Ok(false) => Err(AuthError::InvalidCredentials),
            Err(message) => Err(AuthError::Service(message)),
        }
    }

    async fn register(&self, _request: &RegisterRequest) -> Result<Registration, AuthError> {
        Err(AuthError::Unsupported)
    }

    async fn logout(&self) -> Result<(), AuthError> {
        Ok(())
    }

    async fn reset_password(&self, _email: &str) -> Result<(), AuthError> {
        Err(AuthError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use store::MemoryStorage;

    use super::*;

    #[tokio::test]
    async fn test_predefined_login_succeeds() {
        let provider = LocalAuthProvider::new(MemoryStorage::new());
        let user = provider.login("estudiante1", "est123").await.unwrap();

        assert_eq!(user.id, "local-1");
        assert_eq!(user.display_name(), "María García");
        assert_eq!(user.role.as_deref(), Some("student"));
        assert!(user.confirmed_at.is_none());
    }

    #[tokio::test]
    async fn test_unknown_credentials_fail() {
        let provider = LocalAuthProvider::new(MemoryStorage::new());

        let err = provider.login("estudiante1", "wrong").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);

        let err = provider.login("nadie", "est123").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_plaintext_never_reaches_storage() {
        let storage = MemoryStorage::new();
        let provider = LocalAuthProvider::new(storage.clone());
        provider.login("estudiante1", "est123").await.unwrap();

        let raw = storage.get(keys::USERS).unwrap();
        assert!(!raw.contains("est123"));
        assert!(raw.contains("$argon2id$"));
    }

    #[tokio::test]
    async fn test_seed_merges_by_username() {
        let storage = MemoryStorage::new();

        // An existing directory with one predefined username already present
        // (custom hash) and the rest missing.
        let existing_hash = hash_password("propia").unwrap();
        let existing = serde_json::json!([{
            "id": "custom-9",
            "username": "estudiante1",
            "name": "Cuenta Propia",
            "role": "student",
            "passwordHash": existing_hash,
        }]);
        storage.set(keys::USERS, &existing.to_string());

        let provider = LocalAuthProvider::new(storage.clone());

        // The existing record wins: its credential still works, the
        // predefined one for the same username does not.
        let user = provider.login("estudiante1", "propia").await.unwrap();
        assert_eq!(user.id, "custom-9");
        assert!(provider.login("estudiante1", "est123").await.is_err());

        // Missing predefined entries were added alongside it.
        let directory: Vec<serde_json::Value> =
            serde_json::from_str(&storage.get(keys::USERS).unwrap()).unwrap();
        assert_eq!(directory.len(), 3);
        assert!(provider.login("profesor1", "prof123").await.is_ok());
    }

    #[tokio::test]
    async fn test_register_and_reset_are_unsupported() {
        let provider = LocalAuthProvider::new(MemoryStorage::new());

        let err = provider
            .register(&RegisterRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::Unsupported);

        let err = provider.reset_password("a@b.c").await.unwrap_err();
        assert_eq!(err, AuthError::Unsupported);
    }
}
