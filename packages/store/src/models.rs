//! Domain models shared across the stores.

use serde::{Deserialize, Serialize};

/// A platform user.
///
/// The predefined local directory provides only id, username, display name
/// and role; accounts from the hosted identity service additionally carry an
/// email and, once verified, a confirmation timestamp. Credential material
/// never appears on this type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// ISO-8601 timestamp set once the identity service confirmed the account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl User {
    /// Name shown in the interface.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.username)
    }
}

/// The single process-wide session record, replaced wholesale on login and
/// logout. Also the exact shape persisted under the `auth-storage` key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_persisted_shape() {
        let session = Session {
            user: Some(User {
                id: "u1".into(),
                username: "maria".into(),
                name: Some("María García".into()),
                email: None,
                confirmed_at: None,
                role: Some("student".into()),
            }),
            is_authenticated: true,
        };

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["isAuthenticated"], true);
        assert_eq!(json["user"]["username"], "maria");
        // Absent optionals are omitted entirely.
        assert!(json["user"].get("email").is_none());

        let back: Session = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let user = User {
            id: "u1".into(),
            username: "maria".into(),
            name: None,
            email: None,
            confirmed_at: None,
            role: None,
        };
        assert_eq!(user.display_name(), "maria");
    }
}
