//! Service payload shapes and their client-safe projections.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Account record as returned by the identity service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteUser {
    pub id: String,
    pub email: String,
    /// Present once the user has confirmed their address.
    #[serde(default)]
    pub email_confirmed_at: Option<String>,
    /// Free-form metadata recorded at sign-up (username, display name).
    #[serde(default)]
    pub user_metadata: Value,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl RemoteUser {
    /// Client-safe projection consumed by the session store. Falls back to
    /// the email local-part when no username was recorded at sign-up.
    pub fn to_user(&self) -> store::User {
        let username = self
            .user_metadata
            .get("username")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                self.email
                    .split('@')
                    .next()
                    .unwrap_or(&self.email)
                    .to_string()
            });
        store::User {
            id: self.id.clone(),
            username,
            name: self
                .user_metadata
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string),
            email: Some(self.email.clone()),
            confirmed_at: self.email_confirmed_at.clone(),
            role: None,
        }
    }
}

/// A hosted project row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// One appended activity-log row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub user_id: String,
    pub action: String,
    #[serde(default)]
    pub details: Value,
}
