//! # Hosted project rows — pass-through CRUD
//!
//! [`RemoteProjectClient`] wraps the service's table endpoints
//! (`/rest/v1/projects`). Calls are straight pass-throughs: one request, one
//! outcome, no retry. Every mutating operation appends one row to the
//! `activity_log` table; a failed append is logged and never fails the
//! mutation it describes.

use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::RemoteAuthClient;
use crate::error::ApiError;
use crate::models::{ActivityEntry, ProjectRow};

/// Fields for a new hosted project row.
#[derive(Clone, Debug, Serialize)]
pub struct NewProject {
    pub user_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub config: Value,
}

/// One-shot CRUD over the hosted `projects` table.
#[derive(Clone)]
pub struct RemoteProjectClient {
    auth: RemoteAuthClient,
}

impl RemoteProjectClient {
    /// Shares the auth client so table calls carry the session token.
    pub fn new(auth: RemoteAuthClient) -> Self {
        Self { auth }
    }

    fn table(&self, name: &str) -> String {
        format!(
            "{}/rest/v1/{name}",
            self.auth.config().url.trim_end_matches('/')
        )
    }

    async fn request(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let mut builder = builder.header("apikey", &self.auth.config().anon_key);
        if let Some(token) = self.auth.access_token() {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(RemoteAuthClient::service_error(response).await);
        }
        Ok(response)
    }

    /// All projects owned by `user_id`, newest first.
    pub async fn fetch_projects(&self, user_id: &str) -> Result<Vec<ProjectRow>, ApiError> {
        let url = format!(
            "{}?user_id=eq.{user_id}&order=created_at.desc",
            self.table("projects")
        );
        Ok(self.request(self.auth.http().get(url)).await?.json().await?)
    }

    /// Projects of one visualizer type, newest first.
    pub async fn fetch_projects_by_type(
        &self,
        user_id: &str,
        kind: &str,
    ) -> Result<Vec<ProjectRow>, ApiError> {
        let url = format!(
            "{}?user_id=eq.{user_id}&type=eq.{kind}&order=created_at.desc",
            self.table("projects")
        );
        Ok(self.request(self.auth.http().get(url)).await?.json().await?)
    }

    /// A single row by id, or `None` when it does not exist.
    pub async fn fetch_project(&self, id: &str) -> Result<Option<ProjectRow>, ApiError> {
        let url = format!("{}?id=eq.{id}", self.table("projects"));
        let rows: Vec<ProjectRow> = self.request(self.auth.http().get(url)).await?.json().await?;
        Ok(rows.into_iter().next())
    }

    /// Create a row and log the mutation.
    pub async fn create_project(&self, project: NewProject) -> Result<ProjectRow, ApiError> {
        let response = self
            .request(
                self.auth
                    .http()
                    .post(self.table("projects"))
                    .header("Prefer", "return=representation")
                    .json(&project),
            )
            .await?;
        let rows: Vec<ProjectRow> = response.json().await?;
        let row = rows.into_iter().next().ok_or_else(|| ApiError::Service {
            status: 200,
            message: "El servicio no devolvió el proyecto creado".to_string(),
        })?;
        self.log_activity(
            &row.user_id,
            "project_created",
            json!({ "id": row.id, "name": row.name }),
        )
        .await;
        Ok(row)
    }

    /// Patch fields of a row and log the mutation.
    pub async fn update_project(&self, id: &str, changes: Value) -> Result<ProjectRow, ApiError> {
        let url = format!("{}?id=eq.{id}", self.table("projects"));
        let response = self
            .request(
                self.auth
                    .http()
                    .patch(url)
                    .header("Prefer", "return=representation")
                    .json(&changes),
            )
            .await?;
        let rows: Vec<ProjectRow> = response.json().await?;
        let row = rows.into_iter().next().ok_or_else(|| ApiError::Service {
            status: 200,
            message: "El servicio no devolvió el proyecto actualizado".to_string(),
        })?;
        self.log_activity(&row.user_id, "project_updated", json!({ "id": row.id }))
            .await;
        Ok(row)
    }

    /// Delete a row and log the mutation.
    pub async fn delete_project(&self, user_id: &str, id: &str) -> Result<(), ApiError> {
        let url = format!("{}?id=eq.{id}", self.table("projects"));
        self.request(self.auth.http().delete(url)).await?;
        self.log_activity(user_id, "project_deleted", json!({ "id": id }))
            .await;
        Ok(())
    }

    /// Append one activity row. Best-effort: failures are logged, never
    /// propagated.
    async fn log_activity(&self, user_id: &str, action: &str, details: Value) {
        let entry = ActivityEntry {
            user_id: user_id.to_string(),
            action: action.to_string(),
            details,
        };
        let result = self
            .request(self.auth.http().post(self.table("activity_log")).json(&entry))
            .await;
        if let Err(err) = result {
            tracing::warn!("activity entry {action} not recorded: {err}");
        }
    }
}
