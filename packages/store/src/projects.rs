//! # Project-state store
//!
//! Maps `(user, project)` pairs to opaque JSON state blobs under
//! `project_<userId>_<projectId>` keys, and turns a user's saved projects
//! into a single export/import document.
//!
//! Every save stamps a fresh `lastModified` timestamp over any prior value;
//! every imported project gets an `importedAt` stamp. Import writes each
//! project independently — there is no multi-key transaction, and a write
//! rejected mid-import leaves the earlier projects in place.

use serde_json::{Map, Value};

use crate::config;
use crate::export::ProjectExport;
use crate::now_iso8601;
use crate::storage::KeyValueStorage;

/// Envelope field stamped on every saved state.
const LAST_MODIFIED: &str = "lastModified";
/// Envelope field stamped on every imported project.
const IMPORTED_AT: &str = "importedAt";

/// Persistence layer mapping a user/project pair to an opaque state blob.
pub struct ProjectStore<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> ProjectStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn key(user_id: &str, project_id: &str) -> String {
        format!("{}{user_id}_{project_id}", config::keys::PROJECT_PREFIX)
    }

    fn user_prefix(user_id: &str) -> String {
        format!("{}{user_id}_", config::keys::PROJECT_PREFIX)
    }

    /// The stored state for a project, or `None` when nothing was saved.
    pub fn get_project_state(&self, user_id: &str, project_id: &str) -> Option<Value> {
        let raw = self.storage.get(&Self::key(user_id, project_id))?;
        match serde_json::from_str(&raw) {
            Ok(state) => Some(state),
            Err(err) => {
                tracing::warn!("discarding unreadable state for {project_id}: {err}");
                None
            }
        }
    }

    /// Persist `state`, stamping a fresh `lastModified` over any prior value.
    /// Returns `false` when the storage backend rejects the write.
    pub fn save_project_state(&self, user_id: &str, project_id: &str, state: Value) -> bool {
        let mut object = match state {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        object.insert(LAST_MODIFIED.into(), Value::String(now_iso8601()));

        let raw = Value::Object(object).to_string();
        let saved = self.storage.set(&Self::key(user_id, project_id), &raw);
        if !saved {
            tracing::warn!("state for {project_id} not saved: storage rejected the write");
        }
        saved
    }

    /// Forget a single project's saved state.
    pub fn clear_project_state(&self, user_id: &str, project_id: &str) {
        self.storage.remove(&Self::key(user_id, project_id));
    }

    /// All of a user's saved projects reassembled into one JSON document, or
    /// `None` when no key matches the user's prefix.
    pub fn export_config(&self, user_id: &str) -> Option<String> {
        let prefix = Self::user_prefix(user_id);
        let mut projects = Map::new();

        for key in self.storage.keys() {
            let Some(project_id) = key.strip_prefix(prefix.as_str()) else {
                continue;
            };
            let Some(raw) = self.storage.get(&key) else {
                continue;
            };
            match serde_json::from_str(&raw) {
                Ok(state) => {
                    projects.insert(project_id.to_string(), state);
                }
                Err(err) => {
                    tracing::warn!("skipping unreadable project {project_id} on export: {err}")
                }
            }
        }

        if projects.is_empty() {
            return None;
        }
        serde_json::to_string_pretty(&ProjectExport::new(user_id, projects)).ok()
    }

    /// Import a document produced by [`export_config`]. The document must
    /// carry a `projects` map; each entry is written back under its
    /// synthesized key with an `importedAt` stamp. Malformed JSON or a
    /// missing map is a no-op `false`.
    pub fn import_config(&self, user_id: &str, json: &str) -> bool {
        let document: Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("config import rejected: {err}");
                return false;
            }
        };
        let Some(projects) = document.get("projects").and_then(Value::as_object) else {
            tracing::warn!("config import rejected: no projects map");
            return false;
        };

        let imported_at = now_iso8601();
        for (project_id, state) in projects {
            let mut state = state.clone();
            if let Value::Object(ref mut object) = state {
                object.insert(IMPORTED_AT.into(), Value::String(imported_at.clone()));
            }
            if !self
                .storage
                .set(&Self::key(user_id, project_id), &state.to_string())
            {
                tracing::warn!("project {project_id} not imported: storage rejected the write");
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{now_iso8601, MemoryStorage};

    /// Storage whose writes always fail, for the degraded path.
    struct RejectingStorage;

    impl KeyValueStorage for RejectingStorage {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }
        fn set(&self, _key: &str, _value: &str) -> bool {
            false
        }
        fn remove(&self, _key: &str) {}
        fn keys(&self) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn test_save_stamps_last_modified() {
        let store = ProjectStore::new(MemoryStorage::new());
        let before = now_iso8601();

        assert!(store.save_project_state("u", "fractals", json!({ "zoom": 3 })));

        let state = store.get_project_state("u", "fractals").unwrap();
        assert_eq!(state["zoom"], 3);
        // ISO-8601 strings with equal precision order lexicographically.
        assert!(state["lastModified"].as_str().unwrap() >= before.as_str());
    }

    #[test]
    fn test_save_overwrites_prior_stamp() {
        let store = ProjectStore::new(MemoryStorage::new());
        store.save_project_state(
            "u",
            "fractals",
            json!({ "lastModified": "1999-01-01T00:00:00.000Z" }),
        );

        let state = store.get_project_state("u", "fractals").unwrap();
        assert!(state["lastModified"].as_str().unwrap() > "2000");
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = ProjectStore::new(MemoryStorage::new());
        assert!(store.get_project_state("u", "nope").is_none());
    }

    #[test]
    fn test_clear_project_state() {
        let store = ProjectStore::new(MemoryStorage::new());
        store.save_project_state("u", "fractals", json!({}));
        store.clear_project_state("u", "fractals");
        assert!(store.get_project_state("u", "fractals").is_none());
    }

    #[test]
    fn test_import_then_get_roundtrip() {
        let store = ProjectStore::new(MemoryStorage::new());

        assert!(store.import_config("u", r#"{"projects":{"p1":{"data":"x"}}}"#));

        let state = store.get_project_state("u", "p1").unwrap();
        assert_eq!(state["data"], "x");
        assert!(state["importedAt"].as_str().is_some());
    }

    #[test]
    fn test_import_malformed_json_is_noop() {
        let storage = MemoryStorage::new();
        let store = ProjectStore::new(storage.clone());

        assert!(!store.import_config("u", "not json"));
        assert!(storage.keys().is_empty());
    }

    #[test]
    fn test_import_requires_projects_map() {
        let storage = MemoryStorage::new();
        let store = ProjectStore::new(storage.clone());

        assert!(!store.import_config("u", r#"{"version":"1.0.0"}"#));
        assert!(!store.import_config("u", r#"{"projects":null}"#));
        assert!(!store.import_config("u", r#"{"projects":[1,2]}"#));
        assert!(storage.keys().is_empty());
    }

    #[test]
    fn test_export_none_without_matching_keys() {
        let store = ProjectStore::new(MemoryStorage::new());
        store.save_project_state("other", "p1", json!({}));

        assert!(store.export_config("u").is_none());
    }

    #[test]
    fn test_export_contains_every_matching_key() {
        let store = ProjectStore::new(MemoryStorage::new());
        store.save_project_state("u", "fractals", json!({ "zoom": 2 }));
        store.save_project_state("u", "viewer3d", json!({ "camera": "front" }));
        store.save_project_state("other", "fractals", json!({ "zoom": 9 }));

        let exported = store.export_config("u").unwrap();
        let document: Value = serde_json::from_str(&exported).unwrap();

        assert_eq!(document["version"], "1.0.0");
        assert_eq!(document["userId"], "u");
        let projects = document["projects"].as_object().unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects["fractals"]["zoom"], 2);
        assert_eq!(projects["viewer3d"]["camera"], "front");
    }

    #[test]
    fn test_export_import_roundtrip_across_users() {
        let store = ProjectStore::new(MemoryStorage::new());
        store.save_project_state("origen", "fractals", json!({ "zoom": 5 }));

        let exported = store.export_config("origen").unwrap();
        assert!(store.import_config("destino", &exported));

        let state = store.get_project_state("destino", "fractals").unwrap();
        assert_eq!(state["zoom"], 5);
        assert!(state["importedAt"].as_str().is_some());
    }

    #[test]
    fn test_rejected_write_degrades_to_not_saved() {
        let store = ProjectStore::new(RejectingStorage);
        assert!(!store.save_project_state("u", "fractals", json!({})));
        assert!(!store.import_config("u", r#"{"projects":{"p1":{}}}"#));
    }
}
