use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::storage::KeyValueStorage;

/// In-memory storage for testing and native fallback.
///
/// Clones share the same underlying map, so independently constructed stores
/// handed clones of one `MemoryStorage` observe each other's writes — the
/// same visibility `localStorage` gives separate components in the browser.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.get("missing").is_none());

        assert!(storage.set("k", "v"));
        assert_eq!(storage.get("k").as_deref(), Some("v"));

        storage.remove("k");
        assert!(storage.get("k").is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let storage = MemoryStorage::new();
        let clone = storage.clone();

        storage.set("shared", "yes");
        assert_eq!(clone.get("shared").as_deref(), Some("yes"));
    }

    #[test]
    fn test_keys_lists_everything() {
        let storage = MemoryStorage::new();
        storage.set("a", "1");
        storage.set("b", "2");

        let mut keys = storage.keys();
        keys.sort();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
