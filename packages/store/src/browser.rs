//! # localStorage-backed storage — browser-side persistence
//!
//! [`BrowserStorage`] is the [`KeyValueStorage`] implementation used on the
//! **web platform**, wrapping `window.localStorage` via [`web_sys`].
//!
//! ## Error handling
//!
//! Every method silently swallows errors (returning `None` for reads, `false`
//! for writes). A full quota or an unavailable storage area degrades to
//! "no data" / "not saved" instead of crashing the page; the stores log the
//! failed write and keep their in-memory state.

use crate::storage::KeyValueStorage;

/// `window.localStorage` adapter for the web platform.
#[derive(Clone, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    pub fn new() -> Self {
        Self
    }

    fn local_storage(&self) -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.local_storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        let Some(storage) = self.local_storage() else {
            return false;
        };
        storage.set_item(key, value).is_ok()
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = self.local_storage() {
            let _ = storage.remove_item(key);
        }
    }

    fn keys(&self) -> Vec<String> {
        let Some(storage) = self.local_storage() else {
            return Vec::new();
        };
        let len = storage.length().unwrap_or(0);
        (0..len)
            .filter_map(|i| storage.key(i).ok().flatten())
            .collect()
    }
}
