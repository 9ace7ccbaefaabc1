//! Backend-selecting store constructors.
//!
//! Stores are cheap to build — every durable fact lives behind
//! [`store::KeyValueStorage`] — so call sites construct one per use and let
//! the storage backend carry the state between them.
//!
//! The authentication backend is chosen by the `remote` cargo feature:
//! without it, credential checks run against the predefined local directory;
//! with it, they are delegated to the hosted identity service.

use store::{AuthProvider, KeyValueStorage, ProjectStore, SessionStore, SettingsStore};

/// Platform storage: browser `localStorage` on web builds, a process-wide
/// in-memory map elsewhere.
pub fn platform_storage() -> impl KeyValueStorage + Clone {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::BrowserStorage::new()
    }
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        shared_memory()
    }
}

#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
fn shared_memory() -> store::MemoryStorage {
    use std::sync::OnceLock;
    static STORAGE: OnceLock<store::MemoryStorage> = OnceLock::new();
    STORAGE.get_or_init(store::MemoryStorage::new).clone()
}

/// Session store wired to the configured auth backend.
#[cfg(not(feature = "remote"))]
pub fn make_session() -> SessionStore<impl AuthProvider, impl KeyValueStorage + Clone> {
    SessionStore::new(
        api::LocalAuthProvider::new(platform_storage()),
        platform_storage(),
    )
}

/// Session store wired to the configured auth backend.
#[cfg(feature = "remote")]
pub fn make_session() -> SessionStore<impl AuthProvider, impl KeyValueStorage + Clone> {
    SessionStore::new(remote_provider(), platform_storage())
}

/// The process-wide remote provider. The underlying client is shared so the
/// session token survives across store constructions.
#[cfg(feature = "remote")]
pub(crate) fn remote_provider() -> api::RemoteAuthProvider {
    use std::sync::OnceLock;
    static CLIENT: OnceLock<api::RemoteAuthClient> = OnceLock::new();
    let client = CLIENT.get_or_init(|| {
        let config = api::RemoteConfig::from_env().unwrap_or_else(|| {
            tracing::warn!("no remote service configured; using local defaults");
            api::RemoteConfig {
                url: "http://localhost:54321".to_string(),
                anon_key: String::new(),
            }
        });
        api::RemoteAuthClient::new(config)
    });
    api::RemoteAuthProvider::new(client.clone())
}

pub fn make_projects() -> ProjectStore<impl KeyValueStorage + Clone> {
    ProjectStore::new(platform_storage())
}

pub fn make_settings() -> SettingsStore<impl KeyValueStorage + Clone> {
    SettingsStore::new(platform_storage())
}
