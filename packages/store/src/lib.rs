//! # Store crate — persistence layer for VisualLab
//!
//! Holds everything the application persists on the client: the session
//! record, per-user project state, and the user settings document. All
//! durable reads and writes go through the [`KeyValueStorage`] trait, so the
//! same store logic works against browser `localStorage` (web builds), an
//! in-memory map (tests, native fallback), or any future backend.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`storage`] | The [`KeyValueStorage`] boundary and its contract. |
//! | [`session`] | [`SessionStore`] plus the [`AuthProvider`] capability seam. |
//! | [`projects`] | [`ProjectStore`] — `(user, project)` → opaque JSON state. |
//! | [`settings`] | [`SettingsStore`], the fixed settings schema and validation. |
//! | [`export`] | Downloadable export file envelopes shared by settings and projects. |
//! | [`messaging`] | Typed messages posted to the embedded visualizers. |
//! | [`config`] | Storage keys, export constants and the visualizer catalog. |

pub mod config;
pub mod export;
pub mod messaging;
pub mod models;
pub mod projects;
pub mod session;
pub mod settings;
pub mod storage;

mod memory;
pub use memory::MemoryStorage;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod browser;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use browser::BrowserStorage;

pub use config::ProjectInfo;
pub use export::{ExportFile, ProjectExport, SettingsExport, EXPORT_VERSION};
pub use messaging::ViewerMessage;
pub use models::{Session, User};
pub use projects::ProjectStore;
pub use session::{
    AuthError, AuthProvider, LoginOutcome, RegisterRequest, Registration, SessionStore,
};
pub use settings::{
    validate_settings, DisplayPatch, DisplayPreference, DisplayPrefs, FontSize, ImportError,
    ImportSummary, Language, NotificationKind, NotificationPatch, NotificationPrefs,
    SettingsPatch, SettingsStore, Theme, UserSettings, ValidationReport,
};
pub use storage::KeyValueStorage;

/// Current time as an ISO-8601 string with millisecond precision, matching
/// the format stamped into `lastModified`, `importedAt` and `exportDate`.
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// The `YYYY-MM-DD` prefix of [`now_iso8601`], used in export filenames.
pub fn date_stamp() -> String {
    let now = now_iso8601();
    now.split('T').next().unwrap_or(&now).to_string()
}
