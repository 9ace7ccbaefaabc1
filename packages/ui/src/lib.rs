//! This crate contains the shared UI layer for the workspace: the
//! authentication context, store constructors wired to the configured
//! backend, the embedded-viewer frame, the in-app activity log, and the
//! browser glue (file downloads, document-level settings application).

mod auth;
pub use auth::{login, logout, use_auth, AuthProvider, AuthState};

mod stores;
pub use stores::{make_projects, make_session, make_settings, platform_storage};

mod browser;
pub use browser::{apply_language, apply_settings, apply_theme, download_json};

pub mod activity_log;
pub use activity_log::{
    log_activity, use_activity_log, ActivityLog, ActivityLogPanel, LogEntry, LogLevel,
};

mod viewer_frame;
pub use viewer_frame::ViewerFrame;
