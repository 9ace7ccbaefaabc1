//! # API crate — identity and database service clients
//!
//! Everything that talks to the outside world lives here: the clients of the
//! hosted auth/database service and the predefined-user fallback provider.
//! Both authentication backends implement [`store::AuthProvider`], so the
//! session store is oblivious to which one is wired in.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | [`RemoteAuthClient`] (sign-up/sign-in/sign-out/recover/user) and the [`RemoteAuthProvider`] adapter |
//! | [`local`] | [`LocalAuthProvider`] — predefined directory seeded into client storage |
//! | [`password`] | Argon2id hashing for the predefined directory |
//! | [`projects`] | [`RemoteProjectClient`] — hosted project rows CRUD + activity log |
//! | [`models`] | Service payload shapes and their client-safe projections |
//! | [`error`] | [`ApiError`] — one message per failed call |
//!
//! Remote calls are one-shot: a caller awaits exactly one outcome per call.
//! Nothing here retries, times out, or cancels.

pub mod auth;
pub mod error;
pub mod local;
pub mod models;
pub mod password;
pub mod projects;

pub use auth::{AuthSession, RemoteAuthClient, RemoteAuthProvider, RemoteConfig};
pub use error::ApiError;
pub use local::LocalAuthProvider;
pub use models::{ActivityEntry, ProjectRow, RemoteUser};
pub use projects::{NewProject, RemoteProjectClient};
