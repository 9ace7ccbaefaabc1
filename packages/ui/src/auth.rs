//! Authentication context and hooks for the UI.

use dioxus::prelude::*;
use store::{LoginOutcome, User};

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
            error: None,
        }
    }
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Provider component that manages authentication state.
/// Wrap the app with this component to enable authentication.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let mut auth_state = use_signal(AuthState::default);

    // Restore the persisted session on mount.
    use_effect(move || {
        let session = crate::stores::make_session();
        let user = if session.is_authenticated() {
            session.user().cloned()
        } else {
            None
        };
        auth_state.set(AuthState {
            user,
            loading: false,
            error: None,
        });
    });

    // Periodic session re-check (every 30s), started once process-wide.
    // External changes — another tab logging out, an expired remote session,
    // an account still awaiting confirmation — are mirrored into the shared
    // state on every observation.
    use_effect(move || {
        spawn(async move {
            loop {
                sleep_secs(store::config::AUTOSAVE_INTERVAL_SECS).await;
                if auth_state().loading {
                    continue;
                }
                match refresh_session().await {
                    Ok(user) => {
                        let current = auth_state();
                        if current.user != user {
                            auth_state.set(AuthState {
                                user,
                                loading: false,
                                error: current.error,
                            });
                        }
                    }
                    Err(message) => {
                        auth_state.set(AuthState {
                            user: None,
                            loading: false,
                            error: Some(message),
                        });
                    }
                }
            }
        });
    });

    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}

/// Attempt a login and mirror the outcome into the shared state.
pub async fn login(
    mut auth_state: Signal<AuthState>,
    identifier: String,
    credential: String,
) -> LoginOutcome {
    let mut session = crate::stores::make_session();
    let outcome = session.login(&identifier, &credential).await;
    auth_state.set(AuthState {
        user: session.user().cloned(),
        loading: false,
        error: session.error().map(str::to_string),
    });
    outcome
}

/// Sign out and clear the shared state.
pub async fn logout(mut auth_state: Signal<AuthState>) {
    let mut session = crate::stores::make_session();
    session.logout().await;
    auth_state.set(AuthState {
        user: None,
        loading: false,
        error: None,
    });
}

/// Re-read the session from its backend, applying the confirmed-account
/// rule for remote sessions.
async fn refresh_session() -> Result<Option<User>, String> {
    #[cfg(feature = "remote")]
    {
        crate::stores::remote_provider()
            .current_user()
            .await
            .map_err(|err| err.to_string())
    }
    #[cfg(not(feature = "remote"))]
    {
        let session = crate::stores::make_session();
        let user = if session.is_authenticated() {
            session.user().cloned()
        } else {
            None
        };
        Ok(user)
    }
}

async fn sleep_secs(secs: u64) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(std::time::Duration::from_secs(secs)).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(std::time::Duration::from_secs(secs)).await;
}
