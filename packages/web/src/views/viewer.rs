//! Viewer page: header with back navigation plus the embedded frame.

use dioxus::prelude::*;
use serde_json::json;
use store::config::project_by_id;
use ui::{use_auth, ViewerFrame};

use crate::Route;

/// Viewer page component for one catalog entry.
#[component]
pub fn Viewer(project_id: String) -> Element {
    let auth = use_auth();
    let navigator = use_navigator();

    use_effect(move || {
        let state = auth();
        if !state.loading && !state.is_authenticated() {
            navigator.push(Route::Login {});
        }
    });

    let Some(project) = project_by_id(&project_id) else {
        return rsx! {
            div {
                class: "viewer-missing",
                p { "Ese visualizador no existe." }
                Link { to: Route::Dashboard {}, "Volver al dashboard" }
            }
        };
    };

    let display_name = auth()
        .user
        .map(|u| u.display_name().to_string())
        .unwrap_or_default();

    let handle_back = {
        let project_id = project_id.clone();
        move |_| {
            // One last state stamp before leaving.
            if let Some(user) = auth().user {
                let projects = ui::make_projects();
                projects.save_project_state(
                    &user.id,
                    &project_id,
                    json!({ "timestamp": store::now_iso8601() }),
                );
            }
            navigator.push(Route::Dashboard {});
        }
    };

    rsx! {
        div {
            class: "viewer-page",
            header {
                class: "viewer-header",
                button {
                    class: "back-button",
                    onclick: handle_back,
                    "← Volver al dashboard"
                }
                h2 { "{project.name}" }
                span { class: "user-badge", "{display_name}" }
            }
            ViewerFrame {
                project_id: project_id.clone(),
                embed_path: project.embed_path.to_string(),
                title: project.name.to_string(),
            }
        }
    }
}
