//! Embedded visualizer frame.
//!
//! The visualizers are opaque documents loaded into an iframe. Once the
//! frame finishes loading, the user's saved state is posted into it as a
//! typed [`store::ViewerMessage`]; while the frame stays open, a heartbeat
//! state is saved every 30 seconds so `lastModified` tracks activity.

use dioxus::prelude::*;
use serde_json::json;
use store::ViewerMessage;

#[component]
pub fn ViewerFrame(project_id: String, embed_path: String, title: String) -> Element {
    let auth = crate::use_auth();
    let mut loading = use_signal(|| true);
    let frame_id = format!("viewer-frame-{project_id}");

    // Heartbeat save while the frame is open; the task dies with the
    // component.
    {
        let project_id = project_id.clone();
        use_effect(move || {
            let project_id = project_id.clone();
            spawn(async move {
                loop {
                    sleep_secs(store::config::AUTOSAVE_INTERVAL_SECS).await;
                    if let Some(user) = auth().user {
                        let projects = crate::stores::make_projects();
                        projects.save_project_state(
                            &user.id,
                            &project_id,
                            json!({ "timestamp": store::now_iso8601() }),
                        );
                    }
                }
            });
        });
    }

    let on_load = {
        let project_id = project_id.clone();
        let frame_id = frame_id.clone();
        move |_| {
            loading.set(false);
            let Some(user) = auth().user else {
                return;
            };
            let projects = crate::stores::make_projects();
            if let Some(state) = projects.get_project_state(&user.id, &project_id) {
                post_viewer_message(&frame_id, &ViewerMessage::LoadState { state });
            }
        }
    };

    rsx! {
        div {
            class: "viewer-frame-wrap",
            if loading() {
                div {
                    class: "loading-overlay",
                    p { "Cargando visualizador…" }
                }
            }
            iframe {
                id: "{frame_id}",
                class: "viewer-iframe",
                src: "{embed_path}",
                title: "{title}",
                onload: on_load,
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn post_viewer_message(frame_id: &str, message: &ViewerMessage) {
    use wasm_bindgen::JsCast;

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(element) = document.get_element_by_id(frame_id) else {
        return;
    };
    let Ok(frame) = element.dyn_into::<web_sys::HtmlIFrameElement>() else {
        return;
    };
    let Some(target) = frame.content_window() else {
        return;
    };
    let Ok(payload) = js_sys::JSON::parse(&message.to_json()) else {
        return;
    };
    if let Err(err) = target.post_message(&payload, "*") {
        tracing::warn!("viewer message not delivered: {err:?}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn post_viewer_message(_frame_id: &str, message: &ViewerMessage) {
    tracing::debug!("viewer message (no frame on this platform): {}", message.to_json());
}

async fn sleep_secs(secs: u64) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(std::time::Duration::from_secs(secs)).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(std::time::Duration::from_secs(secs)).await;
}
