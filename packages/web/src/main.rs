use dioxus::prelude::*;

use ui::AuthProvider;
use views::{Dashboard, ForgotPassword, Login, Register, Settings, Viewer};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Root {},
    #[route("/login")]
    Login {},
    #[route("/register")]
    Register {},
    #[route("/forgot-password")]
    ForgotPassword {},
    #[route("/dashboard")]
    Dashboard {},
    #[route("/viewer/:project_id")]
    Viewer { project_id: String },
    #[route("/settings")]
    Settings {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    use_context_provider(|| Signal::new(ui::ActivityLog::default()));

    // Apply the persisted settings before anything renders.
    use_effect(move || {
        let settings = ui::make_settings();
        ui::apply_settings(settings.settings());
    });

    rsx! {
        document::Stylesheet { href: MAIN_CSS }
        AuthProvider {
            Router::<Route> {}
        }
    }
}

/// Entry redirect: dashboard when authenticated, login otherwise.
#[component]
fn Root() -> Element {
    let auth = ui::use_auth();
    let navigator = use_navigator();

    use_effect(move || {
        let state = auth();
        if state.loading {
            return;
        }
        if state.is_authenticated() {
            navigator.push(Route::Dashboard {});
        } else {
            navigator.push(Route::Login {});
        }
    });

    rsx! {
        div { class: "loading-screen", p { "Cargando…" } }
    }
}
