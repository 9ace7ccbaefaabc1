//! Login page view with the credential form.

use dioxus::prelude::*;
use store::LoginOutcome;
use ui::use_auth;

use crate::Route;

/// Login page component.
#[component]
pub fn Login() -> Element {
    let auth = use_auth();
    let navigator = use_navigator();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut field_error = use_signal(|| Option::<String>::None);
    let mut needs_verification = use_signal(|| false);
    let mut loading = use_signal(|| false);

    // Already signed in → dashboard.
    use_effect(move || {
        let state = auth();
        if !state.loading && state.is_authenticated() {
            navigator.push(Route::Dashboard {});
        }
    });

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        spawn(async move {
            field_error.set(None);
            needs_verification.set(false);

            let user = username().trim().to_string();
            let pass = password();
            if user.is_empty() || pass.is_empty() {
                field_error.set(Some("Usuario y contraseña son obligatorios".to_string()));
                return;
            }

            loading.set(true);
            let outcome = ui::login(auth, user, pass).await;
            loading.set(false);
            match outcome {
                LoginOutcome::Success => {
                    navigator.push(Route::Dashboard {});
                }
                LoginOutcome::NeedsVerification => needs_verification.set(true),
                LoginOutcome::Failed => {}
            }
        });
    };

    let store_error = auth().error;

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-card",
                h1 { "VisualLab" }
                p {
                    class: "auth-subtitle",
                    "Visualizadores Interactivos de Figuras Geométricas"
                }

                form {
                    onsubmit: handle_submit,
                    label { r#for: "username", "Usuario" }
                    input {
                        id: "username",
                        value: "{username}",
                        placeholder: "estudiante1",
                        oninput: move |evt| username.set(evt.value()),
                    }
                    label { r#for: "password", "Contraseña" }
                    input {
                        id: "password",
                        r#type: "password",
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }

                    if let Some(message) = field_error() {
                        p { class: "field-error", "{message}" }
                    }
                    if needs_verification() {
                        p {
                            class: "notice",
                            "Tu cuenta aún no está confirmada. Revisa tu correo para verificarla."
                        }
                    } else if let Some(message) = store_error {
                        p { class: "form-error", "{message}" }
                    }

                    button {
                        r#type: "submit",
                        disabled: loading(),
                        if loading() { "Entrando…" } else { "Iniciar sesión" }
                    }
                }

                div {
                    class: "auth-links",
                    Link { to: Route::Register {}, "Crear cuenta" }
                    Link { to: Route::ForgotPassword {}, "¿Olvidaste tu contraseña?" }
                }
            }
        }
    }
}
