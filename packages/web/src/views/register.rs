//! Registration page view.
//!
//! The in-progress form (never the credentials) is kept under the
//! `register_form_progress` key and restored when the user comes back.

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};
use store::config::keys;
use store::{KeyValueStorage, RegisterRequest};
use ui::use_auth;

use crate::Route;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct RegisterDraft {
    username: String,
    email: String,
}

/// Register page component.
#[component]
pub fn Register() -> Element {
    let auth = use_auth();
    let navigator = use_navigator();
    let mut username = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut registered = use_signal(|| false);
    let mut loading = use_signal(|| false);

    // Already signed in → dashboard.
    use_effect(move || {
        let state = auth();
        if !state.loading && state.is_authenticated() {
            navigator.push(Route::Dashboard {});
        }
    });

    // Restore the saved draft on mount.
    use_effect(move || {
        let storage = ui::platform_storage();
        if let Some(draft) = storage
            .get(keys::REGISTER_DRAFT)
            .and_then(|raw| serde_json::from_str::<RegisterDraft>(&raw).ok())
        {
            username.set(draft.username);
            email.set(draft.email);
        }
    });

    let save_draft = move || {
        let draft = RegisterDraft {
            username: username(),
            email: email(),
        };
        if let Ok(raw) = serde_json::to_string(&draft) {
            ui::platform_storage().set(keys::REGISTER_DRAFT, &raw);
        }
    };

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        spawn(async move {
            error.set(None);

            let user = username().trim().to_string();
            let mail = email().trim().to_string();
            let pass = password();

            if user.is_empty() {
                error.set(Some("El nombre de usuario es obligatorio".to_string()));
                return;
            }
            if mail.is_empty() || !mail.contains('@') {
                error.set(Some("Introduce un correo válido".to_string()));
                return;
            }
            if pass.len() < 6 {
                error.set(Some(
                    "La contraseña debe tener al menos 6 caracteres".to_string(),
                ));
                return;
            }
            if pass != confirm_password() {
                error.set(Some("Las contraseñas no coinciden".to_string()));
                return;
            }

            loading.set(true);
            let mut session = ui::make_session();
            let request = RegisterRequest {
                email: mail,
                password: pass,
                username: user,
            };
            match session.register(&request).await {
                Some(_registration) => {
                    ui::platform_storage().remove(keys::REGISTER_DRAFT);
                    registered.set(true);
                }
                None => error.set(session.error().map(str::to_string)),
            }
            loading.set(false);
        });
    };

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-card",
                h1 { "Crear cuenta" }

                if registered() {
                    p {
                        class: "notice",
                        "Cuenta creada. Revisa tu correo y confírmala antes de iniciar sesión."
                    }
                    Link { to: Route::Login {}, "Ir a iniciar sesión" }
                } else {
                    form {
                        onsubmit: handle_submit,
                        label { r#for: "reg-username", "Usuario" }
                        input {
                            id: "reg-username",
                            value: "{username}",
                            oninput: move |evt| {
                                username.set(evt.value());
                                save_draft();
                            },
                        }
                        label { r#for: "reg-email", "Correo" }
                        input {
                            id: "reg-email",
                            r#type: "email",
                            value: "{email}",
                            oninput: move |evt| {
                                email.set(evt.value());
                                save_draft();
                            },
                        }
                        label { r#for: "reg-password", "Contraseña" }
                        input {
                            id: "reg-password",
                            r#type: "password",
                            value: "{password}",
                            oninput: move |evt| password.set(evt.value()),
                        }
                        label { r#for: "reg-confirm", "Repite la contraseña" }
                        input {
                            id: "reg-confirm",
                            r#type: "password",
                            value: "{confirm_password}",
                            oninput: move |evt| confirm_password.set(evt.value()),
                        }

                        if let Some(message) = error() {
                            p { class: "field-error", "{message}" }
                        }

                        button {
                            r#type: "submit",
                            disabled: loading(),
                            if loading() { "Creando…" } else { "Registrarme" }
                        }
                    }

                    div {
                        class: "auth-links",
                        Link { to: Route::Login {}, "Ya tengo cuenta" }
                    }
                }
            }
        }
    }
}
