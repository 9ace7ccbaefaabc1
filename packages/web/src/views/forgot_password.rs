//! Password recovery page view.

use dioxus::prelude::*;

use crate::Route;

/// Forgot-password page component.
#[component]
pub fn ForgotPassword() -> Element {
    let mut email = use_signal(String::new);
    let mut message = use_signal(|| Option::<String>::None);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        spawn(async move {
            message.set(None);
            error.set(None);

            let mail = email().trim().to_string();
            if mail.is_empty() || !mail.contains('@') {
                error.set(Some("Introduce un correo válido".to_string()));
                return;
            }

            loading.set(true);
            let mut session = ui::make_session();
            if session.reset_password(&mail).await {
                message.set(Some(
                    "Te hemos enviado instrucciones para restablecer la contraseña.".to_string(),
                ));
            } else {
                error.set(session.error().map(str::to_string));
            }
            loading.set(false);
        });
    };

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-card",
                h1 { "Recuperar contraseña" }
                p {
                    class: "auth-subtitle",
                    "Te enviaremos un correo con los pasos a seguir."
                }

                form {
                    onsubmit: handle_submit,
                    label { r#for: "recover-email", "Correo" }
                    input {
                        id: "recover-email",
                        r#type: "email",
                        value: "{email}",
                        oninput: move |evt| email.set(evt.value()),
                    }

                    if let Some(text) = message() {
                        p { class: "notice", "{text}" }
                    }
                    if let Some(text) = error() {
                        p { class: "field-error", "{text}" }
                    }

                    button {
                        r#type: "submit",
                        disabled: loading(),
                        if loading() { "Enviando…" } else { "Enviar instrucciones" }
                    }
                }

                div {
                    class: "auth-links",
                    Link { to: Route::Login {}, "Volver a iniciar sesión" }
                }
            }
        }
    }
}
