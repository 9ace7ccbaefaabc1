//! Dashboard view: the visualizer catalog plus the project-config
//! export/import flow.

use dioxus::prelude::*;
use store::config::PROJECTS;
use ui::{log_activity, use_activity_log, use_auth, ActivityLogPanel, LogLevel};

use crate::Route;

/// Dashboard page component.
#[component]
pub fn Dashboard() -> Element {
    let auth = use_auth();
    let navigator = use_navigator();
    let mut log = use_activity_log();
    let mut import_message = use_signal(|| Option::<String>::None);
    let mut import_error = use_signal(|| Option::<String>::None);

    // Guests go to the login page.
    use_effect(move || {
        let state = auth();
        if !state.loading && !state.is_authenticated() {
            navigator.push(Route::Login {});
        }
    });

    let Some(user) = auth().user else {
        return rsx! {
            div { class: "loading-screen", p { "Cargando…" } }
        };
    };
    let display_name = user.display_name().to_string();
    let user_id = user.id.clone();

    let handle_export = {
        let user_id = user_id.clone();
        move |_| {
            let projects = ui::make_projects();
            match projects.export_config(&user_id) {
                Some(contents) => {
                    let file = store::ExportFile::named("visuallab_config", contents);
                    ui::download_json(&file.filename, &file.contents);
                    log_activity(
                        &mut log,
                        LogLevel::Success,
                        "Configuración de proyectos exportada",
                    );
                }
                None => {
                    log_activity(
                        &mut log,
                        LogLevel::Warning,
                        "No hay proyectos guardados para exportar",
                    );
                }
            }
        }
    };

    let handle_import = {
        let user_id = user_id.clone();
        move |evt: FormEvent| {
            let user_id = user_id.clone();
            async move {
                import_message.set(None);
                import_error.set(None);

                let Some(file_engine) = evt.files() else {
                    return;
                };
                let Some(name) = file_engine.files().first().cloned() else {
                    return;
                };
                let Some(contents) = file_engine.read_file_to_string(&name).await else {
                    import_error.set(Some("No se pudo leer el archivo".to_string()));
                    return;
                };

                let projects = ui::make_projects();
                if projects.import_config(&user_id, &contents) {
                    import_message.set(Some("Configuración importada correctamente".to_string()));
                    log_activity(
                        &mut log,
                        LogLevel::Success,
                        "Configuración de proyectos importada",
                    );
                } else {
                    import_error.set(Some(
                        "El archivo no contiene una configuración válida".to_string(),
                    ));
                    log_activity(
                        &mut log,
                        LogLevel::Error,
                        "Importación de configuración rechazada",
                    );
                }
            }
        }
    };

    rsx! {
        div {
            class: "dashboard",
            header {
                class: "dashboard-header",
                h1 { "Plataforma Educativa" }
                div {
                    class: "dashboard-user",
                    span { class: "user-badge", "{display_name}" }
                    Link { to: Route::Settings {}, "Ajustes" }
                    button {
                        class: "logout-button",
                        onclick: move |_| async move {
                            ui::logout(auth).await;
                            navigator.push(Route::Login {});
                        },
                        "Cerrar sesión"
                    }
                }
            }

            section {
                class: "project-grid",
                for project in PROJECTS.iter() {
                    article {
                        key: "{project.id}",
                        class: "project-card",
                        style: "--accent: {project.accent}",
                        span { class: "project-icon", "{project.icon}" }
                        h3 { "{project.name}" }
                        p { "{project.description}" }
                        ul {
                            class: "project-features",
                            for feature in project.features.iter() {
                                li { key: "{feature}", "{feature}" }
                            }
                        }
                        button {
                            class: "open-button",
                            onclick: {
                                let id = project.id;
                                move |_| {
                                    navigator.push(Route::Viewer {
                                        project_id: id.to_string(),
                                    });
                                }
                            },
                            "Abrir"
                        }
                    }
                }
            }

            section {
                class: "config-section",
                h2 { "Configuración de proyectos" }
                p {
                    class: "muted",
                    "Descarga tus proyectos guardados o restáuralos desde un archivo."
                }
                div {
                    class: "config-actions",
                    button { onclick: handle_export, "Exportar configuración" }
                    label {
                        class: "file-button",
                        "Importar configuración"
                        input {
                            r#type: "file",
                            accept: ".json",
                            onchange: handle_import,
                        }
                    }
                }
                if let Some(text) = import_message() {
                    p { class: "notice", "{text}" }
                }
                if let Some(text) = import_error() {
                    p { class: "form-error", "{text}" }
                }
            }

            ActivityLogPanel {}
        }
    }
}
