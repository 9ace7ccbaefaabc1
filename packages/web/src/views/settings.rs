//! Settings view: theme, language, notifications, display preferences and
//! the settings export/import flow.

use dioxus::prelude::*;
use store::{DisplayPreference, FontSize, Language, NotificationKind, Theme};
use ui::{log_activity, use_activity_log, use_auth, LogLevel};

use crate::Route;

fn notification_label(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Email => "Correo electrónico",
        NotificationKind::Push => "Notificaciones push",
        NotificationKind::Sounds => "Sonidos",
        NotificationKind::Desktop => "Escritorio",
    }
}

/// Settings page component.
#[component]
pub fn Settings() -> Element {
    let auth = use_auth();
    let navigator = use_navigator();
    let mut log = use_activity_log();
    let mut settings = use_signal(|| ui::make_settings().settings().clone());
    let mut last_saved = use_signal(|| ui::make_settings().last_saved().map(str::to_string));
    let mut import_result = use_signal(|| Option::<Result<String, String>>::None);
    let mut export_name = use_signal(String::new);

    use_effect(move || {
        let state = auth();
        if !state.loading && !state.is_authenticated() {
            navigator.push(Route::Login {});
        }
    });

    // Mirror the store after a mutation and re-apply document effects.
    let mut refresh = move || {
        let store = ui::make_settings();
        ui::apply_settings(store.settings());
        settings.set(store.settings().clone());
        last_saved.set(store.last_saved().map(str::to_string));
    };

    let current = settings();
    let theme_class = |theme: Theme| {
        if current.theme == theme {
            "theme-card theme-card-active"
        } else {
            "theme-card"
        }
    };

    let notification_rows: Vec<(NotificationKind, &'static str, bool)> = NotificationKind::ALL
        .iter()
        .map(|&kind| {
            (
                kind,
                notification_label(kind),
                current.notifications.get(kind),
            )
        })
        .collect();

    let handle_export = move |_| {
        let store = ui::make_settings();
        let name = export_name();
        let name = name.trim();
        let custom = if name.is_empty() { None } else { Some(name) };
        let file = store.export_settings(custom);
        ui::download_json(&file.filename, &file.contents);
        log_activity(
            &mut log,
            LogLevel::Success,
            "Configuración exportada correctamente",
        );
    };

    let handle_import = move |evt: FormEvent| async move {
        import_result.set(None);

        let Some(file_engine) = evt.files() else {
            return;
        };
        let Some(name) = file_engine.files().first().cloned() else {
            return;
        };
        let Some(contents) = file_engine.read_file_to_string(&name).await else {
            import_result.set(Some(Err("No se pudo leer el archivo".to_string())));
            return;
        };

        let mut store = ui::make_settings();
        match store.import_settings(&name, &contents) {
            Ok(summary) => {
                import_result.set(Some(Ok(summary.message.clone())));
                refresh();
                log_activity(&mut log, LogLevel::Success, &summary.message);
            }
            Err(err) => {
                import_result.set(Some(Err(err.to_string())));
                log_activity(&mut log, LogLevel::Error, &err.to_string());
            }
        }
    };

    rsx! {
        div {
            class: "settings-page",
            header {
                class: "settings-header",
                Link { to: Route::Dashboard {}, class: "back-link", "← Volver al dashboard" }
                h1 { "Ajustes" }
                if let Some(saved) = last_saved() {
                    span { class: "muted", "Último guardado: {saved}" }
                }
            }

            section {
                class: "settings-section",
                h2 { "Tema" }
                div {
                    class: "theme-cards",
                    button {
                        class: theme_class(Theme::Light),
                        onclick: move |_| {
                            let mut store = ui::make_settings();
                            store.set_theme(Theme::Light);
                            refresh();
                        },
                        "Claro"
                    }
                    button {
                        class: theme_class(Theme::Dark),
                        onclick: move |_| {
                            let mut store = ui::make_settings();
                            store.set_theme(Theme::Dark);
                            refresh();
                        },
                        "Oscuro"
                    }
                    button {
                        class: theme_class(Theme::Auto),
                        onclick: move |_| {
                            let mut store = ui::make_settings();
                            store.set_theme(Theme::Auto);
                            refresh();
                        },
                        "Automático"
                    }
                }
            }

            section {
                class: "settings-section",
                h2 { "Idioma" }
                select {
                    value: current.language.as_str(),
                    onchange: move |evt| {
                        let language = match evt.value().as_str() {
                            "en" => Language::En,
                            "pt" => Language::Pt,
                            _ => Language::Es,
                        };
                        let mut store = ui::make_settings();
                        store.set_language(language);
                        refresh();
                    },
                    option { value: "es", "Español" }
                    option { value: "en", "English" }
                    option { value: "pt", "Português" }
                }
            }

            section {
                class: "settings-section",
                h2 { "Notificaciones" }
                for (kind, label_text, checked) in notification_rows {
                    label {
                        key: "{label_text}",
                        class: "check-row",
                        input {
                            r#type: "checkbox",
                            checked,
                            onchange: move |_| {
                                let mut store = ui::make_settings();
                                store.toggle_notification(kind);
                                refresh();
                            },
                        }
                        span { "{label_text}" }
                    }
                }
            }

            section {
                class: "settings-section",
                h2 { "Pantalla" }
                label {
                    class: "check-row",
                    input {
                        r#type: "checkbox",
                        checked: current.display.compact_mode,
                        onchange: move |_| {
                            let mut store = ui::make_settings();
                            let compact = store.settings().display.compact_mode;
                            store.set_display_preference(DisplayPreference::CompactMode(!compact));
                            refresh();
                        },
                    }
                    span { "Modo compacto" }
                }
                label {
                    class: "check-row",
                    input {
                        r#type: "checkbox",
                        checked: current.display.show_animations,
                        onchange: move |_| {
                            let mut store = ui::make_settings();
                            let animations = store.settings().display.show_animations;
                            store.set_display_preference(
                                DisplayPreference::ShowAnimations(!animations),
                            );
                            refresh();
                        },
                    }
                    span { "Mostrar animaciones" }
                }
                label {
                    class: "select-row",
                    span { "Tamaño de fuente" }
                    select {
                        value: current.display.font_size.as_str(),
                        onchange: move |evt| {
                            let size = match evt.value().as_str() {
                                "small" => FontSize::Small,
                                "large" => FontSize::Large,
                                _ => FontSize::Medium,
                            };
                            let mut store = ui::make_settings();
                            store.set_display_preference(DisplayPreference::FontSize(size));
                            refresh();
                        },
                        option { value: "small", "Pequeño" }
                        option { value: "medium", "Mediano" }
                        option { value: "large", "Grande" }
                    }
                }
            }

            section {
                class: "settings-section",
                h2 { "Copia de seguridad" }
                div {
                    class: "config-actions",
                    input {
                        class: "export-name",
                        placeholder: "Nombre del archivo (opcional)",
                        value: "{export_name}",
                        oninput: move |evt| export_name.set(evt.value()),
                    }
                    button { onclick: handle_export, "Exportar ajustes" }
                    label {
                        class: "file-button",
                        "Importar ajustes"
                        input {
                            r#type: "file",
                            accept: ".json",
                            onchange: handle_import,
                        }
                    }
                }
                if let Some(Ok(text)) = import_result() {
                    p { class: "notice", "{text}" }
                }
                if let Some(Err(text)) = import_result() {
                    p { class: "form-error", "{text}" }
                }
            }

            section {
                class: "settings-section",
                button {
                    class: "danger-button",
                    onclick: move |_| {
                        let mut store = ui::make_settings();
                        store.reset_settings();
                        refresh();
                        log_activity(&mut log, LogLevel::Info, "Ajustes restablecidos");
                    },
                    "Restablecer ajustes"
                }
            }
        }
    }
}
