use dioxus::prelude::*;

/// Severity of an activity entry.
#[derive(Clone, Debug, PartialEq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    fn class(&self) -> &'static str {
        match self {
            LogLevel::Info => "log-info",
            LogLevel::Success => "log-success",
            LogLevel::Warning => "log-warning",
            LogLevel::Error => "log-error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

/// In-app record of recent store operations (saves, imports, auth changes).
#[derive(Clone, Debug, Default)]
pub struct ActivityLog {
    pub entries: Vec<LogEntry>,
    pub visible: bool,
}

pub fn use_activity_log() -> Signal<ActivityLog> {
    use_context::<Signal<ActivityLog>>()
}

pub fn log_activity(log: &mut Signal<ActivityLog>, level: LogLevel, message: &str) {
    let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
    log.write().entries.push(LogEntry {
        timestamp,
        level,
        message: message.to_string(),
    });
}

/// Collapsible panel rendering the activity entries, newest last.
#[component]
pub fn ActivityLogPanel() -> Element {
    let mut log = use_activity_log();
    let visible = log().visible;
    let entries = log().entries.clone();

    rsx! {
        div {
            class: "activity-log",
            button {
                class: "activity-log-toggle",
                onclick: move |_| {
                    let current = log().visible;
                    log.write().visible = !current;
                },
                if visible { "Ocultar actividad" } else { "Mostrar actividad" }
            }
            if visible {
                ul {
                    class: "activity-log-entries",
                    for (index, entry) in entries.iter().enumerate() {
                        li {
                            key: "{index}",
                            class: "{entry.level.class()}",
                            span { class: "log-timestamp", "{entry.timestamp}" }
                            span { "{entry.message}" }
                        }
                    }
                }
            }
        }
    }
}
