//! # Settings store — the user preference document
//!
//! [`UserSettings`] is a fixed-shape record: a theme, a language, four
//! boolean notification flags and a display sub-record. [`SettingsStore`]
//! keeps the live document, persists `{settings, lastSaved}` under the
//! `settings-storage` key after every mutation, and implements the
//! export/import flow.
//!
//! ## Merge rule
//!
//! [`SettingsStore::update_settings`] merges shallowly at the top level but
//! nested for the `notifications` and `display` sub-records: existing nested
//! keys survive unless the patch overrides them, while unknown top-level
//! keys replace wholesale. That asymmetry is observable behavior and is
//! relied upon by the import flow.
//!
//! ## Import pipeline
//!
//! [`SettingsStore::import_settings`] runs an ordered, short-circuiting
//! pipeline — filename extension, JSON parse, `settings` field presence,
//! `version` compatibility, schema validation — and only then merges. Schema
//! validation ([`validate_settings`]) is a pure function that collects every
//! violation instead of stopping at the first.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config;
use crate::export::{ExportFile, SettingsExport};
use crate::now_iso8601;
use crate::storage::KeyValueStorage;

/// Interface theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    /// Follow the operating system preference.
    Auto,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }
}

/// Interface language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
    Pt,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
            Language::Pt => "pt",
        }
    }
}

/// Base font size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub fn as_str(self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        }
    }
}

/// The four supported notification channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Email,
    Push,
    Sounds,
    Desktop,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 4] = [
        NotificationKind::Email,
        NotificationKind::Push,
        NotificationKind::Sounds,
        NotificationKind::Desktop,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Email => "email",
            NotificationKind::Push => "push",
            NotificationKind::Sounds => "sounds",
            NotificationKind::Desktop => "desktop",
        }
    }
}

/// Notification flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPrefs {
    pub email: bool,
    pub push: bool,
    pub sounds: bool,
    pub desktop: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            email: true,
            push: false,
            sounds: true,
            desktop: false,
        }
    }
}

impl NotificationPrefs {
    pub fn get(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::Email => self.email,
            NotificationKind::Push => self.push,
            NotificationKind::Sounds => self.sounds,
            NotificationKind::Desktop => self.desktop,
        }
    }

    pub fn set(&mut self, kind: NotificationKind, value: bool) {
        match kind {
            NotificationKind::Email => self.email = value,
            NotificationKind::Push => self.push = value,
            NotificationKind::Sounds => self.sounds = value,
            NotificationKind::Desktop => self.desktop = value,
        }
    }
}

/// Display sub-record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPrefs {
    pub compact_mode: bool,
    pub show_animations: bool,
    pub font_size: FontSize,
}

impl Default for DisplayPrefs {
    fn default() -> Self {
        Self {
            compact_mode: false,
            show_animations: true,
            font_size: FontSize::Medium,
        }
    }
}

/// The fixed-shape user preference document.
///
/// Unknown top-level fields are carried verbatim in `extra` so the shallow
/// top-level merge keeps them observable across updates and exports.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub notifications: NotificationPrefs,
    #[serde(default)]
    pub display: DisplayPrefs,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial update applied by [`SettingsStore::update_settings`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayPatch>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-flag notification overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sounds: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<bool>,
}

/// Per-field display overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compact_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_animations: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,
}

/// A single display preference assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayPreference {
    CompactMode(bool),
    ShowAnimations(bool),
    FontSize(FontSize),
}

/// Result of validating a candidate settings document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

const VALID_THEMES: [&str; 3] = ["light", "dark", "auto"];
const VALID_LANGUAGES: [&str; 3] = ["es", "en", "pt"];
const VALID_FONT_SIZES: [&str; 3] = ["small", "medium", "large"];
const VALID_NOTIFICATION_KEYS: [&str; 4] = ["email", "push", "sounds", "desktop"];

/// Validate a candidate settings document against the fixed schema.
///
/// Pure: inspects the document, collects every violation, never panics.
/// Fields are optional — only present fields are checked.
pub fn validate_settings(settings: &Value) -> ValidationReport {
    let mut errors = Vec::new();

    if let Some(theme) = settings.get("theme") {
        if !theme.as_str().is_some_and(|t| VALID_THEMES.contains(&t)) {
            errors.push("Tema inválido. Debe ser: light, dark o auto".to_string());
        }
    }

    if let Some(language) = settings.get("language") {
        if !language
            .as_str()
            .is_some_and(|l| VALID_LANGUAGES.contains(&l))
        {
            errors.push("Idioma inválido. Debe ser: es, en o pt".to_string());
        }
    }

    if let Some(notifications) = settings.get("notifications") {
        match notifications.as_object() {
            Some(object) => {
                for (key, value) in object {
                    if !VALID_NOTIFICATION_KEYS.contains(&key.as_str()) {
                        errors.push(format!("Clave de notificación inválida: {key}"));
                    }
                    if !value.is_boolean() {
                        errors.push(format!("El valor de {key} debe ser booleano"));
                    }
                }
            }
            None => errors.push("Las notificaciones deben ser un objeto".to_string()),
        }
    }

    if let Some(display) = settings.get("display") {
        match display.as_object() {
            Some(object) => {
                if let Some(font_size) = object.get("fontSize") {
                    if !font_size
                        .as_str()
                        .is_some_and(|f| VALID_FONT_SIZES.contains(&f))
                    {
                        errors.push(
                            "Tamaño de fuente inválido. Debe ser: small, medium o large"
                                .to_string(),
                        );
                    }
                }
                for key in ["compactMode", "showAnimations"] {
                    if object.get(key).is_some_and(|v| !v.is_boolean()) {
                        errors.push(format!("El valor de {key} debe ser booleano"));
                    }
                }
            }
            None => errors.push("La sección display debe ser un objeto".to_string()),
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Why a settings import was rejected. The messages are surfaced verbatim.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("El archivo debe ser de tipo JSON")]
    NotJsonFile,
    #[error("El archivo no contiene JSON válido")]
    InvalidJson,
    #[error("El archivo no contiene configuraciones válidas")]
    MissingSettings,
    #[error("Versión de configuración no compatible")]
    IncompatibleVersion,
    #[error("Configuración inválida: {}", .0.join(", "))]
    Invalid(Vec<String>),
}

/// Successful import descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportSummary {
    pub message: String,
    /// `exportDate` of the imported file, when present.
    pub imported_from: Option<String>,
}

/// Shape persisted under the `settings-storage` key.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSettings {
    settings: UserSettings,
    #[serde(default)]
    last_saved: Option<String>,
}

/// Holds the live settings document; persists after every mutation.
pub struct SettingsStore<S: KeyValueStorage> {
    storage: S,
    settings: UserSettings,
    last_saved: Option<String>,
    error: Option<String>,
}

impl<S: KeyValueStorage> SettingsStore<S> {
    /// Build a store, restoring the persisted document or falling back to
    /// the defaults.
    pub fn new(storage: S) -> Self {
        let persisted: Option<PersistedSettings> = storage
            .get(config::keys::SETTINGS)
            .and_then(|raw| serde_json::from_str(&raw).ok());
        let (settings, last_saved) = match persisted {
            Some(p) => (p.settings, p.last_saved),
            None => (UserSettings::default(), None),
        };
        Self {
            storage,
            settings,
            last_saved,
            error: None,
        }
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn last_saved(&self) -> Option<&str> {
        self.last_saved.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Refresh `lastSaved` and persist the document.
    fn touch(&mut self) {
        self.last_saved = Some(now_iso8601());
        let persisted = PersistedSettings {
            settings: self.settings.clone(),
            last_saved: self.last_saved.clone(),
        };
        match serde_json::to_string(&persisted) {
            Ok(raw) => {
                if !self.storage.set(config::keys::SETTINGS, &raw) {
                    tracing::warn!("settings not saved: storage rejected the write");
                }
            }
            Err(err) => tracing::warn!("settings not saved: {err}"),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
        self.touch();
    }

    pub fn set_language(&mut self, language: Language) {
        self.settings.language = language;
        self.touch();
    }

    pub fn set_notification_preference(&mut self, kind: NotificationKind, value: bool) {
        self.settings.notifications.set(kind, value);
        self.touch();
    }

    pub fn toggle_notification(&mut self, kind: NotificationKind) {
        let current = self.settings.notifications.get(kind);
        self.settings.notifications.set(kind, !current);
        self.touch();
    }

    pub fn set_display_preference(&mut self, preference: DisplayPreference) {
        match preference {
            DisplayPreference::CompactMode(value) => self.settings.display.compact_mode = value,
            DisplayPreference::ShowAnimations(value) => {
                self.settings.display.show_animations = value
            }
            DisplayPreference::FontSize(size) => self.settings.display.font_size = size,
        }
        self.touch();
    }

    /// Merge a partial update: shallow at the top level, nested for the
    /// `notifications` and `display` sub-records.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.settings.theme = theme;
        }
        if let Some(language) = patch.language {
            self.settings.language = language;
        }
        if let Some(notifications) = patch.notifications {
            let prefs = &mut self.settings.notifications;
            if let Some(email) = notifications.email {
                prefs.email = email;
            }
            if let Some(push) = notifications.push {
                prefs.push = push;
            }
            if let Some(sounds) = notifications.sounds {
                prefs.sounds = sounds;
            }
            if let Some(desktop) = notifications.desktop {
                prefs.desktop = desktop;
            }
        }
        if let Some(display) = patch.display {
            let prefs = &mut self.settings.display;
            if let Some(compact) = display.compact_mode {
                prefs.compact_mode = compact;
            }
            if let Some(animations) = display.show_animations {
                prefs.show_animations = animations;
            }
            if let Some(font_size) = display.font_size {
                prefs.font_size = font_size;
            }
        }
        for (key, value) in patch.extra {
            self.settings.extra.insert(key, value);
        }
        self.touch();
    }

    /// Restore the defaults.
    pub fn reset_settings(&mut self) {
        self.settings = UserSettings::default();
        self.error = None;
        self.touch();
    }

    /// Build the downloadable export document. Offering the actual browser
    /// download is UI glue.
    pub fn export_settings(&self, custom_name: Option<&str>) -> ExportFile {
        let export = SettingsExport::new(custom_name, self.settings.clone());
        ExportFile::named(
            custom_name.unwrap_or(config::SETTINGS_EXPORT_PREFIX),
            export.to_json(),
        )
    }

    /// Run the import pipeline over a picked file's name and contents. On
    /// failure the message is also recorded on the `error` field.
    pub fn import_settings(
        &mut self,
        file_name: &str,
        contents: &str,
    ) -> Result<ImportSummary, ImportError> {
        self.error = None;
        let result = self.import_settings_inner(file_name, contents);
        if let Err(ref err) = result {
            self.error = Some(err.to_string());
        }
        result
    }

    fn import_settings_inner(
        &mut self,
        file_name: &str,
        contents: &str,
    ) -> Result<ImportSummary, ImportError> {
        if !file_name.ends_with(config::EXPORT_FILE_EXTENSION) {
            return Err(ImportError::NotJsonFile);
        }

        let document: Value =
            serde_json::from_str(contents).map_err(|_| ImportError::InvalidJson)?;

        let Some(settings) = document.get("settings") else {
            return Err(ImportError::MissingSettings);
        };

        if let Some(version) = document.get("version").and_then(Value::as_str) {
            if !version.starts_with(config::COMPATIBLE_VERSION_PREFIX) {
                return Err(ImportError::IncompatibleVersion);
            }
        }

        let report = validate_settings(settings);
        if !report.is_valid {
            return Err(ImportError::Invalid(report.errors));
        }

        let patch: SettingsPatch = serde_json::from_value(settings.clone())
            .map_err(|_| ImportError::Invalid(vec!["La sección settings debe ser un objeto".to_string()]))?;
        self.update_settings(patch);

        Ok(ImportSummary {
            message: "Configuración importada correctamente".to_string(),
            imported_from: document
                .get("exportDate")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::MemoryStorage;

    fn store() -> SettingsStore<MemoryStorage> {
        SettingsStore::new(MemoryStorage::new())
    }

    #[test]
    fn test_defaults() {
        let store = store();
        let settings = store.settings();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.language, Language::Es);
        assert!(settings.notifications.email);
        assert!(!settings.notifications.push);
        assert!(settings.notifications.sounds);
        assert!(!settings.notifications.desktop);
        assert!(!settings.display.compact_mode);
        assert!(settings.display.show_animations);
        assert_eq!(settings.display.font_size, FontSize::Medium);
        assert!(store.last_saved().is_none());
    }

    #[test]
    fn test_set_theme_touches_last_saved() {
        let mut store = store();
        store.set_theme(Theme::Light);
        assert_eq!(store.settings().theme, Theme::Light);
        assert!(store.last_saved().is_some());
    }

    #[test]
    fn test_toggle_notification() {
        let mut store = store();
        store.toggle_notification(NotificationKind::Email);
        assert!(!store.settings().notifications.email);
        store.toggle_notification(NotificationKind::Email);
        assert!(store.settings().notifications.email);
    }

    #[test]
    fn test_display_preferences() {
        let mut store = store();
        store.set_display_preference(DisplayPreference::CompactMode(true));
        store.set_display_preference(DisplayPreference::FontSize(FontSize::Large));
        assert!(store.settings().display.compact_mode);
        assert_eq!(store.settings().display.font_size, FontSize::Large);
    }

    #[test]
    fn test_update_merges_notifications_nested() {
        let mut store = store();
        store.update_settings(SettingsPatch {
            notifications: Some(NotificationPatch {
                push: Some(true),
                ..NotificationPatch::default()
            }),
            ..SettingsPatch::default()
        });

        let notifications = &store.settings().notifications;
        assert!(notifications.push);
        // All other flags keep their previous values.
        assert!(notifications.email);
        assert!(notifications.sounds);
        assert!(!notifications.desktop);
    }

    #[test]
    fn test_update_merges_unknown_top_level_keys_shallowly() {
        let mut store = store();
        let mut extra = serde_json::Map::new();
        extra.insert("beta".into(), json!({ "flag": true }));
        store.update_settings(SettingsPatch {
            extra,
            ..SettingsPatch::default()
        });

        assert_eq!(store.settings().extra["beta"]["flag"], true);

        // A later update replaces the unknown key wholesale (shallow merge).
        let mut extra = serde_json::Map::new();
        extra.insert("beta".into(), json!({ "other": 1 }));
        store.update_settings(SettingsPatch {
            extra,
            ..SettingsPatch::default()
        });
        assert!(store.settings().extra["beta"].get("flag").is_none());
    }

    #[test]
    fn test_reset_settings() {
        let mut store = store();
        store.set_theme(Theme::Light);
        store.toggle_notification(NotificationKind::Desktop);
        store.reset_settings();
        assert_eq!(*store.settings(), UserSettings::default());
        assert!(store.last_saved().is_some());
    }

    #[test]
    fn test_persistence_roundtrip() {
        let storage = MemoryStorage::new();
        let mut store = SettingsStore::new(storage.clone());
        store.set_theme(Theme::Auto);
        store.set_language(Language::Pt);

        let restored = SettingsStore::new(storage);
        assert_eq!(restored.settings().theme, Theme::Auto);
        assert_eq!(restored.settings().language, Language::Pt);
        assert!(restored.last_saved().is_some());
    }

    #[test]
    fn test_validate_collects_every_violation() {
        let report = validate_settings(&json!({
            "theme": "blue",
            "language": "fr",
            "notifications": { "sms": true, "push": "yes" },
            "display": { "fontSize": "huge" }
        }));

        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 5);
        assert!(report.errors[0].contains("Tema inválido"));
        assert!(report
            .errors
            .iter()
            .any(|e| e == "Clave de notificación inválida: sms"));
        assert!(report
            .errors
            .iter()
            .any(|e| e == "El valor de push debe ser booleano"));
    }

    #[test]
    fn test_validate_accepts_partial_documents() {
        assert!(validate_settings(&json!({ "theme": "auto" })).is_valid);
        assert!(validate_settings(&json!({})).is_valid);
    }

    fn settings_file(settings: Value) -> String {
        json!({
            "version": "1.0.0",
            "exportDate": "2024-06-01T10:00:00.000Z",
            "appName": "VisualLab",
            "settings": settings
        })
        .to_string()
    }

    #[test]
    fn test_import_invalid_theme_rejected() {
        let mut store = store();
        let err = store
            .import_settings("ajustes.json", &settings_file(json!({ "theme": "blue" })))
            .unwrap_err();

        assert!(err.to_string().contains("Tema inválido"));
        assert_eq!(store.settings().theme, Theme::Dark);
        assert_eq!(store.error(), Some(err.to_string().as_str()));
    }

    #[test]
    fn test_import_valid_theme_applies_immediately() {
        let mut store = store();
        let summary = store
            .import_settings("ajustes.json", &settings_file(json!({ "theme": "light" })))
            .unwrap();

        assert_eq!(store.settings().theme, Theme::Light);
        assert_eq!(summary.message, "Configuración importada correctamente");
        assert_eq!(
            summary.imported_from.as_deref(),
            Some("2024-06-01T10:00:00.000Z")
        );
    }

    #[test]
    fn test_import_requires_json_extension() {
        let mut store = store();
        let err = store
            .import_settings("ajustes.txt", &settings_file(json!({})))
            .unwrap_err();
        assert_eq!(err, ImportError::NotJsonFile);
        assert_eq!(err.to_string(), "El archivo debe ser de tipo JSON");
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        let mut store = store();
        let err = store.import_settings("ajustes.json", "{ not json").unwrap_err();
        assert_eq!(err, ImportError::InvalidJson);
    }

    #[test]
    fn test_import_requires_settings_field() {
        let mut store = store();
        let err = store
            .import_settings("ajustes.json", r#"{"version":"1.0.0"}"#)
            .unwrap_err();
        assert_eq!(err, ImportError::MissingSettings);
    }

    #[test]
    fn test_import_rejects_incompatible_version() {
        let mut store = store();
        let contents = json!({ "version": "2.0.0", "settings": {} }).to_string();
        let err = store.import_settings("ajustes.json", &contents).unwrap_err();
        assert_eq!(err, ImportError::IncompatibleVersion);
    }

    #[test]
    fn test_import_without_version_is_accepted() {
        let mut store = store();
        let contents = json!({ "settings": { "language": "en" } }).to_string();
        assert!(store.import_settings("ajustes.json", &contents).is_ok());
        assert_eq!(store.settings().language, Language::En);
    }

    #[test]
    fn test_import_merges_nested_not_replaces() {
        let mut store = store();
        let contents = settings_file(json!({ "notifications": { "push": true } }));
        store.import_settings("ajustes.json", &contents).unwrap();

        let notifications = &store.settings().notifications;
        assert!(notifications.push);
        assert!(notifications.email);
        assert!(notifications.sounds);
    }

    #[test]
    fn test_export_roundtrips_through_import() {
        let mut source = store();
        source.set_theme(Theme::Light);
        source.set_display_preference(DisplayPreference::FontSize(FontSize::Large));
        let file = source.export_settings(None);

        assert!(file.filename.starts_with("visuallab_settings_"));

        let mut target = store();
        target.import_settings(&file.filename, &file.contents).unwrap();
        assert_eq!(target.settings().theme, Theme::Light);
        assert_eq!(target.settings().display.font_size, FontSize::Large);
    }

    #[test]
    fn test_export_with_custom_name() {
        let store = store();
        let file = store.export_settings(Some("mi_config"));
        assert!(file.filename.starts_with("mi_config_"));

        let document: Value = serde_json::from_str(&file.contents).unwrap();
        assert_eq!(document["customName"], "mi_config");
    }
}
