//! Downloadable export file envelopes shared by settings and project config.
//!
//! Both formats follow the same envelope: `{version, exportDate, appName,
//! …payload}`, written as a `.json` file named `<prefix>_<YYYY-MM-DD>.json`.
//! Imports accept any envelope whose `version` starts with `1.`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config;
use crate::settings::UserSettings;
use crate::{date_stamp, now_iso8601};

/// Envelope version written to every export.
pub const EXPORT_VERSION: &str = "1.0.0";

/// A file ready to be offered as a download. Producing the actual browser
/// download is UI glue; the stores only build the name and contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub contents: String,
}

impl ExportFile {
    /// Build a `<prefix>_<YYYY-MM-DD>.json` file.
    pub fn named(prefix: &str, contents: String) -> Self {
        Self {
            filename: format!(
                "{prefix}_{}{}",
                date_stamp(),
                config::EXPORT_FILE_EXTENSION
            ),
            contents,
        }
    }
}

/// Settings export document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsExport {
    pub version: String,
    pub export_date: String,
    pub app_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    pub settings: UserSettings,
}

impl SettingsExport {
    pub fn new(custom_name: Option<&str>, settings: UserSettings) -> Self {
        Self {
            version: EXPORT_VERSION.to_string(),
            export_date: now_iso8601(),
            app_name: config::APP_NAME.to_string(),
            custom_name: custom_name.map(str::to_string),
            settings,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Project-state export document: every saved project of one user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectExport {
    pub version: String,
    pub export_date: String,
    pub app_name: String,
    pub user_id: String,
    pub projects: Map<String, Value>,
}

impl ProjectExport {
    pub fn new(user_id: &str, projects: Map<String, Value>) -> Self {
        Self {
            version: EXPORT_VERSION.to_string(),
            export_date: now_iso8601(),
            app_name: config::APP_NAME.to_string(),
            user_id: user_id.to_string(),
            projects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_carries_date_stamp() {
        let file = ExportFile::named("visuallab_settings", "{}".into());
        assert!(file.filename.starts_with("visuallab_settings_"));
        assert!(file.filename.ends_with(".json"));
        // visuallab_settings_YYYY-MM-DD.json
        let date = &file.filename["visuallab_settings_".len()..file.filename.len() - 5];
        assert_eq!(date.len(), 10);
    }

    #[test]
    fn test_settings_envelope_shape() {
        let export = SettingsExport::new(Some("mi copia"), UserSettings::default());
        let json: Value = serde_json::from_str(&export.to_json()).unwrap();

        assert_eq!(json["version"], "1.0.0");
        assert_eq!(json["appName"], "VisualLab");
        assert_eq!(json["customName"], "mi copia");
        assert!(json["exportDate"].as_str().unwrap().contains('T'));
        assert_eq!(json["settings"]["theme"], "dark");
    }

    #[test]
    fn test_custom_name_omitted_when_absent() {
        let export = SettingsExport::new(None, UserSettings::default());
        let json: Value = serde_json::from_str(&export.to_json()).unwrap();
        assert!(json.get("customName").is_none());
    }
}
