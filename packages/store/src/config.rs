//! Application constants and the static visualizer catalog.

/// Application display name, stamped into export files.
pub const APP_NAME: &str = "VisualLab";

/// Application version.
pub const APP_VERSION: &str = "1.0.0";

/// Accepted extension for imported configuration files.
pub const EXPORT_FILE_EXTENSION: &str = ".json";

/// Export envelope versions accepted on import.
pub const COMPATIBLE_VERSION_PREFIX: &str = "1.";

/// Default filename prefix for settings exports.
pub const SETTINGS_EXPORT_PREFIX: &str = "visuallab_settings";

/// Seconds between automatic project-state saves while a viewer is open.
pub const AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Durable storage keys.
pub mod keys {
    /// Persisted `{user, isAuthenticated}` pair.
    pub const AUTH: &str = "auth-storage";
    /// Persisted `{settings, lastSaved}` pair.
    pub const SETTINGS: &str = "settings-storage";
    /// Seeded predefined-user directory.
    pub const USERS: &str = "edu_platform_users";
    /// In-progress registration form draft.
    pub const REGISTER_DRAFT: &str = "register_form_progress";
    /// Per-project state lives under `project_<userId>_<projectId>`.
    pub const PROJECT_PREFIX: &str = "project_";
}

/// An entry in the visualizer catalog shown on the dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub accent: &'static str,
    /// Path of the embedded document loaded into the viewer frame.
    pub embed_path: &'static str,
    pub features: &'static [&'static str],
}

/// The two embedded visualizer tools reachable from the dashboard.
pub const PROJECTS: [ProjectInfo; 2] = [
    ProjectInfo {
        id: "fractals",
        name: "FractalLab",
        description: "Visualizador interactivo de fractales matemáticos",
        icon: "∞",
        accent: "#667eea",
        embed_path: "/fractals-app/index.html",
        features: &[
            "Conjunto de Mandelbrot",
            "Conjunto de Julia",
            "Curva de Koch",
            "Triángulo de Sierpinski",
            "Árbol Fractal",
        ],
    },
    ProjectInfo {
        id: "viewer3d",
        name: "Visor 3D Interactivo",
        description: "Explorador de figuras geométricas tridimensionales",
        icon: "🎲",
        accent: "#f093fb",
        embed_path: "/3d-app/index.html",
        features: &[
            "Figuras 3D dinámicas",
            "Control de cámara",
            "Animaciones",
            "Texturas y materiales",
            "Exportación de escenas",
        ],
    },
];

/// Look up a catalog entry by its id.
pub fn project_by_id(id: &str) -> Option<&'static ProjectInfo> {
    PROJECTS.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(project_by_id("fractals").unwrap().name, "FractalLab");
        assert_eq!(project_by_id("viewer3d").unwrap().embed_path, "/3d-app/index.html");
        assert!(project_by_id("nope").is_none());
    }
}
