//! Application configuration.

use std::path::PathBuf;

/// Configuration for the desktop shell.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// T-shirt template drawn behind the logo and used for export.
    pub template_path: PathBuf,
    /// Users listing endpoint (the proxy's `/api/users`).
    pub api_url: String,
    /// File name suggested by the export save dialog.
    pub export_file_name: String,
    /// Width over height of the design area.
    pub design_aspect: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Teeprint".to_string(),
            width: 1280,
            height: 900,
            template_path: PathBuf::from("assets/tshirt-template.png"),
            api_url: "http://localhost:3030/api/users".to_string(),
            export_file_name: "tshirt-design.png".to_string(),
            design_aspect: 3.0 / 4.0,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `TEEPRINT_TEMPLATE` and `TEEPRINT_API_URL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(path) = get("TEEPRINT_TEMPLATE") {
            config.template_path = PathBuf::from(path);
        }
        if let Some(url) = get("TEEPRINT_API_URL") {
            config.api_url = url.trim().to_string();
        }
        config
    }
}
