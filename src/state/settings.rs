//! Viewer settings.
//!
//! Settings are persisted to localStorage so they survive page reloads.
//! Native builds always start from the defaults.

use crate::gibs::request_url::DEFAULT_WMTS_BASE_URL;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_CATALOG_URL: &str = "data/layers_info.json";
pub const DEFAULT_EXPORT_URL: &str = "http://localhost:5000/save_data";

/// Endpoints and panel timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// WMTS GetTile endpoint, ending in `?`
    pub wmts_base_url: String,
    /// Layer catalog location, relative to the page
    pub catalog_url: String,
    /// Export backend endpoint
    pub export_url: String,
    /// How long the finished panel stays up
    pub finished_display_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wmts_base_url: DEFAULT_WMTS_BASE_URL.to_string(),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            export_url: DEFAULT_EXPORT_URL.to_string(),
            finished_display_secs: 5,
        }
    }
}

impl Settings {
    /// localStorage key for persisting settings.
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "gibs_workbench_settings";

    pub fn finished_display(&self) -> Duration {
        Duration::from_secs(self.finished_display_secs)
    }

    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => {
                log::info!("Loaded settings from localStorage");
                settings
            }
            Err(e) => {
                log::warn!("Failed to parse settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return Self::default(),
        };

        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => Self::from_json(&json),
            _ => Self::default(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    /// Save settings to localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return,
        };

        let json = match serde_json::to_string(self) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Failed to serialize settings: {}", e);
                return;
            }
        };

        if let Err(e) = storage.set_item(Self::STORAGE_KEY, &json) {
            log::warn!("Failed to save settings: {:?}", e);
        } else {
            log::info!("Saved settings to localStorage");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Settings are not persisted on native builds");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(
            settings.wmts_base_url,
            "https://gibs.earthdata.nasa.gov/wmts/epsg4326/best/wmts.cgi?"
        );
        assert_eq!(settings.catalog_url, "data/layers_info.json");
        assert_eq!(settings.export_url, "http://localhost:5000/save_data");
        assert_eq!(settings.finished_display(), Duration::from_secs(5));
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let settings = Settings::from_json(r#"{"export_url": "http://backend/save"}"#);
        assert_eq!(settings.export_url, "http://backend/save");
        assert_eq!(settings.catalog_url, DEFAULT_CATALOG_URL);
        assert_eq!(settings.finished_display_secs, 5);
    }

    #[test]
    fn test_corrupt_json_uses_defaults() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }
}
