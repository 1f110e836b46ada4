use std::path::Path;
use std::time::Duration;

use egui::{Color32, Vec2};
use log::info;
use serde::{Deserialize, Serialize};

use crate::element::common::parse_hex_color;
use crate::error::ConfigError;
use crate::tools::BrushSettings;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Environment variable overriding the edit service base URL
pub const API_URL_ENV: &str = "DIFFUSION_API_URL";

/// Environment variable naming a JSON config file for the binary
pub const CONFIG_PATH_ENV: &str = "CANVAS_EDITOR_CONFIG";

/// Editor settings. Missing fields take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub brush_size: f32,
    pub brush_color: String,
    pub export_pixel_ratio: f32,
    pub submit_pixel_ratio: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_owned(),
            request_timeout_secs: 120,
            canvas_width: 800.0,
            canvas_height: 600.0,
            brush_size: 5.0,
            brush_color: "#000000".to_owned(),
            export_pixel_ratio: 2.0,
            submit_pixel_ratio: 1.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        info!("Loaded config from {}", path.display());
        Self::from_json(&json)
    }

    /// Load from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a variable lookup such as the process environment
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            info!("Using edit service at {} from {}", url, API_URL_ENV);
            self.api_base_url = url.trim().to_owned();
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        parse_hex_color(&self.brush_color).map(|_| ())
    }

    pub fn brush_color(&self) -> Result<Color32, ConfigError> {
        parse_hex_color(&self.brush_color)
    }

    /// Initial brush, with the size clamped to the supported range
    pub fn brush(&self) -> Result<BrushSettings, ConfigError> {
        Ok(BrushSettings::new(self.brush_size, self.brush_color()?))
    }

    pub fn canvas_size(&self) -> Vec2 {
        Vec2::new(self.canvas_width, self.canvas_height)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r##"{"brush_size": 80, "brush_color": "#ff0000"}"##).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.canvas_size(), Vec2::new(800.0, 600.0));

        let brush = config.brush().unwrap();
        assert_eq!(brush.size(), 50.0);
        assert_eq!(brush.color, Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn test_invalid_color_rejected() {
        let result = EditorConfig::from_json(r#"{"brush_color": "red"}"#);
        assert!(matches!(result, Err(ConfigError::InvalidColor(_))));
    }

    #[test]
    fn test_env_override() {
        let mut config = EditorConfig::default();
        config.apply_overrides(|key| (key == API_URL_ENV).then(|| "http://gpu-box:9000".to_owned()));
        assert_eq!(config.api_base_url, "http://gpu-box:9000");

        let mut config = EditorConfig::default();
        config.apply_overrides(|_| Some("   ".to_owned()));
        assert_eq!(config, EditorConfig::default());
    }
}
