//! Configuration management
//!
//! Load and save user preferences to a TOML config file.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::color::Rgba;
use crate::export::DEFAULT_EXPORT_FILENAME;
use crate::style::{FontFamily, StyleState, DEFAULT_FONT_SIZE};
use crate::terminal_capabilities::ColorSupport;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub style: StylePreferences,
    pub export: ExportPreferences,
    pub preview: PreviewPreferences,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("com", "posterforge", "posterforge") {
            Ok(proj_dirs.config_dir().join("config.toml"))
        } else {
            // Fallback to current directory
            Ok(PathBuf::from("posterforge.toml"))
        }
    }
}

/// Caption style defaults applied to fresh sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StylePreferences {
    /// Hex color of the caption bar fill, `#rrggbb` or `#rrggbbaa`
    pub footer_color: String,
    /// Hex color of the caption text
    pub text_color: String,
    pub font_size: f32,
    pub font: FontFamily,
    pub bold: bool,
    pub italic: bool,
}

impl Default for StylePreferences {
    fn default() -> Self {
        let style = StyleState::default();
        Self {
            footer_color: style.footer_color.to_hex(),
            text_color: style.text_color.to_hex(),
            font_size: DEFAULT_FONT_SIZE,
            font: style.font,
            bold: false,
            italic: false,
        }
    }
}

impl StylePreferences {
    /// Build the startup style state, falling back to defaults for any
    /// hex string that no longer parses.
    pub fn to_style_state(&self) -> StyleState {
        let defaults = StyleState::default();
        StyleState {
            caption: String::new(),
            footer_color: Rgba::parse_hex(&self.footer_color).unwrap_or(defaults.footer_color),
            text_color: Rgba::parse_hex(&self.text_color).unwrap_or(defaults.text_color),
            bold: self.bold,
            italic: self.italic,
            font_size_px: self.font_size.max(1.0),
            font: self.font,
        }
    }

    /// Capture the session's closing style as the next session's defaults.
    pub fn from_style_state(style: &StyleState) -> Self {
        Self {
            footer_color: style.footer_color.to_hex(),
            text_color: style.text_color.to_hex(),
            font_size: style.font_size_px,
            font: style.font,
            bold: style.bold,
            italic: style.italic,
        }
    }
}

/// PNG export preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportPreferences {
    /// Pixel density multiplier applied on top of the on-screen layout
    pub scale: f32,
    pub filename: String,
}

impl Default for ExportPreferences {
    fn default() -> Self {
        Self {
            scale: 2.0,
            filename: DEFAULT_EXPORT_FILENAME.to_string(),
        }
    }
}

/// Live preview preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewPreferences {
    pub columns: usize,
    pub color_mode: ColorSupport,
}

impl Default for PreviewPreferences {
    fn default() -> Self {
        Self {
            columns: 80,
            color_mode: ColorSupport::TrueColor,
        }
    }
}
