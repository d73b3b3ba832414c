//! Configuration system

use std::path::Path;

pub use serde::{Deserialize, Serialize};

use crate::style::WindowStyle;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match extension(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Initial window settings
///
/// Missing fields take their defaults, so a file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Client width in pixels
    pub width: i32,
    /// Client height in pixels
    pub height: i32,
    /// Title bar text
    pub title: String,
    /// Decorations
    pub style: WindowStyle,
    /// Shown after creation
    pub visible: bool,
    /// Cursor drawn over the client area
    pub cursor_visible: bool,
    /// Cursor confined to the client area while focused
    pub cursor_capture: bool,
    /// Held keys re-emit key presses
    pub key_repeat: bool,
    /// PNG to use as the window icon
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<String>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "native_window".to_string(),
            style: WindowStyle::DEFAULT,
            visible: true,
            cursor_visible: true,
            cursor_capture: false,
            key_repeat: true,
            icon_path: None,
        }
    }
}

impl Config for WindowConfig {}
