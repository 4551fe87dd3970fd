use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use xredirect_input::MouseButton;

/// Main configuration for xredirect
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub capture: CaptureSettings,
    #[serde(default)]
    pub click: ClickSettings,
}

/// Which display to open
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DisplaySettings {
    /// Falls back to `$DISPLAY`, then `:0`
    #[serde(default)]
    pub name: Option<String>,
}

/// Where captured frames go
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CaptureSettings {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Reserved for periodic capture, which is not implemented. Parsed and kept only.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_output() -> PathBuf {
    PathBuf::from("Debug.jpg")
}

fn default_interval_ms() -> u64 {
    33
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            output: default_output(),
            interval_ms: default_interval_ms(),
        }
    }
}

/// The click issued after a capture
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClickSettings {
    #[serde(default = "default_click_enabled")]
    pub enabled: bool,
    #[serde(default = "default_click_x")]
    pub x: i32,
    #[serde(default = "default_click_y")]
    pub y: i32,
    #[serde(default = "default_button")]
    pub button: String,
}

fn default_click_enabled() -> bool {
    true
}

fn default_click_x() -> i32 {
    1839
}

fn default_click_y() -> i32 {
    60
}

fn default_button() -> String {
    "left".to_string()
}

impl Default for ClickSettings {
    fn default() -> Self {
        Self {
            enabled: default_click_enabled(),
            x: default_click_x(),
            y: default_click_y(),
            button: default_button(),
        }
    }
}

impl ClickSettings {
    pub fn mouse_button(&self) -> Result<MouseButton> {
        self.button.parse().map_err(Error::Config)
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config/xredirect/config.toml")
    }

    /// Load config from the default path, returning defaults if it is missing or broken
    pub fn load() -> Self {
        let path = Self::path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path. Errors are not papered over.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::parse(&contents)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Save config to `path`, creating parent directories as needed
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("failed to create {}: {}", parent.display(), e)))?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, contents)
            .map_err(|e| Error::Config(format!("failed to write {}: {}", path.display(), e)))
    }

    /// Display to open when none is given on the command line
    pub fn display_name(&self) -> String {
        self.display
            .name
            .clone()
            .or_else(|| std::env::var("DISPLAY").ok().filter(|d| !d.is_empty()))
            .unwrap_or_else(|| ":0".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::parse("").expect("parse");
        assert_eq!(config, Config::default());
        assert_eq!(config.capture.output, PathBuf::from("Debug.jpg"));
        assert_eq!(config.capture.interval_ms, 33);
        assert_eq!((config.click.x, config.click.y), (1839, 60));
        assert!(config.click.enabled);
    }

    #[test]
    fn partial_sections_fill_in() {
        let config = Config::parse(
            r#"
            [display]
            name = ":1"

            [click]
            x = 5
            button = "right"
            "#,
        )
        .expect("parse");
        assert_eq!(config.display.name.as_deref(), Some(":1"));
        assert_eq!(config.display_name(), ":1");
        assert_eq!(config.click.x, 5);
        assert_eq!(config.click.y, 60);
        assert_eq!(config.click.mouse_button().expect("button"), MouseButton::Right);
    }

    #[test]
    fn bad_button_is_config_error() {
        let click = ClickSettings {
            button: "thumb".to_string(),
            ..ClickSettings::default()
        };
        assert!(matches!(click.mouse_button(), Err(Error::Config(_))));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/config.toml");
        let mut config = Config::default();
        config.capture.output = PathBuf::from("/tmp/frame.png");
        config.click.enabled = false;

        config.save_to(&path).expect("save");
        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_missing_file_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Config::load_from(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
