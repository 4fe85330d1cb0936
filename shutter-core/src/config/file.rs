//! Configuration file loading and saving
//!
//! Loads user configuration from `~/.config/shutter/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::{BackendKind, DEFAULT_CAPTURE_HOTKEY, SessionConfig, default_screenshot_dir};
use crate::error::{Result, ShutterError};
use crate::types::Region;

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Naming and destination settings
    #[serde(default)]
    pub screenshot: ScreenshotSettings,

    /// Keyboard shortcuts
    #[serde(default)]
    pub hotkeys: HotkeySettings,

    /// Capture backend settings
    #[serde(default)]
    pub backend: BackendSettings,
}

/// Naming and destination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenshotSettings {
    /// Filename template with optional {timestamp} and {count} tokens
    #[serde(default = "default_template")]
    pub template: String,

    /// Include a timestamp in generated names
    #[serde(default = "default_true")]
    pub include_timestamp: bool,

    /// Target directory (empty = ~/Pictures/Screenshots)
    #[serde(default)]
    pub directory: String,

    /// Default capture region as "X,Y WxH[@SCALE]" (empty = whole output)
    #[serde(default)]
    pub region: String,
}

/// Keyboard shortcut settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotkeySettings {
    /// Shortcut that triggers a capture
    #[serde(default = "default_capture_hotkey")]
    pub capture: String,
}

/// Capture backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Backend kind (command, ipc, none)
    #[serde(default)]
    pub kind: BackendKind,

    /// Screenshot program for the command backend
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments added when a region is given
    #[serde(default = "default_region_args")]
    pub region_args: Vec<String>,

    /// Arguments always passed to the program
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// IPC socket path for the ipc backend (empty = default)
    #[serde(default)]
    pub socket: String,
}

// Default value functions
fn default_template() -> String {
    crate::naming::DEFAULT_TEMPLATE.to_string()
}

fn default_true() -> bool {
    true
}

fn default_capture_hotkey() -> String {
    DEFAULT_CAPTURE_HOTKEY.to_string()
}

fn default_program() -> String {
    "grim".to_string()
}

fn default_region_args() -> Vec<String> {
    vec!["-g".to_string(), "{geometry}".to_string()]
}

fn default_args() -> Vec<String> {
    vec!["{path}".to_string()]
}

impl Default for ScreenshotSettings {
    fn default() -> Self {
        Self {
            template: default_template(),
            include_timestamp: true,
            directory: String::new(),
            region: String::new(),
        }
    }
}

impl Default for HotkeySettings {
    fn default() -> Self {
        Self {
            capture: default_capture_hotkey(),
        }
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            program: default_program(),
            region_args: default_region_args(),
            args: default_args(),
            socket: String::new(),
        }
    }
}

impl BackendSettings {
    /// Configured socket path, if any
    pub fn socket_path(&self) -> Option<PathBuf> {
        (!self.socket.is_empty()).then(|| PathBuf::from(&self.socket))
    }
}

impl ConfigFile {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("shutter").join("config.toml")
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("shutter")
                .join("config.toml")
        } else {
            PathBuf::from("/etc/shutter/config.toml")
        }
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| ShutterError::Config(format!("Failed to read config file: {}", e)))?;

        let config: ConfigFile = toml::from_str(&content)?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration, logging warnings but returning defaults on error
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ShutterError::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ShutterError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&path, content)
            .map_err(|e| ShutterError::Config(format!("Failed to write config file: {}", e)))?;

        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Build the runtime session configuration
    pub fn session_config(&self) -> Result<SessionConfig> {
        let settings = &self.screenshot;

        let directory = if settings.directory.is_empty() {
            default_screenshot_dir()
        } else {
            expand_home(&settings.directory)
        };

        let region = if settings.region.trim().is_empty() {
            None
        } else {
            Some(Region::parse(&settings.region)?)
        };

        Ok(SessionConfig {
            template: (!settings.template.is_empty()).then(|| settings.template.clone()),
            include_timestamp: settings.include_timestamp,
            directory,
            region,
        })
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Generate a sample configuration file
pub fn sample_config() -> String {
    r#"# Shutter Configuration

[screenshot]
# Filename template. Tokens:
#   {timestamp} - local time as YYYY-MM-DD_HH-MM-SS
#   {count}     - capture number, zero-padded to 3 digits
# ".png" is always appended. Runs of - and _ are collapsed.
template = "screenshot_{timestamp}_{count}"

# Include the timestamp. When the template has no {timestamp} token the
# timestamp is added before the last "." or at the end.
include_timestamp = true

# Where screenshots are written (empty = ~/Pictures/Screenshots)
directory = ""

# Default region as "X,Y WxH", optionally "@SCALE" (empty = whole output)
region = ""

[hotkeys]
# Shortcut that triggers a capture in `shutter watch`
capture = "ctrl+shift+s"

[backend]
# command - run an external screenshot program
# ipc     - forward to a host started with `shutter host`
# none    - accept captures without writing anything
kind = "command"

# Program for the command backend. Placeholders: {geometry} {path} {scale}
program = "grim"
region_args = ["-g", "{geometry}"]
args = ["{path}"]

# Socket for the ipc backend (empty = $XDG_RUNTIME_DIR/shutter.sock)
socket = ""
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();
        assert_eq!(config.screenshot.template, "screenshot_{timestamp}_{count}");
        assert!(config.screenshot.include_timestamp);
        assert_eq!(config.hotkeys.capture, "ctrl+shift+s");
        assert_eq!(config.backend.kind, BackendKind::Command);
    }

    #[test]
    fn test_sample_config_parses() {
        let sample = sample_config();
        let config: ConfigFile = toml::from_str(&sample).unwrap();
        assert_eq!(config.backend.program, "grim");
        assert_eq!(config.backend.region_args, vec!["-g", "{geometry}"]);
        assert!(config.backend.socket_path().is_none());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/tmp/shots"), PathBuf::from("/tmp/shots"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/shots"), home.join("shots"));
        }
    }
}
