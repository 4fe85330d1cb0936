//! Configuration types for Shutter
//!
//! Provides the runtime session configuration and backend selection.

mod file;

pub use file::{
    BackendSettings, ConfigFile, HotkeySettings, ScreenshotSettings, sample_config,
};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::naming::DEFAULT_TEMPLATE;
use crate::types::Region;

/// Default capture shortcut
pub const DEFAULT_CAPTURE_HOTKEY: &str = "ctrl+shift+s";

/// Which capture backend persists screenshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Run an external screenshot program
    #[default]
    Command,
    /// Forward to a capture host over the IPC socket
    Ipc,
    /// Accept every request without writing anything
    None,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command => write!(f, "command"),
            Self::Ipc => write!(f, "ipc"),
            Self::None => write!(f, "none"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "command" | "cmd" => Ok(Self::Command),
            "ipc" | "host" => Ok(Self::Ipc),
            "none" | "null" => Ok(Self::None),
            _ => Err(format!("Unknown backend: {}", s)),
        }
    }
}

/// Runtime configuration for a capture session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Filename template (`None` = default template)
    pub template: Option<String>,
    /// Include a timestamp in generated names
    pub include_timestamp: bool,
    /// Directory screenshots are written to
    pub directory: PathBuf,
    /// Region captured when the trigger doesn't provide one
    pub region: Option<Region>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            template: None,
            include_timestamp: true,
            directory: default_screenshot_dir(),
            region: None,
        }
    }
}

impl SessionConfig {
    /// Set the filename template
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Enable or disable timestamps in names
    pub fn with_timestamp(mut self, include: bool) -> Self {
        self.include_timestamp = include;
        self
    }

    /// Set the target directory
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Set the default capture region
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Template that will actually be used
    pub fn effective_template(&self) -> &str {
        match self.template.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => DEFAULT_TEMPLATE,
        }
    }

    /// Return warnings for settings that work but are probably unintended
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let template = self.effective_template();

        if !template.contains("{count}") && !template.contains("{timestamp}") {
            warnings.push(format!(
                "Template '{}' has no {{count}} or {{timestamp}} token; repeated captures will get _1, _2 suffixes",
                template
            ));
        }

        if template.contains("{timestamp}") && !self.include_timestamp {
            warnings.push(
                "Template contains {timestamp} but timestamps are disabled; the token will be dropped"
                    .to_string(),
            );
        }

        if template.contains('/') || template.contains('\\') {
            warnings.push(format!(
                "Template '{}' contains a path separator; names may land outside the target directory",
                template
            ));
        }

        warnings
    }
}

/// Default directory for screenshots
///
/// `~/Pictures/Screenshots` where the platform knows a pictures directory.
pub fn default_screenshot_dir() -> PathBuf {
    if let Some(pictures) = dirs::picture_dir() {
        pictures.join("Screenshots")
    } else if let Some(home) = dirs::home_dir() {
        home.join("Screenshots")
    } else {
        PathBuf::from(".")
    }
}
