//! Error types for Shutter

use thiserror::Error;

/// Result type alias using ShutterError
pub type Result<T> = std::result::Result<T, ShutterError>;

/// Main error type for Shutter operations
#[derive(Debug, Error)]
pub enum ShutterError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Capture backend could not be used
    #[error("Backend error: {0}")]
    Backend(String),

    /// Host IPC communication error
    #[error("IPC error: {0}")]
    Ipc(String),

    /// Hotkey setup or parsing error
    #[error("Hotkey error: {0}")]
    Hotkey(String),

    /// Region descriptor could not be parsed
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    /// The backend reported a failed capture
    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    /// Another capture is still outstanding
    #[error("A capture is already in progress")]
    CaptureInProgress,

    /// No host process is listening on the IPC socket
    #[error("Capture host is not running")]
    HostUnavailable,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ShutterError>,
    },
}

impl ShutterError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create an IPC error
    pub fn ipc(msg: impl Into<String>) -> Self {
        Self::Ipc(msg.into())
    }

    /// Create a hotkey error
    pub fn hotkey(msg: impl Into<String>) -> Self {
        Self::Hotkey(msg.into())
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// A short suggestion the user can act on, if there is one
    pub fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Config(_) => Some("Check ~/.config/shutter/config.toml or run `shutter config init`"),
            Self::Backend(_) => Some("Make sure the capture program (e.g. grim) is installed and on PATH"),
            Self::Ipc(_) | Self::HostUnavailable => {
                Some("Start the capture host with `shutter host` or switch the backend kind")
            }
            Self::Hotkey(_) => Some("Add your user to the 'input' group to read /dev/input devices"),
            Self::InvalidRegion(_) => Some("Regions use the form X,Y WxH, optionally followed by @SCALE"),
            Self::CaptureInProgress => Some("Wait for the current capture to finish"),
            Self::WithContext { source, .. } => source.user_hint(),
            Self::CaptureFailed(_) | Self::Io(_) => None,
        }
    }

    /// Whether the user can fix this without code changes
    pub fn is_user_recoverable(&self) -> bool {
        match self {
            Self::Config(_)
            | Self::Backend(_)
            | Self::Hotkey(_)
            | Self::InvalidRegion(_)
            | Self::CaptureInProgress
            | Self::HostUnavailable => true,
            Self::WithContext { source, .. } => source.is_user_recoverable(),
            Self::Ipc(_) | Self::CaptureFailed(_) | Self::Io(_) => false,
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl From<toml::de::Error> for ShutterError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("Failed to parse config file: {}", err))
    }
}

impl From<serde_json::Error> for ShutterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Ipc(format!("Malformed message: {}", err))
    }
}
