//! CLI command implementations

mod capture;
mod config;
mod host;
mod names;
mod watch;

pub use capture::{CaptureArgs, capture};
pub use config::{ConfigArgs, config};
pub use host::{HostArgs, host};
pub use names::{NamesArgs, names};
pub use watch::{WatchArgs, watch};

use anyhow::{Context, Result};
use clap::Args;
use shutter_core::config::{BackendKind, ConfigFile, SessionConfig};
use shutter_core::notify::NotificationSink;
use shutter_core::types::Severity;
use std::path::PathBuf;

/// Options shared by every command that names or captures screenshots
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Config file to use instead of ~/.config/shutter/config.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Filename template ({timestamp} and {count} are replaced)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Leave the timestamp out of generated names
    #[arg(long)]
    pub no_timestamp: bool,

    /// Directory to write screenshots to
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Capture backend (command, ipc, none)
    #[arg(short, long)]
    pub backend: Option<BackendKind>,
}

impl SessionArgs {
    /// Load the config file and apply command-line overrides
    pub fn load(&self) -> Result<(ConfigFile, SessionConfig)> {
        let mut file = match &self.config {
            Some(path) => ConfigFile::load_from(path.clone())
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => ConfigFile::load_or_default(),
        };

        if let Some(kind) = self.backend {
            file.backend.kind = kind;
        }

        let mut session = file
            .session_config()
            .context("Invalid [screenshot] settings")?;

        if let Some(template) = &self.template {
            session = session.with_template(template.clone());
        }
        if self.no_timestamp {
            session = session.with_timestamp(false);
        }
        if let Some(dir) = &self.dir {
            session = session.with_directory(dir.clone());
        }

        Ok((file, session))
    }
}

/// Prints notifications to the terminal
pub struct TerminalNotifier;

impl NotificationSink for TerminalNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Success => println!("{}", message),
            Severity::Warning | Severity::Error => eprintln!("{}: {}", severity, message),
        }
    }
}
