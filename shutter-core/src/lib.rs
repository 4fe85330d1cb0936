//! Shutter Core Library
//!
//! Template-driven screenshot capture with collision-free file names.
//!
//! This library provides:
//! - Unique file naming from `{timestamp}`/`{count}` templates
//! - A capture session that advances its counter only on success
//! - Pluggable capture backends (external program, IPC host, no-op)
//! - Global keyboard shortcuts via evdev
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │ Hotkey / CLI    │───▶│ CaptureSession   │───▶│ CaptureBackend  │
//! │ (trigger)       │    │ (naming, count)  │    │ (grim / host)   │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod hotkeys;
pub mod ipc;
pub mod naming;
pub mod notify;
pub mod session;
pub mod types;

pub use backend::{AnyBackend, CaptureBackend};
pub use config::{BackendKind, ConfigFile, SessionConfig};
pub use error::{Result, ShutterError};
pub use naming::FilenameGenerator;
pub use notify::{NotificationSink, TracingNotifier};
pub use session::CaptureSession;
pub use types::{CaptureRequest, CaptureResult, Region, SavedCapture, Severity};
