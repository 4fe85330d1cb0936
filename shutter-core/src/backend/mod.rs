//! Capture backends
//!
//! A backend receives a [`CaptureRequest`] and persists the image. Shutter
//! never touches pixels itself: it only needs to know whether the backend
//! succeeded so the capture counter can advance.
//!
//! - [`CommandBackend`] runs an external screenshot program such as grim
//! - [`IpcBackend`] forwards the request to a capture host
//! - [`NullBackend`] accepts everything and writes nothing

mod command;
mod ipc;
mod null;

pub use command::CommandBackend;
pub use ipc::IpcBackend;
pub use null::NullBackend;

use std::future::Future;
use std::sync::Arc;

use crate::config::{BackendKind, BackendSettings};
use crate::error::Result;
use crate::types::{CaptureRequest, CaptureResult};

/// Something that can persist a screenshot
///
/// Failures are reported in the returned [`CaptureResult`], never as an
/// error, so a backend cannot abort the calling session.
pub trait CaptureBackend: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Capture `request.region` into `request.directory/request.filename`
    fn capture(&self, request: &CaptureRequest) -> impl Future<Output = CaptureResult> + Send;
}

impl<B: CaptureBackend> CaptureBackend for Arc<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn capture(&self, request: &CaptureRequest) -> impl Future<Output = CaptureResult> + Send {
        (**self).capture(request)
    }
}

/// Backend chosen at runtime from configuration
#[derive(Debug, Clone)]
pub enum AnyBackend {
    Command(CommandBackend),
    Ipc(IpcBackend),
    Null(NullBackend),
}

impl AnyBackend {
    /// Build the backend described by `settings`
    pub fn from_settings(settings: &BackendSettings) -> Self {
        match settings.kind {
            BackendKind::Command => Self::Command(CommandBackend::from_settings(settings)),
            BackendKind::Ipc => Self::Ipc(match settings.socket_path() {
                Some(path) => IpcBackend::with_socket(path),
                None => IpcBackend::new(),
            }),
            BackendKind::None => Self::Null(NullBackend),
        }
    }

    /// Fail early if this backend cannot work as configured
    pub fn check(&self) -> Result<()> {
        match self {
            Self::Command(b) => b.check(),
            Self::Ipc(_) | Self::Null(_) => Ok(()),
        }
    }

    /// Which kind of backend this is
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Command(_) => BackendKind::Command,
            Self::Ipc(_) => BackendKind::Ipc,
            Self::Null(_) => BackendKind::None,
        }
    }
}

impl CaptureBackend for AnyBackend {
    fn name(&self) -> &'static str {
        match self {
            Self::Command(b) => b.name(),
            Self::Ipc(b) => b.name(),
            Self::Null(b) => b.name(),
        }
    }

    async fn capture(&self, request: &CaptureRequest) -> CaptureResult {
        match self {
            Self::Command(b) => b.capture(request).await,
            Self::Ipc(b) => b.capture(request).await,
            Self::Null(b) => b.capture(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings() {
        let mut settings = BackendSettings::default();
        assert_eq!(AnyBackend::from_settings(&settings).kind(), BackendKind::Command);

        settings.kind = BackendKind::Ipc;
        let backend = AnyBackend::from_settings(&settings);
        assert_eq!(backend.kind(), BackendKind::Ipc);
        assert_eq!(backend.name(), "ipc");

        settings.kind = BackendKind::None;
        assert_eq!(AnyBackend::from_settings(&settings).name(), "none");
    }

    #[test]
    fn test_check_only_applies_to_command() {
        let mut settings = BackendSettings {
            args: Vec::new(),
            ..BackendSettings::default()
        };
        assert!(AnyBackend::from_settings(&settings).check().is_err());

        settings.kind = BackendKind::None;
        assert!(AnyBackend::from_settings(&settings).check().is_ok());
    }
}
