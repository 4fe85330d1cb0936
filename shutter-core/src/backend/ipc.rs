//! Backend that forwards captures to a capture host

use std::path::PathBuf;
use tracing::warn;

use super::CaptureBackend;
use crate::ipc::{IpcClient, socket_path};
use crate::types::{CaptureRequest, CaptureResult};

/// Sends each capture to the host listening on a Unix socket
#[derive(Debug, Clone)]
pub struct IpcBackend {
    socket: PathBuf,
}

impl IpcBackend {
    /// Use the default socket path
    pub fn new() -> Self {
        Self::with_socket(socket_path())
    }

    /// Use a specific socket path
    pub fn with_socket(path: impl Into<PathBuf>) -> Self {
        Self {
            socket: path.into(),
        }
    }
}

impl Default for IpcBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for IpcBackend {
    fn name(&self) -> &'static str {
        "ipc"
    }

    async fn capture(&self, request: &CaptureRequest) -> CaptureResult {
        let result = match IpcClient::connect_to(&self.socket).await {
            Ok(mut client) => client.capture(request.clone()).await,
            Err(e) => Err(e),
        };

        result.unwrap_or_else(|e| {
            warn!("Capture host request failed: {}", e);
            CaptureResult::failed(e.to_string())
        })
    }
}
