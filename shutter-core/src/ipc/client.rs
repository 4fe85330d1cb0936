//! IPC client used by capture sessions
//!
//! Connects to the running host to send requests and receive responses.

use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tracing::debug;

use super::protocol::{HostRequest, HostResponse};
use crate::error::{Result, ShutterError};
use crate::types::{CaptureRequest, CaptureResult};

/// Default connection timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default read/write timeout
///
/// Capture involves the host's screenshot program, so this is generous.
const IO_TIMEOUT: Duration = Duration::from_secs(30);

/// IPC client for communicating with the host
pub struct IpcClient {
    stream: UnixStream,
}

impl IpcClient {
    /// Connect to the host on a specific socket
    pub async fn connect_to(path: &Path) -> Result<Self> {
        Self::connect_with_timeout(path, CONNECT_TIMEOUT).await
    }

    /// Connect with a custom timeout
    pub async fn connect_with_timeout(path: &Path, timeout: Duration) -> Result<Self> {
        if !path.exists() {
            return Err(ShutterError::HostUnavailable);
        }

        let stream = tokio::time::timeout(timeout, UnixStream::connect(path))
            .await
            .map_err(|_| ShutterError::ipc("Connection timed out"))?
            .map_err(|e| ShutterError::ipc(format!("Failed to connect to host: {}", e)))?;

        debug!("Connected to capture host at {:?}", path);

        Ok(Self { stream })
    }

    /// Send a request and receive a response with the default timeout
    async fn send(&mut self, msg: HostRequest) -> Result<HostResponse> {
        self.send_with_timeout(msg, IO_TIMEOUT).await
    }

    /// Send a request and receive a response with a custom timeout
    async fn send_with_timeout(
        &mut self,
        msg: HostRequest,
        timeout: Duration,
    ) -> Result<HostResponse> {
        let (reader, mut writer) = self.stream.split();

        let msg_bytes = msg.to_bytes();
        tokio::time::timeout(timeout, writer.write_all(&msg_bytes))
            .await
            .map_err(|_| ShutterError::ipc("Write timed out"))?
            .map_err(|e| ShutterError::ipc(format!("Failed to send request: {}", e)))?;

        let mut reader = BufReader::new(reader);
        let mut line = String::new();
        let read = tokio::time::timeout(timeout, reader.read_line(&mut line))
            .await
            .map_err(|_| ShutterError::ipc("Read timed out"))?
            .map_err(|e| ShutterError::ipc(format!("Failed to read response: {}", e)))?;

        if read == 0 {
            return Err(ShutterError::ipc("Host closed the connection"));
        }

        Ok(HostResponse::from_bytes(line.trim().as_bytes())?)
    }

    /// Ping the host to check if it's alive
    pub async fn ping(&mut self) -> Result<bool> {
        match self.send(HostRequest::Ping).await {
            Ok(HostResponse::Pong) => Ok(true),
            Ok(_) => Ok(false),
            Err(_) => Ok(false),
        }
    }

    /// Ask the host to capture a screenshot
    pub async fn capture(&mut self, request: CaptureRequest) -> Result<CaptureResult> {
        match self.send(HostRequest::Capture(request)).await? {
            HostResponse::Captured(result) => Ok(result),
            HostResponse::Error { message } => Err(ShutterError::Ipc(message)),
            _ => Err(ShutterError::ipc("Unexpected response")),
        }
    }

    /// Ask the host to stop
    pub async fn shutdown(&mut self) -> Result<()> {
        match self.send(HostRequest::Shutdown).await? {
            HostResponse::Stopping => Ok(()),
            HostResponse::Error { message } => Err(ShutterError::Ipc(message)),
            _ => Err(ShutterError::ipc("Unexpected response")),
        }
    }
}
