//! IPC server run by the capture host
//!
//! Listens on a Unix socket and serves capture requests through a backend.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, info, warn};

use super::protocol::{HostRequest, HostResponse};
use crate::backend::CaptureBackend;
use crate::error::{Result, ShutterError};

/// How long `accept_one` waits before giving the caller a chance to stop
const ACCEPT_POLL: Duration = Duration::from_millis(100);

/// How long a connected client may stay silent before it is dropped
const CLIENT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// IPC server that handles client connections
pub struct IpcServer<B> {
    /// Path to the Unix socket
    socket_path: PathBuf,
    /// Listener for incoming connections
    listener: Option<UnixListener>,
    /// Backend that performs captures
    backend: B,
    /// Silence allowed between requests on one connection
    idle_timeout: Duration,
}

impl<B: CaptureBackend> IpcServer<B> {
    /// Create a server on the default socket path
    pub fn new(backend: B) -> Self {
        Self::with_socket(super::socket_path(), backend)
    }

    /// Create a server on a specific socket path
    pub fn with_socket(path: impl Into<PathBuf>, backend: B) -> Self {
        Self {
            socket_path: path.into(),
            listener: None,
            backend,
            idle_timeout: CLIENT_IDLE_TIMEOUT,
        }
    }

    /// Drop clients that send nothing for `timeout`
    ///
    /// Connections are served one at a time, so an idle client would
    /// otherwise hold up every other caller.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Socket this server listens on
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Start listening for connections
    pub async fn start(&mut self) -> Result<()> {
        // Remove a stale socket left by a previous host
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path).map_err(|e| {
                ShutterError::ipc(format!("Failed to remove old socket: {}", e))
            })?;
        }

        if let Some(parent) = self.socket_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ShutterError::ipc(format!("Failed to create socket directory: {}", e))
                })?;
            }
        }

        let listener = UnixListener::bind(&self.socket_path).map_err(|e| {
            ShutterError::ipc(format!(
                "Failed to bind socket at {:?}: {}",
                self.socket_path, e
            ))
        })?;

        // Owner-only: other users must not be able to write into our directories
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&self.socket_path, permissions).map_err(|e| {
            ShutterError::ipc(format!("Failed to set socket permissions: {}", e))
        })?;

        info!(
            "Capture host listening on {:?} ({} backend)",
            self.socket_path,
            self.backend.name()
        );
        self.listener = Some(listener);

        Ok(())
    }

    /// Accept and handle one connection
    ///
    /// Returns true if the server should continue, false if it should shut down
    pub async fn accept_one(&self) -> Result<bool> {
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| ShutterError::ipc("Server not started"))?;

        let (stream, _addr) = match tokio::time::timeout(ACCEPT_POLL, listener.accept()).await {
            Ok(Ok(accepted)) => accepted,
            Ok(Err(e)) => {
                error!("Failed to accept connection: {}", e);
                return Ok(true);
            }
            Err(_) => return Ok(true),
        };

        debug!("IPC client connected");

        Ok(self.handle_connection(stream).await)
    }

    /// Serve connections until a client asks the host to shut down
    pub async fn run(&self) -> Result<()> {
        while self.accept_one().await? {}
        info!("Capture host shutting down");
        Ok(())
    }

    /// Handle a client connection
    ///
    /// Returns true if server should continue, false if it should shut down
    async fn handle_connection(&self, stream: UnixStream) -> bool {
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        let mut line = String::new();

        loop {
            line.clear();
            let read = tokio::time::timeout(self.idle_timeout, reader.read_line(&mut line)).await;
            let Ok(read) = read else {
                warn!("Dropping IPC client idle for {:?}", self.idle_timeout);
                return true;
            };

            match read {
                Ok(0) => {
                    debug!("IPC client disconnected");
                    return true;
                }
                Ok(_) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match HostRequest::from_bytes(trimmed.as_bytes()) {
                        Ok(msg) => {
                            let (response, should_stop) = self.handle_message(msg).await;

                            if let Err(e) = writer.write_all(&response.to_bytes()).await {
                                error!("Failed to send IPC response: {}", e);
                                return true;
                            }

                            if should_stop {
                                return false;
                            }
                        }
                        Err(e) => {
                            warn!("Invalid IPC message: {}", e);
                            let response = HostResponse::error(format!("Invalid message: {}", e));
                            let _ = writer.write_all(&response.to_bytes()).await;
                        }
                    }
                }
                Err(e) => {
                    error!("Error reading from IPC client: {}", e);
                    return true;
                }
            }
        }
    }

    /// Handle an IPC message
    ///
    /// Returns (response, should_stop)
    async fn handle_message(&self, msg: HostRequest) -> (HostResponse, bool) {
        match msg {
            HostRequest::Ping => (HostResponse::Pong, false),
            HostRequest::Capture(request) => {
                debug!("Capture requested: {}", request.filename);
                let result = self.backend.capture(&request).await;
                if !result.success {
                    warn!(
                        "Capture of {} failed: {}",
                        request.filename,
                        result.error.as_deref().unwrap_or("unknown error")
                    );
                }
                (HostResponse::Captured(result), false)
            }
            HostRequest::Shutdown => {
                info!("Received shutdown request via IPC");
                (HostResponse::Stopping, true)
            }
        }
    }

    /// Clean up the socket file
    pub fn cleanup(&self) {
        if self.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.socket_path) {
                warn!("Failed to remove socket file: {}", e);
            } else {
                debug!("Removed socket file {:?}", self.socket_path);
            }
        }
    }
}

impl<B> Drop for IpcServer<B> {
    fn drop(&mut self) {
        if self.listener.is_some() && self.socket_path.exists() {
            let _ = std::fs::remove_file(&self.socket_path);
        }
    }
}
