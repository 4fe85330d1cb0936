//! IPC bridge between capture clients and a capture host
//!
//! A host process owns the actual screenshot facility and listens on a Unix
//! socket. Clients send capture requests as newline-delimited JSON and get a
//! [`CaptureResult`](crate::types::CaptureResult) back.

mod client;
mod protocol;
mod server;

pub use client::IpcClient;
pub use protocol::{HostRequest, HostResponse};
pub use server::IpcServer;

use std::path::{Path, PathBuf};

/// Get the default IPC socket path
///
/// Uses XDG_RUNTIME_DIR if available, otherwise /tmp
pub fn socket_path() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(runtime_dir).join("shutter.sock")
    } else {
        // SAFETY: getuid has no preconditions and cannot fail.
        let uid = unsafe { libc::getuid() };
        PathBuf::from(format!("/tmp/shutter-{}.sock", uid))
    }
}

/// Check whether a host is listening and answering pings at `path`
pub async fn host_running(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }

    match IpcClient::connect_to(path).await {
        Ok(mut client) => matches!(client.ping().await, Ok(true)),
        Err(_) => false,
    }
}
