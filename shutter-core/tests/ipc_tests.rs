//! Integration tests for the capture host bridge

mod mocks;

use mocks::MockBackend;
use shutter_core::backend::{CaptureBackend, IpcBackend};
use shutter_core::error::ShutterError;
use shutter_core::ipc::{HostRequest, HostResponse, IpcClient, IpcServer, host_running};
use shutter_core::types::{CaptureRequest, CaptureResult, Region};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::UnixStream;

fn request(name: &str) -> CaptureRequest {
    CaptureRequest {
        region: Some(Region::new(0, 0, 320, 240)),
        filename: name.to_string(),
        directory: PathBuf::from("/tmp/shots"),
    }
}

#[test]
fn test_request_roundtrip() {
    let msg = HostRequest::Capture(request("a.png"));
    let bytes = msg.to_bytes();
    let parsed = HostRequest::from_bytes(&bytes[..bytes.len() - 1]).expect("Should parse");
    assert_eq!(parsed, msg);
}

#[test]
fn test_response_roundtrip() {
    let resp = HostResponse::Captured(CaptureResult::failed("no display"));
    let bytes = resp.to_bytes();
    let parsed = HostResponse::from_bytes(&bytes[..bytes.len() - 1]).expect("Should parse");
    assert_eq!(parsed, resp);
}

#[test]
fn test_unknown_message_rejected() {
    assert!(HostRequest::from_bytes(br#"{"type":"Explode"}"#).is_err());
}

#[tokio::test]
async fn test_client_without_host() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.sock");

    assert!(!host_running(&path).await);
    assert!(matches!(
        IpcClient::connect_to(&path).await,
        Err(ShutterError::HostUnavailable)
    ));

    let result = IpcBackend::with_socket(&path).capture(&request("a.png")).await;
    assert!(!result.success);
    assert!(result.error.is_some());
}

#[tokio::test]
async fn test_capture_through_host() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("host.sock");

    let backend = Arc::new(MockBackend::scripted([
        CaptureResult::saved("first.png"),
        CaptureResult::failed("backend exploded"),
    ]));
    let mut server = IpcServer::with_socket(&path, backend.clone());
    server.start().await.expect("server starts");
    let host = tokio::spawn(async move { server.run().await });

    assert!(host_running(&path).await);

    let ipc = IpcBackend::with_socket(&path);
    let ok = ipc.capture(&request("first.png")).await;
    assert_eq!(ok, CaptureResult::saved("first.png"));

    let failed = ipc.capture(&request("second.png")).await;
    assert!(!failed.success);
    assert_eq!(failed.error.as_deref(), Some("backend exploded"));

    assert_eq!(backend.filenames(), vec!["first.png", "second.png"]);
    assert_eq!(backend.requests()[0].region, Some(Region::new(0, 0, 320, 240)));

    let mut client = IpcClient::connect_to(&path).await.unwrap();
    client.shutdown().await.expect("host acknowledges shutdown");

    host.await.unwrap().expect("host exits cleanly");
    assert!(!path.exists(), "socket removed on drop");
}

#[tokio::test]
async fn test_idle_client_does_not_block_host() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("idle.sock");

    let mut server = IpcServer::with_socket(&path, MockBackend::new())
        .with_idle_timeout(Duration::from_millis(100));
    server.start().await.expect("server starts");
    let host = tokio::spawn(async move { server.run().await });

    // Connected but never sends a request
    let _idle = UnixStream::connect(&path).await.unwrap();

    let mut client = IpcClient::connect_to(&path).await.unwrap();
    let pong = tokio::time::timeout(Duration::from_secs(5), client.ping())
        .await
        .expect("host answers once the idle client is dropped");
    assert!(pong.unwrap());
    drop(client);

    let mut client = IpcClient::connect_to(&path).await.unwrap();
    client.shutdown().await.expect("host acknowledges shutdown");
    host.await.unwrap().expect("host exits cleanly");
}
