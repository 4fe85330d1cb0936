//! Integration tests for the command backend

use shutter_core::backend::{CaptureBackend, CommandBackend, NullBackend};
use shutter_core::types::{CaptureRequest, Region};
use tempfile::TempDir;

#[tokio::test]
async fn test_command_backend_writes_file() {
    let dir = TempDir::new().unwrap();
    let request = CaptureRequest {
        region: None,
        filename: "shot_001.png".to_string(),
        directory: dir.path().join("nested"),
    };

    let backend = CommandBackend::new("touch");
    let result = backend.capture(&request).await;

    assert!(result.success, "touch failed: {:?}", result.error);
    assert_eq!(result.filename.as_deref(), Some("shot_001.png"));
    assert!(request.path().exists());
}

#[tokio::test]
async fn test_command_backend_reports_stderr() {
    let dir = TempDir::new().unwrap();
    let request = CaptureRequest {
        region: Some(Region::new(0, 0, 10, 10)),
        filename: "x.png".to_string(),
        directory: dir.path().to_path_buf(),
    };

    let backend = CommandBackend::new("sh")
        .with_region_args(Vec::<String>::new())
        .with_args(["-c", "echo 'no output selected' >&2; exit 3"]);
    let result = backend.capture(&request).await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("no output selected"));
}

#[tokio::test]
async fn test_command_backend_missing_program() {
    let dir = TempDir::new().unwrap();
    let request = CaptureRequest {
        region: None,
        filename: "x.png".to_string(),
        directory: dir.path().to_path_buf(),
    };

    let result = CommandBackend::new("shutter-no-such-program")
        .capture(&request)
        .await;
    assert!(!result.success);
    assert!(result.error.unwrap().contains("shutter-no-such-program"));
}

#[tokio::test]
async fn test_null_backend_accepts_everything() {
    let request = CaptureRequest {
        region: None,
        filename: "ghost.png".to_string(),
        directory: "/nonexistent".into(),
    };

    let result = NullBackend.capture(&request).await;
    assert!(result.success);
    assert!(!request.path().exists());
}
