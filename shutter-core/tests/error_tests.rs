//! Integration tests for error handling

use shutter_core::error::{ResultExt, ShutterError};

#[test]
fn test_error_context_chaining() {
    let err = ShutterError::backend("grim not found").with_context("Capturing screenshot");

    let msg = format!("{}", err);
    assert!(msg.contains("Capturing screenshot"));
    assert!(msg.contains("grim not found"));
}

#[test]
fn test_context_preserves_hint_and_recoverability() {
    let base = ShutterError::HostUnavailable;
    let hint = base.user_hint();

    let wrapped = base.with_context("Sending capture").with_context("Hotkey handler");
    assert_eq!(wrapped.user_hint(), hint);
    assert!(wrapped.is_user_recoverable());
}

#[test]
fn test_result_ext_context() {
    let result: Result<(), ShutterError> = Err(ShutterError::config("bad template"));
    let err = result.context("Loading config").unwrap_err();
    assert!(err.to_string().starts_with("Loading config: "));
}

#[test]
fn test_user_hints() {
    assert!(ShutterError::config("x").user_hint().unwrap().contains("config.toml"));
    assert!(ShutterError::backend("x").user_hint().unwrap().contains("grim"));
    assert!(ShutterError::hotkey("x").user_hint().unwrap().contains("input"));
    assert!(
        ShutterError::HostUnavailable
            .user_hint()
            .unwrap()
            .contains("shutter host")
    );
    assert!(ShutterError::CaptureFailed("x".into()).user_hint().is_none());
}

#[test]
fn test_user_recoverable() {
    assert!(ShutterError::CaptureInProgress.is_user_recoverable());
    assert!(ShutterError::InvalidRegion("x".into()).is_user_recoverable());
    assert!(!ShutterError::ipc("x").is_user_recoverable());
    assert!(!ShutterError::CaptureFailed("x".into()).is_user_recoverable());
}

#[test]
fn test_error_display_format() {
    assert_eq!(
        ShutterError::CaptureInProgress.to_string(),
        "A capture is already in progress"
    );
    assert_eq!(
        ShutterError::CaptureFailed("disk full".into()).to_string(),
        "Capture failed: disk full"
    );
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let err: ShutterError = io_err.into();
    assert!(err.to_string().contains("I/O error"));
}
