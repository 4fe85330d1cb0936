//! Capture session
//!
//! Ties naming, the capture backend and user notifications together. A
//! session owns the capture counter and the issued-name set; both start
//! empty and are dropped with the session.
//!
//! ```text
//! ┌──────────────┐    ┌───────────────────┐    ┌────────────────┐
//! │ Trigger      │───▶│ FilenameGenerator │───▶│ CaptureBackend │
//! │ (key/button) │    │ (unique name)     │    │ (host / grim)  │
//! └──────────────┘    └───────────────────┘    └────────────────┘
//! ```

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use crate::backend::CaptureBackend;
use crate::config::SessionConfig;
use crate::error::{Result, ShutterError};
use crate::naming::FilenameGenerator;
use crate::notify::NotificationSink;
use crate::types::{CaptureRequest, Region, SavedCapture, Severity};

/// State that only changes while a capture is being named or completed
#[derive(Debug, Default)]
struct SessionState {
    /// Issued-name set
    names: FilenameGenerator,
    /// Successful captures so far
    captures: u64,
}

/// One running capture session
pub struct CaptureSession<B, N> {
    config: SessionConfig,
    backend: B,
    notifier: N,
    state: Mutex<SessionState>,
    /// Set while a capture is outstanding
    busy: AtomicBool,
}

/// Clears the busy flag when the capture attempt ends
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<B: CaptureBackend, N: NotificationSink> CaptureSession<B, N> {
    /// Create a session with an empty counter and name set
    pub fn new(config: SessionConfig, backend: B, notifier: N) -> Self {
        for warning in config.validate() {
            warn!("{}", warning);
        }

        Self {
            config,
            backend,
            notifier,
            state: Mutex::new(SessionState::default()),
            busy: AtomicBool::new(false),
        }
    }

    /// Capture the configured default region
    pub async fn capture_default(&self) -> Result<SavedCapture> {
        self.capture(self.config.region).await
    }

    /// Capture `region` (or the whole output) and persist it
    ///
    /// Fails with [`ShutterError::CaptureInProgress`] if another capture is
    /// outstanding, and with [`ShutterError::CaptureFailed`] if the backend
    /// reports a failure. A failed capture still consumes its name.
    pub async fn capture(&self, region: Option<Region>) -> Result<SavedCapture> {
        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            self.notifier
                .notify("Screenshot already in progress", Severity::Warning);
            return Err(ShutterError::CaptureInProgress);
        };

        let filename = {
            let mut state = self.state.lock();
            let captures = state.captures;
            state.names.generate(
                self.config.template.as_deref(),
                captures,
                self.config.include_timestamp,
            )
        };

        let request = CaptureRequest {
            region,
            filename,
            directory: self.config.directory.clone(),
        };

        debug!(
            "Capturing {} via {} backend",
            request.filename,
            self.backend.name()
        );
        let result = self.backend.capture(&request).await;

        if !result.success {
            let reason = result
                .error
                .unwrap_or_else(|| "unknown error".to_string());
            self.notifier
                .notify(&format!("Screenshot failed: {}", reason), Severity::Error);
            return Err(ShutterError::CaptureFailed(reason));
        }

        let sequence = {
            let mut state = self.state.lock();
            state.captures += 1;
            state.captures
        };

        let filename = result.filename.unwrap_or(request.filename);
        let path = self.config.directory.join(&filename);

        info!("Screenshot #{} saved to {:?}", sequence, path);
        self.notifier
            .notify(&format!("Screenshot saved: {}", filename), Severity::Success);

        Ok(SavedCapture {
            filename,
            path,
            sequence,
        })
    }

    /// Number of successful captures
    pub fn captures_taken(&self) -> u64 {
        self.state.lock().captures
    }

    /// Number of names handed out, including those of failed captures
    pub fn issued_count(&self) -> usize {
        self.state.lock().names.issued_count()
    }

    /// Whether a capture is outstanding
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
