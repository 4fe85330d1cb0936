//! Mock infrastructure for testing
//!
//! Provides a scripted capture backend and a notification sink that keeps
//! everything it is told.

#![allow(dead_code)]

use parking_lot::Mutex;
use shutter_core::backend::CaptureBackend;
use shutter_core::notify::NotificationSink;
use shutter_core::types::{CaptureRequest, CaptureResult, Severity};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;

/// Backend that records requests and replays scripted results
///
/// When the script runs out every capture succeeds.
#[derive(Default)]
pub struct MockBackend {
    requests: Mutex<Vec<CaptureRequest>>,
    script: Mutex<VecDeque<CaptureResult>>,
    gate: Option<Arc<Notify>>,
}

impl MockBackend {
    /// Backend where every capture succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that returns `results` in order, then succeeds
    pub fn scripted(results: impl IntoIterator<Item = CaptureResult>) -> Self {
        Self {
            script: Mutex::new(results.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Backend whose captures wait until `gate` is notified
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<CaptureRequest> {
        self.requests.lock().clone()
    }

    /// File names requested so far
    pub fn filenames(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.filename.clone()).collect()
    }
}

impl CaptureBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn capture(&self, request: &CaptureRequest) -> CaptureResult {
        self.requests.lock().push(request.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let scripted = self.script.lock().pop_front();
        scripted.unwrap_or_else(|| CaptureResult {
            success: true,
            filename: None,
            error: None,
        })
    }
}

/// Notification sink that stores every message
#[derive(Default)]
pub struct CollectingNotifier {
    messages: Mutex<Vec<(String, Severity)>>,
}

impl CollectingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Everything received so far
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.lock().clone()
    }

    /// Severity of the most recent message
    pub fn last_severity(&self) -> Option<Severity> {
        self.messages.lock().last().map(|(_, s)| *s)
    }
}

impl NotificationSink for CollectingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages.lock().push((message.to_string(), severity));
    }
}
