//! IPC protocol definitions
//!
//! Defines the message types exchanged between capture clients and the host.

use serde::{Deserialize, Serialize};

use crate::types::{CaptureRequest, CaptureResult};

/// Messages a client sends to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostRequest {
    /// Check if the host is alive
    Ping,
    /// Capture a screenshot
    Capture(CaptureRequest),
    /// Stop the host gracefully
    Shutdown,
}

/// Responses from the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostResponse {
    /// Pong response to ping
    Pong,
    /// Outcome of a capture request
    Captured(CaptureResult),
    /// Shutdown acknowledgment
    Stopping,
    /// Error response
    Error { message: String },
}

impl HostRequest {
    /// Serialize message to JSON bytes with newline terminator
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = serde_json::to_vec(self).unwrap_or_default();
        bytes.push(b'\n');
        bytes
    }

    /// Deserialize message from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

impl HostResponse {
    /// Serialize response to JSON bytes with newline terminator
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = serde_json::to_vec(self).unwrap_or_default();
        bytes.push(b'\n');
        bytes
    }

    /// Deserialize response from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        HostResponse::Error {
            message: message.into(),
        }
    }
}
