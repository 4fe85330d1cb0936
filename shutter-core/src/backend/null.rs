//! No-op backend

use tracing::debug;

use super::CaptureBackend;
use crate::types::{CaptureRequest, CaptureResult};

/// Reports every capture as saved without writing anything
///
/// Useful for dry runs and for hosts that persist images on their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl CaptureBackend for NullBackend {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn capture(&self, request: &CaptureRequest) -> CaptureResult {
        debug!("Null backend accepting {}", request.filename);
        CaptureResult::saved(request.filename.clone())
    }
}
