//! User-facing notifications
//!
//! The session reports capture outcomes through a [`NotificationSink`] so
//! the front end decides how they are shown.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::types::Severity;

/// Receives user feedback messages
pub trait NotificationSink: Send + Sync {
    /// Show a message to the user
    fn notify(&self, message: &str, severity: Severity);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn notify(&self, message: &str, severity: Severity) {
        (**self).notify(message, severity)
    }
}

/// Sends notifications to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Success => info!("{}", message),
            Severity::Warning => warn!("{}", message),
            Severity::Error => error!("{}", message),
        }
    }
}
