//! Toast notification sink.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::{error, info};

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
}

/// A delivered notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity
    pub level: NotificationLevel,
    /// User-facing text
    pub message: String,
}

/// Receives user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Deliver a notification.
    fn notify(&self, notification: Notification);

    /// Report a success.
    fn success(&self, message: &str) {
        self.notify(Notification {
            level: NotificationLevel::Success,
            message: message.to_string(),
        });
    }

    /// Report a failure.
    fn error(&self, message: &str) {
        self.notify(Notification {
            level: NotificationLevel::Error,
            message: message.to_string(),
        });
    }
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!(message = %notification.message, "notification"),
            NotificationLevel::Error => error!(message = %notification.message, "notification"),
        }
    }
}

/// Keeps notifications in memory. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    delivered: Arc<RwLock<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications delivered so far, oldest first.
    #[must_use]
    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered
            .read()
            .expect("notification lock poisoned")
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.delivered
            .write()
            .expect("notification lock poisoned")
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_shares_state() {
        let notifier = RecordingNotifier::new();
        let handle = notifier.clone();

        notifier.success("saved");
        notifier.error("failed");

        let delivered = handle.delivered();
        assert_eq!(delivered.len(), 2);
        assert_eq!(delivered[0].level, NotificationLevel::Success);
        assert_eq!(delivered[1].message, "failed");
    }

    #[test]
    fn test_trait_object() {
        let notifier: Box<dyn Notifier> = Box::new(LogNotifier);
        notifier.success("ok");
    }
}
