// Transient user-facing notifications (toasts)

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationVariant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Default,
            raised_at: Utc::now(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: NotificationVariant::Destructive,
            ..Self::success(title, description)
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}

/// Notification sink handed to every handler and browser.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Keeps every notification in order; used by tests and previews.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().clone()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.seen.lock().iter().filter(|n| n.is_error()).cloned().collect()
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.seen.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().push(notification);
    }
}

/// Emits notifications as tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            NotificationVariant::Default => {
                info!(title = %notification.title, "{}", notification.description)
            }
            NotificationVariant::Destructive => {
                error!(title = %notification.title, "{}", notification.description)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::success("Saved", "ok"));
        notifier.notify(Notification::error("Error", "nope"));

        let seen = notifier.notifications();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].title, "Saved");
        assert!(!seen[0].is_error());
        assert_eq!(notifier.errors().len(), 1);
        assert_eq!(notifier.last().unwrap().title, "Error");

        notifier.clear();
        assert!(notifier.notifications().is_empty());
    }
}
