//! Transient Notifications
//!
//! One toast at a time; a newer message replaces the current one. The UI
//! schedules the auto-dismiss and passes the id back so a stale timer cannot
//! close a newer toast.

use std::cell::{Cell, RefCell};

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            NotificationKind::Success => "alert-success",
            NotificationKind::Error => "alert-error",
            NotificationKind::Info => "alert-info",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Success => "check-circle",
            NotificationKind::Error => "exclamation-circle",
            NotificationKind::Info => "info-circle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Notifier {
    current: RefCell<Option<Notification>>,
    next_id: Cell<u64>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, kind: NotificationKind, message: impl Into<String>) -> Notification {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let notification = Notification {
            id,
            kind,
            message: message.into(),
        };
        *self.current.borrow_mut() = Some(notification.clone());
        notification
    }

    /// Log a failed action and show it as "<action>: <error>"
    pub fn failure(&self, action: &str, err: &ClientError) -> Notification {
        log::error!("{}: {}", action, err);
        self.push(NotificationKind::Error, format!("{}: {}", action, err))
    }

    /// Dismiss `id` if it is still the one showing
    pub fn dismiss(&self, id: u64) -> bool {
        let mut current = self.current.borrow_mut();
        if current.as_ref().map(|n| n.id) == Some(id) {
            *current = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_message_replaces_older() {
        let notifier = Notifier::new();
        let first = notifier.push(NotificationKind::Success, "saved");
        let second = notifier.push(NotificationKind::Error, "failed");

        assert_eq!(second.message, "failed");
        assert!(second.id > first.id);
        // stale timer for the first toast does nothing
        assert!(!notifier.dismiss(first.id));
        assert!(notifier.dismiss(second.id));
        assert!(!notifier.dismiss(second.id));
    }

    #[test]
    fn failure_formats_action_and_error() {
        let notifier = Notifier::new();
        let shown = notifier.failure(
            "Failed to create project",
            &ClientError::Http {
                status: 400,
                message: "Name required".into(),
            },
        );
        assert_eq!(shown.kind, NotificationKind::Error);
        assert_eq!(shown.message, "Failed to create project: Name required");
    }
}
