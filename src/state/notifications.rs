// ============================================================================
// NOTIFICATIONS - Avisos transitorios (toasts) para el usuario
// ============================================================================

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::reactivity::ReactiveState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Cola de notificaciones; la vista las descarta con `dismiss`
#[derive(Clone, Default)]
pub struct Notifications {
    items: ReactiveState<Vec<Notification>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, level: NotificationLevel, message: impl Into<String>) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            created_at: Utc::now(),
        };
        let id = notification.id;
        self.items.update(|items| items.push(notification));
        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.push(NotificationLevel::Success, message)
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.push(NotificationLevel::Info, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> Uuid {
        self.push(NotificationLevel::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.push(NotificationLevel::Error, message)
    }

    pub fn dismiss(&self, id: Uuid) {
        self.items.update(|items| items.retain(|n| n.id != id));
    }

    pub fn clear(&self) {
        self.items.set(Vec::new());
    }

    pub fn all(&self) -> Vec<Notification> {
        self.items.snapshot()
    }

    pub fn last(&self) -> Option<Notification> {
        self.items.with(|items| items.last().cloned())
    }

    pub fn subscribe<F: Fn() + 'static>(&self, callback: F) {
        self.items.subscribe(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismiss_removes_only_the_given_notification() {
        let notifications = Notifications::new();
        let first = notifications.error("Upload failed");
        notifications.success("Imported 3 jobs");

        notifications.dismiss(first);
        let remaining = notifications.all();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].level, NotificationLevel::Success);
    }
}
