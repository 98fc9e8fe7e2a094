//! User-facing notifications (toast-style success/error messages)

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Fire-and-forget sink for success and error messages
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify_success(&self, message: &str);
    fn notify_error(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub raised_at: Instant,
}

/// Bounded queue of recent notifications, read by the status bar
#[derive(Debug)]
pub struct NotificationQueue {
    items: Mutex<VecDeque<Notification>>,
    limit: usize,
}

impl NotificationQueue {
    pub fn new(limit: usize) -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            limit: limit.max(1),
        }
    }

    fn push(&self, kind: NotificationKind, message: &str) {
        let Ok(mut items) = self.items.lock() else {
            return;
        };
        items.push_back(Notification {
            kind,
            message: message.to_string(),
            raised_at: Instant::now(),
        });
        while items.len() > self.limit {
            items.pop_front();
        }
    }

    /// Most recent notification still younger than `ttl`
    pub fn current(&self, ttl: Duration) -> Option<Notification> {
        let items = self.items.lock().ok()?;
        items
            .back()
            .filter(|n| n.raised_at.elapsed() < ttl)
            .cloned()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Vec<Notification> {
        self.items
            .lock()
            .map(|items| items.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(20)
    }
}

impl Notifier for NotificationQueue {
    fn notify_success(&self, message: &str) {
        tracing::info!("{message}");
        self.push(NotificationKind::Success, message);
    }

    fn notify_error(&self, message: &str) {
        tracing::warn!("{message}");
        self.push(NotificationKind::Error, message);
    }
}
