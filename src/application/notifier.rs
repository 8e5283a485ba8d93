// Notifier - Transient, user-facing error and status messages
use crate::domain::notification::{Notification, NotificationLevel};
use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

const MAX_VISIBLE: usize = 3;
const DISPLAY_SECONDS: i64 = 5;

#[derive(Default)]
struct NotifierState {
    next_id: u64,
    visible: VecDeque<Notification>,
}

#[derive(Clone, Default)]
pub struct Notifier {
    state: Arc<Mutex<NotifierState>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self, message: impl Into<String>) -> Notification {
        self.publish(NotificationLevel::Error, message.into())
    }

    pub fn warning(&self, message: impl Into<String>) -> Notification {
        self.publish(NotificationLevel::Warning, message.into())
    }

    pub fn publish(&self, level: NotificationLevel, message: String) -> Notification {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.next_id += 1;
        let notification = Notification {
            id: state.next_id,
            level,
            message,
            raised_at: Utc::now(),
        };

        // Oldest message makes room once the stack is full
        if state.visible.len() == MAX_VISIBLE {
            state.visible.pop_front();
        }
        state.visible.push_back(notification.clone());
        notification
    }

    pub fn visible(&self) -> Vec<Notification> {
        self.visible_at(Utc::now())
    }

    /// Notifications still on screen at `now`; expired ones are dropped
    pub fn visible_at(&self, now: DateTime<Utc>) -> Vec<Notification> {
        let ttl = Duration::seconds(DISPLAY_SECONDS);
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.visible.retain(|n| now - n.raised_at < ttl);
        state.visible.iter().cloned().collect()
    }
}
