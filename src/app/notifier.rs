//! Short-lived status messages.
//!
//! At most one notification is visible. Emitting replaces the current one and
//! restarts the countdown; when the countdown elapses the notification clears
//! itself.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// The visible notification plus the generation that produced it, so a
/// countdown only ever clears its own message.
#[derive(Debug, Default)]
struct Slot {
    current: Option<Notification>,
    generation: u64,
}

pub struct NotificationChannel {
    ttl: Duration,
    slot: Arc<Mutex<Slot>>,
    countdown: Mutex<Option<JoinHandle<()>>>,
}

impl NotificationChannel {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Arc::new(Mutex::new(Slot::default())),
            countdown: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Shows `text`, replacing any current notification, and schedules it to
    /// clear after the channel's duration. Must be called within a tokio
    /// runtime.
    pub async fn emit(&self, text: impl Into<String>) {
        let text = text.into();
        // Held for the whole emit so generations and countdowns stay in step.
        let mut countdown = self.countdown.lock().await;

        let generation = {
            let mut slot = self.slot.lock().await;
            slot.generation += 1;
            slot.current = Some(Notification {
                text: text.clone(),
                created_at: Utc::now(),
            });
            slot.generation
        };
        debug!(%text, generation, "notification emitted");

        let slot = Arc::clone(&self.slot);
        let ttl = self.ttl;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut slot = slot.lock().await;
            if slot.generation == generation {
                slot.current = None;
            }
        });

        if let Some(previous) = countdown.replace(handle) {
            previous.abort();
        }
    }

    /// The visible notification, if any.
    pub async fn current(&self) -> Option<Notification> {
        self.slot.lock().await.current.clone()
    }

    /// Clears the visible notification immediately.
    pub async fn dismiss(&self) {
        if let Some(handle) = self.countdown.lock().await.take() {
            handle.abort();
        }
        self.slot.lock().await.current = None;
    }
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new(Duration::from_secs(crate::infra::config::DEFAULT_NOTIFICATION_SECS))
    }
}
