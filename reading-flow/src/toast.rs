use crate::capabilities::Notifier;
use chrono::{DateTime, Utc};
use fortune_core::{ErrorExt, Observable};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Transient confirmations. Every toast is removed by its own timer task
/// once `duration` has elapsed.
#[derive(Clone)]
pub struct ToastCenter {
    toasts: Observable<Vec<Toast>>,
    duration: Duration,
    notifier: Option<Arc<dyn Notifier>>,
}

impl ToastCenter {
    pub fn new(duration: Duration, notifier: Option<Arc<dyn Notifier>>) -> Self {
        Self {
            toasts: Observable::new(Vec::new()),
            duration,
            notifier,
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn show(&self, message: impl Into<String>) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            message: message.into(),
            created_at: Utc::now(),
        };
        let id = toast.id;
        debug!("Toast {}: {}", id, toast.message);

        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.notify(&toast.message, self.duration) {
                warn!("Notifier failed: {}", e.user_friendly_message());
            }
        }

        self.toasts.update(|toasts| toasts.push(toast));

        let toasts = self.toasts.clone();
        let duration = self.duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            toasts.update(|toasts| toasts.retain(|t| t.id != id));
        });

        id
    }

    pub fn active(&self) -> Vec<Toast> {
        self.toasts.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.toasts.subscribe()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}
