//! Notification dispatch abstraction

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{NotificationEvent, Result};

/// Channel that delivers converted messages to the downstream consumer
///
/// Delivery must preserve per-patient ordering; implementations key
/// their ordering unit on the event's patient id.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Delivers one event, retrying transient failures per the
    /// implementation's policy
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::HieError::Dispatch`] once the retry
    /// policy is exhausted.
    async fn dispatch(&self, event: &NotificationEvent) -> Result<()>;
}

// Lets callers share one dispatcher between the pipeline and an observer
#[async_trait]
impl<T: NotificationDispatcher> NotificationDispatcher for Arc<T> {
    async fn dispatch(&self, event: &NotificationEvent) -> Result<()> {
        self.as_ref().dispatch(event).await
    }
}
