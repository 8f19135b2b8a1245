//! In-process notification dispatcher
//!
//! Logs each event and records it in memory. Used for dry runs, local
//! development, and as the assertion point in pipeline tests.

use async_trait::async_trait;
use std::sync::Mutex;
use tracing::info;

use crate::domain::{NotificationEvent, Result};

use super::traits::NotificationDispatcher;

/// Dispatcher that records events instead of sending them anywhere
#[derive(Default)]
pub struct LocalDispatcher {
    events: Mutex<Vec<NotificationEvent>>,
}

impl LocalDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything dispatched so far
    pub fn recorded(&self) -> Vec<NotificationEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl NotificationDispatcher for LocalDispatcher {
    async fn dispatch(&self, event: &NotificationEvent) -> Result<()> {
        info!(
            customer_id = %event.customer_id,
            patient_id = %event.patient_id,
            partner = %event.partner_name,
            "Recorded notification locally"
        );
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
        Ok(())
    }
}
