//! Queue-backed notification dispatcher
//!
//! Sends events to a FIFO queue. The message group id is the patient id,
//! which gives per-patient ordering while letting unrelated patients
//! flow in parallel; the deduplication id is a content hash so a retried
//! run cannot double-deliver an identical event.

use async_trait::async_trait;
use aws_sdk_sqs::Client;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{QueueConfig, RetryConfig};
use crate::domain::{HieError, NotificationEvent, Result};

use super::traits::NotificationDispatcher;

/// Dispatcher delivering events to a FIFO message queue
pub struct SqsDispatcher {
    client: Client,
    queue_url: String,
    retry: RetryConfig,
}

impl SqsDispatcher {
    /// Builds a dispatcher from configuration, loading AWS credentials
    /// from the ambient environment
    pub async fn new(config: &QueueConfig, retry: RetryConfig) -> Self {
        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;
        Self::with_client(Client::new(&shared), config, retry)
    }

    /// Builds a dispatcher around an existing client (used by tests)
    pub fn with_client(client: Client, config: &QueueConfig, retry: RetryConfig) -> Self {
        Self {
            client,
            queue_url: config.url.clone(),
            retry,
        }
    }

    fn backoff_delay(&self, attempt: usize) -> Duration {
        let exp = self.retry.backoff_multiplier.powi(attempt as i32);
        let millis = (self.retry.initial_delay_ms as f64 * exp) as u64;
        Duration::from_millis(millis.min(self.retry.max_delay_ms))
    }
}

/// Content hash used as the FIFO deduplication id
pub fn deduplication_id(body: &str) -> String {
    let digest = Sha256::digest(body.as_bytes());
    format!("{digest:x}")
}

#[async_trait]
impl NotificationDispatcher for SqsDispatcher {
    async fn dispatch(&self, event: &NotificationEvent) -> Result<()> {
        let body = serde_json::to_string(event)?;
        let group_id = event.patient_id.as_str();
        let dedup_id = deduplication_id(&body);

        let mut last_error = String::new();
        let total_attempts = self.retry.max_retries + 1;
        for attempt in 0..total_attempts {
            if attempt > 0 {
                let delay = self.backoff_delay(attempt - 1);
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying notification dispatch"
                );
                tokio::time::sleep(delay).await;
            }

            match self
                .client
                .send_message()
                .queue_url(&self.queue_url)
                .message_body(&body)
                .message_group_id(group_id)
                .message_deduplication_id(&dedup_id)
                .send()
                .await
            {
                Ok(output) => {
                    debug!(
                        patient_id = group_id,
                        message_id = output.message_id().unwrap_or("unknown"),
                        "Dispatched notification"
                    );
                    return Ok(());
                }
                Err(e) => {
                    last_error = e.to_string();
                    warn!(attempt = attempt + 1, error = %last_error, "Notification dispatch failed");
                }
            }
        }

        Err(HieError::Dispatch {
            attempts: total_attempts,
            message: last_error,
        })
    }
}
