//! Notification event handed to the dispatcher
//!
//! One [`NotificationEvent`] wraps one serialized clinical message together
//! with the identifiers the downstream consumer needs for routing. Ownership
//! transfers to the dispatcher on send; events are never persisted by this
//! subsystem.

use crate::domain::ids::{CustomerId, PatientId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One converted message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Customer the patient is subscribed under
    pub customer_id: CustomerId,

    /// Bridge-side patient id; also the per-patient ordering key
    pub patient_id: PatientId,

    /// Serialized clinical message text
    pub message: String,

    /// When the clinical event occurred (UTC, post-normalization)
    pub source_timestamp: DateTime<Utc>,

    /// When this bridge received and converted the row
    pub received_timestamp: DateTime<Utc>,

    /// Display name of the originating HIE partner
    pub partner_name: String,

    /// Replica path of the raw feed file this event came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_file_reference: Option<String>,
}
