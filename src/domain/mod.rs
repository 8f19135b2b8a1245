//! Domain models and types for the ingestion bridge.
//!
//! This module contains the core domain models, types, and business rules.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`CustomerId`], [`PatientId`],
//!   [`CompositePatientId`])
//! - **Feed models** ([`IngestionRow`], [`FieldDiagnostic`])
//! - **The message model** ([`ClinicalMessage`], [`Segment`]) with its
//!   1-based wire indexing held behind a reserved slot 0
//! - **The dispatch payload** ([`NotificationEvent`])
//! - **Error types** ([`HieError`], [`RemoteError`], [`ReplicaError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers use the newtype pattern so the two halves of a composite
//! patient id can never be swapped:
//!
//! ```rust
//! use hiebridge::domain::CompositePatientId;
//!
//! let composite = CompositePatientId::unpack(
//!     "550e8400-e29b-41d4-a716-446655440001_550e8400-e29b-41d4-a716-446655440002",
//! ).unwrap();
//! assert_eq!(
//!     composite.patient_id.as_str(),
//!     "550e8400-e29b-41d4-a716-446655440002",
//! );
//! ```

pub mod errors;
pub mod event;
pub mod ids;
pub mod message;
pub mod result;
pub mod row;

// Re-export commonly used types for convenience
pub use errors::{HieError, RemoteError, ReplicaError};
pub use event::NotificationEvent;
pub use ids::{CompositePatientId, CustomerId, PatientId};
pub use message::{ClinicalMessage, Segment};
pub use result::Result;
pub use row::{FieldDiagnostic, IngestionRow};
