//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for the identifiers that flow
//! through the pipeline. Each type ensures type safety so a customer id
//! can never be passed where a patient id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Customer identifier newtype wrapper
///
/// Identifies the downstream customer subscribed to a patient's ADT events.
///
/// # Examples
///
/// ```
/// use hiebridge::domain::ids::CustomerId;
/// use std::str::FromStr;
///
/// let cx = CustomerId::from_str("550e8400-e29b-41d4-a716-446655440001").unwrap();
/// assert_eq!(cx.as_str(), "550e8400-e29b-41d4-a716-446655440001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(String);

impl CustomerId {
    /// Creates a new CustomerId from a UUID string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        Uuid::parse_str(id.trim()).map_err(|_| format!("Customer ID is not a UUID: '{id}'"))?;
        Ok(Self(id.trim().to_string()))
    }

    /// Returns the customer ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CustomerId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Patient identifier newtype wrapper
///
/// Identifies one patient in the bridge's own namespace. This is distinct
/// from the partner-local `PatientID` column, which is an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new PatientId from a UUID string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        Uuid::parse_str(id.trim()).map_err(|_| format!("Patient ID is not a UUID: '{id}'"))?;
        Ok(Self(id.trim().to_string()))
    }

    /// Returns the patient ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Composite identifier carried in the partner feed
///
/// Partner rosters carry a single column that packs the customer id and the
/// bridge-side patient id into one value, joined by an underscore. The same
/// composite value is emitted into PID-2 and the first PID-3 repetition so
/// the downstream consumer can route the message.
///
/// Format: `<customer-uuid>_<patient-uuid>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositePatientId {
    /// Customer the patient is subscribed under
    pub customer_id: CustomerId,

    /// Bridge-side patient id
    pub patient_id: PatientId,
}

impl CompositePatientId {
    /// Creates a composite id from its two halves
    pub fn new(customer_id: CustomerId, patient_id: PatientId) -> Self {
        Self {
            customer_id,
            patient_id,
        }
    }

    /// Parses a packed `<customer-uuid>_<patient-uuid>` value
    ///
    /// # Errors
    ///
    /// Returns a description of the malformed part. A row whose composite id
    /// cannot be unpacked is unrecoverable and must be dropped by the caller.
    pub fn unpack(packed: &str) -> Result<Self, String> {
        let packed = packed.trim();
        let (customer, patient) = packed
            .split_once('_')
            .ok_or_else(|| format!("Composite patient ID has no separator: '{packed}'"))?;
        Ok(Self {
            customer_id: CustomerId::new(customer)?,
            patient_id: PatientId::new(patient)?,
        })
    }

    /// Packs the composite id back into its feed representation
    pub fn pack(&self) -> String {
        format!("{}_{}", self.customer_id, self.patient_id)
    }
}

impl fmt::Display for CompositePatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pack())
    }
}

impl FromStr for CompositePatientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::unpack(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CX: &str = "550e8400-e29b-41d4-a716-446655440001";
    const PT: &str = "550e8400-e29b-41d4-a716-446655440002";

    #[test]
    fn test_customer_id_valid() {
        let id = CustomerId::new(CX).unwrap();
        assert_eq!(id.as_str(), CX);
    }

    #[test]
    fn test_customer_id_rejects_non_uuid() {
        assert!(CustomerId::new("not-a-uuid").is_err());
    }

    #[test]
    fn test_composite_roundtrip() {
        let packed = format!("{CX}_{PT}");
        let composite = CompositePatientId::unpack(&packed).unwrap();
        assert_eq!(composite.customer_id.as_str(), CX);
        assert_eq!(composite.patient_id.as_str(), PT);
        assert_eq!(composite.pack(), packed);
    }

    #[test]
    fn test_composite_missing_separator() {
        let err = CompositePatientId::unpack(CX).unwrap_err();
        assert!(err.contains("no separator"));
    }

    #[test]
    fn test_composite_bad_patient_half() {
        let packed = format!("{CX}_garbage");
        assert!(CompositePatientId::unpack(&packed).is_err());
    }
}
