//! Validated partner feed row
//!
//! One [`IngestionRow`] is one record from a pipe-separated partner feed
//! after per-field normalization. Normalization never fails a row: each
//! field either carries its canonical value or a documented fallback, and
//! anything suspicious is captured as a [`FieldDiagnostic`] on the row.

use serde::{Deserialize, Serialize};

/// One captured validation finding for a single field
///
/// Diagnostics are advisory: the row is still converted using fallback
/// values. They are aggregated into the run summary for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDiagnostic {
    /// Column name of the offending field (e.g. "PatClass")
    pub field: String,

    /// The raw value as received from the partner
    pub received: String,

    /// The validation rule that was violated
    pub rule: String,
}

impl FieldDiagnostic {
    /// Creates a new diagnostic
    pub fn new(
        field: impl Into<String>,
        received: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            received: received.into(),
            rule: rule.into(),
        }
    }
}

/// One validated record from a partner admission/discharge feed
///
/// Field order mirrors the feed's fixed column order. Every value is a
/// normalized string; empty means the partner sent nothing usable and no
/// fallback applies at this layer (segment builders apply their own
/// positional defaults).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionRow {
    /// Short facility code, used as the assigning authority
    pub facility_abbrev: String,

    /// Facility display name
    pub facility_name: String,

    /// Partner-local visit number
    pub visit_number: String,

    /// Partner-local patient identifier
    pub patient_id: String,

    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,

    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,

    /// Phone as received; reduced to digits at conversion time
    pub primary_phone_number: String,

    pub ssn: String,

    /// Date of birth, 8-digit YYYYMMDD after normalization
    pub date_of_birth: String,

    /// Administrative sex code (table 0001), "U" fallback
    pub sex: String,

    /// Marital status code (table 0002), "U" fallback
    pub marital_status: String,

    /// Admit timestamp as received (digits, up to 14)
    pub admit_date_time: String,

    pub chief_complaint: String,

    pub diagnosis_code: String,
    pub diagnosis_text: String,
    pub diagnosis_coding_system: String,

    /// Free-text "Last, First Middle" clinician names
    pub attending_physician_name: String,
    pub referring_physician_name: String,
    pub admitting_physician_name: String,

    /// Receiving system name announced by the partner
    pub sending_to_system: String,

    /// Packed `<customer-uuid>_<patient-uuid>` cross-reference id
    pub network_patient_id: String,

    /// Discharge timestamp; presence classifies the row as a discharge event
    pub discharge_date_time: String,

    /// ESI triage level, 1-5
    pub emergency_severity_level: String,

    /// Patient class code (table 0004), "U" fallback on unknown input
    pub patient_class: String,

    /// Validation findings captured while normalizing this row
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<FieldDiagnostic>,
}

impl IngestionRow {
    /// True if any field normalization captured a finding
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Records a validation finding against this row
    pub fn add_diagnostic(&mut self, diagnostic: FieldDiagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_starts_clean() {
        let row = IngestionRow::default();
        assert!(!row.has_diagnostics());
    }

    #[test]
    fn test_diagnostics_accumulate() {
        let mut row = IngestionRow::default();
        row.add_diagnostic(FieldDiagnostic::new(
            "PatClass",
            "XYZ",
            "unknown patient class",
        ));
        row.add_diagnostic(FieldDiagnostic::new(
            "MaritalStatus",
            "??",
            "unknown marital status",
        ));
        assert!(row.has_diagnostics());
        assert_eq!(row.diagnostics.len(), 2);
        assert_eq!(row.diagnostics[0].field, "PatClass");
    }

    #[test]
    fn test_diagnostics_skipped_when_empty() {
        let row = IngestionRow::default();
        let json = serde_json::to_string(&row).unwrap();
        assert!(!json.contains("diagnostics"));
    }
}
