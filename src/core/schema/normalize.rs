//! Per-field normalization rules
//!
//! Each normalizer returns the canonical value plus an optional
//! diagnostic. Normalization never rejects a row: coded fields fall back
//! to "U" (unknown) and free text passes through, so one sloppy column
//! cannot suppress an admission event.

use crate::core::datetime::{to_wire_date, to_wire_timestamp};
use crate::domain::FieldDiagnostic;

/// Outcome of normalizing one field
pub type Normalized = (String, Option<FieldDiagnostic>);

fn ok(value: impl Into<String>) -> Normalized {
    (value.into(), None)
}

fn fallback(value: &str, field: &str, received: &str, rule: &str) -> Normalized {
    (
        value.to_string(),
        Some(FieldDiagnostic::new(field, received, rule)),
    )
}

/// Administrative sex, table 0001 codes with common spelled-out synonyms
pub fn normalize_sex(raw: &str) -> Normalized {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ok("");
    }
    let upper = trimmed.to_uppercase();
    match upper.as_str() {
        "F" | "M" | "O" | "U" | "A" | "N" => ok(upper),
        "FEMALE" => ok("F"),
        "MALE" => ok("M"),
        "OTHER" => ok("O"),
        "UNKNOWN" => ok("U"),
        "AMBIGUOUS" => ok("A"),
        _ => fallback("U", "Gender", trimmed, "not a table 0001 code"),
    }
}

/// Marital status, table 0002 codes with common spelled-out synonyms
pub fn normalize_marital_status(raw: &str) -> Normalized {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ok("");
    }
    let upper = trimmed.to_uppercase();
    match upper.as_str() {
        "A" | "B" | "C" | "D" | "E" | "G" | "I" | "M" | "N" | "O" | "P" | "R" | "S" | "T"
        | "U" | "W" => ok(upper),
        "MARRIED" => ok("M"),
        "SINGLE" | "NEVER MARRIED" => ok("S"),
        "DIVORCED" => ok("D"),
        "WIDOWED" | "WIDOW" | "WIDOWER" => ok("W"),
        "SEPARATED" => ok("A"),
        "COMMON LAW" => ok("C"),
        "DOMESTIC PARTNER" | "PARTNER" => ok("T"),
        "UNKNOWN" => ok("U"),
        _ => fallback("U", "MaritalStatus", trimmed, "not a table 0002 code"),
    }
}

/// Patient class, table 0004 codes with common spelled-out synonyms
///
/// Unknown input falls back to "U" so the visit still flows downstream.
pub fn normalize_patient_class(raw: &str) -> Normalized {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ok("");
    }
    let upper = trimmed.to_uppercase();
    match upper.as_str() {
        "B" | "C" | "E" | "I" | "N" | "O" | "P" | "R" | "U" => ok(upper),
        "EMERGENCY" | "EMER" | "ER" => ok("E"),
        "INPATIENT" => ok("I"),
        "OUTPATIENT" => ok("O"),
        "PREADMIT" => ok("P"),
        "RECURRING" | "RECURRING PATIENT" => ok("R"),
        "OBSTETRICS" => ok("B"),
        "UNKNOWN" => ok("U"),
        _ => fallback("U", "PatClass", trimmed, "not a table 0004 code"),
    }
}

/// Date of birth, canonicalized to 8-digit YYYYMMDD
pub fn normalize_date_of_birth(raw: &str) -> Normalized {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ok("");
    }
    let wire = to_wire_date(trimmed);
    if wire.is_empty() {
        fallback(trimmed, "PatientDateofBirth", trimmed, "unparseable date")
    } else {
        ok(wire)
    }
}

/// Event timestamp, canonicalized to 14-digit YYYYMMDDHHMMSS
///
/// The raw value is kept when it fails to parse so the original survives
/// into the replica and the diagnostic report.
pub fn normalize_event_timestamp(raw: &str, field: &str) -> Normalized {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ok("");
    }
    let wire = to_wire_timestamp(trimmed);
    if wire.is_empty() {
        fallback(trimmed, field, trimmed, "unparseable timestamp")
    } else {
        ok(wire)
    }
}

/// ESI triage level, digits 1 through 5
pub fn normalize_severity_level(raw: &str) -> Normalized {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ok("");
    }
    match trimmed {
        "1" | "2" | "3" | "4" | "5" => ok(trimmed),
        _ => fallback(
            trimmed,
            "EmergencySeverityLevel",
            trimmed,
            "not an ESI level 1-5",
        ),
    }
}

/// Checks a hard-required identifier column
pub fn require_identifier(raw: &str, field: &str) -> Normalized {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        fallback("", field, "", "required identifier missing")
    } else {
        ok(trimmed)
    }
}
