//! Partner feed schema and parsing
//!
//! Partner roster files are pipe-separated values with a fixed 29-column
//! layout and an optional header line. Parsing is line oriented: header
//! and blank lines are skipped, every other line becomes one
//! [`IngestionRow`] with per-field normalization applied and findings
//! captured as diagnostics on the row.

pub mod normalize;

use tracing::{debug, warn};

use crate::domain::{FieldDiagnostic, IngestionRow};

use normalize::{
    normalize_date_of_birth, normalize_event_timestamp, normalize_marital_status,
    normalize_patient_class, normalize_severity_level, normalize_sex, require_identifier,
};

/// Fixed column order of the partner feed
pub const FEED_COLUMNS: [&str; 29] = [
    "FacilityAbbrev",
    "FacilityName",
    "VisitNumber",
    "PatientID",
    "LastName",
    "FirstName",
    "MiddleName",
    "StreetAddress",
    "City",
    "State",
    "ZipCode",
    "PrimaryPhoneNumber",
    "SSN",
    "PatientDateofBirth",
    "Gender",
    "MaritalStatus",
    "AdmitDateTime",
    "ChiefComplaint",
    "DiagnosisCode",
    "DiagnosisText",
    "DiagnosisCodingSystem",
    "AttendingPhysicianName",
    "ReferringPhysicianName",
    "AdmittingPhysicianName",
    "SendingToSystem",
    "NetworkPatID",
    "DischargeDateTime",
    "EmergencySeverityLevel",
    "PatClass",
];

/// The canonical header line
pub fn header_line() -> String {
    FEED_COLUMNS.join("|")
}

/// True when the line is the feed header (column names, any casing)
pub fn is_header(line: &str) -> bool {
    let cells: Vec<&str> = line.split('|').map(str::trim).collect();
    cells.len() == FEED_COLUMNS.len()
        && cells
            .iter()
            .zip(FEED_COLUMNS.iter())
            .all(|(cell, column)| cell.eq_ignore_ascii_case(column))
}

/// Parses a whole feed file into validated rows
///
/// Blank lines and header lines are skipped; nothing else is dropped at
/// this layer. Rows with missing identifiers carry diagnostics and are
/// weeded out downstream when the composite id fails to unpack.
pub fn parse_feed(content: &str) -> Vec<IngestionRow> {
    let mut rows = Vec::new();
    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        if is_header(line) {
            debug!(line = index + 1, "Skipping feed header line");
            continue;
        }
        rows.push(parse_row(line, index + 1));
    }
    rows
}

/// Parses and normalizes one feed line
pub fn parse_row(line: &str, line_number: usize) -> IngestionRow {
    let cells: Vec<&str> = line.split('|').map(str::trim).collect();

    let mut diagnostics: Vec<FieldDiagnostic> = Vec::new();
    if cells.len() != FEED_COLUMNS.len() {
        warn!(
            line = line_number,
            columns = cells.len(),
            expected = FEED_COLUMNS.len(),
            "Feed line has unexpected column count"
        );
        diagnostics.push(FieldDiagnostic::new(
            "Row",
            format!("{} columns", cells.len()),
            format!("expected {} columns", FEED_COLUMNS.len()),
        ));
    }

    let cell = |index: usize| cells.get(index).copied().unwrap_or("").to_string();

    let facility_abbrev = cell(0);
    let facility_name = cell(1);
    if facility_abbrev.is_empty() && facility_name.is_empty() {
        diagnostics.push(FieldDiagnostic::new(
            "FacilityAbbrev",
            "",
            "required identifier missing",
        ));
    }

    let mut capture = |normalized: (String, Option<FieldDiagnostic>)| {
        let (value, diagnostic) = normalized;
        if let Some(diagnostic) = diagnostic {
            warn!(
                line = line_number,
                field = %diagnostic.field,
                received = %diagnostic.received,
                rule = %diagnostic.rule,
                "Field failed validation, using fallback"
            );
            diagnostics.push(diagnostic);
        }
        value
    };

    let row = IngestionRow {
        facility_abbrev,
        facility_name,
        visit_number: cell(2),
        patient_id: capture(require_identifier(&cell(3), "PatientID")),
        last_name: cell(4),
        first_name: cell(5),
        middle_name: cell(6),
        street_address: cell(7),
        city: cell(8),
        state: cell(9),
        zip_code: cell(10),
        primary_phone_number: cell(11),
        ssn: cell(12),
        date_of_birth: capture(normalize_date_of_birth(&cell(13))),
        sex: capture(normalize_sex(&cell(14))),
        marital_status: capture(normalize_marital_status(&cell(15))),
        admit_date_time: capture(normalize_event_timestamp(&cell(16), "AdmitDateTime")),
        chief_complaint: cell(17),
        diagnosis_code: cell(18),
        diagnosis_text: cell(19),
        diagnosis_coding_system: cell(20),
        attending_physician_name: cell(21),
        referring_physician_name: cell(22),
        admitting_physician_name: cell(23),
        sending_to_system: cell(24),
        network_patient_id: capture(require_identifier(&cell(25), "NetworkPatID")),
        discharge_date_time: capture(normalize_event_timestamp(&cell(26), "DischargeDateTime")),
        emergency_severity_level: capture(normalize_severity_level(&cell(27))),
        patient_class: capture(normalize_patient_class(&cell(28))),
        diagnostics: Vec::new(),
    };

    IngestionRow {
        diagnostics,
        ..row
    }
}
