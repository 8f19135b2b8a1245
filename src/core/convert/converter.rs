//! PSV row to ADT message conversion
//!
//! Builds one ADT message (A01 admit or A03 discharge) per feed row.
//! Segment layout follows v2.5.1: MSH, EVN, PID, PV1, PV2, DG1 in every
//! message; PV2 and DG1 keep their set-id and type fields even when the
//! row carries no visit detail or diagnosis.
//!
//! Field indices follow the crate-wide 1-based convention where MSH
//! field 1 is the encoding characters (the field separator itself is
//! implicit in the wire rendering).

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::core::datetime::{parse_flexible, to_wire_date, to_wire_timestamp, WIRE_TIMESTAMP_FORMAT};
use crate::domain::{ClinicalMessage, CompositePatientId, HieError, IngestionRow, Result, Segment};

use super::escape::{digits_only, escape_text, extract_timestamp};

/// Version carried in MSH-12
pub const HL7_VERSION: &str = "2.5.1";

/// Application identifier carried in MSH-3
pub const SENDING_APPLICATION: &str = "HIEGATE";

/// Receiving application/facility when the row does not name one
pub const DEFAULT_RECEIVING_APPLICATION: &str = "GATEWAY";

const ENCODING_CHARACTERS: &str = "^~\\&";
const PROCESSING_ID: &str = "P";

/// ADT trigger event derived from the row
///
/// A row with a discharge timestamp produces a discharge message,
/// everything else is treated as an admit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    Admit,
    Discharge,
}

impl TriggerEvent {
    pub fn code(&self) -> &'static str {
        match self {
            TriggerEvent::Admit => "A01",
            TriggerEvent::Discharge => "A03",
        }
    }

    /// MSH-9 message type value, e.g. `ADT^A01^ADT_A01`
    pub fn message_type(&self) -> String {
        format!("ADT^{code}^ADT_{code}", code = self.code())
    }

    pub fn for_row(row: &IngestionRow) -> Self {
        if row.discharge_date_time.trim().is_empty() {
            TriggerEvent::Admit
        } else {
            TriggerEvent::Discharge
        }
    }
}

/// Converts normalized feed rows into ADT messages
pub struct AdtConverter {
    timezone: Tz,
    fixed_message_time: Option<NaiveDateTime>,
}

impl AdtConverter {
    /// Creates a converter stamping messages in the partner's timezone
    pub fn new(timezone: Tz) -> Self {
        Self {
            timezone,
            fixed_message_time: None,
        }
    }

    /// Pins the MSH message time instead of reading the wall clock
    pub fn with_fixed_message_time(timezone: Tz, at: NaiveDateTime) -> Self {
        Self {
            timezone,
            fixed_message_time: Some(at),
        }
    }

    /// Builds the ADT message for one row
    pub fn convert(&self, row: &IngestionRow) -> ClinicalMessage {
        let event = TriggerEvent::for_row(row);
        let message_time = self.message_time();

        let mut message = ClinicalMessage::new();
        message.push(self.build_msh(row, event, &message_time));
        message.push(self.build_evn(row, event, &message_time));
        message.push(self.build_pid(row));
        message.push(self.build_pv1(row, event));
        message.push(self.build_pv2(row));
        message.push(self.build_dg1(row, event));

        message
    }

    fn message_time(&self) -> String {
        let now = match self.fixed_message_time {
            Some(at) => at,
            None => Utc::now().with_timezone(&self.timezone).naive_local(),
        };
        now.format(WIRE_TIMESTAMP_FORMAT).to_string()
    }

    /// Event timestamp used for EVN-6, DG1-5 and the control id:
    /// discharge time for discharge messages, admit time otherwise
    fn event_timestamp(row: &IngestionRow, event: TriggerEvent) -> String {
        match event {
            TriggerEvent::Discharge => to_wire_timestamp(&row.discharge_date_time),
            TriggerEvent::Admit => to_wire_timestamp(&row.admit_date_time),
        }
    }

    fn build_msh(&self, row: &IngestionRow, event: TriggerEvent, message_time: &str) -> Segment {
        let facility = first_non_empty(&[&row.facility_name, &row.facility_abbrev]);
        let receiving = first_non_empty(&[&row.sending_to_system, DEFAULT_RECEIVING_APPLICATION]);

        let mut event_time = Self::event_timestamp(row, event);
        if event_time.is_empty() {
            event_time = message_time.to_string();
        }
        let control_base = first_non_empty(&[
            &row.visit_number,
            &row.patient_id,
            &row.network_patient_id,
            "NA",
        ]);

        let mut msh = Segment::new("MSH");
        msh.set_field(1, ENCODING_CHARACTERS);
        msh.set_field(2, SENDING_APPLICATION);
        msh.set_field(3, &escape_text(&facility));
        msh.set_field(4, &escape_text(&receiving));
        msh.set_field(5, &escape_text(&receiving));
        msh.set_field(6, message_time);
        msh.set_field(8, &event.message_type());
        msh.set_field(9, &format!("{control_base}_{event_time}"));
        msh.set_field(10, PROCESSING_ID);
        msh.set_field(11, HL7_VERSION);
        msh
    }

    fn build_evn(&self, row: &IngestionRow, event: TriggerEvent, message_time: &str) -> Segment {
        let occurred = {
            let ts = Self::event_timestamp(row, event);
            if ts.is_empty() {
                message_time.to_string()
            } else {
                ts
            }
        };
        let facility = first_non_empty(&[&row.facility_name, &row.facility_abbrev]);

        let mut evn = Segment::new("EVN");
        evn.set_field(1, event.code());
        evn.set_field(2, message_time);
        evn.set_field(6, &occurred);
        evn.set_field(7, &escape_text(&facility));
        evn
    }

    fn build_pid(&self, row: &IngestionRow) -> Segment {
        let authority = first_non_empty(&[&row.facility_abbrev, &row.facility_name]);

        let mut identifiers = Vec::new();
        if !row.network_patient_id.trim().is_empty() {
            identifiers.push(format!(
                "{}^^^{}",
                escape_text(row.network_patient_id.trim()),
                escape_text(&authority)
            ));
        }
        if !row.patient_id.trim().is_empty() {
            identifiers.push(format!(
                "{}^^^{}",
                escape_text(row.patient_id.trim()),
                escape_text(&authority)
            ));
        }

        let mut pid = Segment::new("PID");
        pid.set_field(1, "1");
        pid.set_field(2, &escape_text(row.network_patient_id.trim()));
        pid.set_field(3, &identifiers.join("~"));
        pid.set_field(
            5,
            &join_components(&[
                escape_text(&row.last_name),
                escape_text(&row.first_name),
                escape_text(&row.middle_name),
            ]),
        );
        pid.set_field(7, &to_wire_date(&row.date_of_birth));
        pid.set_field(8, &first_non_empty(&[&row.sex, "U"]));
        pid.set_field(
            11,
            &join_components(&[
                escape_text(&row.street_address),
                String::new(),
                escape_text(&row.city),
                escape_text(&row.state),
                escape_text(&row.zip_code),
            ]),
        );
        pid.set_field(13, &build_phone(&row.primary_phone_number));
        pid.set_field(16, &escape_text(&row.marital_status));
        pid.set_field(19, &escape_text(&row.ssn));
        pid
    }

    fn build_pv1(&self, row: &IngestionRow, event: TriggerEvent) -> Segment {
        let facility = first_non_empty(&[&row.facility_name, &row.facility_abbrev]);
        let abbrev = first_non_empty(&[&row.facility_abbrev, &row.facility_name]);
        let patient_class = first_non_empty(&[&row.patient_class, "O"]);
        let emergency = is_emergency(row);
        let sending_to = first_non_empty(&[&row.sending_to_system, DEFAULT_RECEIVING_APPLICATION]);

        let mut pv1 = Segment::new("PV1");
        pv1.set_field(1, "1");
        pv1.set_field(2, &patient_class);
        pv1.set_field(3, &format!("^^^{}", escape_text(&facility)));
        pv1.set_field(4, if emergency { "E" } else { "R" });
        pv1.set_field(7, &build_physician(&row.attending_physician_name));
        pv1.set_field(8, &build_physician(&row.referring_physician_name));
        if emergency {
            pv1.set_field(10, "EMER");
        }
        pv1.set_field(17, &build_physician(&row.admitting_physician_name));
        pv1.set_field(18, &patient_class);
        if !row.visit_number.trim().is_empty() {
            pv1.set_field(
                19,
                &format!(
                    "{}^^^{}^VN",
                    escape_text(row.visit_number.trim()),
                    escape_text(&sending_to)
                ),
            );
        }
        pv1.set_field(39, &escape_text(&abbrev));
        pv1.set_field(44, &extract_timestamp(&to_wire_timestamp(&row.admit_date_time)));
        if event == TriggerEvent::Discharge {
            pv1.set_field(
                45,
                &extract_timestamp(&to_wire_timestamp(&row.discharge_date_time)),
            );
        }
        pv1
    }

    fn build_pv2(&self, row: &IngestionRow) -> Segment {
        let diagnosis = build_cwe(
            &row.diagnosis_code,
            &row.diagnosis_text,
            &row.diagnosis_coding_system,
        );
        let admit = to_wire_timestamp(&row.admit_date_time);
        let discharge = to_wire_timestamp(&row.discharge_date_time);
        let stay = length_of_stay(&row.admit_date_time, &row.discharge_date_time);
        let complaint = escape_text(&row.chief_complaint);
        let esi = row.emergency_severity_level.trim();

        let mut pv2 = Segment::new("PV2");
        pv2.set_field(3, &diagnosis);
        pv2.set_field(8, &admit);
        pv2.set_field(9, &discharge);
        pv2.set_field(11, &stay);
        pv2.set_field(12, &complaint);
        pv2.set_field(23, &escape_text(&row.facility_name));
        if !row.patient_class.trim().is_empty() {
            pv2.set_field(24, &row.patient_class);
        }
        if !esi.is_empty() {
            pv2.set_field(40, &build_cwe(esi, "ESI triage level", "ESI"));
        }
        pv2
    }

    fn build_dg1(&self, row: &IngestionRow, event: TriggerEvent) -> Segment {
        let mut dg1 = Segment::new("DG1");
        dg1.set_field(1, "1");
        dg1.set_field(
            3,
            &build_cwe(
                &row.diagnosis_code,
                &row.diagnosis_text,
                &row.diagnosis_coding_system,
            ),
        );
        dg1.set_field(4, &escape_text(&row.diagnosis_text));
        dg1.set_field(5, &Self::event_timestamp(row, event));
        // Final diagnosis on discharge, admitting diagnosis otherwise
        dg1.set_field(
            6,
            match event {
                TriggerEvent::Discharge => "F",
                TriggerEvent::Admit => "A",
            },
        );
        dg1.set_field(15, "1");
        dg1
    }
}

/// Reads the composite patient identifier a converted message was built
/// around, from PID-2
///
/// # Errors
///
/// Returns [`HieError::RowValidation`] when the field is missing or not
/// in `<customer-uuid>_<patient-uuid>` form.
pub fn extract_composite_id(message: &ClinicalMessage) -> Result<CompositePatientId> {
    let pid = message
        .segment("PID")
        .ok_or_else(|| HieError::RowValidation {
            field: "PID".to_string(),
            received: String::new(),
            rule: "message has no PID segment".to_string(),
        })?;
    let raw = pid.field(2).unwrap_or("").to_string();
    CompositePatientId::unpack(&raw).map_err(|rule| HieError::RowValidation {
        field: "PID-2".to_string(),
        received: raw,
        rule,
    })
}

fn first_non_empty(candidates: &[&str]) -> String {
    candidates
        .iter()
        .map(|c| c.trim())
        .find(|c| !c.is_empty())
        .unwrap_or("")
        .to_string()
}

/// Joins components with `^`, dropping trailing empties
fn join_components(parts: &[String]) -> String {
    let last = parts
        .iter()
        .rposition(|p| !p.is_empty())
        .map(|i| i + 1)
        .unwrap_or(0);
    parts[..last].join("^")
}

/// XTN phone value: `^PRN^PH^^^^<digits>`, empty when no digits survive
fn build_phone(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.is_empty() {
        String::new()
    } else {
        format!("^PRN^PH^^^^{digits}")
    }
}

/// XCN physician value from a display name
///
/// `"Dr. Howser, Doogie R"` becomes `^Howser^Doogie^R^^Dr.`. A name
/// without a comma is treated as a bare family name.
fn build_physician(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let (prefix, rest) = if let Some(rest) = trimmed.strip_prefix("Dr. ") {
        ("Dr.", rest.trim())
    } else if let Some(rest) = trimmed.strip_prefix("Dr ") {
        ("Dr.", rest.trim())
    } else {
        ("", trimmed)
    };

    let (family, given_part) = match rest.split_once(',') {
        Some((family, given)) => (family.trim(), given.trim()),
        None => (rest, ""),
    };
    let mut given_words = given_part.split_whitespace();
    let given = given_words.next().unwrap_or("");
    let middle = given_words.collect::<Vec<_>>().join(" ");

    join_components(&[
        String::new(),
        escape_text(family),
        escape_text(given),
        escape_text(&middle),
        String::new(),
        prefix.to_string(),
    ])
}

/// CWE coded value: `code^text^coding system`, trailing empties dropped
fn build_cwe(code: &str, text: &str, system: &str) -> String {
    join_components(&[
        escape_text(code.trim()),
        escape_text(text.trim()),
        escape_text(system.trim()),
    ])
}

/// Length of stay in whole days, rounded; empty when either endpoint is
/// missing or the interval is negative
fn length_of_stay(admit: &str, discharge: &str) -> String {
    let (Some(admitted), Some(discharged)) = (parse_flexible(admit), parse_flexible(discharge))
    else {
        return String::new();
    };
    let seconds = (discharged - admitted).num_seconds();
    if seconds < 0 {
        return String::new();
    }
    let days = (seconds as f64 / 86_400.0).round() as i64;
    days.to_string()
}

fn is_emergency(row: &IngestionRow) -> bool {
    !row.emergency_severity_level.trim().is_empty() || row.patient_class.trim() == "E"
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fld(segment: &Segment, index: usize) -> &str {
        segment.field(index).unwrap_or("")
    }

    fn fixed_converter() -> AdtConverter {
        AdtConverter::with_fixed_message_time(
            "America/New_York".parse().unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 2)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        )
    }

    fn sample_row() -> IngestionRow {
        IngestionRow {
            facility_abbrev: "STMH".to_string(),
            facility_name: "St. Mary Hospital".to_string(),
            visit_number: "V12345".to_string(),
            patient_id: "MRN001".to_string(),
            last_name: "Doe".to_string(),
            first_name: "Jane".to_string(),
            middle_name: "Q".to_string(),
            street_address: "123 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62704".to_string(),
            primary_phone_number: "(555) 123-4567".to_string(),
            ssn: "123-45-6789".to_string(),
            date_of_birth: "1990-01-15".to_string(),
            sex: "F".to_string(),
            marital_status: "M".to_string(),
            admit_date_time: "2024-01-01 08:30:00".to_string(),
            chief_complaint: "Chest pain".to_string(),
            diagnosis_code: "I21.9".to_string(),
            diagnosis_text: "Acute myocardial infarction".to_string(),
            diagnosis_coding_system: "I10".to_string(),
            attending_physician_name: "Dr. Howser, Doogie R".to_string(),
            referring_physician_name: String::new(),
            admitting_physician_name: "Welby, Marcus".to_string(),
            sending_to_system: "COASTAL".to_string(),
            network_patient_id: format!(
                "{}_{}",
                "550e8400-e29b-41d4-a716-446655440000", "650e8400-e29b-41d4-a716-446655440001"
            ),
            discharge_date_time: String::new(),
            emergency_severity_level: String::new(),
            patient_class: "I".to_string(),
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn test_admit_message_header() {
        let message = fixed_converter().convert(&sample_row());
        let msh = message.segment("MSH").unwrap();

        assert_eq!(fld(msh, 1), "^~\\&");
        assert_eq!(fld(msh, 2), SENDING_APPLICATION);
        assert_eq!(fld(msh, 3), "St. Mary Hospital");
        assert_eq!(fld(msh, 4), "COASTAL");
        assert_eq!(fld(msh, 5), "COASTAL");
        assert_eq!(fld(msh, 6), "20250102120000");
        assert_eq!(fld(msh, 8), "ADT^A01^ADT_A01");
        assert_eq!(fld(msh, 9), "V12345_20240101083000");
        assert_eq!(fld(msh, 10), "P");
        assert_eq!(fld(msh, 11), HL7_VERSION);
    }

    #[test]
    fn test_discharge_row_produces_a03() {
        let mut row = sample_row();
        row.discharge_date_time = "2024-01-03 08:30:00".to_string();

        let message = fixed_converter().convert(&row);
        assert_eq!(fld(message.segment("MSH").unwrap(), 8), "ADT^A03^ADT_A03");
        assert_eq!(fld(message.segment("EVN").unwrap(), 1), "A03");
        assert_eq!(fld(message.segment("PV1").unwrap(), 45), "20240103083000");
        // Final diagnosis, stamped with the discharge time
        let dg1 = message.segment("DG1").unwrap();
        assert_eq!(fld(dg1, 5), "20240103083000");
        assert_eq!(fld(dg1, 6), "F");
    }

    #[test]
    fn test_admit_message_has_no_discharge_fields() {
        let message = fixed_converter().convert(&sample_row());
        assert_eq!(fld(message.segment("PV1").unwrap(), 45), "");
        let dg1 = message.segment("DG1").unwrap();
        assert_eq!(fld(dg1, 5), "20240101083000");
        assert_eq!(fld(dg1, 6), "A");
    }

    #[test]
    fn test_evn_fields() {
        let message = fixed_converter().convert(&sample_row());
        let evn = message.segment("EVN").unwrap();
        assert_eq!(fld(evn, 1), "A01");
        assert_eq!(fld(evn, 2), "20250102120000");
        assert_eq!(fld(evn, 6), "20240101083000");
        assert_eq!(fld(evn, 7), "St. Mary Hospital");
    }

    #[test]
    fn test_pid_fields() {
        let row = sample_row();
        let message = fixed_converter().convert(&row);
        let pid = message.segment("PID").unwrap();

        assert_eq!(fld(pid, 1), "1");
        assert_eq!(fld(pid, 2), row.network_patient_id);
        assert_eq!(
            fld(pid, 3),
            format!("{}^^^STMH~MRN001^^^STMH", row.network_patient_id)
        );
        assert_eq!(fld(pid, 5), "Doe^Jane^Q");
        assert_eq!(fld(pid, 7), "19900115");
        assert_eq!(fld(pid, 8), "F");
        assert_eq!(fld(pid, 11), "123 Main St^^Springfield^IL^62704");
        assert_eq!(fld(pid, 13), "^PRN^PH^^^^5551234567");
        assert_eq!(fld(pid, 16), "M");
        assert_eq!(fld(pid, 19), "123-45-6789");
    }

    #[test]
    fn test_pv1_fields() {
        let message = fixed_converter().convert(&sample_row());
        let pv1 = message.segment("PV1").unwrap();

        assert_eq!(fld(pv1, 1), "1");
        assert_eq!(fld(pv1, 2), "I");
        assert_eq!(fld(pv1, 3), "^^^St. Mary Hospital");
        assert_eq!(fld(pv1, 4), "R");
        assert_eq!(fld(pv1, 7), "^Howser^Doogie^R^^Dr.");
        assert_eq!(fld(pv1, 8), "");
        assert_eq!(fld(pv1, 10), "");
        assert_eq!(fld(pv1, 17), "^Welby^Marcus");
        assert_eq!(fld(pv1, 18), "I");
        assert_eq!(fld(pv1, 19), "V12345^^^COASTAL^VN");
        assert_eq!(fld(pv1, 39), "STMH");
        assert_eq!(fld(pv1, 44), "20240101083000");
    }

    #[test]
    fn test_emergency_row_marks_emer() {
        let mut row = sample_row();
        row.emergency_severity_level = "2".to_string();

        let message = fixed_converter().convert(&row);
        let pv1 = message.segment("PV1").unwrap();
        assert_eq!(fld(pv1, 4), "E");
        assert_eq!(fld(pv1, 10), "EMER");

        let pv2 = message.segment("PV2").unwrap();
        assert_eq!(fld(pv2, 40), "2^ESI triage level^ESI");
    }

    #[test]
    fn test_patient_class_e_is_emergency() {
        let mut row = sample_row();
        row.patient_class = "E".to_string();

        let message = fixed_converter().convert(&row);
        assert_eq!(fld(message.segment("PV1").unwrap(), 10), "EMER");
    }

    #[test]
    fn test_pv2_fields() {
        let mut row = sample_row();
        row.discharge_date_time = "2024-01-03 08:30:00".to_string();

        let message = fixed_converter().convert(&row);
        let pv2 = message.segment("PV2").unwrap();
        assert_eq!(fld(pv2, 3), "I21.9^Acute myocardial infarction^I10");
        assert_eq!(fld(pv2, 8), "20240101083000");
        assert_eq!(fld(pv2, 9), "20240103083000");
        assert_eq!(fld(pv2, 11), "2");
        assert_eq!(fld(pv2, 12), "Chest pain");
        assert_eq!(fld(pv2, 23), "St. Mary Hospital");
        assert_eq!(fld(pv2, 24), "I");
    }

    #[test]
    fn test_minimal_row_defaults() {
        let mut row = sample_row();
        row.sex = String::new();
        row.patient_class = String::new();
        row.sending_to_system = String::new();
        row.visit_number = String::new();

        let message = fixed_converter().convert(&row);
        assert_eq!(fld(message.segment("PID").unwrap(), 8), "U");
        let pv1 = message.segment("PV1").unwrap();
        assert_eq!(fld(pv1, 2), "O");
        assert_eq!(fld(pv1, 18), "O");
        assert_eq!(fld(pv1, 19), "");
        let msh = message.segment("MSH").unwrap();
        assert_eq!(fld(msh, 4), DEFAULT_RECEIVING_APPLICATION);
        // Control id falls back from visit number to patient id
        assert_eq!(fld(msh, 9), "MRN001_20240101083000");
    }

    #[test]
    fn test_control_id_falls_back_to_message_time() {
        let mut row = sample_row();
        row.admit_date_time = String::new();

        let message = fixed_converter().convert(&row);
        assert_eq!(
            fld(message.segment("MSH").unwrap(), 9),
            "V12345_20250102120000"
        );
    }

    #[test]
    fn test_empty_diagnosis_still_emits_dg1() {
        let mut row = sample_row();
        row.diagnosis_code = String::new();
        row.diagnosis_text = String::new();
        row.diagnosis_coding_system = String::new();

        let message = fixed_converter().convert(&row);
        let dg1 = message.segment("DG1").unwrap();
        assert_eq!(fld(dg1, 1), "1");
        assert_eq!(fld(dg1, 3), "");
        assert_eq!(fld(dg1, 5), "20240101083000");
        assert_eq!(fld(dg1, 6), "A");
        assert_eq!(fld(dg1, 15), "1");
    }

    #[test]
    fn test_bare_row_still_emits_pv2() {
        let mut row = sample_row();
        row.diagnosis_code = String::new();
        row.diagnosis_text = String::new();
        row.diagnosis_coding_system = String::new();
        row.chief_complaint = String::new();
        row.emergency_severity_level = String::new();
        row.facility_name = String::new();
        row.patient_class = String::new();
        row.admit_date_time = String::new();
        row.discharge_date_time = String::new();

        let message = fixed_converter().convert(&row);
        assert!(message.segment("PV2").is_some());
        let wire = message.to_wire();
        let names: Vec<&str> = wire
            .split('\r')
            .map(|s| s.split('|').next().unwrap_or(""))
            .collect();
        assert_eq!(names, vec!["MSH", "EVN", "PID", "PV1", "PV2", "DG1"]);
    }

    #[test]
    fn test_free_text_is_escaped() {
        let mut row = sample_row();
        row.chief_complaint = "Pain | worse^at night".to_string();

        let message = fixed_converter().convert(&row);
        assert_eq!(
            fld(message.segment("PV2").unwrap(), 12),
            "Pain \\F\\ worse\\S\\at night"
        );
    }

    #[test]
    fn test_length_of_stay_rounding() {
        assert_eq!(length_of_stay("2024-01-01", "2024-01-03"), "2");
        assert_eq!(
            length_of_stay("2024-01-01 00:00:00", "2024-01-01 13:00:00"),
            "1"
        );
        assert_eq!(
            length_of_stay("2024-01-01 00:00:00", "2024-01-01 11:00:00"),
            "0"
        );
        // Negative interval renders nothing
        assert_eq!(length_of_stay("2024-01-03", "2024-01-01"), "");
        assert_eq!(length_of_stay("", "2024-01-01"), "");
    }

    #[test]
    fn test_build_physician_shapes() {
        assert_eq!(build_physician("Dr. Howser, Doogie R"), "^Howser^Doogie^R^^Dr.");
        assert_eq!(build_physician("Welby, Marcus"), "^Welby^Marcus");
        assert_eq!(build_physician("House"), "^House");
        assert_eq!(build_physician(""), "");
    }

    #[test]
    fn test_extract_composite_id() {
        let message = fixed_converter().convert(&sample_row());
        let composite = extract_composite_id(&message).unwrap();
        assert_eq!(
            composite.customer_id.as_str(),
            "550e8400-e29b-41d4-a716-446655440000"
        );
        assert_eq!(
            composite.patient_id.as_str(),
            "650e8400-e29b-41d4-a716-446655440001"
        );
    }

    #[test]
    fn test_extract_composite_id_rejects_malformed() {
        let mut row = sample_row();
        row.network_patient_id = "not-a-composite".to_string();

        let message = fixed_converter().convert(&row);
        let err = extract_composite_id(&message).unwrap_err();
        assert!(matches!(err, HieError::RowValidation { .. }));
    }

    #[test]
    fn test_wire_rendering_orders_segments() {
        let mut row = sample_row();
        row.discharge_date_time = "2024-01-03 08:30:00".to_string();

        let wire = fixed_converter().convert(&row).to_wire();
        let names: Vec<&str> = wire
            .split('\r')
            .map(|s| s.split('|').next().unwrap_or(""))
            .collect();
        assert_eq!(names, vec!["MSH", "EVN", "PID", "PV1", "PV2", "DG1"]);
        assert!(wire.starts_with("MSH|^~\\&|HIEGATE|"));
    }
}
