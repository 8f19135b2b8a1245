//! Timestamp parsing and normalization
//!
//! Partner feeds carry timestamps in whatever shape their export job
//! produces: 14-digit wire timestamps, bare dates, ISO 8601 with or
//! without an inline UTC offset, sometimes with subsecond precision.
//! This module parses the common shapes and normalizes message
//! timestamps to 14-digit UTC.
//!
//! Naive values (no inline offset) are interpreted in the partner's
//! configured IANA timezone; values carrying an offset are converted by
//! honoring that offset regardless of the configured zone.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

use crate::domain::{ClinicalMessage, FieldDiagnostic};

/// Wire timestamp format, 14 digits, no separators
pub const WIRE_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Wire date format, 8 digits
pub const WIRE_DATE_FORMAT: &str = "%Y%m%d";

/// Message locations that carry an event timestamp in component 1
///
/// `(segment name, field index)` using the crate-wide 1-based field
/// convention. Every matching segment in the message is visited, so
/// repeated DG1 segments are all normalized.
const TIMESTAMP_LOCATIONS: &[(&str, usize)] = &[
    ("MSH", 6),
    ("EVN", 2),
    ("EVN", 6),
    ("PV1", 44),
    ("PV1", 45),
    ("PV2", 8),
    ("PV2", 9),
    ("DG1", 5),
];

fn offset_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<body>.+?)(?P<offset>[+-]\d{2}:?\d{2})$").unwrap_or_else(|_| unreachable!())
    })
}

/// Parses a timestamp in any of the shapes partner feeds are known to
/// produce, ignoring any trailing offset or subseconds
///
/// Accepted shapes: 14/12/8-digit wire values, `YYYY-MM-DD`,
/// `YYYY-MM-DD HH:MM[:SS]` and the `T`-separated ISO equivalents.
pub fn parse_flexible(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Drop an inline offset and subseconds before shape matching
    let without_offset = match offset_suffix_re().captures(trimmed) {
        Some(caps) => caps["body"].to_string(),
        None => trimmed.trim_end_matches('Z').to_string(),
    };
    let body = without_offset
        .split_once('.')
        .map(|(main, _)| main)
        .unwrap_or(&without_offset);

    if body.chars().all(|c| c.is_ascii_digit()) {
        return match body.len() {
            14 => NaiveDateTime::parse_from_str(body, "%Y%m%d%H%M%S").ok(),
            12 => NaiveDateTime::parse_from_str(body, "%Y%m%d%H%M").ok(),
            8 => NaiveDate::parse_from_str(body, "%Y%m%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0)),
            _ => None,
        };
    }

    const SEPARATED_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y",
    ];
    for fmt in SEPARATED_FORMATS {
        if fmt.contains('H') {
            if let Ok(dt) = NaiveDateTime::parse_from_str(body, fmt) {
                return Some(dt);
            }
        } else if let Ok(d) = NaiveDate::parse_from_str(body, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    NaiveDate::parse_from_str(body, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Formats a feed value as a 14-digit wire timestamp, or empty if it
/// does not parse
pub fn to_wire_timestamp(value: &str) -> String {
    parse_flexible(value)
        .map(|dt| dt.format(WIRE_TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

/// Formats a feed value as an 8-digit wire date, or empty if it does
/// not parse
pub fn to_wire_date(value: &str) -> String {
    parse_flexible(value)
        .map(|dt| dt.format(WIRE_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Normalizes event timestamps in a message to 14-digit UTC
///
/// The normalizer is constructed with the partner's IANA timezone and
/// applied to each converted message before dispatch.
pub struct TimestampNormalizer {
    timezone: Tz,
}

impl TimestampNormalizer {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Rewrites every known timestamp location in place
    ///
    /// Values that fail to parse are left untouched and reported as
    /// diagnostics; empty fields are skipped silently.
    pub fn normalize(&self, message: &mut ClinicalMessage) -> Vec<FieldDiagnostic> {
        let mut diagnostics = Vec::new();

        for &(segment_name, field) in TIMESTAMP_LOCATIONS {
            for segment in message.segments_mut() {
                if segment.name() != segment_name {
                    continue;
                }
                let original = match segment.component(field, 1) {
                    Some(value) if !value.trim().is_empty() => value.to_string(),
                    _ => continue,
                };
                match self.normalize_value(&original) {
                    Ok(normalized) => {
                        if normalized != original {
                            segment.set_component(field, 1, &normalized);
                        }
                    }
                    Err(rule) => {
                        warn!(
                            segment = segment_name,
                            field,
                            value = %original,
                            "Timestamp did not normalize, keeping original value"
                        );
                        diagnostics.push(FieldDiagnostic::new(
                            format!("{segment_name}-{field}"),
                            original,
                            rule,
                        ));
                    }
                }
            }
        }

        diagnostics
    }

    /// Converts one timestamp value to 14-digit UTC
    ///
    /// An inline `±HHMM` / `±HH:MM` suffix wins over the configured
    /// timezone. Subseconds are dropped.
    pub fn normalize_value(&self, value: &str) -> Result<String, String> {
        let trimmed = value.trim();

        if let Some(caps) = offset_suffix_re().captures(trimmed) {
            let body = caps["body"]
                .split_once('.')
                .map(|(main, _)| main.to_string())
                .unwrap_or_else(|| caps["body"].to_string());
            let naive = parse_digits(&body)
                .ok_or_else(|| "unrecognized timestamp shape".to_string())?;
            let offset = parse_offset(&caps["offset"])
                .ok_or_else(|| "invalid UTC offset".to_string())?;
            let local: DateTime<FixedOffset> = offset
                .from_local_datetime(&naive)
                .single()
                .ok_or_else(|| "timestamp not representable in offset".to_string())?;
            return Ok(local
                .with_timezone(&Utc)
                .format(WIRE_TIMESTAMP_FORMAT)
                .to_string());
        }

        let body = trimmed
            .split_once('.')
            .map(|(main, _)| main)
            .unwrap_or(trimmed);
        let naive =
            parse_digits(body).ok_or_else(|| "unrecognized timestamp shape".to_string())?;
        let local = self
            .timezone
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| "timestamp does not exist in partner timezone".to_string())?;
        Ok(local
            .with_timezone(&Utc)
            .format(WIRE_TIMESTAMP_FORMAT)
            .to_string())
    }
}

fn parse_digits(body: &str) -> Option<NaiveDateTime> {
    if !body.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match body.len() {
        14 => NaiveDateTime::parse_from_str(body, "%Y%m%d%H%M%S").ok(),
        12 => NaiveDateTime::parse_from_str(body, "%Y%m%d%H%M").ok(),
        8 => NaiveDate::parse_from_str(body, "%Y%m%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0)),
        _ => None,
    }
}

fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let cleaned = raw.replace(':', "");
    let sign = match cleaned.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let hours: i32 = cleaned.get(1..3)?.parse().ok()?;
    let minutes: i32 = cleaned.get(3..5)?.parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
