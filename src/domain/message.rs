//! In-memory clinical message model
//!
//! An ADT message is an ordered sequence of segments; each segment has a
//! name and an ordered sequence of `|`-delimited fields, which in turn hold
//! `^`-delimited components and `~`-delimited repetitions.
//!
//! The wire protocol numbers fields starting at 1, so the in-memory field
//! vector reserves slot 0 and keeps it empty; serialization strips the
//! reserved slot and joins the remainder. That translation lives here and
//! nowhere else.
//!
//! One quirk inherited from the wire format: MSH-1 *is* the field separator
//! character, so for MSH segments the in-memory field `n` corresponds to
//! wire field `n + 1` (in-memory MSH field 1 holds the encoding characters,
//! which the wire calls MSH-2). All other segments line up exactly with the
//! wire numbering.

use crate::domain::errors::HieError;
use crate::domain::result::Result;

/// Separates segments in a serialized message
pub const SEGMENT_SEPARATOR: &str = "\r";

/// Separates fields within a segment
pub const FIELD_SEPARATOR: char = '|';

/// Separates components within a field
pub const COMPONENT_SEPARATOR: char = '^';

/// Separates repetitions within a field
pub const REPETITION_SEPARATOR: char = '~';

/// The escape character of the wire format
pub const ESCAPE_CHARACTER: char = '\\';

/// One named segment of a clinical message
///
/// Invariant: `fields[0]` is reserved and always empty so that field
/// indices match the 1-based wire protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    name: String,
    fields: Vec<String>,
}

impl Segment {
    /// Creates an empty segment with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            // slot 0 reserved, wire indices are 1-based
            fields: vec![String::new()],
        }
    }

    /// Returns the segment name (e.g. "PID")
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets a field at a 1-based wire index, growing the vector as needed
    ///
    /// Index 0 is the reserved slot and must never be written.
    pub fn set_field(&mut self, index: usize, value: impl Into<String>) {
        assert!(index >= 1, "wire protocol field indices are 1-based");
        if self.fields.len() <= index {
            self.fields.resize(index + 1, String::new());
        }
        self.fields[index] = value.into();
    }

    /// Returns the field at a 1-based wire index, if present
    pub fn field(&self, index: usize) -> Option<&str> {
        if index == 0 {
            return None;
        }
        self.fields.get(index).map(String::as_str)
    }

    /// Returns a 1-based component of the first repetition of a field
    ///
    /// A field without component separators is itself component 1.
    pub fn component(&self, field: usize, component: usize) -> Option<&str> {
        let value = self.field(field)?;
        let first_repetition = value.split(REPETITION_SEPARATOR).next().unwrap_or("");
        first_repetition
            .split(COMPONENT_SEPARATOR)
            .nth(component.checked_sub(1)?)
    }

    /// Rewrites a 1-based component of the first repetition of a field
    ///
    /// Later repetitions are preserved untouched. The field is padded with
    /// empty components if it is shorter than the target index.
    pub fn set_component(&mut self, field: usize, component: usize, value: impl Into<String>) {
        assert!(
            field >= 1 && component >= 1,
            "wire protocol indices are 1-based"
        );
        let current = self.field(field).unwrap_or("").to_string();
        let mut repetitions: Vec<String> = current
            .split(REPETITION_SEPARATOR)
            .map(str::to_string)
            .collect();
        let mut components: Vec<String> = repetitions[0]
            .split(COMPONENT_SEPARATOR)
            .map(str::to_string)
            .collect();
        if components.len() < component {
            components.resize(component, String::new());
        }
        components[component - 1] = value.into();
        repetitions[0] = components.join(&COMPONENT_SEPARATOR.to_string());
        self.set_field(field, repetitions.join(&REPETITION_SEPARATOR.to_string()));
    }

    /// Serializes the segment for the wire
    ///
    /// Strips the reserved slot 0 and trims trailing empty fields.
    pub fn to_wire(&self) -> String {
        let mut fields: Vec<&str> = self.fields[1..].iter().map(String::as_str).collect();
        while fields.last() == Some(&"") {
            fields.pop();
        }
        format!(
            "{}{}{}",
            self.name,
            FIELD_SEPARATOR,
            fields.join(&FIELD_SEPARATOR.to_string())
        )
    }

    /// Parses one serialized segment line
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split(FIELD_SEPARATOR);
        let name = parts
            .next()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| HieError::Message(format!("Segment line has no name: '{line}'")))?;
        let mut segment = Segment::new(name);
        for (offset, value) in parts.enumerate() {
            segment.set_field(offset + 1, value);
        }
        Ok(segment)
    }
}

/// An ordered sequence of segments forming one ADT message
///
/// Messages are transient: constructed per feed row, serialized, and
/// discarded after dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClinicalMessage {
    segments: Vec<Segment>,
}

impl ClinicalMessage {
    /// Creates an empty message
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment to the message
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Returns the first segment with the given name
    pub fn segment(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.name() == name)
    }

    /// Returns a mutable reference to the first segment with the given name
    pub fn segment_mut(&mut self, name: &str) -> Option<&mut Segment> {
        self.segments.iter_mut().find(|s| s.name() == name)
    }

    /// Returns all segments in order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns mutable access to all segments in order
    pub fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    /// Serializes the whole message, segments separated by carriage return
    pub fn to_wire(&self) -> String {
        self.segments
            .iter()
            .map(Segment::to_wire)
            .collect::<Vec<_>>()
            .join(SEGMENT_SEPARATOR)
    }

    /// Parses a serialized message
    ///
    /// Accepts both bare carriage returns (the wire form) and CR/LF pairs
    /// as segment separators; blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut message = ClinicalMessage::new();
        for line in text.split(['\r', '\n']) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            message.push(Segment::parse(line)?);
        }
        if message.segments.is_empty() {
            return Err(HieError::Message("Message has no segments".to_string()));
        }
        Ok(message)
    }
}
