//! Feed row to ADT message conversion
//!
//! [`converter::AdtConverter`] builds one ADT A01/A03 message per
//! validated feed row; [`escape`] carries the wire-format text escaping
//! rules the segment builders rely on.

pub mod converter;
pub mod escape;

pub use converter::{
    extract_composite_id, AdtConverter, TriggerEvent, DEFAULT_RECEIVING_APPLICATION, HL7_VERSION,
    SENDING_APPLICATION,
};
