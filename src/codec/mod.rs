//! Conversion between collection plaintext and in-memory records.
//!
//! A collection's plaintext is exactly one JSON array of objects. Decoding
//! preserves order and unknown fields; encoding writes the same array back.
//! Field position inside a record is not contractual, values are.

mod errors;
mod record;

pub use errors::{CodecError, CodecResult};
pub use record::{
    Record, FIELD_CREATED_AT, FIELD_ID, FIELD_UPDATED_AT, FIELD_VERSION, RESERVED_FIELDS,
};

use serde_json::{Map, Value};

/// Decode collection plaintext into an ordered record sequence.
pub fn decode(bytes: &[u8]) -> CodecResult<Vec<Record>> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Value::Array(items) = value else {
        return Err(CodecError::NotAnArray);
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(Record::from_map(map)),
            _ => Err(CodecError::NotAnArray),
        })
        .collect()
}

/// Encode a record sequence back to collection plaintext.
pub fn encode(records: &[Record]) -> CodecResult<Vec<u8>> {
    serde_json::to_vec(records).map_err(CodecError::from)
}

/// Parse caller-supplied record text into a field map.
///
/// Surrounding single or double quotes are stripped first; some shells pass
/// the quoting through with the argument.
pub fn parse_fields(raw: &str) -> CodecResult<Map<String, Value>> {
    let cleaned = raw.trim().trim_matches(|c| c == '\'' || c == '"');
    let value: Value = serde_json::from_str(cleaned)?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CodecError::NotAnObject),
    }
}
