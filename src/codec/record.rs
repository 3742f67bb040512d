//! Record type and reserved-field stamping.
//!
//! A record is an open JSON object; the domain intentionally has no schema.
//! Four reserved fields are system-managed and can never be set by callers:
//!
//! - `_id`: UUIDv4 string, assigned once, immutable
//! - `createdAt`: RFC3339 UTC, set once
//! - `updatedAt`: RFC3339 UTC, rewritten on every edit
//! - `_version`: integer, 0 at creation, +1 per edit
//!
//! [`Record::stamp_new`] and [`Record::stamp_edit`] are the only two places
//! the reserved-field invariant is enforced; every store operation funnels
//! caller input through one of them.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Reserved field: record identity.
pub const FIELD_ID: &str = "_id";
/// Reserved field: creation timestamp.
pub const FIELD_CREATED_AT: &str = "createdAt";
/// Reserved field: last-edit timestamp.
pub const FIELD_UPDATED_AT: &str = "updatedAt";
/// Reserved field: edit counter.
pub const FIELD_VERSION: &str = "_version";

/// The four field names callers can never set.
pub const RESERVED_FIELDS: [&str; 4] =
    [FIELD_ID, FIELD_CREATED_AT, FIELD_UPDATED_AT, FIELD_VERSION];

/// Current UTC time as RFC3339 with second precision, e.g.
/// `2026-08-29T10:15:00Z`.
fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// One stored record: reserved metadata plus arbitrary caller fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wrap an already-decoded JSON object without restamping.
    ///
    /// Used by the codec when loading stored collections; unknown fields are
    /// preserved verbatim.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Build a brand-new record from caller fields.
    ///
    /// Reserved keys in `fields` are silently discarded and replaced by
    /// system-computed values; `createdAt` and `updatedAt` start equal.
    pub fn stamp_new(fields: Map<String, Value>) -> Self {
        let now = now_rfc3339();
        let mut map = Map::new();
        map.insert(FIELD_ID.into(), Value::String(Uuid::new_v4().to_string()));
        map.insert(FIELD_CREATED_AT.into(), Value::String(now.clone()));
        map.insert(FIELD_UPDATED_AT.into(), Value::String(now));
        map.insert(FIELD_VERSION.into(), Value::from(0));
        merge_caller_fields(&mut map, fields);
        Self(map)
    }

    /// Build the replacement for an existing record after an edit.
    ///
    /// `_id` and `createdAt` carry forward from `self`, `updatedAt` is
    /// rewritten, `_version` increments by exactly one. Non-reserved fields
    /// come only from `fields`: an edit is a full replace, not a patch.
    pub fn stamp_edit(&self, fields: Map<String, Value>) -> Self {
        let mut map = Map::new();
        map.insert(
            FIELD_ID.into(),
            self.0.get(FIELD_ID).cloned().unwrap_or(Value::Null),
        );
        map.insert(
            FIELD_CREATED_AT.into(),
            self.0.get(FIELD_CREATED_AT).cloned().unwrap_or(Value::Null),
        );
        map.insert(FIELD_UPDATED_AT.into(), Value::String(now_rfc3339()));
        map.insert(FIELD_VERSION.into(), Value::from(self.version() + 1));
        merge_caller_fields(&mut map, fields);
        Self(map)
    }

    /// Record identity, if present and a string.
    pub fn id(&self) -> Option<&str> {
        self.0.get(FIELD_ID).and_then(Value::as_str)
    }

    /// Creation timestamp as stored.
    pub fn created_at(&self) -> Option<&str> {
        self.0.get(FIELD_CREATED_AT).and_then(Value::as_str)
    }

    /// Last-edit timestamp as stored.
    pub fn updated_at(&self) -> Option<&str> {
        self.0.get(FIELD_UPDATED_AT).and_then(Value::as_str)
    }

    /// Edit counter. Records stamped by this codec always carry an integer;
    /// a missing or non-numeric value reads as 0 so the next edit restores
    /// the invariant rather than failing.
    pub fn version(&self) -> i64 {
        self.0
            .get(FIELD_VERSION)
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
            .unwrap_or(0)
    }

    /// Look up any field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// All fields, reserved and caller-supplied.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

fn merge_caller_fields(map: &mut Map<String, Value>, fields: Map<String, Value>) {
    for (key, value) in fields {
        if !RESERVED_FIELDS.contains(&key.as_str()) {
            map.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_stamp_new_sets_all_reserved_fields() {
        let record = Record::stamp_new(fields(json!({"name": "bob", "level": 5})));

        assert!(record.id().is_some());
        assert_eq!(record.version(), 0);
        assert_eq!(record.created_at(), record.updated_at());
        assert_eq!(record.get("name"), Some(&json!("bob")));
        assert_eq!(record.get("level"), Some(&json!(5)));
    }

    #[test]
    fn test_stamp_new_ids_are_unique() {
        let a = Record::stamp_new(Map::new());
        let b = Record::stamp_new(Map::new());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_stamp_new_discards_reserved_input() {
        let record = Record::stamp_new(fields(json!({
            "_id": "forged",
            "createdAt": "1999-01-01T00:00:00Z",
            "updatedAt": "1999-01-01T00:00:00Z",
            "_version": 42,
            "name": "bob"
        })));

        assert_ne!(record.id(), Some("forged"));
        assert_ne!(record.created_at(), Some("1999-01-01T00:00:00Z"));
        assert_eq!(record.version(), 0);
        assert_eq!(record.get("name"), Some(&json!("bob")));
    }

    #[test]
    fn test_stamp_edit_keeps_identity_and_bumps_version() {
        let original = Record::stamp_new(fields(json!({"name": "bob", "level": 5})));
        let edited = original.stamp_edit(fields(json!({"name": "bobby"})));

        assert_eq!(edited.id(), original.id());
        assert_eq!(edited.created_at(), original.created_at());
        assert_eq!(edited.version(), 1);
    }

    #[test]
    fn test_stamp_edit_is_full_replace_not_patch() {
        let original = Record::stamp_new(fields(json!({"name": "bob", "level": 5})));
        let edited = original.stamp_edit(fields(json!({"name": "bobby"})));

        assert_eq!(edited.get("name"), Some(&json!("bobby")));
        assert_eq!(edited.get("level"), None);
    }

    #[test]
    fn test_stamp_edit_discards_reserved_input() {
        let original = Record::stamp_new(Map::new());
        let edited = original.stamp_edit(fields(json!({"_version": 99, "_id": "forged"})));

        assert_eq!(edited.version(), 1);
        assert_eq!(edited.id(), original.id());
    }

    #[test]
    fn test_version_reads_float_encoded_counter() {
        // A collection written by another producer may carry 2.0 instead of 2.
        let record = Record::from_map(fields(json!({"_id": "x", "_version": 2.0})));
        assert_eq!(record.version(), 2);
    }

    #[test]
    fn test_version_missing_reads_zero() {
        let record = Record::from_map(fields(json!({"_id": "x"})));
        assert_eq!(record.version(), 0);
    }

    #[test]
    fn test_repeated_edits_are_strictly_monotonic() {
        let mut record = Record::stamp_new(Map::new());
        for expected in 1..=5 {
            record = record.stamp_edit(Map::new());
            assert_eq!(record.version(), expected);
        }
    }
}
