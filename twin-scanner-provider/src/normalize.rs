//! Normalization of `GET /get` responses into record sequences.

use crate::types::{Record, VALUE_KEY, Value};

/// Turns any JSON response into an ordered sequence of records.
///
/// - array: object elements are kept as-is, other elements are wrapped as `{"value": x}`
/// - object: one-element sequence
/// - scalar or null: `[{"value": x}]`
///
/// The result is never a bare scalar or singleton object.
pub fn normalize_records(value: Value) -> Vec<Record> {
    match value {
        Value::Array(items) => items.into_iter().map(into_record).collect(),
        other => vec![into_record(other)],
    }
}

fn into_record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => {
            let mut record = Record::new();
            record.insert(VALUE_KEY.to_string(), other);
            record
        }
    }
}
