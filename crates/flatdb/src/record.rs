//! Record codec.
//!
//! On disk every record is a single JSON document, indented with tabs and
//! terminated by exactly one newline. In memory, code that does not know the
//! caller's typed shape (Update's merge, Query's scan) works on a [`Record`]:
//! an untyped field mapping whose values are [`serde_json::Value`]s.
//!
//! Conversion to and from typed shapes happens at the boundary through serde:
//! [`to_record`] and [`from_record`].

use crate::error::{Result, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

/// Untyped record: field name -> dynamic value.
pub type Record = Map<String, Value>;

/// File extension of record files, without the dot.
pub const RECORD_EXT: &str = "json";

/// Serializes `data` to the canonical on-disk form.
pub fn encode<T: Serialize + ?Sized>(data: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(256);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    data.serialize(&mut ser)
        .map_err(|e| StoreError::serialization("marshal data", e))?;
    buf.push(b'\n');
    Ok(buf)
}

pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| StoreError::serialization("unmarshal data", e))
}

/// Converts a typed value into an untyped [`Record`].
///
/// Fails if `data` does not serialize to a JSON object.
pub fn to_record<T: Serialize + ?Sized>(data: &T) -> Result<Record> {
    match to_value(data)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Store(format!(
            "expected a JSON object, got {}",
            kind_name(&other)
        ))),
    }
}

pub fn from_record<T: DeserializeOwned>(record: Record) -> Result<T> {
    serde_json::from_value(Value::Object(record))
        .map_err(|e| StoreError::serialization("convert record", e))
}

pub(crate) fn to_value<T: Serialize + ?Sized>(data: &T) -> Result<Value> {
    serde_json::to_value(data).map_err(|e| StoreError::serialization("marshal data", e))
}

/// Overwrites (or adds) every field of `patch` in `record`.
pub fn merge(record: &mut Record, patch: Record) {
    for (key, value) in patch {
        record.insert(key, value);
    }
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Album {
        name: String,
        year: u32,
    }

    #[test]
    fn encode_uses_tabs_and_trailing_newline() {
        let bytes = encode(&json!({"a": 1, "b": [true]})).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "{\n\t\"a\": 1,\n\t\"b\": [\n\t\ttrue\n\t]\n}\n");
    }

    #[test]
    fn encode_keeps_struct_field_order() {
        let bytes = encode(&Album {
            name: "Red".into(),
            year: 1974,
        })
        .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "{\n\t\"name\": \"Red\",\n\t\"year\": 1974\n}\n");
    }

    #[test]
    fn decode_reports_serialization_error() {
        let err = decode::<Record>("{ not json").unwrap_err();
        assert!(matches!(err, StoreError::Serialization { .. }));
    }

    #[test]
    fn to_record_rejects_non_objects() {
        assert!(to_record(&vec![1, 2, 3]).is_err());
        assert!(to_record("text").is_err());
    }

    #[test]
    fn typed_shape_survives_record_conversion() {
        let album = Album {
            name: "Discipline".into(),
            year: 1981,
        };
        let record = to_record(&album).unwrap();
        assert_eq!(record.get("year"), Some(&json!(1981)));

        let back: Album = from_record(record).unwrap();
        assert_eq!(back, album);
    }

    #[test]
    fn merge_overwrites_and_adds() {
        let mut record = to_record(&json!({"a": 1, "b": 2})).unwrap();
        let patch = to_record(&json!({"b": 3, "z": 9})).unwrap();
        merge(&mut record, patch);
        assert_eq!(Value::Object(record), json!({"a": 1, "b": 3, "z": 9}));
    }
}
