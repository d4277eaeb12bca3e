//! # Transport Serialization
//!
//! Converts raw stored documents into JSON-safe mappings for API responses.
//! Store-native identifiers become their hex string form under the key `id`,
//! timestamps become RFC 3339 strings, and list fields are converted
//! element-wise. Everything else passes through unchanged.
//!
//! Because stored fields are tagged by declared type ([`FieldValue`]), the
//! conversion never re-interprets plain JSON: a string that happens to look
//! like an identifier or a timestamp stays exactly as it is, so serializing
//! already-serialized data is a no-op.

use serde_json::{Map, Value};

use crate::{FieldValue, StoredDocument};

/// Converts one tagged field value into its transport-safe JSON form.
pub fn serialize_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Id(id) => Value::String(id.to_string()),
        FieldValue::Timestamp(ts) => Value::String(ts.to_rfc3339()),
        FieldValue::List(items) => Value::Array(items.iter().map(serialize_value).collect()),
        FieldValue::Json(v) => v.clone(),
    }
}

/// Converts a raw stored document into a transport-safe JSON mapping.
///
/// The store-assigned identifier is renamed to `id`; `created_at` carries the
/// store's insertion timestamp. The document's own fields follow in their
/// stored order and cannot shadow either key.
pub fn serialize_document(doc: &StoredDocument) -> Map<String, Value> {
    let mut out = Map::new();
    out.insert("id".to_string(), Value::String(doc.id.to_string()));
    out.insert(
        "created_at".to_string(),
        Value::String(doc.created_at.to_rfc3339()),
    );
    for (name, value) in &doc.fields {
        if name == "id" || name == "created_at" {
            continue;
        }
        out.insert(name.clone(), serialize_value(value));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentId;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn sample_id() -> DocumentId {
        DocumentId::new([0xAB; 16])
    }

    #[test]
    fn id_field_becomes_hex_string() {
        let value = serialize_value(&FieldValue::Id(sample_id()));
        assert_eq!(value, json!("abababababababababababababababab"));
    }

    #[test]
    fn timestamp_becomes_rfc3339_string() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap();
        let value = serialize_value(&FieldValue::Timestamp(ts));
        assert_eq!(value, json!("2024-03-15T09:30:00+00:00"));
    }

    #[test]
    fn list_converts_id_elements_only() {
        let list = FieldValue::List(vec![
            FieldValue::Id(sample_id()),
            FieldValue::from("iPhone 8+"),
            FieldValue::Json(json!(42)),
        ]);
        assert_eq!(
            serialize_value(&list),
            json!(["abababababababababababababababab", "iPhone 8+", 42])
        );
    }

    #[test]
    fn plain_json_is_identity() {
        for value in [
            json!(null),
            json!(true),
            json!(7),
            json!("abababababababababababababababab"),
            json!("2024-03-15T09:30:00+00:00"),
            json!({"nested": {"deep": [1, 2, 3]}}),
        ] {
            assert_eq!(serialize_value(&FieldValue::Json(value.clone())), value);
        }
    }

    #[test]
    fn serializing_twice_is_serializing_once() {
        let once = serialize_value(&FieldValue::Id(sample_id()));
        // The output is plain JSON; feeding it back through is a no-op.
        let twice = serialize_value(&FieldValue::Json(once.clone()));
        assert_eq!(once, twice);
    }

    #[test]
    fn document_gains_id_and_created_at() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let doc = StoredDocument {
            id: sample_id(),
            created_at: ts,
            fields: vec![
                ("key".to_string(), FieldValue::from("icloud")),
                ("urgent".to_string(), FieldValue::from(false)),
            ],
        };

        let out = serialize_document(&doc);
        assert_eq!(out.get("id"), Some(&json!("abababababababababababababababab")));
        assert_eq!(out.get("created_at"), Some(&json!("2024-01-01T00:00:00+00:00")));
        assert_eq!(out.get("key"), Some(&json!("icloud")));
        assert_eq!(out.get("urgent"), Some(&json!(false)));
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn document_fields_cannot_shadow_id() {
        let doc = StoredDocument {
            id: sample_id(),
            created_at: Utc::now(),
            fields: vec![("id".to_string(), FieldValue::from("spoofed"))],
        };

        let out = serialize_document(&doc);
        assert_eq!(out.get("id"), Some(&json!("abababababababababababababababab")));
    }
}
