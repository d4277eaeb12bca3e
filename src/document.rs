use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs::File;
use std::io::Read;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

///////////////////////////////////////////// DocumentId //////////////////////////////////////////

/// A store-assigned document identifier: 16 random bytes rendered as 32 hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId([u8; 16]);

impl DocumentId {
    /// Creates a document ID from raw bytes.
    pub fn new(bytes: [u8; 16]) -> Self {
        DocumentId(bytes)
    }

    /// Returns the raw bytes of the ID.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Generates a random document ID from /dev/urandom.
    pub fn random() -> Result<Self, std::io::Error> {
        let mut bytes = [0u8; 16];
        let mut file = File::open("/dev/urandom")?;
        file.read_exact(&mut bytes)?;
        Ok(DocumentId(bytes))
    }
}

/////////////////////////////////////////// Hex Encoding ///////////////////////////////////////////

const HEX_CHARS: &[u8] = b"0123456789abcdef";

fn encode_hex(input: &[u8]) -> String {
    let mut result = String::with_capacity(input.len() * 2);
    for byte in input {
        result.push(HEX_CHARS[(byte >> 4) as usize] as char);
        result.push(HEX_CHARS[(byte & 0x0F) as usize] as char);
    }
    result
}

fn hex_value(c: char) -> Result<u8, &'static str> {
    match c {
        '0'..='9' => Ok(c as u8 - b'0'),
        'a'..='f' => Ok(c as u8 - b'a' + 10),
        'A'..='F' => Ok(c as u8 - b'A' + 10),
        _ => Err("Invalid hex character"),
    }
}

fn decode_hex(input: &str) -> Result<Vec<u8>, &'static str> {
    if !input.len().is_multiple_of(2) {
        return Err("Odd-length hex string");
    }
    let chars: Vec<char> = input.chars().collect();
    let mut result = Vec::with_capacity(chars.len() / 2);
    for pair in chars.chunks(2) {
        let hi = hex_value(pair[0])?;
        let lo = hex_value(pair[1])?;
        result.push((hi << 4) | lo);
    }
    Ok(result)
}

/////////////////////////////////////// Display and FromStr ////////////////////////////////////////

impl Display for DocumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", encode_hex(&self.0))
    }
}

/// Errors that can occur when parsing a document ID from its string form.
#[derive(Debug, PartialEq, Eq)]
pub enum DocumentIdParseError {
    /// The string is not exactly 32 characters long.
    InvalidLength,
    /// The string contains a non-hex character.
    InvalidHex,
}

impl Display for DocumentIdParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DocumentIdParseError::InvalidLength => {
                write!(f, "Document ID must be exactly 32 hex characters")
            }
            DocumentIdParseError::InvalidHex => write!(f, "Invalid hex encoding"),
        }
    }
}

impl std::error::Error for DocumentIdParseError {}

impl FromStr for DocumentId {
    type Err = DocumentIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(DocumentIdParseError::InvalidLength);
        }
        let decoded = decode_hex(s).map_err(|_| DocumentIdParseError::InvalidHex)?;
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&decoded);
        Ok(DocumentId(bytes))
    }
}

///////////////////////////////////////////// FieldValue ///////////////////////////////////////////

/// A single stored field, tagged by its store-native type.
///
/// Identifier and timestamp fields are distinguished statically so that the
/// serializer dispatches on the declared variant rather than inspecting
/// runtime type names.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A store-native document identifier.
    Id(DocumentId),
    /// A store-native timestamp.
    Timestamp(DateTime<Utc>),
    /// An ordered sequence of values, each itself tagged.
    List(Vec<FieldValue>),
    /// Any other value, already transport-safe JSON.
    Json(Value),
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Json(Value::String(s.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Json(Value::String(s))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Json(Value::Bool(b))
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        FieldValue::Json(v)
    }
}

/// The named fields of a document, in insertion order.
pub type DocumentFields = Vec<(String, FieldValue)>;

/// A field-equality filter: a document matches when every named field
/// serializes to the given JSON value. An empty filter matches everything.
pub type Filter = HashMap<String, Value>;

/////////////////////////////////////////// StoredDocument /////////////////////////////////////////

/// One raw record as returned by the document store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// The store-assigned identifier.
    pub id: DocumentId,
    /// When the store persisted the document.
    pub created_at: DateTime<Utc>,
    /// The document's named fields.
    pub fields: DocumentFields,
}

impl StoredDocument {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Tests this document against a field-equality filter.
    pub fn matches(&self, filter: &Filter) -> bool {
        filter.iter().all(|(name, expected)| {
            self.field(name)
                .is_some_and(|value| &crate::serialize_value(value) == expected)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_id_display_is_hex() {
        let id = DocumentId::new([0u8; 16]);
        assert_eq!(id.to_string(), "00000000000000000000000000000000");

        let id = DocumentId::new([0xFF; 16]);
        assert_eq!(id.to_string(), "ffffffffffffffffffffffffffffffff");
    }

    #[test]
    fn document_id_round_trip() {
        let bytes = [
            0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06,
            0x07, 0x08,
        ];
        let id = DocumentId::new(bytes);
        let parsed = DocumentId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn document_id_from_str_wrong_length() {
        assert_eq!(
            DocumentId::from_str("abc123"),
            Err(DocumentIdParseError::InvalidLength)
        );
    }

    #[test]
    fn document_id_from_str_bad_hex() {
        assert_eq!(
            DocumentId::from_str("zz000000000000000000000000000000"),
            Err(DocumentIdParseError::InvalidHex)
        );
    }

    #[test]
    fn document_id_random_is_not_constant() {
        let a = DocumentId::random().unwrap();
        let b = DocumentId::random().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn hex_round_trip() {
        let input = b"arbitrary bytes!";
        let encoded = encode_hex(input);
        assert_eq!(decode_hex(&encoded).unwrap(), input);
    }

    fn doc_with_field(name: &str, value: FieldValue) -> StoredDocument {
        StoredDocument {
            id: DocumentId::new([1u8; 16]),
            created_at: Utc::now(),
            fields: vec![(name.to_string(), value)],
        }
    }

    #[test]
    fn field_lookup() {
        let doc = doc_with_field("key", FieldValue::from("icloud"));
        assert_eq!(doc.field("key"), Some(&FieldValue::from("icloud")));
        assert_eq!(doc.field("missing"), None);
    }

    #[test]
    fn empty_filter_matches_everything() {
        let doc = doc_with_field("key", FieldValue::from("icloud"));
        assert!(doc.matches(&Filter::new()));
    }

    #[test]
    fn filter_matches_on_equality() {
        let doc = doc_with_field("category_key", FieldValue::from("frp"));

        let mut matching = Filter::new();
        matching.insert("category_key".to_string(), json!("frp"));
        assert!(doc.matches(&matching));

        let mut wrong_value = Filter::new();
        wrong_value.insert("category_key".to_string(), json!("icloud"));
        assert!(!doc.matches(&wrong_value));

        let mut wrong_field = Filter::new();
        wrong_field.insert("absent".to_string(), json!("frp"));
        assert!(!doc.matches(&wrong_field));
    }
}
