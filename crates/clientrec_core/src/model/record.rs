//! Record and record id types.
//!
//! # Responsibility
//! - Decode loosely-shaped JSON objects into typed records.
//! - Preserve unrecognized fields for export.
//!
//! # Invariants
//! - A decoded record never drops input data: a known key with an
//!   unexpected JSON type is kept in `extra` under its original name.
//! - `RecordId` equality is by JSON value (`1` and `"1"` are different ids).

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt::{Display, Formatter};

/// Caller-supplied record identifier.
///
/// Input files carry either numeric or string ids; both shapes are kept
/// as-is so exported JSON matches what was uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// JSON number id, e.g. `17`.
    Number(Number),
    /// JSON string id, e.g. `"c-17"`.
    Text(String),
}

impl RecordId {
    /// Stable string key for UI row addressing (JSON encoding of the id).
    pub fn to_key(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(value) => Value::String(value.clone()).to_string(),
        }
    }
}

/// Row key for an optional id: the id's JSON encoding, or `null`.
pub fn row_key(id: Option<&RecordId>) -> String {
    id.map(RecordId::to_key).unwrap_or_else(|| Value::Null.to_string())
}

/// Parses a [`row_key`]. `Some(None)` addresses records without an id.
pub fn parse_row_key(key: &str) -> Option<Option<RecordId>> {
    serde_json::from_str(key).ok()
}

// Display follows JavaScript `toString()`: integral floats drop `.0`.
impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) if value.is_f64() => {
                let float = value.as_f64().unwrap_or_default();
                if float == 0.0 {
                    f.write_str("0")
                } else {
                    write!(f, "{float}")
                }
            }
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One client row: `{ id, name, email }` plus pass-through fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Every other input key, written back verbatim on export.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// Creates a record with the three known fields set.
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            email: Some(email.into()),
            extra: Map::new(),
        }
    }

    /// Decodes one JSON array element.
    ///
    /// Returns `None` for non-object values; they have no record shape.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut fields) = value else {
            return None;
        };

        let id = match fields.remove("id") {
            Some(Value::Number(number)) => Some(RecordId::Number(number)),
            Some(Value::String(text)) => Some(RecordId::Text(text)),
            Some(other) => {
                fields.insert("id".to_string(), other);
                None
            }
            None => None,
        };
        let name = take_string(&mut fields, "name");
        let email = take_string(&mut fields, "email");

        Some(Self {
            id,
            name,
            email,
            extra: fields,
        })
    }

    /// Returns the email when it can act as a deduplication key.
    pub fn email_key(&self) -> Option<&str> {
        self.email.as_deref().filter(|email| !email.is_empty())
    }

    /// Returns whether this record carries exactly `id`.
    pub fn has_id(&self, id: &RecordId) -> bool {
        self.id.as_ref() == Some(id)
    }

    /// Like [`Record::has_id`], but `None` matches records without an id.
    pub fn matches_id(&self, id: Option<&RecordId>) -> bool {
        self.id.as_ref() == id
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Record::from_value(value).ok_or_else(|| D::Error::custom("record must be a JSON object"))
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key) {
        Some(Value::String(text)) => Some(text),
        Some(other) => {
            fields.insert(key.to_string(), other);
            None
        }
        None => None,
    }
}
