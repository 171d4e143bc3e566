use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::kind::ModelKind;

/// Timestamp layout used in the persisted file and in record rendering
/// (ISO 8601 with microseconds, no timezone suffix).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Attribute fields that can never be overwritten through `update`
pub const PROTECTED_FIELDS: [&str; 4] = ["id", "created_at", "updated_at", "__class__"];

/// Scalar attribute value
///
/// Attributes are plain scalars; the variant a field is seeded with fixes
/// the type that later updates coerce into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl AttrValue {
    /// Coerce a raw textual value to this value's type
    ///
    /// Falls back to storing the raw string when parsing fails.
    pub fn coerce(&self, raw: &str) -> AttrValue {
        match self {
            AttrValue::Bool(_) => raw
                .parse::<bool>()
                .map(AttrValue::Bool)
                .unwrap_or_else(|_| AttrValue::Str(raw.to_string())),
            AttrValue::Int(_) => raw
                .parse::<i64>()
                .map(AttrValue::Int)
                .unwrap_or_else(|_| AttrValue::Str(raw.to_string())),
            AttrValue::Float(_) => raw
                .parse::<f64>()
                .map(AttrValue::Float)
                .unwrap_or_else(|_| AttrValue::Str(raw.to_string())),
            AttrValue::Str(_) => AttrValue::Str(raw.to_string()),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Int(i) => write!(f, "{}", i),
            // {:?} keeps the trailing .0 on whole floats
            AttrValue::Float(x) => write!(f, "{:?}", x),
            AttrValue::Str(s) => write!(f, "'{}'", s),
        }
    }
}

/// A single persisted entity instance
///
/// Every record carries a generated id (immutable after creation), creation
/// and update timestamps, and a map of scalar attributes seeded from its
/// kind's defaults. The serialized form is the flat document stored in the
/// persistence file: `__class__`, `id`, formatted timestamps, and the
/// attributes at top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Registered kind of this record (serialized as `__class__`)
    #[serde(rename = "__class__")]
    pub kind: ModelKind,

    /// Opaque unique identifier, generated at creation
    pub id: String,

    /// Timestamp when this record was created
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,

    /// Timestamp when this record was last updated
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,

    /// Scalar attributes, seeded from the kind's defaults
    #[serde(flatten)]
    pub attributes: BTreeMap<String, AttrValue>,
}

impl Record {
    /// Create a new record of the given kind
    ///
    /// Generates a UUID v4 id, stamps both timestamps with the current
    /// time, and seeds the attribute map from the kind's defaults.
    pub fn new(kind: ModelKind) -> Self {
        let now = Utc::now();
        Self {
            kind,
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            attributes: kind.seed_attributes(),
        }
    }

    /// The composite lookup key, `"<ClassName>.<id>"`
    pub fn key(&self) -> String {
        composite_key(self.kind.as_str(), &self.id)
    }

    /// Advance the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Set an attribute from raw console input
    ///
    /// Protected fields are refused (returns false, timestamps untouched).
    /// When the attribute already exists the raw value is coerced to its
    /// type; new attributes are stored as strings. Returns true and
    /// advances `updated_at` when the attribute was written.
    pub fn set_attribute(&mut self, field: &str, raw: &str) -> bool {
        if PROTECTED_FIELDS.contains(&field) {
            return false;
        }
        let value = match self.attributes.get(field) {
            Some(existing) => existing.coerce(raw),
            None => AttrValue::Str(raw.to_string()),
        };
        self.attributes.insert(field.to_string(), value);
        self.touch();
        true
    }
}

impl fmt::Display for Record {
    /// Renders as `[<Class>] (<id>) {...}` with a dict-style attribute
    /// listing: id and timestamps first, then attributes in key order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ({}) {{'id': '{}'", self.kind, self.id, self.id)?;
        write!(
            f,
            ", 'created_at': '{}'",
            self.created_at.format(TIMESTAMP_FORMAT)
        )?;
        write!(
            f,
            ", 'updated_at': '{}'",
            self.updated_at.format(TIMESTAMP_FORMAT)
        )?;
        for (field, value) in &self.attributes {
            write!(f, ", '{}': {}", field, value)?;
        }
        write!(f, "}}")
    }
}

/// Build the composite lookup key for a class name and id
pub fn composite_key(class_name: &str, id: &str) -> String {
    format!("{}.{}", class_name, id)
}

mod timestamp {
    //! Serde adapter for the persisted timestamp strings

    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
