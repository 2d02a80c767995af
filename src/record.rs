//! Record and field value model for ingested JSON rows

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single scalar field value as observed in the source JSON.
///
/// Nested arrays and objects are not supported as native columns and are
/// carried as their serialized text form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Absent or explicit JSON null
    Null,
    /// Whole number
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// String (also the fallback for booleans, arrays, and objects)
    Text(String),
}

impl FieldValue {
    /// Whether this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Convert a parsed JSON value into a field value
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Integer(i)
                } else {
                    FieldValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Bool(b) => FieldValue::Text(b.to_string()),
            // Arrays and objects degrade to their serialized form
            other => FieldValue::Text(other.to_string()),
        }
    }
}

/// One JSON record: an ordered mapping from field name to scalar value.
///
/// Field order is first-seen order from the source document. Different
/// records in the same batch may carry different field sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a JSON object, preserving key order.
    ///
    /// Returns `None` when the value is not an object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let fields = obj
            .iter()
            .map(|(k, v)| (k.clone(), FieldValue::from_json(v)))
            .collect();
        Some(Self { fields })
    }

    /// Append a field. Keeps insertion order; duplicate names are not merged.
    pub fn push(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.push((name.into(), value));
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Field names in first-seen order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render the record back to a JSON object (for the failure artifact)
    pub fn to_json(&self) -> Value {
        let mut obj = serde_json::Map::new();
        for (k, v) in &self.fields {
            let jv = match v {
                FieldValue::Null => Value::Null,
                FieldValue::Integer(i) => Value::from(*i),
                FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                FieldValue::Text(s) => Value::String(s.clone()),
            };
            obj.insert(k.clone(), jv);
        }
        Value::Object(obj)
    }
}
