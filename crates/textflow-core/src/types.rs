//! Field values and tuples: the records that flow between operators.
//!
//! A `Tuple` carries only values; its shape is given by the `Schema` of the
//! operator that produced it, addressed positionally.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{FieldType, Schema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Null,
    String(String),
    Text(String),
    Integer(i64),
    Double(f64),
    Date(String),
    List(Vec<String>),
}

impl FieldValue {
    /// The field type this value belongs to; `None` for nulls.
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            FieldValue::Null => None,
            FieldValue::String(_) => Some(FieldType::String),
            FieldValue::Text(_) => Some(FieldType::Text),
            FieldValue::Integer(_) => Some(FieldType::Integer),
            FieldValue::Double(_) => Some(FieldType::Double),
            FieldValue::Date(_) => Some(FieldType::Date),
            FieldValue::List(_) => Some(FieldType::List),
        }
    }

    /// Nulls conform to every type.
    pub fn conforms_to(&self, ty: FieldType) -> bool {
        self.field_type().map_or(true, |t| t == ty)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) | FieldValue::Text(s) | FieldValue::Date(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a loosely typed JSON value into a value of `ty`.
    pub fn from_json(value: &serde_json::Value, ty: FieldType) -> Result<Self> {
        use serde_json::Value;

        let mismatch = || Error::TypeMismatch {
            expected: ty.to_string(),
            value: value.to_string(),
        };

        if value.is_null() {
            return Ok(FieldValue::Null);
        }
        match ty {
            FieldType::String => value
                .as_str()
                .map(|s| FieldValue::String(s.to_string()))
                .ok_or_else(mismatch),
            FieldType::Text => value
                .as_str()
                .map(|s| FieldValue::Text(s.to_string()))
                .ok_or_else(mismatch),
            FieldType::Date => value
                .as_str()
                .filter(|s| is_iso_date(s))
                .map(|s| FieldValue::Date(s.to_string()))
                .ok_or_else(mismatch),
            FieldType::Integer => value.as_i64().map(FieldValue::Integer).ok_or_else(mismatch),
            FieldType::Double => value.as_f64().map(FieldValue::Double).ok_or_else(mismatch),
            FieldType::List => match value {
                Value::Array(items) => items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).ok_or_else(mismatch))
                    .collect::<Result<Vec<_>>>()
                    .map(FieldValue::List),
                _ => Err(mismatch()),
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::String(s) | FieldValue::Text(s) | FieldValue::Date(s) => {
                Value::String(s.clone())
            }
            FieldValue::Integer(i) => Value::from(*i),
            FieldValue::Double(f) => Value::from(*f),
            FieldValue::List(items) => Value::from(items.clone()),
        }
    }
}

fn is_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tuple {
    pub fields: Vec<FieldValue>,
}

impl Tuple {
    pub fn new(fields: Vec<FieldValue>) -> Self {
        Self { fields }
    }

    pub fn field(&self, idx: usize) -> Option<&FieldValue> {
        self.fields.get(idx)
    }

    /// Look up a field by attribute name through the producing schema.
    pub fn get<'a>(&'a self, schema: &Schema, name: &str) -> Option<&'a FieldValue> {
        schema.index_of(name).and_then(|i| self.fields.get(i))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check arity and per-position types against `schema`.
    pub fn conforms_to(&self, schema: &Schema) -> bool {
        self.fields.len() == schema.len()
            && self
                .fields
                .iter()
                .zip(schema.iter())
                .all(|(v, a)| v.conforms_to(a.field_type))
    }

    /// Parse one JSON object into a tuple laid out by `schema`.
    /// Missing keys become nulls; extra keys are ignored.
    pub fn from_json_object(value: &serde_json::Value, schema: &Schema) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| Error::TypeMismatch {
            expected: "object".into(),
            value: value.to_string(),
        })?;
        let fields = schema
            .iter()
            .map(|attr| match obj.get(&attr.name) {
                Some(v) => FieldValue::from_json(v, attr.field_type),
                None => Ok(FieldValue::Null),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Tuple { fields })
    }

    /// Render as a JSON object keyed by attribute name, in schema order.
    pub fn to_json_object(&self, schema: &Schema) -> serde_json::Value {
        let mut obj = serde_json::Map::with_capacity(schema.len());
        for (attr, value) in schema.iter().zip(self.fields.iter()) {
            obj.insert(attr.name.clone(), value.to_json());
        }
        serde_json::Value::Object(obj)
    }
}
