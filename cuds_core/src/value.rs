//! Attribute values and sparse attribute rows.

use std::collections::btree_map::{self, BTreeMap};

use uuid::Uuid;

use crate::error::Result;
use crate::keys::AttributeKey;

/// A single attribute value.
///
/// Numeric variants are what columns store; `Null` is an explicit null
/// distinct from any numeric default. `Text`, `Uid` and `Float9` exist so that
/// rows can carry non-representable keys; columnar storage ignores them.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Floating point scalar.
    Float(f64),
    /// Integer scalar.
    Int(i64),
    /// Floating point 3-vector.
    Float3([f64; 3]),
    /// Integer 3-vector.
    Int3([i64; 3]),
    /// Floating point 3x3 matrix (row-major).
    Float9([f64; 9]),
    /// Text.
    Text(String),
    /// Identifier.
    Uid(Uuid),
    /// Explicit null.
    Null,
}

impl AttributeValue {
    /// True for the explicit null marker.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Equality that treats NaN components as equal to each other.
    pub fn same_as(&self, other: &AttributeValue) -> bool {
        fn eq(a: f64, b: f64) -> bool {
            a == b || (a.is_nan() && b.is_nan())
        }
        match (self, other) {
            (AttributeValue::Float(a), AttributeValue::Float(b)) => eq(*a, *b),
            (AttributeValue::Float3(a), AttributeValue::Float3(b)) => {
                a.iter().zip(b).all(|(x, y)| eq(*x, *y))
            }
            (AttributeValue::Float9(a), AttributeValue::Float9(b)) => {
                a.iter().zip(b).all(|(x, y)| eq(*x, *y))
            }
            _ => self == other,
        }
    }

    /// Floating scalar payload, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer scalar payload, if any.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<[f64; 3]> for AttributeValue {
    fn from(v: [f64; 3]) -> Self {
        AttributeValue::Float3(v)
    }
}

impl From<[i64; 3]> for AttributeValue {
    fn from(v: [i64; 3]) -> Self {
        AttributeValue::Int3(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_string())
    }
}

/// A sparse row: mapping from attribute key to value.
///
/// Keys iterate in registry order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataContainer {
    values: BTreeMap<AttributeKey, AttributeValue>,
}

impl DataContainer {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value after checking it against the key's type and shape.
    ///
    /// # Errors
    /// Returns `Type` when the value does not match the key.
    pub fn insert(
        &mut self,
        key: AttributeKey,
        value: impl Into<AttributeValue>,
    ) -> Result<Option<AttributeValue>> {
        let value = value.into();
        key.check_value(&value)?;
        Ok(self.values.insert(key, value))
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: AttributeKey, value: impl Into<AttributeValue>) -> Result<Self> {
        self.insert(key, value)?;
        Ok(self)
    }

    /// Value for `key`, if present.
    pub fn get(&self, key: AttributeKey) -> Option<&AttributeValue> {
        self.values.get(&key)
    }

    /// Remove and return the value for `key`.
    pub fn remove(&mut self, key: AttributeKey) -> Option<AttributeValue> {
        self.values.remove(&key)
    }

    /// True if the row has a value (possibly null) for `key`.
    pub fn contains_key(&self, key: AttributeKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Number of keys present.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no keys are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keys present in the row.
    pub fn keys(&self) -> impl Iterator<Item = AttributeKey> + '_ {
        self.values.keys().copied()
    }

    /// Key/value pairs in registry order.
    pub fn iter(&self) -> btree_map::Iter<'_, AttributeKey, AttributeValue> {
        self.values.iter()
    }

    /// Equality that treats NaN components as equal to each other.
    pub fn same_as(&self, other: &DataContainer) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(*k).map_or(false, |o| v.same_as(o)))
    }
}

impl<'a> IntoIterator for &'a DataContainer {
    type Item = (&'a AttributeKey, &'a AttributeValue);
    type IntoIter = btree_map::Iter<'a, AttributeKey, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl IntoIterator for DataContainer {
    type Item = (AttributeKey, AttributeValue);
    type IntoIter = btree_map::IntoIter<AttributeKey, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
