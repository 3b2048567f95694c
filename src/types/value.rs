//! Values that can be carried in an LLSD document.
//!
//! This module provides the [`Value`] enum, which represents every type
//! the LLSD serialization formats can express.
//!
//! # Example
//!
//! ```
//! use llsd::Value;
//!
//! // Create values via From trait
//! let name: Value = "Alice".into();
//! let age: Value = 30i64.into();
//! let score: Value = 95.5f64.into();
//! let active: Value = true.into();
//!
//! // Access typed values
//! assert_eq!(name.as_str(), Some("Alice"));
//! assert_eq!(age.as_integer(), Some(30));
//! assert_eq!(score.as_real(), Some(95.5));
//! assert_eq!(active.as_bool(), Some(true));
//!
//! // Links are a distinct variant from plain strings
//! let link = Value::uri("http://example.com/");
//! assert!(link.as_str().is_none());
//! assert_eq!(link.as_uri(), Some("http://example.com/"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LlsdError;

/// A value that can be serialized to or from an LLSD document.
///
/// This enum is the complete, closed universe of LLSD types. Every wire
/// format codec matches on it exhaustively, so adding a variant forces
/// every codec to handle it.
///
/// # Supported Types
///
/// | Variant | Rust Type | Wire Tag |
/// |---------|-----------|----------|
/// | `Undef` | - | `undef` |
/// | `Boolean` | `bool` | `boolean` |
/// | `Integer` | `i64` | `integer` |
/// | `Real` | `f64` | `real` |
/// | `Uuid` | `Uuid` | `uuid` |
/// | `String` | `String` | `string` |
/// | `Binary` | `Vec<u8>` | `binary` |
/// | `Date` | `DateTime<Utc>` | `date` |
/// | `Uri` | `String` | `uri` |
/// | `Map` | `Vec<(String, Value)>` | `map` |
/// | `Array` | `Vec<Value>` | `array` |
///
/// # Maps
///
/// Maps are ordered association lists: entry order is significant and
/// survives a round-trip through any codec. Keys are strings by
/// construction and must stay unique; [`Value::map`] and the decoder both
/// overwrite the value of an existing key in place rather than appending
/// a duplicate.
///
/// # Equality
///
/// Equality is variant-and-payload exact. `String("")` is not `Undef`,
/// and `Uri("")` is not `String("")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// No value
    Undef,
    /// Boolean value
    Boolean(bool),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Real(f64),
    /// 128-bit identifier
    Uuid(Uuid),
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Binary(Vec<u8>),
    /// Instant in time, microsecond resolution, always UTC
    Date(DateTime<Utc>),
    /// Link to a resource, distinct from a plain string
    Uri(String),
    /// Ordered map with unique string keys
    Map(Vec<(String, Value)>),
    /// Ordered list of values
    Array(Vec<Value>),
}

impl Value {
    /// Returns `true` if the value is undefined.
    #[inline]
    #[must_use]
    pub const fn is_undef(&self) -> bool {
        matches!(self, Self::Undef)
    }

    /// Returns the value as a boolean if it is one.
    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as an integer if it is one.
    #[inline]
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a real if it is one.
    #[inline]
    #[must_use]
    pub const fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Returns the value as a UUID if it is one.
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is a string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a byte slice if it is binary.
    #[inline]
    #[must_use]
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as a timestamp if it is one.
    #[inline]
    #[must_use]
    pub const fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the value as a URI string slice if it is one.
    #[inline]
    #[must_use]
    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Self::Uri(u) => Some(u),
            _ => None,
        }
    }

    /// Returns the value as a slice of map entries if it is a map.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&[(String, Value)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the value as a slice of members if it is an array.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Looks up a map entry by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Creates a URI value.
    #[must_use]
    pub fn uri(uri: impl Into<String>) -> Self {
        Self::Uri(uri.into())
    }

    /// Creates a map value from key/value pairs, preserving order.
    ///
    /// A repeated key overwrites the value at its first position instead
    /// of appending a duplicate entry.
    #[must_use]
    pub fn map(entries: impl IntoIterator<Item = (impl Into<String>, Value)>) -> Self {
        let mut out: Vec<(String, Value)> = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            if let Some(slot) = out.iter_mut().find(|(k, _)| *k == key) {
                slot.1 = value;
            } else {
                out.push((key, value));
            }
        }
        Self::Map(out)
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(r: f64) -> Self {
        Self::Real(r)
    }
}

impl From<Uuid> for Value {
    #[inline]
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<Vec<u8>> for Value {
    #[inline]
    fn from(b: Vec<u8>) -> Self {
        Self::Binary(b)
    }
}

impl From<DateTime<Utc>> for Value {
    #[inline]
    fn from(d: DateTime<Utc>) -> Self {
        Self::Date(d)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(values: Vec<Value>) -> Self {
        Self::Array(values)
    }
}

impl From<Vec<(String, Value)>> for Value {
    #[inline]
    fn from(entries: Vec<(String, Value)>) -> Self {
        Self::Map(entries)
    }
}

/// Builds a map from untyped key/value pairs.
///
/// This is the fallible boundary for callers holding dynamically typed
/// keys: every key must be a [`Value::String`].
impl TryFrom<Vec<(Value, Value)>> for Value {
    type Error = LlsdError;

    fn try_from(pairs: Vec<(Value, Value)>) -> Result<Self, Self::Error> {
        let mut entries: Vec<(String, Value)> = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let Self::String(key) = key else {
                return Err(LlsdError::InvalidKeyType);
            };
            if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
                slot.1 = value;
            } else {
                entries.push((key, value));
            }
        }
        Ok(Self::Map(entries))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn value_type_checks() {
        assert!(Value::Undef.is_undef());
        assert!(!Value::Boolean(true).is_undef());
    }

    #[test]
    fn value_conversions() {
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(42i64).as_integer(), Some(42));
        assert_eq!(Value::from(2.5f64).as_real(), Some(2.5));
        assert_eq!(Value::from("hello").as_str(), Some("hello"));
        assert_eq!(Value::from(vec![1u8, 2, 3]).as_binary(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn empty_string_is_not_undef() {
        assert_ne!(Value::String(String::new()), Value::Undef);
    }

    #[test]
    fn uri_is_not_string() {
        assert_ne!(Value::uri(""), Value::String(String::new()));
        assert_ne!(Value::uri("http://a/"), Value::String("http://a/".to_owned()));
    }

    #[test]
    fn map_lookup_by_key() {
        let map = Value::map([("a", Value::Integer(1)), ("b", Value::Integer(2))]);
        assert_eq!(map.get("b"), Some(&Value::Integer(2)));
        assert_eq!(map.get("c"), None);
    }

    #[test]
    fn map_constructor_overwrites_duplicate_keys_in_place() {
        let map = Value::map([
            ("a", Value::Integer(1)),
            ("b", Value::Integer(2)),
            ("a", Value::Integer(3)),
        ]);
        assert_eq!(
            map.as_map().unwrap(),
            &[("a".to_owned(), Value::Integer(3)), ("b".to_owned(), Value::Integer(2))]
        );
    }

    #[test]
    fn map_from_typed_pairs() {
        let pairs = vec![
            (Value::String("name".to_owned()), Value::String("Alice".to_owned())),
            (Value::String("age".to_owned()), Value::Integer(30)),
        ];
        let map = Value::try_from(pairs).unwrap();
        assert_eq!(map.get("age"), Some(&Value::Integer(30)));
    }

    #[test]
    fn map_from_pairs_rejects_non_string_key() {
        let pairs = vec![(Value::Integer(1), Value::String("one".to_owned()))];
        assert!(matches!(Value::try_from(pairs), Err(LlsdError::InvalidKeyType)));
    }

    #[test]
    fn array_preserves_order() {
        let array = Value::Array(vec![Value::Integer(3), Value::Integer(1), Value::Integer(2)]);
        let members = array.as_array().unwrap();
        assert_eq!(members[0], Value::Integer(3));
        assert_eq!(members[2], Value::Integer(2));
    }
}
