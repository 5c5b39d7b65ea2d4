//! Property tree representation.
//!
//! A document's extracted data is held as a tree of `PropertyValue`s: ordered
//! mappings, sequences and scalars. Mappings use `IndexMap` so insertion order
//! survives merging and lookup-key extraction.
//!
//! # Example
//!
//! ```
//! use docs_enricher::document::node::{PropertyMap, PropertyValue, PropertyNumber};
//!
//! let mut author = PropertyMap::new();
//! author.insert("id".to_string(), PropertyValue::from("2"));
//! author.insert("age".to_string(), PropertyValue::Number(PropertyNumber::Integer(42)));
//!
//! let authors = PropertyValue::Array(vec![PropertyValue::Object(author)]);
//! assert!(authors.is_array());
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An insertion-ordered mapping from property names to values.
pub type PropertyMap = IndexMap<String, PropertyValue>;

/// Numeric property values (integer or float).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyNumber {
    Integer(i64),
    Float(f64),
}

impl fmt::Display for PropertyNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyNumber::Integer(i) => write!(f, "{}", i),
            PropertyNumber::Float(fl) => write!(f, "{}", fl),
        }
    }
}

impl PropertyNumber {
    pub fn as_f64(&self) -> f64 {
        match self {
            PropertyNumber::Integer(i) => *i as f64,
            PropertyNumber::Float(f) => *f,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, PropertyNumber::Integer(_))
    }
}

/// A node in a property tree.
///
/// The tree is a closed union: every value is a mapping, a sequence or a
/// scalar. Selector evaluation and tree merging match on it exhaustively.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// A JSON null / absent scalar
    #[default]
    Null,
    /// A boolean scalar
    Boolean(bool),
    /// A numeric scalar
    Number(PropertyNumber),
    /// A string scalar
    String(String),
    /// An ordered sequence of values
    Array(Vec<PropertyValue>),
    /// An ordered mapping of named values
    Object(PropertyMap),
}

/// The runtime shape of a value, used to filter selection results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Mapping values (`PropertyValue::Object`)
    Object,
    /// Sequence values (`PropertyValue::Array`)
    Array,
    /// Strings, numbers, booleans and null
    Scalar,
}

impl PropertyValue {
    /// Returns true if this value is an object.
    ///
    /// # Example
    ///
    /// ```
    /// use docs_enricher::document::node::{PropertyMap, PropertyValue};
    ///
    /// assert!(PropertyValue::Object(PropertyMap::new()).is_object());
    /// assert!(!PropertyValue::from(42).is_object());
    /// ```
    pub fn is_object(&self) -> bool {
        matches!(self, PropertyValue::Object(_))
    }

    /// Returns true if this value is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, PropertyValue::Array(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// Returns the shape of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::Object(_) => ValueKind::Object,
            PropertyValue::Array(_) => ValueKind::Array,
            PropertyValue::Null
            | PropertyValue::Boolean(_)
            | PropertyValue::Number(_)
            | PropertyValue::String(_) => ValueKind::Scalar,
        }
    }

    pub fn as_object(&self) -> Option<&PropertyMap> {
        match self {
            PropertyValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut PropertyMap> {
        match self {
            PropertyValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<PropertyValue>> {
        match self {
            PropertyValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Scalars render as their plain text; containers render as compact JSON.
impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => write!(f, "null"),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::String(s) => write!(f, "{}", s),
            PropertyValue::Array(_) | PropertyValue::Object(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                write!(f, "{}", json)
            }
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Number(PropertyNumber::Integer(value))
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Number(PropertyNumber::Integer(i64::from(value)))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(PropertyNumber::Float(value))
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<PropertyMap> for PropertyValue {
    fn from(value: PropertyMap) -> Self {
        PropertyValue::Object(value)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(value: Vec<PropertyValue>) -> Self {
        PropertyValue::Array(value)
    }
}
