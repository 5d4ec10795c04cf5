// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only view of map features as seen by filters and predicates.
//!
//! Features are owned by the map renderer (or whatever produced them). The style core only needs
//! an identifier and scalar properties, so it talks to features through [`FeatureProperties`].

extern crate alloc;

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

use core::fmt;

/// A scalar feature property value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// A string value (OSM tags are always strings).
    String(String),
    /// A numeric value.
    Number(f64),
    /// A boolean value.
    Bool(bool),
}

impl PropertyValue {
    /// Returns the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts a JSON value into a property value.
    ///
    /// Returns `None` for `null`, arrays and objects; vector tiles only carry scalars.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Self::String(s.clone())),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number),
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Null
            | serde_json::Value::Array(_)
            | serde_json::Value::Object(_) => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// The feature data a predicate can observe.
///
/// Implementations must be cheap to query: predicates call into this once per expression node.
pub trait FeatureProperties {
    /// Returns the feature's stable identifier, if it has one.
    fn feature_id(&self) -> Option<i64>;

    /// Returns the value of property `key`, if present.
    fn property(&self, key: &str) -> Option<&PropertyValue>;

    /// Iterates over all properties in key order.
    fn properties(&self) -> Box<dyn Iterator<Item = (&str, &PropertyValue)> + '_>;
}

/// An owned identifier + property map.
///
/// Properties are kept in key order so that anything derived from them (rule suggestions, debug
/// output) is deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyBag {
    id: Option<i64>,
    values: BTreeMap<String, PropertyValue>,
}

impl PropertyBag {
    /// Creates an empty bag without an identifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the feature identifier.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Adds (or replaces) a property.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts (or replaces) a property.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Sets or clears the feature identifier.
    pub fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FeatureProperties for PropertyBag {
    fn feature_id(&self) -> Option<i64> {
        self.id
    }

    fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    fn properties(&self) -> Box<dyn Iterator<Item = (&str, &PropertyValue)> + '_> {
        Box::new(self.values.iter().map(|(k, v)| (k.as_str(), v)))
    }
}

impl<T: FeatureProperties + ?Sized> FeatureProperties for &T {
    fn feature_id(&self) -> Option<i64> {
        (**self).feature_id()
    }

    fn property(&self, key: &str) -> Option<&PropertyValue> {
        (**self).property(key)
    }

    fn properties(&self) -> Box<dyn Iterator<Item = (&str, &PropertyValue)> + '_> {
        (**self).properties()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn json_scalars_convert_and_containers_are_dropped() {
        assert_eq!(
            PropertyValue::from_json(&serde_json::Value::from("park")),
            Some(PropertyValue::String("park".into()))
        );
        assert_eq!(
            PropertyValue::from_json(&serde_json::Value::from(3)),
            Some(PropertyValue::Number(3.0))
        );
        assert_eq!(PropertyValue::from_json(&serde_json::Value::Null), None);
        assert_eq!(
            PropertyValue::from_json(&serde_json::Value::Array(Vec::new())),
            None
        );
    }

    #[test]
    fn bag_iterates_in_key_order() {
        let bag = PropertyBag::new()
            .with("name", "Main St")
            .with("highway", "residential")
            .with_id(7);
        let keys: Vec<&str> = bag.properties().map(|(k, _)| k).collect();
        assert_eq!(keys, ["highway", "name"]);
        assert_eq!(bag.feature_id(), Some(7));
    }
}
