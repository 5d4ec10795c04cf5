// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-feature matching filters.
//!
//! A [`FilterExpression`] is what a user picks when creating a rule ("objects with key
//! `highway`", "objects `natural=water`", "this specific object"). It compiles to a
//! [`Predicate`] and renders a short label for rule lists and exported layer names.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::feature::FeatureProperties;
use crate::predicate::Predicate;
use crate::text::title_case;

/// Pseudo-key that makes a [`FilterExpression::KeyValue`] compare against the feature id.
pub const ID_PSEUDO_KEY: &str = "$id";

/// Property keys that are never offered as rule suggestions.
const HIDDEN_PROPERTIES: [&str; 3] = ["website", "latitude", "longitude"];

/// A predicate over a single feature's properties or identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FilterExpression {
    /// Matches features that carry `key`.
    KeyPresence {
        /// Property key.
        key: String,
    },
    /// Matches features whose `key` property is the string `value`.
    ///
    /// With `key == "$id"` and an integer `value`, matches on the feature id instead.
    KeyValue {
        /// Property key.
        key: String,
        /// Expected value.
        value: String,
    },
    /// Matches the single feature with this identifier.
    Identity {
        /// Feature identifier.
        id: i64,
    },
}

impl FilterExpression {
    /// Creates a key presence filter.
    pub fn key_presence(key: impl Into<String>) -> Self {
        Self::KeyPresence { key: key.into() }
    }

    /// Creates a key/value filter.
    pub fn key_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::KeyValue {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates an identity filter.
    pub fn identity(id: i64) -> Self {
        Self::Identity { id }
    }

    /// Compiles the filter into a predicate.
    ///
    /// A `$id` key whose value is not an integer falls back to a plain property comparison, which
    /// only matches features that really carry a `$id` property.
    pub fn compile(&self) -> Predicate {
        match self {
            Self::KeyPresence { key } => Predicate::Has(key.clone()),
            Self::KeyValue { key, value } => match value.parse::<i64>() {
                Ok(id) if key == ID_PSEUDO_KEY => Predicate::IdEquals(id),
                _ => Predicate::PropertyEquals {
                    key: key.clone(),
                    value: value.clone(),
                },
            },
            Self::Identity { id } => Predicate::IdEquals(*id),
        }
    }

    /// Returns a short human-readable label, e.g. `"Highway Motorway"` or `"#1234"`.
    pub fn summarize(&self) -> String {
        match self {
            Self::KeyPresence { key } => title_case(key),
            Self::KeyValue { key, value } => title_case(&format!("{key} {value}")),
            Self::Identity { id } => format!("#{id}"),
        }
    }

    /// Returns the filters a user can choose from after clicking `feature`.
    ///
    /// The identity filter comes first, then a presence and a key/value filter for each
    /// displayable property, in key order.
    pub fn suggestions_for<F: FeatureProperties + ?Sized>(feature: &F) -> Vec<Self> {
        let mut out = Vec::new();
        if let Some(id) = feature.feature_id() {
            out.push(Self::identity(id));
        }
        for (key, value) in feature.properties() {
            if !is_displayable_property(key) {
                continue;
            }
            out.push(Self::key_presence(key));
            out.push(Self::key_value(key, value.to_string()));
        }
        out
    }
}

/// Returns `true` if a property is worth showing to a user.
///
/// Namespaced keys (`name:de`, `source:geometry`) are hidden except for `addr:*`, as are
/// all-caps import artifacts and a few coordinate/URL keys.
pub fn is_displayable_property(key: &str) -> bool {
    if key.contains(':') && !key.starts_with("addr:") {
        return false;
    }
    if key.chars().any(char::is_alphabetic) && key == key.to_uppercase() {
        return false;
    }
    !HIDDEN_PROPERTIES
        .iter()
        .any(|hidden| key.eq_ignore_ascii_case(hidden))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::feature::PropertyBag;

    #[test]
    fn compiles_each_kind() {
        assert_eq!(
            FilterExpression::key_presence("highway").compile(),
            Predicate::Has("highway".into())
        );
        assert_eq!(
            FilterExpression::key_value("natural", "water").compile(),
            Predicate::PropertyEquals {
                key: "natural".into(),
                value: "water".into(),
            }
        );
        assert_eq!(
            FilterExpression::identity(99).compile(),
            Predicate::IdEquals(99)
        );
    }

    #[test]
    fn id_pseudo_key_compares_identifier() {
        let filter = FilterExpression::key_value(ID_PSEUDO_KEY, "1234");
        assert_eq!(filter.compile(), Predicate::IdEquals(1234));
        let feature = PropertyBag::new().with_id(1234);
        assert!(filter.compile().evaluate(&feature));
    }

    #[test]
    fn non_numeric_id_value_never_matches_identifiers() {
        let filter = FilterExpression::key_value(ID_PSEUDO_KEY, "abc");
        let feature = PropertyBag::new().with_id(1234);
        assert!(!filter.compile().evaluate(&feature));
    }

    #[test]
    fn summaries_are_title_cased() {
        assert_eq!(
            FilterExpression::key_presence("highway").summarize(),
            "Highway"
        );
        assert_eq!(
            FilterExpression::key_value("highway", "motorway").summarize(),
            "Highway Motorway"
        );
        assert_eq!(FilterExpression::identity(17).summarize(), "#17");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let filter = FilterExpression::key_value("leisure", "park");
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "key-value", "key": "leisure", "value": "park"})
        );
        let back: FilterExpression = serde_json::from_value(json).unwrap();
        assert_eq!(back, filter);
    }

    #[test]
    fn suggestions_skip_hidden_properties() {
        let feature = PropertyBag::new()
            .with_id(5)
            .with("highway", "residential")
            .with("name:de", "Hauptstrasse")
            .with("addr:street", "Main")
            .with("FIXME", "check")
            .with("website", "https://example.com");
        let suggestions = FilterExpression::suggestions_for(&feature);
        assert_eq!(
            suggestions,
            vec![
                FilterExpression::identity(5),
                FilterExpression::key_presence("addr:street"),
                FilterExpression::key_value("addr:street", "Main"),
                FilterExpression::key_presence("highway"),
                FilterExpression::key_value("highway", "residential"),
            ]
        );
    }
}
