// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boolean expression trees over feature properties.
//!
//! A [`Predicate`] is the compiled form of one or more filters. It has two interchangeable
//! representations:
//! - the Rust tree, which [`Predicate::evaluate`] runs against a feature, and
//! - Mapbox GL expression JSON (`["has", "highway"]`, `["all", ...]`, ...), which the map renderer
//!   evaluates.
//!
//! Both must agree, so evaluation follows the renderer's semantics: `all` of nothing is true,
//! `any` of nothing is false, and `==` never coerces between strings and numbers.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::feature::FeatureProperties;

/// Errors returned when parsing expression JSON with [`Predicate::from_json`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExpressionError {
    /// The value is not an expression array.
    #[error("expected an expression array, found {0}")]
    NotAnExpression(&'static str),
    /// The expression array is empty or its operator is not a string.
    #[error("expression is missing its operator")]
    MissingOperator,
    /// The operator is valid JSON but not one this crate understands.
    #[error("unsupported expression operator `{0}`")]
    UnsupportedOperator(String),
    /// The operator is known but its arguments do not fit.
    #[error("malformed `{0}` expression")]
    Malformed(String),
}

/// A boolean expression tree over feature properties and identifiers.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// `["has", key]`
    Has(String),
    /// `["==", value, ["get", key]]`
    PropertyEquals {
        /// Property key.
        key: String,
        /// Expected string value.
        value: String,
    },
    /// `["==", id, ["id"]]`
    IdEquals(i64),
    /// `["all", ...]`
    All(Vec<Self>),
    /// `["any", ...]`
    Any(Vec<Self>),
    /// `["!", expr]`
    Not(Box<Self>),
}

impl Predicate {
    /// Negates a predicate.
    pub fn negate(inner: Self) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Evaluates the predicate for a feature.
    pub fn evaluate<F: FeatureProperties + ?Sized>(&self, feature: &F) -> bool {
        match self {
            Self::Has(key) => feature.property(key).is_some(),
            Self::PropertyEquals { key, value } => feature
                .property(key)
                .and_then(|v| v.as_str())
                .is_some_and(|v| v == value),
            Self::IdEquals(id) => feature.feature_id() == Some(*id),
            Self::All(items) => items.iter().all(|p| p.evaluate(feature)),
            Self::Any(items) => items.iter().any(|p| p.evaluate(feature)),
            Self::Not(inner) => !inner.evaluate(feature),
        }
    }

    /// Renders the predicate as Mapbox GL expression JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Has(key) => Value::Array(vec!["has".into(), key.as_str().into()]),
            Self::PropertyEquals { key, value } => Value::Array(vec![
                "==".into(),
                value.as_str().into(),
                Value::Array(vec!["get".into(), key.as_str().into()]),
            ]),
            Self::IdEquals(id) => Value::Array(vec![
                "==".into(),
                (*id).into(),
                Value::Array(vec!["id".into()]),
            ]),
            Self::All(items) => variadic("all", items),
            Self::Any(items) => variadic("any", items),
            Self::Not(inner) => Value::Array(vec!["!".into(), inner.to_json()]),
        }
    }

    /// Parses Mapbox GL expression JSON produced by [`Predicate::to_json`].
    ///
    /// The operand order of `==` is not significant, so `["==", ["get", k], v]` is accepted too.
    pub fn from_json(value: &Value) -> Result<Self, ExpressionError> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(ExpressionError::NotAnExpression(json_kind(other))),
        };
        let Some(Value::String(op)) = items.first() else {
            return Err(ExpressionError::MissingOperator);
        };
        let args = &items[1..];
        match op.as_str() {
            "has" => match args {
                [Value::String(key)] => Ok(Self::Has(key.clone())),
                _ => Err(ExpressionError::Malformed(op.clone())),
            },
            "==" => match args {
                [lhs, rhs] => parse_equality(lhs, rhs)
                    .or_else(|| parse_equality(rhs, lhs))
                    .ok_or_else(|| ExpressionError::Malformed(op.clone())),
                _ => Err(ExpressionError::Malformed(op.clone())),
            },
            "all" => args
                .iter()
                .map(Self::from_json)
                .collect::<Result<_, _>>()
                .map(Self::All),
            "any" => args
                .iter()
                .map(Self::from_json)
                .collect::<Result<_, _>>()
                .map(Self::Any),
            "!" => match args {
                [inner] => Ok(Self::negate(Self::from_json(inner)?)),
                _ => Err(ExpressionError::Malformed(op.clone())),
            },
            other => Err(ExpressionError::UnsupportedOperator(other.to_string())),
        }
    }
}

fn variadic(op: &str, items: &[Predicate]) -> Value {
    let mut out = Vec::with_capacity(items.len() + 1);
    out.push(Value::from(op));
    out.extend(items.iter().map(Predicate::to_json));
    Value::Array(out)
}

fn parse_equality(literal: &Value, accessor: &Value) -> Option<Predicate> {
    let Value::Array(accessor) = accessor else {
        return None;
    };
    match (accessor.as_slice(), literal) {
        ([Value::String(get), Value::String(key)], Value::String(value)) if get == "get" => {
            Some(Predicate::PropertyEquals {
                key: key.clone(),
                value: value.clone(),
            })
        }
        ([Value::String(id)], Value::Number(n)) if id == "id" => n.as_i64().map(Predicate::IdEquals),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Predicate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::feature::PropertyBag;

    fn motorway() -> PropertyBag {
        PropertyBag::new().with("highway", "motorway").with_id(42)
    }

    #[test]
    fn evaluates_leaf_predicates() {
        let f = motorway();
        assert!(Predicate::Has("highway".into()).evaluate(&f));
        assert!(!Predicate::Has("building".into()).evaluate(&f));
        assert!(
            Predicate::PropertyEquals {
                key: "highway".into(),
                value: "motorway".into(),
            }
            .evaluate(&f)
        );
        assert!(Predicate::IdEquals(42).evaluate(&f));
        assert!(!Predicate::IdEquals(43).evaluate(&f));
    }

    #[test]
    fn empty_combinators_follow_renderer_semantics() {
        let f = motorway();
        assert!(Predicate::All(vec![]).evaluate(&f));
        assert!(!Predicate::Any(vec![]).evaluate(&f));
        assert!(Predicate::negate(Predicate::Any(vec![])).evaluate(&f));
    }

    #[test]
    fn equality_does_not_coerce_numbers() {
        let f = PropertyBag::new().with("lanes", 2.0);
        let p = Predicate::PropertyEquals {
            key: "lanes".into(),
            value: "2".into(),
        };
        assert!(!p.evaluate(&f));
    }

    #[test]
    fn json_shape_matches_mapbox_expressions() {
        let p = Predicate::All(vec![
            Predicate::PropertyEquals {
                key: "highway".into(),
                value: "motorway".into(),
            },
            Predicate::negate(Predicate::Any(vec![
                Predicate::Has("building".into()),
                Predicate::IdEquals(7),
            ])),
        ]);
        let expected = serde_json::json!([
            "all",
            ["==", "motorway", ["get", "highway"]],
            ["!", ["any", ["has", "building"], ["==", 7, ["id"]]]]
        ]);
        assert_eq!(p.to_json(), expected);
        assert_eq!(Predicate::from_json(&expected), Ok(p));
    }

    #[test]
    fn parses_swapped_equality_operands() {
        let v = serde_json::json!(["==", ["get", "natural"], "water"]);
        assert_eq!(
            Predicate::from_json(&v),
            Ok(Predicate::PropertyEquals {
                key: "natural".into(),
                value: "water".into(),
            })
        );
    }

    #[test]
    fn rejects_unknown_and_malformed_expressions() {
        assert_eq!(
            Predicate::from_json(&serde_json::json!(["in", "a", "b"])),
            Err(ExpressionError::UnsupportedOperator("in".into()))
        );
        assert_eq!(
            Predicate::from_json(&serde_json::json!(["has"])),
            Err(ExpressionError::Malformed("has".into()))
        );
        assert_eq!(
            Predicate::from_json(&serde_json::json!({"has": "x"})),
            Err(ExpressionError::NotAnExpression("an object"))
        );
        assert_eq!(
            Predicate::from_json(&serde_json::json!([])),
            Err(ExpressionError::MissingOperator)
        );
    }

    #[test]
    fn serde_uses_expression_json() {
        let p = Predicate::negate(Predicate::Has("leisure".into()));
        let text = serde_json::to_string(&p).unwrap();
        assert_eq!(text, r#"["!",["has","leisure"]]"#);
        let back: Predicate = serde_json::from_str(&text).unwrap();
        assert_eq!(back, p);
    }
}
