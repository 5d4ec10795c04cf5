// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style rules: a filter plus the paint applied to what it matches.

extern crate alloc;

use alloc::string::String;

use core::fmt;

use peniko::color::palette::css;
use serde::{Deserialize, Serialize};

use crate::filter::FilterExpression;
use crate::treatment::{FillTreatment, LineTreatment, Treatment};

/// Stroke width given to freshly created rules.
pub const SUGGESTED_LINE_WIDTH: f64 = 5.0;

/// Caller-assigned rule identity. Stable across reorders and edits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    /// Creates a rule id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RuleId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A filter and the paint applied to the features it (effectively) matches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RuleRecord", into = "RuleRecord")]
pub struct StyleRule {
    /// Stable identity.
    pub id: RuleId,
    /// Which features the rule targets.
    pub filter: FilterExpression,
    /// Paint for matched features.
    pub treatment: Treatment,
}

impl StyleRule {
    /// Creates an unstyled rule.
    pub fn new(id: impl Into<RuleId>, filter: FilterExpression) -> Self {
        Self {
            id: id.into(),
            filter,
            treatment: Treatment::Unstyled,
        }
    }

    /// Creates a rule the way the rule picker does: a solid red 5px line.
    pub fn suggested(id: impl Into<RuleId>, filter: FilterExpression) -> Self {
        Self::new(id, filter).with_line(LineTreatment::solid(SUGGESTED_LINE_WIDTH, css::RED))
    }

    /// Sets (or replaces) the stroke paint.
    pub fn with_line(mut self, line: LineTreatment) -> Self {
        let (_, fill) = self.treatment.into_parts();
        self.treatment = Treatment::from_parts(Some(line), fill);
        self
    }

    /// Sets (or replaces) the fill paint.
    pub fn with_fill(mut self, fill: FillTreatment) -> Self {
        let (line, _) = self.treatment.into_parts();
        self.treatment = Treatment::from_parts(line, Some(fill));
        self
    }

    /// Removes the stroke paint.
    pub fn without_line(mut self) -> Self {
        let (_, fill) = self.treatment.into_parts();
        self.treatment = Treatment::from_parts(None, fill);
        self
    }

    /// Removes the fill paint.
    pub fn without_fill(mut self) -> Self {
        let (line, _) = self.treatment.into_parts();
        self.treatment = Treatment::from_parts(line, None);
        self
    }
}

/// Wire shape of a rule: optional `line` and `fill` objects next to the filter.
///
/// Unknown keys are rejected, so a misspelled or foreign treatment (`stroke`, `lineStyle`) fails
/// to decode instead of producing an unstyled rule.
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleRecord {
    id: RuleId,
    filter: FilterExpression,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    line: Option<LineTreatment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fill: Option<FillTreatment>,
}

impl From<RuleRecord> for StyleRule {
    fn from(record: RuleRecord) -> Self {
        Self {
            id: record.id,
            filter: record.filter,
            treatment: Treatment::from_parts(record.line, record.fill),
        }
    }
}

impl From<StyleRule> for RuleRecord {
    fn from(rule: StyleRule) -> Self {
        let (line, fill) = rule.treatment.into_parts();
        Self {
            id: rule.id,
            filter: rule.filter,
            line,
            fill,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn builder_composes_treatments() {
        let rule = StyleRule::new("r1", FilterExpression::key_presence("building"))
            .with_fill(FillTreatment::new(css::GRAY))
            .with_line(LineTreatment::solid(1.0, css::BLACK));
        assert!(matches!(rule.treatment, Treatment::LineAndFill { .. }));
        let rule = rule.without_fill().without_line();
        assert!(rule.treatment.is_unstyled());
    }

    #[test]
    fn json_uses_optional_line_and_fill() {
        let rule = StyleRule::new("park", FilterExpression::key_value("leisure", "park"))
            .with_fill(FillTreatment::new(css::LIME));
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "park",
                "filter": {"kind": "key-value", "key": "leisure", "value": "park"},
                "fill": {"color": "#00ff00"}
            })
        );
        let back: StyleRule = serde_json::from_value(json).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn rule_without_paint_decodes_as_unstyled() {
        let rule: StyleRule = serde_json::from_str(
            r#"{"id": "x", "filter": {"kind": "identity", "id": 3}}"#,
        )
        .unwrap();
        assert!(rule.treatment.is_unstyled());
    }

    #[test]
    fn unknown_treatment_keys_are_rejected() {
        for text in [
            r##"{"id": "x", "filter": {"kind": "identity", "id": 3}, "stroke": {"width": 2, "color": "#000"}}"##,
            r##"{"id": "x", "filter": {"kind": "key-presence", "key": "highway"}, "lineStyle": {"width": 2, "color": "#111111", "dashed": false}}"##,
        ] {
            assert!(serde_json::from_str::<StyleRule>(text).is_err(), "{text}");
        }
    }

    #[test]
    fn suggested_rules_draw_a_red_line() {
        let rule = StyleRule::suggested("new", FilterExpression::identity(1));
        let line = rule.treatment.line().unwrap();
        assert_eq!(line.width, SUGGESTED_LINE_WIDTH);
        assert!(!line.dashed);
    }
}
