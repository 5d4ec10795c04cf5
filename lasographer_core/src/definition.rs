// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Versioned, immutable style definitions.
//!
//! A [`StyleDefinition`] is never mutated in place. Every edit returns a new definition with the
//! next [`Revision`]; unchanged rule and POI lists are shared between revisions via `Arc`, so a
//! consumer holding revision N (the live map, an export in progress) never observes the edit that
//! produced revision N + 1.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use core::fmt;

use hashbrown::HashSet;
use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::StyleError;
use crate::feature::{FeatureProperties, PropertyValue};
use crate::rule::{RuleId, StyleRule};

/// Opaque version token of a [`StyleDefinition`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    /// Creates a revision token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives the successor token.
    ///
    /// A trailing `-<n>` counter is incremented; any other token gets `-1` appended.
    pub fn next(&self) -> Self {
        if let Some((base, counter)) = self.0.rsplit_once('-')
            && let Ok(n) = counter.parse::<u64>()
            && let Some(n) = n.checked_add(1)
        {
            return Self(format!("{base}-{n}"));
        }
        Self(format!("{}-1", self.0))
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Revision {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A user-pinned point of interest drawn on top of the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedPoi {
    /// Identifier of the feature the POI was created from.
    pub id: String,
    /// Position as `(longitude, latitude)`.
    #[serde(with = "lng_lat")]
    pub position: Point,
    /// Label text.
    pub text: String,
    /// Icon key into the icon atlas.
    pub sprite: String,
}

impl SavedPoi {
    /// Creates a POI.
    pub fn new(
        id: impl Into<String>,
        position: Point,
        text: impl Into<String>,
        sprite: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            text: text.into(),
            sprite: sprite.into(),
        }
    }

    /// Creates a POI from a clicked map label feature.
    ///
    /// The label is `name_en`, then `name`, then the feature id; the sprite is `maki_beta`, then
    /// `maki`. Returns `None` if the feature has no identifier.
    pub fn from_feature<F: FeatureProperties + ?Sized>(feature: &F, position: Point) -> Option<Self> {
        let id = feature.feature_id()?;
        let text = first_text(feature, &["name_en", "name"]).unwrap_or_else(|| id.to_string());
        let sprite = first_text(feature, &["maki_beta", "maki"]).unwrap_or_default();
        Some(Self::new(id.to_string(), position, text, sprite))
    }
}

fn first_text<F: FeatureProperties + ?Sized>(feature: &F, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| feature.property(key).and_then(PropertyValue::as_str))
        .find(|text| !text.is_empty())
        .map(String::from)
}

mod lng_lat {
    use kurbo::Point;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<S: Serializer>(p: &Point, serializer: S) -> Result<S::Ok, S::Error> {
        [p.x, p.y].serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Point, D::Error> {
        let [lng, lat] = <[f64; 2]>::deserialize(deserializer)?;
        Ok(Point::new(lng, lat))
    }
}

/// An ordered rule list plus saved POIs, at one revision.
///
/// Rule order encodes priority: index 0 is the lowest priority (drawn first, overridden by every
/// later rule that matches the same feature).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleDefinition {
    revision: Revision,
    rules: Arc<[StyleRule]>,
    #[serde(rename = "savedPOIs", default)]
    saved_pois: Arc<[SavedPoi]>,
}

impl StyleDefinition {
    /// Creates a definition without saved POIs.
    pub fn new(revision: impl Into<Revision>, rules: impl Into<Arc<[StyleRule]>>) -> Self {
        Self {
            revision: revision.into(),
            rules: rules.into(),
            saved_pois: Arc::default(),
        }
    }

    /// Creates a definition with no rules and no POIs.
    pub fn empty(revision: impl Into<Revision>) -> Self {
        Self::new(revision, Vec::new())
    }

    /// Replaces the saved POIs without bumping the revision. Intended for construction.
    pub fn with_saved_pois(mut self, saved_pois: impl Into<Arc<[SavedPoi]>>) -> Self {
        self.saved_pois = saved_pois.into();
        self
    }

    /// Decodes a definition from JSON and validates it.
    pub fn from_json(text: &str) -> Result<Self, StyleError> {
        let style: Self =
            serde_json::from_str(text).map_err(|err| StyleError::Decode(err.to_string()))?;
        style.validate()?;
        Ok(style)
    }

    /// Returns the revision token.
    pub fn revision(&self) -> &Revision {
        &self.revision
    }

    /// Returns the rules, lowest priority first.
    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    /// Returns the saved POIs.
    pub fn saved_pois(&self) -> &[SavedPoi] {
        &self.saved_pois
    }

    /// Looks up a rule by id.
    pub fn rule(&self, id: &RuleId) -> Option<&StyleRule> {
        self.rules.iter().find(|r| &r.id == id)
    }

    /// Checks the invariants compilers rely on: unique ids and positive line widths.
    pub fn validate(&self) -> Result<(), StyleError> {
        let mut seen = HashSet::with_capacity(self.rules.len());
        for rule in self.rules.iter() {
            if !seen.insert(&rule.id) {
                return Err(StyleError::DuplicateRuleId(rule.id.clone()));
            }
            if let Some(line) = rule.treatment.line()
                && !line.has_valid_width()
            {
                return Err(StyleError::InvalidLineWidth {
                    rule: rule.id.clone(),
                    width: line.width,
                });
            }
        }
        Ok(())
    }

    /// Returns a new revision with `rule` appended as the highest-priority rule.
    pub fn with_rule_added(&self, rule: StyleRule) -> Result<Self, StyleError> {
        if self.rule(&rule.id).is_some() {
            return Err(StyleError::DuplicateRuleId(rule.id));
        }
        let mut rules = self.rules.to_vec();
        rules.push(rule);
        Ok(self.revised(rules.into(), self.saved_pois.clone()))
    }

    /// Returns a new revision without the rule `id`.
    pub fn without_rule(&self, id: &RuleId) -> Result<Self, StyleError> {
        let index = self.index_of(id)?;
        let mut rules = self.rules.to_vec();
        rules.remove(index);
        Ok(self.revised(rules.into(), self.saved_pois.clone()))
    }

    /// Returns a new revision where the rule with `rule.id` is replaced in place.
    pub fn with_rule_replaced(&self, rule: StyleRule) -> Result<Self, StyleError> {
        let index = self.index_of(&rule.id)?;
        let mut rules = self.rules.to_vec();
        rules[index] = rule;
        Ok(self.revised(rules.into(), self.saved_pois.clone()))
    }

    /// Returns a new revision with the rule at `from` moved to position `to`.
    pub fn with_rule_moved(&self, from: usize, to: usize) -> Result<Self, StyleError> {
        let len = self.rules.len();
        for index in [from, to] {
            if index >= len {
                return Err(StyleError::IndexOutOfRange { index, len });
            }
        }
        let mut rules = self.rules.to_vec();
        let rule = rules.remove(from);
        rules.insert(to, rule);
        Ok(self.revised(rules.into(), self.saved_pois.clone()))
    }

    /// Returns a new revision with the POI for `feature_id` removed if present, or added in front
    /// otherwise.
    ///
    /// Toggling an absent POI twice restores the saved list exactly. Toggling a saved POI twice
    /// re-adds it in front, so its position in the list is not preserved.
    pub fn toggle_saved_poi(
        &self,
        feature_id: &str,
        position: Point,
        text: impl Into<String>,
        sprite: impl Into<String>,
    ) -> Self {
        self.toggle_poi(SavedPoi::new(feature_id, position, text, sprite))
    }

    /// Like [`StyleDefinition::toggle_saved_poi`], for an already built POI.
    pub fn toggle_poi(&self, poi: SavedPoi) -> Self {
        let mut pois = self.saved_pois.to_vec();
        if let Some(index) = pois.iter().position(|p| p.id == poi.id) {
            pois.remove(index);
        } else {
            pois.insert(0, poi);
        }
        self.revised(self.rules.clone(), pois.into())
    }

    fn index_of(&self, id: &RuleId) -> Result<usize, StyleError> {
        self.rules
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| StyleError::UnknownRule(id.clone()))
    }

    fn revised(&self, rules: Arc<[StyleRule]>, saved_pois: Arc<[SavedPoi]>) -> Self {
        Self {
            revision: self.revision.next(),
            rules,
            saved_pois,
        }
    }
}
