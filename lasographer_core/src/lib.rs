// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style rules and rule-priority resolution for Lasographer map styles.
//!
//! This crate is the renderer-independent core:
//! - **Filters** ([`FilterExpression`]) pick features by key, key/value, or identity, and compile
//!   to boolean [`Predicate`] trees that serialize as Mapbox GL expressions.
//! - **Rules** ([`StyleRule`]) pair a filter with a [`Treatment`] (line, fill, both, or nothing).
//! - **Definitions** ([`StyleDefinition`]) are ordered, immutable rule lists plus saved POIs,
//!   edited by producing new revisions.
//! - **Priority** ([`effective_predicates`]) turns overlapping filters into mutually exclusive
//!   ones, so every consumer paints each feature with exactly one rule.
//!
//! Producing renderer styles and vector exports is left to `lasographer_mapbox` and
//! `lasographer_svg`; both consume [`effective_predicates`] so their output stays consistent.

#![no_std]

extern crate alloc;

pub mod css_color;
mod definition;
mod error;
mod feature;
mod filter;
mod predicate;
mod priority;
mod rule;
mod text;
mod treatment;

pub use definition::{Revision, SavedPoi, StyleDefinition};
pub use error::StyleError;
pub use feature::{FeatureProperties, PropertyBag, PropertyValue};
pub use filter::{FilterExpression, ID_PSEUDO_KEY, is_displayable_property};
pub use predicate::{ExpressionError, Predicate};
pub use priority::{EffectiveRule, any_rule_predicate, effective_predicates, winning_rule};
pub use rule::{RuleId, SUGGESTED_LINE_WIDTH, StyleRule};
pub use treatment::{FillTreatment, LineTreatment, PaintTreatment, Treatment};
