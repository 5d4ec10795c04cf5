// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rule priority resolution.
//!
//! Rules are authored as independent filters that may overlap. The renderer and the exporter both
//! need mutually exclusive layers instead: a feature matched by several rules must be painted by
//! exactly one of them, the one authored last. [`effective_predicates`] rewrites each rule's
//! filter so that it excludes everything claimed by a later rule.
//!
//! ```
//! use lasographer_core::{FilterExpression, PropertyBag, StyleRule, effective_predicates};
//!
//! let rules = [
//!     StyleRule::new("roads", FilterExpression::key_presence("highway")),
//!     StyleRule::new("motorways", FilterExpression::key_value("highway", "motorway")),
//! ];
//! let motorway = PropertyBag::new().with("highway", "motorway");
//! let effective = effective_predicates(&rules);
//! assert!(!effective[0].predicate.evaluate(&motorway));
//! assert!(effective[1].predicate.evaluate(&motorway));
//! ```

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use log::warn;

use crate::feature::FeatureProperties;
use crate::predicate::Predicate;
use crate::rule::StyleRule;

/// A rule paired with the predicate it actually paints, after priority resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectiveRule<'a> {
    /// Position of the rule in the authored list.
    pub index: usize,
    /// The authored rule.
    pub rule: &'a StyleRule,
    /// The rule's filter minus everything matched by higher-priority rules.
    pub predicate: Predicate,
}

/// Resolves rule priority, returning one entry per rule in authored order.
///
/// The rule at index `i` gets `all(filter_i, !any(filter_j for j > i))`; the last rule keeps its
/// own filter unchanged. Unstyled rules are resolved like any other and only logged.
pub fn effective_predicates(rules: &[StyleRule]) -> Vec<EffectiveRule<'_>> {
    let compiled: Vec<Predicate> = rules.iter().map(|rule| rule.filter.compile()).collect();
    rules
        .iter()
        .zip(&compiled)
        .enumerate()
        .map(|(index, (rule, own))| {
            if rule.treatment.is_unstyled() {
                warn!("rule `{}` has no line or fill and draws nothing", rule.id);
            }
            let higher = &compiled[index + 1..];
            let predicate = if higher.is_empty() {
                own.clone()
            } else {
                Predicate::All(vec![
                    own.clone(),
                    Predicate::negate(Predicate::Any(higher.to_vec())),
                ])
            };
            EffectiveRule {
                index,
                rule,
                predicate,
            }
        })
        .collect()
}

/// Returns a predicate matching every feature some rule's raw filter matches.
///
/// Ghost layers use its negation to draw what no rule covers.
pub fn any_rule_predicate(rules: &[StyleRule]) -> Predicate {
    Predicate::Any(rules.iter().map(|rule| rule.filter.compile()).collect())
}

/// Returns the index of the rule that paints `feature`, if any: the last rule whose raw filter
/// matches.
pub fn winning_rule<F: FeatureProperties + ?Sized>(rules: &[StyleRule], feature: &F) -> Option<usize> {
    rules
        .iter()
        .rposition(|rule| rule.filter.compile().evaluate(feature))
}
