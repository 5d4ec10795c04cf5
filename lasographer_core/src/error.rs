// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate alloc;

use alloc::string::String;

use thiserror::Error;

use crate::rule::RuleId;

/// Errors from editing, validating or decoding a [`crate::StyleDefinition`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum StyleError {
    /// Two rules share an id.
    #[error("duplicate rule id `{0}`")]
    DuplicateRuleId(RuleId),
    /// A line treatment has a zero, negative or non-finite width.
    #[error("rule `{rule}` has invalid line width {width}")]
    InvalidLineWidth {
        /// The offending rule.
        rule: RuleId,
        /// The rejected width.
        width: f64,
    },
    /// An edit referenced a rule id that is not in the definition.
    #[error("no rule with id `{0}`")]
    UnknownRule(RuleId),
    /// A reorder referenced a position past the end of the rule list.
    #[error("rule index {index} is out of range for {len} rules")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of rules.
        len: usize,
    },
    /// The style definition JSON could not be decoded.
    #[error("failed to decode style definition: {0}")]
    Decode(String),
}
