// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label formatting for filter summaries.

extern crate alloc;

use alloc::string::String;

/// Humanizes `text` and converts it to title case.
///
/// Underscores become spaces; every word (split on whitespace or `-`) is lower-cased and then
/// gets an upper-case first letter: `"natural_water"` becomes `"Natural Water"`.
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        let c = if c == '_' { ' ' } else { c };
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        at_word_start = c.is_whitespace() || c == '-';
    }
    out
}
