// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement for POI label layout.
//!
//! The exporter writes text as SVG `<text>` and leaves shaping to whatever opens the file, but it
//! needs a width estimate to center a label under its icon. Plug in real font metrics through
//! [`TextMeasurer`], or use [`HeuristicTextMeasurer`].

use kurbo::Size;

/// Estimates the extent of a single line of text.
pub trait TextMeasurer {
    /// Returns the size of `text` set at `font_size` pixels.
    fn measure(&self, text: &str, font_size: f64) -> Size;
}

/// Assumes an average glyph width of 0.6em and a line height of 1em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> Size {
        let glyphs = text.chars().count() as f64;
        Size::new(0.6 * font_size * glyphs, font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_characters_not_bytes() {
        let m = HeuristicTextMeasurer;
        assert_eq!(m.measure("Café", 10.0), Size::new(24.0, 10.0));
        assert_eq!(m.measure("", 10.0).width, 0.0);
    }
}
