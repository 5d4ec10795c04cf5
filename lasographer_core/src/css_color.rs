// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSS color strings for [`peniko::Color`].
//!
//! Style definitions and compiled style documents carry colors as CSS strings. This module is
//! usable as a serde `with` module:
//!
//! ```
//! # use peniko::Color;
//! #[derive(serde::Serialize, serde::Deserialize)]
//! struct Swatch {
//!     #[serde(with = "lasographer_core::css_color")]
//!     color: Color,
//! }
//! ```

extern crate alloc;

use alloc::format;
use alloc::string::String;

use peniko::Color;
use peniko::color::{Srgb, parse_color};
use serde::{Deserialize, Deserializer, Serializer};

/// Formats a color as `#rrggbb`, or `#rrggbbaa` when it is not fully opaque.
pub fn to_hex(color: &Color) -> String {
    let rgba = color.to_rgba8();
    if rgba.a == u8::MAX {
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

/// Formats a color as `#rrggbb`, ignoring alpha.
pub fn to_opaque_hex(color: &Color) -> String {
    let rgba = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
}

/// Returns the color's alpha as a fraction, or `None` when fully opaque.
pub fn opacity(color: &Color) -> Option<f64> {
    let a = color.to_rgba8().a;
    (a != u8::MAX).then(|| f64::from(a) / 255.0)
}

/// Parses any CSS color syntax (`#f00`, `#ff0000`, `rgb(...)`, named colors).
pub fn parse(text: &str) -> Result<Color, String> {
    parse_color(text)
        .map(|c| c.to_alpha_color::<Srgb>())
        .map_err(|err| format!("invalid color `{text}`: {err}"))
}

/// Serializes a color as a CSS hex string.
pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_hex(color))
}

/// Deserializes a color from any CSS color string.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse(&text).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use peniko::color::palette::css;

    use super::*;

    #[test]
    fn hex_round_trips() {
        let red = parse("#ff0000").unwrap();
        assert_eq!(to_hex(&red), "#ff0000");
        assert_eq!(to_hex(&parse("#444").unwrap()), "#444444");
        assert_eq!(to_hex(&css::BLACK), "#000000");
    }

    #[test]
    fn translucent_colors_keep_alpha() {
        let c = Color::from_rgba8(0, 0, 255, 128);
        assert_eq!(to_hex(&c), "#0000ff80");
        assert_eq!(to_opaque_hex(&c), "#0000ff");
        assert!(opacity(&c).is_some());
        assert_eq!(opacity(&css::BLACK), None);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("not a color").is_err());
    }
}
