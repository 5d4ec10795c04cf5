// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Where compiled layers read their data from.

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use peniko::Color;
use peniko::color::palette::css;
use serde::{Deserialize, Serialize};

/// Vector tile source carrying the styled features.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileSource {
    /// Source id referenced by every rule layer.
    pub id: String,
    /// Tile URL templates (`{z}/{x}/{y}`).
    pub tiles: Vec<String>,
    /// Layer inside each tile. PostGIS `ST_AsMVT` names it `default`.
    pub source_layer: String,
    /// Lowest zoom at which rule layers are drawn.
    pub min_zoom: u8,
    /// Highest zoom at which rule layers are drawn.
    pub max_zoom: u8,
}

impl Default for TileSource {
    fn default() -> Self {
        Self {
            id: "postgis-tiles".into(),
            tiles: vec!["http://localhost:8080/api/v1/tile/{z}/{x}/{y}".into()],
            source_layer: "default".into(),
            min_zoom: 14,
            max_zoom: 22,
        }
    }
}

/// Basemap source providing point-of-interest labels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoiSource {
    /// Source id.
    pub id: String,
    /// TileJSON URL.
    pub url: String,
    /// Layer inside each tile holding POI labels.
    pub source_layer: String,
}

impl Default for PoiSource {
    fn default() -> Self {
        Self {
            id: "mapbox".into(),
            url: "mapbox://mapbox.mapbox-streets-v8".into(),
            source_layer: "poi_label".into(),
        }
    }
}

/// Settings for [`crate::StyleCompiler`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleCompilerConfig {
    /// Source for rule and ghost layers.
    pub tiles: TileSource,
    /// Source for the POI label layer. `None` omits that layer.
    pub pois: Option<PoiSource>,
    /// Glyph URL template for text rendering.
    pub glyphs: Option<String>,
    /// Sprite sheet URL for POI icons.
    pub sprite: Option<String>,
    /// Color painted over a rule's color while its feature is hovered.
    #[serde(with = "lasographer_core::css_color")]
    pub hover_color: Color,
}

impl Default for StyleCompilerConfig {
    fn default() -> Self {
        Self {
            tiles: TileSource::default(),
            pois: Some(PoiSource::default()),
            glyphs: None,
            sprite: None,
            hover_color: css::RED,
        }
    }
}

impl StyleCompilerConfig {
    /// Replaces the tile URL templates with a single `url`.
    pub fn with_tile_url(mut self, url: impl Into<String>) -> Self {
        self.tiles.tiles = vec![url.into()];
        self
    }

    /// Sets the tile source.
    pub fn with_tiles(mut self, tiles: TileSource) -> Self {
        self.tiles = tiles;
        self
    }

    /// Sets (or removes) the POI source.
    pub fn with_pois(mut self, pois: Option<PoiSource>) -> Self {
        self.pois = pois;
        self
    }

    /// Sets the glyph URL template.
    pub fn with_glyphs(mut self, glyphs: impl Into<String>) -> Self {
        self.glyphs = Some(glyphs.into());
        self
    }

    /// Sets the sprite URL.
    pub fn with_sprite(mut self, sprite: impl Into<String>) -> Self {
        self.sprite = Some(sprite.into());
        self
    }

    /// Sets the hover highlight color.
    pub fn with_hover_color(mut self, color: Color) -> Self {
        self.hover_color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: StyleCompilerConfig = serde_json::from_str(
            r#"{"tiles": {"tiles": ["https://tiles.example/{z}/{x}/{y}"]}, "pois": null}"#,
        )
        .unwrap();
        assert_eq!(config.tiles.id, "postgis-tiles");
        assert_eq!(config.tiles.min_zoom, 14);
        assert_eq!(config.tiles.tiles, ["https://tiles.example/{z}/{x}/{y}"]);
        assert!(config.pois.is_none());
        assert_eq!(config.hover_color, css::RED);
    }

    #[test]
    fn builders_override_fields() {
        let config = StyleCompilerConfig::default()
            .with_tile_url("/tiles/{z}/{x}/{y}")
            .with_glyphs("/fonts/{fontstack}/{range}.pbf")
            .with_pois(None);
        assert_eq!(config.tiles.tiles.len(), 1);
        assert_eq!(config.glyphs.as_deref(), Some("/fonts/{fontstack}/{range}.pbf"));
        assert!(config.pois.is_none());
    }
}
