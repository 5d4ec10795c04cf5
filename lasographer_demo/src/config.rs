// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Demo settings: a JSON file, then environment overrides.

use std::path::Path;

use anyhow::{Context, Result};
use kurbo::{Point, Size};
use lasographer_mapbox::StyleCompilerConfig;
use lasographer_svg::{ExportOptions, WebMercatorViewport};
use log::info;
use serde::{Deserialize, Serialize};

/// Overrides the vector tile URL template.
pub(crate) const TILE_URL_VAR: &str = "LASOGRAPHER_TILE_URL";
/// Overrides the glyph URL template.
pub(crate) const GLYPHS_VAR: &str = "LASOGRAPHER_GLYPHS";
/// Overrides the sprite URL.
pub(crate) const SPRITE_VAR: &str = "LASOGRAPHER_SPRITE";

/// The map view to export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ViewConfig {
    pub(crate) lng: f64,
    pub(crate) lat: f64,
    pub(crate) zoom: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        // Seward Park, Seattle.
        Self {
            lng: -122.274154,
            lat: 47.567995,
            zoom: 15.0,
            width: 1024.0,
            height: 768.0,
        }
    }
}

impl ViewConfig {
    pub(crate) fn viewport(&self) -> WebMercatorViewport {
        WebMercatorViewport::new(
            Point::new(self.lng, self.lat),
            self.zoom,
            Size::new(self.width, self.height),
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct DemoConfig {
    pub(crate) style: StyleCompilerConfig,
    pub(crate) export: ExportOptions,
    pub(crate) view: ViewConfig,
}

impl DemoConfig {
    /// Reads `path` if given, otherwise starts from defaults, then applies environment overrides.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config `{}`", path.display()))?;
                info!("using config `{}`", path.display());
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config `{}`", path.display()))?
            }
            None => Self::default(),
        };
        Ok(config.with_overrides(|name| std::env::var(name).ok()))
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = var(TILE_URL_VAR) {
            info!("{TILE_URL_VAR}={url}");
            self.style = self.style.with_tile_url(url);
        }
        if let Some(glyphs) = var(GLYPHS_VAR) {
            self.style = self.style.with_glyphs(glyphs);
        }
        if let Some(sprite) = var(SPRITE_VAR) {
            self.style = self.style.with_sprite(sprite);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_keep_defaults() {
        let config: DemoConfig =
            serde_json::from_str(r#"{ "view": { "zoom": 16 }, "export": { "poi_font_size": 14 } }"#)
                .unwrap();
        assert_eq!(config.view.zoom, 16.0);
        assert_eq!(config.view.lat, ViewConfig::default().lat);
        assert_eq!(config.export.poi_font_size, 14.0);
        assert_eq!(config.style, StyleCompilerConfig::default());
    }

    #[test]
    fn environment_overrides_urls() {
        let config = DemoConfig::default().with_overrides(|name| match name {
            TILE_URL_VAR => Some("https://tiles.example/{z}/{x}/{y}".into()),
            SPRITE_VAR => Some("https://sprites.example/maki".into()),
            _ => None,
        });
        assert_eq!(config.style.tiles.tiles, ["https://tiles.example/{z}/{x}/{y}"]);
        assert_eq!(config.style.sprite.as_deref(), Some("https://sprites.example/maki"));
        assert_eq!(config.style.glyphs, StyleCompilerConfig::default().glyphs);
    }
}
