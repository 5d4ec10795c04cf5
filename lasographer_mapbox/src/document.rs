// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The Mapbox GL style document model.
//!
//! Only the subset of the style specification the compiler emits is modeled. Paint and layout
//! properties stay as JSON objects, keyed by their style-spec names.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use lasographer_core::Predicate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Style specification version the documents conform to.
pub const STYLE_VERSION: u8 = 8;

/// A complete renderer style: sources plus ordered layers, bottom first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleDocument {
    /// Always [`STYLE_VERSION`].
    pub version: u8,
    /// Data sources by id.
    pub sources: BTreeMap<String, Source>,
    /// Glyph URL template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyphs: Option<String>,
    /// Sprite sheet URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<String>,
    /// Layers in draw order.
    pub layers: Vec<Layer>,
}

impl StyleDocument {
    /// Serializes the document. Object keys are sorted, so equal documents give equal strings.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Like [`StyleDocument::to_json_string`], indented for humans.
    pub fn to_json_string_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Looks up a layer by id.
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }
}

/// A vector tile source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Source type; always `vector`.
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// Tile URL templates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiles: Vec<String>,
    /// TileJSON URL, as an alternative to `tiles`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Kinds of [`Source`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Mapbox vector tiles.
    Vector,
}

/// Kinds of [`Layer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    /// Polygon fill.
    Fill,
    /// Stroked lines and polygon outlines.
    Line,
    /// Icons and labels.
    Symbol,
}

/// One renderer layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique layer id.
    pub id: String,
    /// Layer type.
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    /// Source id.
    pub source: String,
    /// Layer inside the source's tiles.
    #[serde(rename = "source-layer")]
    pub source_layer: String,
    /// Which features the layer draws. `None` draws all of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Predicate>,
    /// Layout properties.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub layout: Map<String, Value>,
    /// Paint properties.
    #[serde(default)]
    pub paint: Map<String, Value>,
    /// Lowest zoom the layer is visible at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minzoom: Option<u8>,
    /// Highest zoom the layer is visible at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxzoom: Option<u8>,
}

impl Layer {
    /// Returns a paint property.
    pub fn paint(&self, name: &str) -> Option<&Value> {
        self.paint.get(name)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    #[test]
    fn layers_use_style_spec_keys() {
        let mut paint = Map::new();
        paint.insert("fill-color".into(), "#999999".into());
        let layer = Layer {
            id: "building-fill".into(),
            layer_type: LayerType::Fill,
            source: "postgis-tiles".into(),
            source_layer: "default".into(),
            filter: Some(Predicate::Has("building".into())),
            layout: Map::new(),
            paint,
            minzoom: Some(14),
            maxzoom: Some(22),
        };
        assert_eq!(
            serde_json::to_value(&layer).unwrap(),
            serde_json::json!({
                "id": "building-fill",
                "type": "fill",
                "source": "postgis-tiles",
                "source-layer": "default",
                "filter": ["has", "building"],
                "paint": {"fill-color": "#999999"},
                "minzoom": 14,
                "maxzoom": 22
            })
        );
    }

    #[test]
    fn sources_omit_unused_fields() {
        let source = Source {
            kind: SourceKind::Vector,
            tiles: vec![],
            url: Some("mapbox://mapbox.mapbox-streets-v8".into()),
        };
        assert_eq!(
            serde_json::to_value(&source).unwrap(),
            serde_json::json!({"type": "vector", "url": "mapbox://mapbox.mapbox-streets-v8"})
        );
    }
}
