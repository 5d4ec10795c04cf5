// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style definition to renderer style compilation.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use lasographer_core::{
    EffectiveRule, FillTreatment, LineTreatment, PaintTreatment, Predicate, SavedPoi, StyleDefinition,
    StyleError, any_rule_predicate, css_color, effective_predicates,
};
use log::warn;
use peniko::Color;
use serde_json::{Map, Value, json};
use smallvec::SmallVec;

use crate::config::{PoiSource, StyleCompilerConfig};
use crate::document::{Layer, LayerType, STYLE_VERSION, Source, SourceKind, StyleDocument};

/// Id of the POI label layer.
pub const POI_LAYER_ID: &str = "mapbox-pois";

/// Dash pattern of dashed lines, in line widths.
const LINE_DASHARRAY: [f64; 2] = [2.0, 1.0];

/// Muted layers drawing features no rule claims, so unstyled data stays visible for picking.
struct Ghost {
    id: &'static str,
    layer_type: LayerType,
    color: Color,
    width: Option<f64>,
    keys: &'static [&'static str],
}

const GHOSTS: [Ghost; 4] = [
    Ghost {
        id: "ghost-highways",
        layer_type: LayerType::Line,
        color: Color::from_rgb8(0xc0, 0xc0, 0xc0),
        width: Some(3.0),
        keys: &["highway"],
    },
    Ghost {
        id: "ghost-buildings",
        layer_type: LayerType::Fill,
        color: Color::from_rgb8(0xe0, 0xe0, 0xe0),
        width: None,
        keys: &["building"],
    },
    Ghost {
        id: "ghost-nature-fill",
        layer_type: LayerType::Fill,
        color: Color::from_rgb8(0xd0, 0xd0, 0xd0),
        width: None,
        keys: &["natural", "leisure"],
    },
    Ghost {
        id: "ghost-nature-line",
        layer_type: LayerType::Line,
        color: Color::from_rgb8(0xcc, 0xcc, 0xcc),
        width: None,
        keys: &["natural", "leisure"],
    },
];

/// Compiles [`StyleDefinition`]s into [`StyleDocument`]s.
///
/// Layers are emitted bottom to top: ghost layers, then each rule's fill and line layers in
/// authored order, then the POI label layer. Rule layers are filtered by the rule's effective
/// predicate, so every feature is drawn by at most one rule.
#[derive(Clone, Debug, Default)]
pub struct StyleCompiler {
    config: StyleCompilerConfig,
}

impl StyleCompiler {
    /// Creates a compiler.
    pub fn new(config: StyleCompilerConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &StyleCompilerConfig {
        &self.config
    }

    /// Compiles a style definition.
    ///
    /// Fails without producing a partial document if the definition has duplicate rule ids or
    /// invalid line widths.
    pub fn compile(&self, style: &StyleDefinition) -> Result<StyleDocument, StyleError> {
        style.validate()?;

        let mut layers = self.ghost_layers(style);
        for effective in effective_predicates(style.rules()) {
            layers.extend(self.rule_layers(&effective));
        }
        if let Some(pois) = &self.config.pois {
            layers.push(self.poi_layer(pois, style.saved_pois()));
        }

        Ok(StyleDocument {
            version: STYLE_VERSION,
            sources: self.sources(),
            glyphs: self.config.glyphs.clone(),
            sprite: self.config.sprite.clone(),
            layers,
        })
    }

    /// Returns the layers for one resolved rule: fill first, then line. Unstyled rules get none.
    pub fn rule_layers(&self, effective: &EffectiveRule<'_>) -> SmallVec<[Layer; 2]> {
        let id = &effective.rule.id;
        effective
            .rule
            .treatment
            .paints()
            .map(|paint| match paint {
                PaintTreatment::Fill(fill) => self.tile_layer(
                    format!("{id}-fill"),
                    LayerType::Fill,
                    effective.predicate.clone(),
                    self.fill_paint(fill),
                ),
                PaintTreatment::Line(line) => self.tile_layer(
                    format!("{id}-line"),
                    LayerType::Line,
                    effective.predicate.clone(),
                    self.line_paint(line),
                ),
            })
            .collect()
    }

    fn ghost_layers(&self, style: &StyleDefinition) -> Vec<Layer> {
        let unclaimed = Predicate::negate(any_rule_predicate(style.rules()));
        GHOSTS
            .iter()
            .map(|ghost| {
                let category = match ghost.keys {
                    [key] => Predicate::Has((*key).into()),
                    keys => Predicate::Any(keys.iter().map(|k| Predicate::Has((*k).into())).collect()),
                };
                let prefix = match ghost.layer_type {
                    LayerType::Fill => "fill",
                    LayerType::Line | LayerType::Symbol => "line",
                };
                let mut paint = Map::new();
                paint.insert(
                    format!("{prefix}-color"),
                    self.hover(Value::String(css_color::to_hex(&ghost.color))),
                );
                if let Some(width) = ghost.width {
                    paint.insert("line-width".into(), json!(width));
                }
                self.tile_layer(
                    ghost.id.into(),
                    ghost.layer_type,
                    Predicate::All(vec![unclaimed.clone(), category]),
                    paint,
                )
            })
            .collect()
    }

    fn fill_paint(&self, fill: &FillTreatment) -> Map<String, Value> {
        let mut paint = Map::new();
        paint.insert(
            "fill-color".into(),
            self.hover(Value::String(css_color::to_opaque_hex(&fill.color))),
        );
        if let Some(opacity) = css_color::opacity(&fill.color) {
            paint.insert("fill-opacity".into(), json!(opacity));
        }
        paint
    }

    fn line_paint(&self, line: &LineTreatment) -> Map<String, Value> {
        let mut paint = Map::new();
        paint.insert(
            "line-color".into(),
            self.hover(Value::String(css_color::to_opaque_hex(&line.color))),
        );
        paint.insert("line-width".into(), json!(line.width));
        if let Some(opacity) = css_color::opacity(&line.color) {
            paint.insert("line-opacity".into(), json!(opacity));
        }
        if line.dashed {
            paint.insert("line-dasharray".into(), json!(LINE_DASHARRAY));
        }
        paint
    }

    fn poi_layer(&self, source: &PoiSource, saved: &[SavedPoi]) -> Layer {
        let saved_ids: Vec<Predicate> = saved
            .iter()
            .filter_map(|poi| match poi.id.parse::<i64>() {
                Ok(id) => Some(Predicate::IdEquals(id)),
                Err(_) => {
                    warn!("saved POI `{}` has a non-numeric id and cannot be highlighted", poi.id);
                    None
                }
            })
            .collect();
        let is_saved = Predicate::Any(saved_ids).to_json();

        let layout = object([
            (
                "text-field",
                json!(["coalesce", ["get", "name_en"], ["get", "name"]]),
            ),
            (
                "icon-image",
                json!([
                    "case",
                    ["has", "maki_beta"],
                    ["image", ["concat", ["get", "maki_beta"], "-15"]],
                    ["image", ["concat", ["get", "maki"], "-15"]]
                ]),
            ),
            ("icon-allow-overlap", json!(false)),
            ("text-allow-overlap", json!(false)),
            (
                "text-anchor",
                json!([
                    "step", ["zoom"],
                    ["step", ["get", "sizerank"], "center", 5, "top"],
                    17,
                    ["step", ["get", "sizerank"], "center", 13, "top"]
                ]),
            ),
            (
                "text-offset",
                json!([
                    "step", ["zoom"],
                    ["step", ["get", "sizerank"], ["literal", [0, 0]], 5, ["literal", [0, 0.75]]],
                    17,
                    ["step", ["get", "sizerank"], ["literal", [0, 0]], 13, ["literal", [0, 0.75]]]
                ]),
            ),
        ]);
        let paint = object([
            (
                "text-opacity",
                hover_case(json!(1.0), json!(["case", is_saved, 1.0, 0.5])),
            ),
            ("text-color", json!("black")),
            ("text-halo-width", json!(5)),
            ("text-halo-blur", json!(0.5)),
            ("text-halo-color", self.hover(json!("white"))),
        ]);

        Layer {
            id: POI_LAYER_ID.into(),
            layer_type: LayerType::Symbol,
            source: source.id.clone(),
            source_layer: source.source_layer.clone(),
            filter: None,
            layout,
            paint,
            minzoom: None,
            maxzoom: None,
        }
    }

    fn sources(&self) -> BTreeMap<String, Source> {
        let mut sources = BTreeMap::new();
        sources.insert(
            self.config.tiles.id.clone(),
            Source {
                kind: SourceKind::Vector,
                tiles: self.config.tiles.tiles.clone(),
                url: None,
            },
        );
        if let Some(pois) = &self.config.pois {
            sources.insert(
                pois.id.clone(),
                Source {
                    kind: SourceKind::Vector,
                    tiles: Vec::new(),
                    url: Some(pois.url.clone()),
                },
            );
        }
        sources
    }

    fn tile_layer(
        &self,
        id: String,
        layer_type: LayerType,
        filter: Predicate,
        paint: Map<String, Value>,
    ) -> Layer {
        let tiles = &self.config.tiles;
        Layer {
            id,
            layer_type,
            source: tiles.id.clone(),
            source_layer: tiles.source_layer.clone(),
            filter: Some(filter),
            layout: Map::new(),
            paint,
            minzoom: Some(tiles.min_zoom),
            maxzoom: Some(tiles.max_zoom),
        }
    }

    fn hover(&self, value: Value) -> Value {
        hover_case(
            Value::String(css_color::to_hex(&self.config.hover_color)),
            value,
        )
    }
}

/// `value`, replaced by `highlight` while the feature's `hover` state is set.
fn hover_case(highlight: Value, value: Value) -> Value {
    json!([
        "case",
        ["boolean", ["feature-state", "hover"], false],
        highlight,
        value
    ])
}

fn object<const N: usize>(entries: [(&str, Value); N]) -> Map<String, Value> {
    entries
        .into_iter()
        .map(|(key, value)| (key.into(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;

    use kurbo::Point;
    use lasographer_core::{FilterExpression, PropertyBag, RuleId, StyleRule};
    use peniko::color::palette::css;

    use super::*;

    fn roads() -> StyleDefinition {
        StyleDefinition::new(
            "style-1",
            vec![
                StyleRule::new("roads", FilterExpression::key_presence("highway"))
                    .with_line(LineTreatment::solid(2.0, css::BLACK)),
                StyleRule::new("motorways", FilterExpression::key_value("highway", "motorway"))
                    .with_line(LineTreatment::new(4.0, css::BLUE, true)),
            ],
        )
    }

    fn layer_ids(doc: &StyleDocument) -> Vec<&str> {
        doc.layers.iter().map(|l| l.id.as_str()).collect()
    }

    fn filter_of<'a>(doc: &'a StyleDocument, id: &str) -> &'a Predicate {
        doc.layer(id).and_then(|l| l.filter.as_ref()).unwrap()
    }

    #[test]
    fn empty_style_has_only_ghost_and_poi_layers() {
        let doc = StyleCompiler::default()
            .compile(&StyleDefinition::empty("r"))
            .unwrap();
        assert_eq!(
            layer_ids(&doc),
            [
                "ghost-highways",
                "ghost-buildings",
                "ghost-nature-fill",
                "ghost-nature-line",
                POI_LAYER_ID,
            ]
        );
        let doc = StyleCompiler::new(StyleCompilerConfig::default().with_pois(None))
            .compile(&StyleDefinition::empty("r"))
            .unwrap();
        assert_eq!(doc.layers.len(), 4);
        assert_eq!(doc.sources.len(), 1);
    }

    #[test]
    fn motorway_is_drawn_by_the_later_rule_only() {
        let doc = StyleCompiler::default().compile(&roads()).unwrap();
        assert_eq!(
            &layer_ids(&doc)[4..],
            ["roads-line", "motorways-line", POI_LAYER_ID]
        );
        let motorway = PropertyBag::new().with("highway", "motorway");
        let residential = PropertyBag::new().with("highway", "residential");
        assert!(!filter_of(&doc, "roads-line").evaluate(&motorway));
        assert!(filter_of(&doc, "motorways-line").evaluate(&motorway));
        assert!(filter_of(&doc, "roads-line").evaluate(&residential));
        assert!(!filter_of(&doc, "ghost-highways").evaluate(&residential));
    }

    #[test]
    fn ghost_layers_draw_unclaimed_features() {
        let doc = StyleCompiler::default().compile(&roads()).unwrap();
        let park = PropertyBag::new().with("leisure", "park");
        let building = PropertyBag::new().with("building", "yes");
        assert!(filter_of(&doc, "ghost-nature-fill").evaluate(&park));
        assert!(filter_of(&doc, "ghost-buildings").evaluate(&building));
        assert!(!filter_of(&doc, "ghost-buildings").evaluate(&park));
        let ghost = doc.layer("ghost-highways").unwrap();
        assert_eq!(ghost.paint("line-width"), Some(&json!(3.0)));
        assert_eq!(
            ghost.paint("line-color"),
            Some(&json!([
                "case",
                ["boolean", ["feature-state", "hover"], false],
                "#ff0000",
                "#c0c0c0"
            ]))
        );
    }

    #[test]
    fn line_paint_carries_width_and_dashes() {
        let doc = StyleCompiler::default().compile(&roads()).unwrap();
        let solid = doc.layer("roads-line").unwrap();
        assert_eq!(solid.paint("line-width"), Some(&json!(2.0)));
        assert!(solid.paint("line-dasharray").is_none());
        let dashed = doc.layer("motorways-line").unwrap();
        assert_eq!(dashed.paint("line-dasharray"), Some(&json!([2.0, 1.0])));
        assert_eq!(dashed.minzoom, Some(14));
        assert_eq!(dashed.maxzoom, Some(22));
        assert_eq!(dashed.source_layer, "default");
    }

    #[test]
    fn fill_and_line_rule_emits_fill_then_line() {
        let style = StyleDefinition::new(
            "r",
            vec![
                StyleRule::new("water", FilterExpression::key_value("natural", "water"))
                    .with_fill(FillTreatment::new(css::BLUE.with_alpha(0.5)))
                    .with_line(LineTreatment::solid(1.0, css::NAVY)),
            ],
        );
        let doc = StyleCompiler::default().compile(&style).unwrap();
        assert_eq!(&layer_ids(&doc)[4..6], ["water-fill", "water-line"]);
        let fill = doc.layer("water-fill").unwrap();
        assert_eq!(fill.layer_type, LayerType::Fill);
        assert!(fill.paint("fill-opacity").is_some());
        assert!(doc.layer("water-line").unwrap().paint("line-opacity").is_none());
    }

    #[test]
    fn unstyled_rules_emit_no_layers() {
        let style = StyleDefinition::new(
            "r",
            vec![StyleRule::new("nothing", FilterExpression::identity(1))],
        );
        let doc = StyleCompiler::default().compile(&style).unwrap();
        assert!(doc.layers.iter().all(|l| !l.id.starts_with("nothing")));
        // The rule still claims its feature, so no ghost draws it either.
        let claimed = PropertyBag::new().with_id(1).with("highway", "primary");
        assert!(!filter_of(&doc, "ghost-highways").evaluate(&claimed));
    }

    #[test]
    fn invalid_definitions_fail_without_output() {
        let style = StyleDefinition::new(
            "r",
            vec![
                StyleRule::new("a", FilterExpression::identity(1)),
                StyleRule::new("a", FilterExpression::identity(2)),
            ],
        );
        assert_eq!(
            StyleCompiler::default().compile(&style),
            Err(StyleError::DuplicateRuleId(RuleId::new("a")))
        );
        let style = StyleDefinition::new(
            "r",
            vec![
                StyleRule::new("a", FilterExpression::identity(1))
                    .with_line(LineTreatment::solid(0.0, css::BLACK)),
            ],
        );
        assert!(matches!(
            StyleCompiler::default().compile(&style),
            Err(StyleError::InvalidLineWidth { .. })
        ));
    }

    #[test]
    fn compilation_is_idempotent() {
        let compiler = StyleCompiler::default();
        let style = roads();
        let a = compiler.compile(&style).unwrap().to_json_string().unwrap();
        let b = compiler.compile(&style).unwrap().to_json_string().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn reorder_and_back_compiles_identically() {
        let compiler = StyleCompiler::default();
        let style = roads();
        let before = compiler.compile(&style).unwrap();
        let moved = style.with_rule_moved(1, 0).unwrap();
        assert_ne!(compiler.compile(&moved).unwrap(), before);
        let back = moved.with_rule_moved(0, 1).unwrap();
        assert_eq!(compiler.compile(&back).unwrap(), before);
    }

    #[test]
    fn saved_pois_are_fully_opaque() {
        let style = roads().toggle_saved_poi("17", Point::new(-122.3, 47.6), "Cafe", "cafe");
        let doc = StyleCompiler::default().compile(&style).unwrap();
        let pois = doc.layer(POI_LAYER_ID).unwrap();
        assert_eq!(pois.source, "mapbox");
        assert_eq!(pois.source_layer, "poi_label");
        assert_eq!(
            pois.paint("text-opacity"),
            Some(&json!([
                "case",
                ["boolean", ["feature-state", "hover"], false],
                1.0,
                ["case", ["any", ["==", 17, ["id"]]], 1.0, 0.5]
            ]))
        );
        assert!(pois.layout.contains_key("icon-image"));
    }

    #[test]
    fn poi_layer_carries_label_layout_and_halo() {
        let doc = StyleCompiler::default().compile(&roads()).unwrap();
        let pois = doc.layer(POI_LAYER_ID).unwrap();
        let mut layout: Vec<&str> = pois.layout.keys().map(String::as_str).collect();
        layout.sort_unstable();
        assert_eq!(
            layout,
            [
                "icon-allow-overlap",
                "icon-image",
                "text-allow-overlap",
                "text-anchor",
                "text-field",
                "text-offset"
            ]
        );
        assert_eq!(
            pois.layout["text-field"],
            json!(["coalesce", ["get", "name_en"], ["get", "name"]])
        );
        assert_eq!(pois.paint("text-color"), Some(&json!("black")));
        assert_eq!(pois.paint("text-halo-width"), Some(&json!(5)));
        assert_eq!(
            pois.paint("text-halo-color"),
            Some(&json!([
                "case",
                ["boolean", ["feature-state", "hover"], false],
                "#ff0000",
                "white"
            ]))
        );
    }

    #[test]
    fn document_carries_sources_and_urls() {
        let config = StyleCompilerConfig::default()
            .with_tile_url("https://tiles.example/{z}/{x}/{y}")
            .with_glyphs("https://fonts.example/{fontstack}/{range}.pbf")
            .with_sprite("https://sprites.example/maki");
        let json: Value = serde_json::from_str(
            &StyleCompiler::new(config)
                .compile(&roads())
                .unwrap()
                .to_json_string()
                .unwrap(),
        )
        .unwrap();
        assert_eq!(json["version"], 8);
        assert_eq!(
            json["sources"]["postgis-tiles"],
            json!({"type": "vector", "tiles": ["https://tiles.example/{z}/{x}/{y}"]})
        );
        assert_eq!(json["sprite"], "https://sprites.example/maki".to_string());
        assert!(json["glyphs"].is_string());
    }
}
