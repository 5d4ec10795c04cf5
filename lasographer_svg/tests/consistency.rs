// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The exported SVG and the compiled renderer style must agree on which rule draws each feature.

use geojson::Value;
use kurbo::{Point, Rect};
use lasographer_core::{
    FillTreatment, FilterExpression, LineTreatment, StyleDefinition, StyleRule,
};
use lasographer_mapbox::StyleCompiler;
use lasographer_svg::{FEATURES_LAYER, RenderedFeature, SvgNode, VectorExporter};
use peniko::color::palette::css;

fn style() -> StyleDefinition {
    StyleDefinition::new(
        "consistency",
        vec![
            StyleRule::new("roads", FilterExpression::key_presence("highway"))
                .with_line(LineTreatment::solid(2.0, css::BLACK)),
            StyleRule::new("buildings", FilterExpression::key_presence("building"))
                .with_fill(FillTreatment::new(css::GRAY))
                .with_line(LineTreatment::solid(1.0, css::BLACK)),
            StyleRule::new("motorways", FilterExpression::key_value("highway", "motorway"))
                .with_line(LineTreatment::new(4.0, css::RED, true)),
            StyleRule::new("feature-7", FilterExpression::identity(7))
                .with_line(LineTreatment::solid(3.0, css::BLUE)),
        ],
    )
}

fn road(id: i64, highway: &str) -> RenderedFeature {
    RenderedFeature::new(Value::LineString(vec![vec![10.0, 10.0], vec![20.0, 30.0]]))
        .with_id(id)
        .with_property("highway", highway)
}

fn features() -> Vec<RenderedFeature> {
    vec![
        road(1, "residential"),
        road(2, "motorway"),
        road(7, "motorway"),
        RenderedFeature::new(Value::Polygon(vec![vec![
            vec![40.0, 40.0],
            vec![50.0, 40.0],
            vec![50.0, 50.0],
            vec![40.0, 40.0],
        ]]))
        .with_id(3)
        .with_property("building", "yes"),
        RenderedFeature::new(Value::LineString(vec![vec![60.0, 60.0], vec![70.0, 70.0]]))
            .with_id(4)
            .with_property("waterway", "river"),
    ]
}

/// Rule ids whose compiled layers would draw `feature`.
fn styled_by(style: &StyleDefinition, feature: &RenderedFeature) -> Vec<String> {
    let doc = StyleCompiler::default().compile(style).unwrap();
    style
        .rules()
        .iter()
        .filter(|rule| {
            ["fill", "line"].iter().any(|kind| {
                doc.layer(&format!("{}-{kind}", rule.id))
                    .and_then(|layer| layer.filter.as_ref())
                    .is_some_and(|filter| filter.evaluate(feature))
            })
        })
        .map(|rule| rule.id.to_string())
        .collect()
}

/// Rule ids whose SVG layer contains `feature`.
fn exported_by(style: &StyleDefinition, feature: &RenderedFeature) -> Vec<String> {
    let flip = |p: Point| Point::new(p.x, -p.y);
    let export = VectorExporter::default().export(
        style,
        core::slice::from_ref(feature),
        &flip,
        Rect::new(0.0, 0.0, 100.0, 100.0),
    );
    let features = export.document.group(FEATURES_LAYER).unwrap();
    style
        .rules()
        .iter()
        .zip(&features.children)
        .filter(|(_, node)| matches!(node, SvgNode::Group(g) if !g.children.is_empty()))
        .map(|(rule, _)| rule.id.to_string())
        .collect()
}

#[test]
fn svg_layers_match_compiled_style() {
    let style = style();
    for feature in features() {
        let styled = styled_by(&style, &feature);
        assert!(styled.len() <= 1, "{feature:?} drawn by {styled:?}");
        assert_eq!(styled, exported_by(&style, &feature), "{feature:?}");
    }
}

#[test]
fn later_rules_win() {
    let style = style();
    let features = features();
    let winners: Vec<Vec<String>> = features.iter().map(|f| styled_by(&style, f)).collect();
    assert_eq!(
        winners,
        [
            vec!["roads".to_string()],
            vec!["motorways".to_string()],
            vec!["feature-7".to_string()],
            vec!["buildings".to_string()],
            vec![],
        ]
    );
}

#[test]
fn agreement_survives_reordering() {
    let style = style().with_rule_moved(3, 0).unwrap();
    for feature in features() {
        assert_eq!(
            styled_by(&style, &feature),
            exported_by(&style, &feature),
            "{feature:?}"
        );
    }
}
