// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The starting style and a handful of features around the default view.

use geojson::Value;
use kurbo::Point;
use lasographer_core::{FillTreatment, FilterExpression, LineTreatment, StyleDefinition, StyleRule};
use lasographer_svg::RenderedFeature;
use peniko::Color;

/// The style a new session starts with. Later rules take precedence.
pub(crate) fn default_style() -> StyleDefinition {
    StyleDefinition::new(
        "style-default",
        vec![
            StyleRule::new("default-park-color", FilterExpression::key_value("leisure", "park"))
                .with_fill(FillTreatment::new(Color::from_rgb8(0x00, 0xff, 0x00))),
            StyleRule::new("default-beach-color", FilterExpression::key_value("natural", "beach"))
                .with_fill(FillTreatment::new(Color::from_rgb8(0xff, 0xff, 0x00))),
            StyleRule::new("default-water-color", FilterExpression::key_value("natural", "water"))
                .with_fill(FillTreatment::new(Color::from_rgb8(0x00, 0x00, 0xff))),
            StyleRule::new("default-building-rule", FilterExpression::key_presence("building"))
                .with_fill(FillTreatment::new(Color::from_rgb8(0x99, 0x99, 0x99))),
            StyleRule::new("default-highway-rule", FilterExpression::key_presence("highway"))
                .with_line(LineTreatment::solid(2.0, Color::from_rgb8(0x44, 0x44, 0x44))),
            StyleRule::new(
                "default-coastline-rule",
                FilterExpression::key_value("natural", "coastline"),
            )
            .with_line(LineTreatment::solid(2.0, Color::from_rgb8(0x11, 0x11, 0x11))),
        ],
    )
}

/// Offsets from `center` in degrees, as GeoJSON positions.
fn around(center: Point, offsets: &[[f64; 2]]) -> Vec<Vec<f64>> {
    offsets
        .iter()
        .map(|[dx, dy]| vec![center.x + dx, center.y + dy])
        .collect()
}

fn ring(center: Point, offsets: &[[f64; 2]]) -> Vec<Vec<f64>> {
    let mut ring = around(center, offsets);
    if let Some(first) = ring.first().cloned() {
        ring.push(first);
    }
    ring
}

/// Stand-in for what a map would report as rendered around `center`.
pub(crate) fn sample_features(center: Point) -> Vec<RenderedFeature> {
    vec![
        RenderedFeature::new(Value::Polygon(vec![ring(
            center,
            &[[-0.004, -0.003], [0.004, -0.003], [0.004, 0.003], [-0.004, 0.003]],
        )]))
        .with_id(1001)
        .with_property("leisure", "park")
        .with_property("name", "Seward Park"),
        RenderedFeature::new(Value::Polygon(vec![ring(
            center,
            &[[0.004, -0.006], [0.02, -0.006], [0.02, 0.006], [0.004, 0.006]],
        )]))
        .with_id(1002)
        .with_property("natural", "water"),
        RenderedFeature::new(Value::LineString(around(
            center,
            &[[0.004, -0.006], [0.0045, 0.0], [0.004, 0.006]],
        )))
        .with_id(1003)
        .with_property("natural", "coastline"),
        RenderedFeature::new(Value::LineString(around(
            center,
            &[[-0.02, -0.001], [-0.006, -0.0015], [0.0, -0.004]],
        )))
        .with_id(1004)
        .with_property("highway", "residential")
        .with_property("name", "Lake Washington Boulevard South"),
        RenderedFeature::new(Value::MultiLineString(vec![
            around(center, &[[-0.03, 0.002], [-0.003, 0.002]]),
            around(center, &[[-0.003, 0.002], [-0.003, 0.008]]),
        ]))
        .with_id(1005)
        .with_property("highway", "footway"),
        RenderedFeature::new(Value::MultiPolygon(vec![
            vec![ring(
                center,
                &[[-0.0012, 0.0004], [-0.0008, 0.0004], [-0.0008, 0.0008], [-0.0012, 0.0008]],
            )],
            vec![ring(
                center,
                &[[-0.0006, 0.0004], [-0.0002, 0.0004], [-0.0002, 0.0007], [-0.0006, 0.0007]],
            )],
        ]))
        .with_id(1006)
        .with_property("building", "yes"),
        RenderedFeature::new(Value::Point(vec![center.x - 0.001, center.y + 0.001]))
            .with_id(1007)
            .with_property("amenity", "cafe")
            .with_property("name", "Seward Park Cafe")
            .with_property("maki", "cafe"),
    ]
}

#[cfg(test)]
mod tests {
    use lasographer_core::{FeatureProperties, winning_rule};

    use super::*;

    #[test]
    fn default_style_is_valid() {
        assert!(default_style().validate().is_ok());
    }

    #[test]
    fn every_sample_but_the_cafe_is_styled() {
        let style = default_style();
        let unstyled: Vec<_> = sample_features(Point::new(-122.27, 47.57))
            .into_iter()
            .filter(|f| winning_rule(style.rules(), f).is_none())
            .filter_map(|f| f.properties.feature_id())
            .collect();
        assert_eq!(unstyled, [1007]);
    }
}
