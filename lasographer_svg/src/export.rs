// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering a styled map view into an [`SvgDocument`].

use std::fmt;

use geo::{Coord, LineString, Simplify};
use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};
use lasographer_core::{
    EffectiveRule, FeatureProperties, RuleId, SavedPoi, StyleDefinition, StyleRule,
    effective_predicates,
};
use log::{debug, warn};
use peniko::Color;
use peniko::color::palette::css;
use serde::{Deserialize, Serialize};

use crate::ExportError;
use crate::clip::{clip_line, clip_ring};
use crate::feature::{FeatureQuery, RenderedFeature};
use crate::icons::IconAtlas;
use crate::measure::{HeuristicTextMeasurer, TextMeasurer};
use crate::projection::Projector;
use crate::tree::{SvgDocument, SvgGroup, SvgNode, SvgPath, SvgStroke, SvgText, TextAnchor};

/// Label of the group holding one layer per rule.
pub const FEATURES_LAYER: &str = "Features";
/// Label of the group holding saved POIs.
pub const POIS_LAYER: &str = "POIs";
/// Label of the attribution group.
pub const ATTRIBUTION_LAYER: &str = "Attribution";

/// Dash and gap lengths of dashed lines, in pixels.
pub const DASH_PATTERN: [f64; 2] = [5.0, 2.5];

/// Attribution text OpenStreetMap asks for on derived works.
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors, openstreetmap.org/copyright";

/// Settings for [`VectorExporter`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Douglas-Peucker tolerance in pixels. `None` keeps every vertex.
    pub simplify_tolerance: Option<f64>,
    /// Font size of POI labels, in pixels.
    pub poi_font_size: f64,
    /// Gap between a POI icon and its label, in pixels.
    pub poi_label_gap: f64,
    /// Text placed in the bottom right corner. `None` writes no attribution.
    pub attribution: Option<String>,
    /// Font size of the attribution, in pixels.
    pub attribution_font_size: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            simplify_tolerance: None,
            poi_font_size: 12.0,
            poi_label_gap: 2.0,
            attribution: None,
            attribution_font_size: 10.0,
        }
    }
}

impl ExportOptions {
    /// Sets the simplification tolerance.
    pub fn with_simplify_tolerance(mut self, tolerance: f64) -> Self {
        self.simplify_tolerance = Some(tolerance);
        self
    }

    /// Sets the attribution text.
    pub fn with_attribution(mut self, text: impl Into<String>) -> Self {
        self.attribution = Some(text.into());
        self
    }
}

/// A non-fatal problem encountered during an export.
#[derive(Clone, Debug, PartialEq)]
pub enum ExportDiagnostic {
    /// A matched feature has a geometry type the exporter does not draw.
    UnsupportedGeometry {
        /// Rule that matched the feature.
        rule: RuleId,
        /// Feature id, if any.
        feature: Option<i64>,
        /// GeoJSON geometry type.
        geometry: &'static str,
    },
    /// A rule has neither line nor fill, so its layer is empty.
    UnstyledRule {
        /// The rule.
        rule: RuleId,
    },
    /// A saved POI's sprite is not in the icon atlas. Its label is still drawn.
    MissingIcon {
        /// POI id.
        poi: String,
        /// Requested sprite.
        sprite: String,
    },
}

impl fmt::Display for ExportDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedGeometry {
                rule,
                feature,
                geometry,
            } => {
                write!(f, "rule `{rule}` matched ")?;
                match feature {
                    Some(id) => write!(f, "feature {id}")?,
                    None => f.write_str("a feature")?,
                }
                write!(f, " with unsupported geometry {geometry}")
            }
            Self::UnstyledRule { rule } => write!(f, "rule `{rule}` has no line or fill"),
            Self::MissingIcon { poi, sprite } => {
                write!(f, "POI `{poi}` uses unknown sprite `{sprite}`")
            }
        }
    }
}

/// A downloadable file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Suggested file name.
    pub file_name: &'static str,
    /// MIME type.
    pub media_type: &'static str,
    /// File contents.
    pub contents: String,
}

/// The result of an export: the document and everything worth telling the user about it.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorExport {
    /// The drawing.
    pub document: SvgDocument,
    /// Non-fatal problems, in the order they were found.
    pub diagnostics: Vec<ExportDiagnostic>,
}

impl VectorExport {
    /// Serializes the document.
    pub fn to_svg_string(&self) -> String {
        self.document.to_svg_string()
    }

    /// Packages the document as `map.svg`.
    pub fn artifact(&self) -> Artifact {
        Artifact {
            file_name: "map.svg",
            media_type: "image/svg+xml",
            contents: self.to_svg_string(),
        }
    }
}

/// Renders styled features and saved POIs into layered SVG.
///
/// The document contains a `Features` layer with one sub-layer per rule, in authored order, each
/// drawing the features the rule's effective predicate matches; then a `POIs` layer. Feature
/// membership is decided by the same priority resolution the renderer style uses.
#[derive(Debug)]
pub struct VectorExporter<M = HeuristicTextMeasurer> {
    options: ExportOptions,
    icons: IconAtlas,
    measurer: M,
}

impl VectorExporter {
    /// Creates an exporter with the heuristic text measurer.
    pub fn new(options: ExportOptions, icons: IconAtlas) -> Self {
        Self {
            options,
            icons,
            measurer: HeuristicTextMeasurer,
        }
    }
}

impl Default for VectorExporter {
    fn default() -> Self {
        Self::new(ExportOptions::default(), IconAtlas::new())
    }
}

impl<M: TextMeasurer> VectorExporter<M> {
    /// Replaces the text measurer.
    pub fn with_measurer<N: TextMeasurer>(self, measurer: N) -> VectorExporter<N> {
        VectorExporter {
            options: self.options,
            icons: self.icons,
            measurer,
        }
    }

    /// Returns the options.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Returns the icon atlas.
    pub fn icons(&self) -> &IconAtlas {
        &self.icons
    }

    /// Queries features, then exports them.
    ///
    /// A failed query is the only error; everything after it is reported as diagnostics.
    pub fn export_from<Q: FeatureQuery + ?Sized>(
        &self,
        style: &StyleDefinition,
        query: &Q,
        projector: &dyn Projector,
        bounds: Rect,
    ) -> Result<VectorExport, ExportError> {
        let features = query
            .rendered_features()
            .map_err(|err| ExportError::FeatureQuery(Box::new(err)))?;
        Ok(self.export(style, &features, projector, bounds))
    }

    /// Exports the view `bounds` (`x` longitude, `y` latitude) of `features` styled by `style`.
    ///
    /// The canvas spans the projected bounds.
    pub fn export(
        &self,
        style: &StyleDefinition,
        features: &[RenderedFeature],
        projector: &dyn Projector,
        bounds: Rect,
    ) -> VectorExport {
        let mut diagnostics = Vec::new();
        let top_left = projector.project(Point::new(bounds.x0, bounds.y1));
        let bottom_right = projector.project(Point::new(bounds.x1, bounds.y0));
        let origin = top_left.to_vec2();
        let size = Size::new(
            (bottom_right.x - top_left.x).abs(),
            (bottom_right.y - top_left.y).abs(),
        );
        let view = View {
            projector,
            bounds,
            origin,
        };

        let mut features_layer = SvgGroup::layer(FEATURES_LAYER);
        for effective in effective_predicates(style.rules()) {
            features_layer.push(self.rule_layer(&effective, features, &view, &mut diagnostics));
        }

        let mut pois_layer = SvgGroup::layer(POIS_LAYER);
        for poi in style.saved_pois() {
            pois_layer.push(self.poi_group(poi, &view, &mut diagnostics));
        }

        let mut document = SvgDocument::new(size);
        document.children.push(features_layer.into());
        document.children.push(pois_layer.into());
        if let Some(text) = &self.options.attribution {
            document
                .children
                .push(self.attribution_layer(text, size).into());
        }

        for diagnostic in &diagnostics {
            warn!("{diagnostic}");
        }
        VectorExport {
            document,
            diagnostics,
        }
    }

    fn rule_layer(
        &self,
        effective: &EffectiveRule<'_>,
        features: &[RenderedFeature],
        view: &View<'_>,
        diagnostics: &mut Vec<ExportDiagnostic>,
    ) -> SvgGroup {
        let rule = effective.rule;
        let mut layer = SvgGroup::layer(rule.filter.summarize());
        if rule.treatment.is_unstyled() {
            diagnostics.push(ExportDiagnostic::UnstyledRule {
                rule: rule.id.clone(),
            });
            return layer;
        }
        let mut matched = 0_usize;
        for feature in features {
            if !effective.predicate.evaluate(feature) {
                continue;
            }
            matched += 1;
            if let Some(node) = self.feature_node(rule, feature, view, diagnostics) {
                layer.push(node);
            }
        }
        debug!(
            "rule `{}`: {matched} features matched, {} drawn",
            rule.id,
            layer.children.len()
        );
        layer
    }

    fn feature_node(
        &self,
        rule: &StyleRule,
        feature: &RenderedFeature,
        view: &View<'_>,
        diagnostics: &mut Vec<ExportDiagnostic>,
    ) -> Option<SvgNode> {
        use geojson::Value;

        let closed = rule.treatment.fill().is_some();
        let line_paths = |lines: &[Vec<Point>]| -> Vec<SvgPath> {
            lines
                .iter()
                .flat_map(|line| clip_line(line, view.bounds))
                .filter_map(|piece| self.path(rule, view, &piece, closed))
                .collect()
        };
        let ring_paths = |rings: &[Vec<Point>]| -> Vec<SvgPath> {
            rings
                .iter()
                .map(|ring| clip_ring(ring, view.bounds))
                .filter_map(|ring| self.path(rule, view, &ring, closed))
                .collect()
        };

        let paths = match &feature.geometry.value {
            Value::Point(_) | Value::MultiPoint(_) | Value::GeometryCollection(_) => {
                diagnostics.push(ExportDiagnostic::UnsupportedGeometry {
                    rule: rule.id.clone(),
                    feature: feature.feature_id(),
                    geometry: feature.geometry_type(),
                });
                return None;
            }
            Value::LineString(line) => {
                let mut paths = line_paths(&[positions(line)]);
                if paths.len() == 1 {
                    return paths.pop().map(SvgNode::Path);
                }
                paths
            }
            Value::MultiLineString(lines) => {
                line_paths(&lines.iter().map(|l| positions(l)).collect::<Vec<_>>())
            }
            Value::Polygon(rings) => {
                ring_paths(&rings.iter().map(|r| positions(r)).collect::<Vec<_>>())
            }
            Value::MultiPolygon(polygons) => {
                let children: Vec<SvgNode> = polygons
                    .iter()
                    .filter_map(|rings| {
                        path_group(ring_paths(
                            &rings.iter().map(|r| positions(r)).collect::<Vec<_>>(),
                        ))
                    })
                    .map(SvgNode::Group)
                    .collect();
                if children.is_empty() {
                    return None;
                }
                return Some(SvgNode::Group(SvgGroup {
                    children,
                    ..SvgGroup::default()
                }));
            }
        };
        path_group(paths).map(SvgNode::Group)
    }

    /// Projects, simplifies, and paints one line or ring.
    fn path(&self, rule: &StyleRule, view: &View<'_>, points: &[Point], closed: bool) -> Option<SvgPath> {
        let projected: Vec<Point> = points.iter().map(|&p| view.project(p)).collect();
        let projected = match self.options.simplify_tolerance {
            Some(tolerance) if tolerance > 0.0 => simplified(&projected, tolerance),
            _ => projected,
        };
        let (first, rest) = projected.split_first()?;
        if rest.is_empty() {
            return None;
        }
        let mut data = BezPath::new();
        data.move_to(*first);
        for &p in rest {
            data.line_to(p);
        }
        if closed {
            data.close_path();
        }
        Some(SvgPath {
            data,
            fill: rule.treatment.fill().map(|fill| fill.color),
            stroke: rule.treatment.line().map(|line| SvgStroke {
                color: line.color,
                width: line.width,
                dasharray: line.dashed.then_some(DASH_PATTERN),
            }),
        })
    }

    /// An icon above its label, centered on the POI.
    fn poi_group(&self, poi: &SavedPoi, view: &View<'_>, diagnostics: &mut Vec<ExportDiagnostic>) -> SvgGroup {
        let font_size = self.options.poi_font_size;
        let label = self.measurer.measure(&poi.text, font_size);
        let icon = self.icons.get(&poi.sprite);
        if icon.is_none() {
            diagnostics.push(ExportDiagnostic::MissingIcon {
                poi: poi.id.clone(),
                sprite: poi.sprite.clone(),
            });
        }
        let icon_size = icon.map_or(Size::ZERO, |icon| icon.size);
        let gap = if icon.is_some() {
            self.options.poi_label_gap
        } else {
            0.0
        };
        let top = -(icon_size.height + gap + label.height) / 2.0;

        let mut group =
            SvgGroup::new().with_transform(Affine::translate(view.project(poi.position).to_vec2()));
        if let Some(icon) = icon {
            let mut icon_group = SvgGroup::new()
                .with_transform(Affine::translate(Vec2::new(-icon_size.width / 2.0, top)));
            icon_group.push(SvgNode::Raw(icon.markup.clone()));
            group.push(icon_group);
        }
        group.push(SvgText {
            // Baseline sits roughly 0.8em below the top of the line box.
            position: Point::new(
                -label.width / 2.0,
                top + icon_size.height + gap + 0.8 * label.height,
            ),
            text: poi.text.clone(),
            font_size,
            anchor: TextAnchor::Start,
            fill: css::BLACK,
        });
        group
    }

    fn attribution_layer(&self, text: &str, size: Size) -> SvgGroup {
        let margin = 4.0;
        let mut layer = SvgGroup::layer(ATTRIBUTION_LAYER);
        layer.push(SvgText {
            position: Point::new(size.width - margin, size.height - margin),
            text: text.to_string(),
            font_size: self.options.attribution_font_size,
            anchor: TextAnchor::End,
            fill: Color::from_rgb8(0x33, 0x33, 0x33),
        });
        layer
    }
}

/// Projection state shared by one export: screen coordinates are relative to the view's
/// top-left corner.
struct View<'a> {
    projector: &'a dyn Projector,
    bounds: Rect,
    origin: Vec2,
}

impl View<'_> {
    fn project(&self, lng_lat: Point) -> Point {
        self.projector.project(lng_lat) - self.origin
    }
}

/// An unlabeled group of `paths`, or `None` if there are none.
fn path_group(paths: Vec<SvgPath>) -> Option<SvgGroup> {
    if paths.is_empty() {
        return None;
    }
    Some(SvgGroup {
        children: paths.into_iter().map(SvgNode::Path).collect(),
        ..SvgGroup::default()
    })
}

/// Douglas-Peucker in screen space. Endpoints are kept, so closed rings stay closed.
fn simplified(points: &[Point], tolerance: f64) -> Vec<Point> {
    let line: LineString<f64> = points.iter().map(|p| Coord { x: p.x, y: p.y }).collect();
    line.simplify(&tolerance)
        .coords()
        .map(|c| Point::new(c.x, c.y))
        .collect()
}

fn positions(coords: &[Vec<f64>]) -> Vec<Point> {
    coords
        .iter()
        .filter_map(|c| match c.as_slice() {
            [x, y, ..] => Some(Point::new(*x, *y)),
            _ => None,
        })
        .collect()
}
