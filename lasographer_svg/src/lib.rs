// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layered SVG export of Lasographer-styled map views.
//!
//! [`VectorExporter`] takes the features currently rendered in a view, the style that rendered
//! them, and the view's bounds, and produces an [`SvgDocument`] meant to be finished by hand in
//! Inkscape:
//! - a `Features` layer with one sub-layer per rule, holding exactly the features that rule wins,
//! - a `POIs` layer with an icon and label for each saved POI,
//! - optionally, an attribution line.
//!
//! Geometry is clipped to the view, projected with a caller-supplied [`Projector`], and
//! optionally simplified. Problems with individual features are collected as
//! [`ExportDiagnostic`]s instead of failing the export.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use lasographer_core::{FilterExpression, LineTreatment, StyleDefinition, StyleRule};
//! use lasographer_svg::{RenderedFeature, VectorExporter, WebMercatorViewport};
//! use peniko::color::palette::css;
//!
//! let style = StyleDefinition::new(
//!     "style-1",
//!     vec![
//!         StyleRule::new("roads", FilterExpression::key_presence("highway"))
//!             .with_line(LineTreatment::solid(2.0, css::BLACK)),
//!     ],
//! );
//! let road = RenderedFeature::new(geojson::Value::LineString(vec![
//!     vec![-122.28, 47.565],
//!     vec![-122.27, 47.57],
//! ]))
//! .with_property("highway", "primary");
//!
//! let viewport = WebMercatorViewport::new(Point::new(-122.274154, 47.567995), 15.0, (800.0, 600.0).into());
//! let export = VectorExporter::default().export(&style, &[road], &viewport, viewport.bounds());
//! assert!(export.diagnostics.is_empty());
//! assert!(export.to_svg_string().contains(r#"inkscape:label="Highway""#));
//! ```

mod error;
mod export;
mod feature;
mod icons;
mod measure;
mod projection;
mod tree;
mod writer;

pub mod clip;

pub use error::ExportError;
pub use export::{
    ATTRIBUTION_LAYER, Artifact, DASH_PATTERN, ExportDiagnostic, ExportOptions, FEATURES_LAYER,
    OSM_ATTRIBUTION, POIS_LAYER, VectorExport, VectorExporter,
};
pub use feature::{FeatureQuery, RenderedFeature};
pub use icons::{DEFAULT_ICON_SIZE, Icon, IconAtlas};
pub use measure::{HeuristicTextMeasurer, TextMeasurer};
pub use projection::{MAX_LATITUDE, Projector, WORLD_TILE_SIZE, WebMercatorViewport};
pub use tree::{SvgDocument, SvgGroup, SvgNode, SvgPath, SvgStroke, SvgText, TextAnchor};
pub use writer::{INKSCAPE_NS, path_data};
