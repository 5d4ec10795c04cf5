// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Features as rendered by the map, with full geometry.

use std::convert::Infallible;
use std::error::Error;

use geojson::feature::Id;
use geojson::{GeoJson, Geometry, JsonObject};
use kurbo::Point;
use lasographer_core::{FeatureProperties, PropertyBag, PropertyValue, SavedPoi};

use crate::ExportError;

/// A feature the map currently renders: identity, properties, geometry, and where it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedFeature {
    /// Identifier and scalar properties.
    pub properties: PropertyBag,
    /// Geometry in `(lng, lat)`.
    pub geometry: Geometry,
    /// Id of the source the feature was read from.
    pub source: Option<String>,
    /// Layer within the source.
    pub source_layer: Option<String>,
}

impl RenderedFeature {
    /// Creates a feature without properties.
    pub fn new(geometry: impl Into<Geometry>) -> Self {
        Self {
            properties: PropertyBag::new(),
            geometry: geometry.into(),
            source: None,
            source_layer: None,
        }
    }

    /// Sets the identifier.
    pub fn with_id(mut self, id: i64) -> Self {
        self.properties.set_id(Some(id));
        self
    }

    /// Adds a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key, value);
        self
    }

    /// Sets the source and source layer.
    pub fn with_source(mut self, source: impl Into<String>, source_layer: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self.source_layer = Some(source_layer.into());
        self
    }

    /// Converts a GeoJSON feature. Returns `None` for features without geometry.
    ///
    /// Numeric ids (or strings holding one) become the feature id. Only scalar properties are
    /// kept. `source` and `sourceLayer` foreign members, as written by the map's feature query,
    /// become [`RenderedFeature::source`] and [`RenderedFeature::source_layer`].
    pub fn from_geojson(feature: geojson::Feature) -> Option<Self> {
        let geometry = feature.geometry?;
        let mut properties = PropertyBag::new();
        properties.set_id(feature.id.as_ref().and_then(numeric_id));
        for (key, value) in feature.properties.unwrap_or_default() {
            if let Some(value) = PropertyValue::from_json(&value) {
                properties.insert(key, value);
            }
        }
        let members = feature.foreign_members.unwrap_or_default();
        Some(Self {
            properties,
            geometry,
            source: string_member(&members, "source"),
            source_layer: string_member(&members, "sourceLayer"),
        })
    }

    /// Parses a GeoJSON `FeatureCollection`, `Feature`, or bare geometry.
    ///
    /// Features without geometry are dropped.
    pub fn parse_collection(text: &str) -> Result<Vec<Self>, ExportError> {
        Ok(match text.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(collection) => collection
                .features
                .into_iter()
                .filter_map(Self::from_geojson)
                .collect(),
            GeoJson::Feature(feature) => Self::from_geojson(feature).into_iter().collect(),
            GeoJson::Geometry(geometry) => vec![Self::new(geometry)],
        })
    }

    /// Returns the POI a click on this feature would save, if it is an identified point.
    pub fn saved_poi(&self) -> Option<SavedPoi> {
        match &self.geometry.value {
            geojson::Value::Point(position) => {
                let [lng, lat, ..] = position.as_slice() else {
                    return None;
                };
                SavedPoi::from_feature(&self.properties, Point::new(*lng, *lat))
            }
            _ => None,
        }
    }

    /// Name of the geometry type, as in GeoJSON.
    pub fn geometry_type(&self) -> &'static str {
        match self.geometry.value {
            geojson::Value::Point(_) => "Point",
            geojson::Value::MultiPoint(_) => "MultiPoint",
            geojson::Value::LineString(_) => "LineString",
            geojson::Value::MultiLineString(_) => "MultiLineString",
            geojson::Value::Polygon(_) => "Polygon",
            geojson::Value::MultiPolygon(_) => "MultiPolygon",
            geojson::Value::GeometryCollection(_) => "GeometryCollection",
        }
    }
}

impl FeatureProperties for RenderedFeature {
    fn feature_id(&self) -> Option<i64> {
        self.properties.feature_id()
    }

    fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.property(key)
    }

    fn properties(&self) -> Box<dyn Iterator<Item = (&str, &PropertyValue)> + '_> {
        self.properties.properties()
    }
}

fn numeric_id(id: &Id) -> Option<i64> {
    match id {
        Id::Number(n) => n.as_i64(),
        Id::String(s) => s.parse().ok(),
    }
}

fn string_member(members: &JsonObject, key: &str) -> Option<String> {
    members.get(key)?.as_str().map(String::from)
}

/// Supplies the features currently rendered in the map view.
///
/// The exporter calls this once per export. Failures abort the export with
/// [`ExportError::FeatureQuery`].
pub trait FeatureQuery {
    /// Error type of the query.
    type Error: Error + Send + Sync + 'static;

    /// Returns the rendered features.
    fn rendered_features(&self) -> Result<Vec<RenderedFeature>, Self::Error>;
}

impl FeatureQuery for [RenderedFeature] {
    type Error = Infallible;

    fn rendered_features(&self) -> Result<Vec<RenderedFeature>, Self::Error> {
        Ok(self.to_vec())
    }
}

impl FeatureQuery for Vec<RenderedFeature> {
    type Error = Infallible;

    fn rendered_features(&self) -> Result<Vec<RenderedFeature>, Self::Error> {
        Ok(self.clone())
    }
}
