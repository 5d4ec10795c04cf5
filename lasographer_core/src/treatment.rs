// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint treatments applied to features matched by a rule.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// Stroke paint for linear features and polygon outlines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineTreatment {
    /// Stroke width in screen pixels. Must be positive.
    pub width: f64,
    /// Stroke color.
    #[serde(with = "crate::css_color")]
    pub color: Color,
    /// Whether the stroke is dashed.
    #[serde(default)]
    pub dashed: bool,
}

impl LineTreatment {
    /// Creates a line treatment.
    pub fn new(width: f64, color: Color, dashed: bool) -> Self {
        Self {
            width,
            color,
            dashed,
        }
    }

    /// Creates a solid line treatment.
    pub fn solid(width: f64, color: Color) -> Self {
        Self::new(width, color, false)
    }

    /// Returns `true` if the width is finite and positive.
    pub fn has_valid_width(&self) -> bool {
        self.width.is_finite() && self.width > 0.0
    }
}

/// Area paint for polygons.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FillTreatment {
    /// Fill color.
    #[serde(with = "crate::css_color")]
    pub color: Color,
}

impl FillTreatment {
    /// Creates a fill treatment.
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

/// One paint operation, as emitted per renderer layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaintTreatment<'a> {
    /// Fill the feature's area.
    Fill(&'a FillTreatment),
    /// Stroke the feature's outline or line.
    Line(&'a LineTreatment),
}

/// The paint carried by a rule.
///
/// A rule without any paint is valid but draws nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Treatment {
    /// No paint.
    #[default]
    Unstyled,
    /// Stroke only.
    Line(LineTreatment),
    /// Fill only.
    Fill(FillTreatment),
    /// Fill and stroke on the same geometry.
    LineAndFill {
        /// Stroke paint.
        line: LineTreatment,
        /// Fill paint.
        fill: FillTreatment,
    },
}

impl Treatment {
    /// Builds a treatment from optional parts.
    pub fn from_parts(line: Option<LineTreatment>, fill: Option<FillTreatment>) -> Self {
        match (line, fill) {
            (None, None) => Self::Unstyled,
            (Some(line), None) => Self::Line(line),
            (None, Some(fill)) => Self::Fill(fill),
            (Some(line), Some(fill)) => Self::LineAndFill { line, fill },
        }
    }

    /// Splits the treatment into optional parts.
    pub fn into_parts(self) -> (Option<LineTreatment>, Option<FillTreatment>) {
        match self {
            Self::Unstyled => (None, None),
            Self::Line(line) => (Some(line), None),
            Self::Fill(fill) => (None, Some(fill)),
            Self::LineAndFill { line, fill } => (Some(line), Some(fill)),
        }
    }

    /// Returns the stroke paint, if any.
    pub fn line(&self) -> Option<&LineTreatment> {
        match self {
            Self::Line(line) | Self::LineAndFill { line, .. } => Some(line),
            Self::Unstyled | Self::Fill(_) => None,
        }
    }

    /// Returns the fill paint, if any.
    pub fn fill(&self) -> Option<&FillTreatment> {
        match self {
            Self::Fill(fill) | Self::LineAndFill { fill, .. } => Some(fill),
            Self::Unstyled | Self::Line(_) => None,
        }
    }

    /// Returns `true` if the treatment paints nothing.
    pub fn is_unstyled(&self) -> bool {
        matches!(self, Self::Unstyled)
    }

    /// Iterates paints in draw order: fill first, then line.
    pub fn paints(&self) -> impl Iterator<Item = PaintTreatment<'_>> {
        self.fill()
            .map(PaintTreatment::Fill)
            .into_iter()
            .chain(self.line().map(PaintTreatment::Line))
    }
}
