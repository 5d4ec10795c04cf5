// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory SVG tree, just rich enough for map exports.
//!
//! Groups can be marked as Inkscape layers, so exported files open in Inkscape with one layer per
//! rule. [`SvgDocument::to_svg_string`] serializes the tree.

use kurbo::{Affine, BezPath, Point, Size};
use peniko::Color;

/// Root of an exported drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgDocument {
    /// Canvas size; also the view box.
    pub size: Size,
    /// Top-level nodes, bottom first.
    pub children: Vec<SvgNode>,
}

impl SvgDocument {
    /// Creates an empty document.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            children: Vec::new(),
        }
    }

    /// Finds a top-level group by label.
    pub fn group(&self, label: &str) -> Option<&SvgGroup> {
        self.children.iter().find_map(|node| match node {
            SvgNode::Group(g) if g.label.as_deref() == Some(label) => Some(g),
            _ => None,
        })
    }
}

/// Any drawable element.
#[derive(Clone, Debug, PartialEq)]
pub enum SvgNode {
    /// `<g>`
    Group(SvgGroup),
    /// `<path>`
    Path(SvgPath),
    /// `<text>`
    Text(SvgText),
    /// Pre-serialized markup, such as icon contents, written verbatim.
    Raw(String),
}

/// A group of nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SvgGroup {
    /// Inkscape label.
    pub label: Option<String>,
    /// Whether Inkscape should treat the group as a layer.
    pub layer: bool,
    /// Transform applied to the children.
    pub transform: Option<Affine>,
    /// Children, bottom first.
    pub children: Vec<SvgNode>,
}

impl SvgGroup {
    /// Creates an unlabeled group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an Inkscape layer.
    pub fn layer(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            layer: true,
            ..Self::default()
        }
    }

    /// Sets the transform.
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Appends a child.
    pub fn push(&mut self, node: impl Into<SvgNode>) {
        self.children.push(node.into());
    }

    /// Iterates all paths in this group and its descendants, depth first.
    pub fn paths(&self) -> Box<dyn Iterator<Item = &SvgPath> + '_> {
        Box::new(self.children.iter().flat_map(|node| -> Box<dyn Iterator<Item = &SvgPath> + '_> {
            match node {
                SvgNode::Path(p) => Box::new(std::iter::once(p)),
                SvgNode::Group(g) => g.paths(),
                SvgNode::Text(_) | SvgNode::Raw(_) => Box::new(std::iter::empty()),
            }
        }))
    }
}

/// Stroke paint of a path.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgStroke {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f64,
    /// Dash and gap lengths, if dashed.
    pub dasharray: Option<[f64; 2]>,
}

/// A path with optional fill and stroke. A path without fill is written with `fill="none"`.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgPath {
    /// Geometry in screen pixels.
    pub data: BezPath,
    /// Fill color.
    pub fill: Option<Color>,
    /// Stroke paint.
    pub stroke: Option<SvgStroke>,
}

/// Horizontal alignment of [`SvgText`] relative to its position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text starts at the position.
    #[default]
    Start,
    /// Text is centered on the position.
    Middle,
    /// Text ends at the position.
    End,
}

/// A single line of text. `position` is on the alphabetic baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgText {
    /// Anchor point.
    pub position: Point,
    /// Content.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Horizontal alignment.
    pub anchor: TextAnchor,
    /// Text color.
    pub fill: Color,
}

impl From<SvgGroup> for SvgNode {
    fn from(value: SvgGroup) -> Self {
        Self::Group(value)
    }
}

impl From<SvgPath> for SvgNode {
    fn from(value: SvgPath) -> Self {
        Self::Path(value)
    }
}

impl From<SvgText> for SvgNode {
    fn from(value: SvgText) -> Self {
        Self::Text(value)
    }
}
