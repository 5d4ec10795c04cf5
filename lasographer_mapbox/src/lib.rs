// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapbox GL style output for Lasographer style definitions.
//!
//! [`StyleCompiler`] turns a [`lasographer_core::StyleDefinition`] into a [`StyleDocument`]: a
//! version 8 style whose layers are, bottom to top,
//! - muted "ghost" layers for highways, buildings, and nature no rule claims,
//! - a fill and/or line layer per rule, filtered by the rule's effective predicate,
//! - a symbol layer with basemap POI labels, highlighting saved POIs.
//!
//! Every rule color is wrapped in a hover expression so hovered features light up.
//!
//! ```
//! use lasographer_core::{FilterExpression, LineTreatment, StyleDefinition, StyleRule};
//! use lasographer_mapbox::StyleCompiler;
//! use peniko::color::palette::css;
//!
//! let style = StyleDefinition::new(
//!     "style-1",
//!     vec![
//!         StyleRule::new("roads", FilterExpression::key_presence("highway"))
//!             .with_line(LineTreatment::solid(2.0, css::BLACK)),
//!     ],
//! );
//! let doc = StyleCompiler::default().compile(&style).unwrap();
//! assert!(doc.layer("roads-line").is_some());
//! ```

#![no_std]

extern crate alloc;

mod compile;
mod config;
mod document;

pub use compile::{POI_LAYER_ID, StyleCompiler};
pub use config::{PoiSource, StyleCompilerConfig, TileSource};
pub use document::{Layer, LayerType, STYLE_VERSION, Source, SourceKind, StyleDocument};
