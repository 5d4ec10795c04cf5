// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compiles a Lasographer style for the map renderer and exports a view of it as SVG.
//!
//! Writes `definition.json` (the style definition as edited), `style.json` (the renderer style),
//! and `map.svg` into the output directory.

mod config;
mod sample;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use lasographer_core::{FeatureProperties, StyleDefinition};
use lasographer_mapbox::StyleCompiler;
use lasographer_svg::{IconAtlas, RenderedFeature, VectorExporter};
use log::{info, warn};

use crate::config::DemoConfig;

#[derive(Debug, Parser)]
#[command(name = "lasographer", version, about)]
struct Cli {
    /// Style definition JSON. Defaults to the built-in starting style.
    #[arg(long, short = 's')]
    style: Option<PathBuf>,
    /// GeoJSON with the rendered features to export. Defaults to built-in samples.
    #[arg(long, short = 'f')]
    features: Option<PathBuf>,
    /// Directory of POI icons (`cafe-15.svg`, ...).
    #[arg(long, short = 'i')]
    icons: Option<PathBuf>,
    /// Demo settings JSON: `style`, `export`, and `view` sections.
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
    /// Save the POI feature with this id before exporting (repeatable).
    #[arg(long = "save-poi", value_name = "ID")]
    save_pois: Vec<i64>,
    /// Output directory.
    #[arg(long, short = 'o', default_value = "out")]
    out: PathBuf,
    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = DemoConfig::load(cli.config.as_deref())?;
    let viewport = config.view.viewport();

    let mut style = match &cli.style {
        Some(path) => {
            let text = read(path)?;
            StyleDefinition::from_json(&text)
                .with_context(|| format!("loading style `{}`", path.display()))?
        }
        None => sample::default_style(),
    };
    let features = match &cli.features {
        Some(path) => RenderedFeature::parse_collection(&read(path)?)
            .with_context(|| format!("loading features `{}`", path.display()))?,
        None => sample::sample_features(viewport.center),
    };
    info!(
        "style {} with {} rules, {} features",
        style.revision(),
        style.rules().len(),
        features.len()
    );

    for id in &cli.save_pois {
        let poi = features
            .iter()
            .filter(|f| f.properties.feature_id() == Some(*id))
            .find_map(RenderedFeature::saved_poi);
        match poi {
            Some(poi) => style = style.toggle_poi(poi),
            None => warn!("no point feature with id {id} to save"),
        }
    }

    let icons = match &cli.icons {
        Some(dir) => IconAtlas::load_dir(dir)?,
        None => IconAtlas::new(),
    };

    let document = StyleCompiler::new(config.style)
        .compile(&style)
        .context("compiling style")?;
    let exporter = VectorExporter::new(config.export, icons);
    let export = exporter.export_from(&style, &features, &viewport, viewport.bounds())?;
    let artifact = export.artifact();

    fs::create_dir_all(&cli.out)
        .with_context(|| format!("creating `{}`", cli.out.display()))?;
    write(&cli.out, "definition.json", &serde_json::to_string_pretty(&style)?)?;
    write(&cli.out, "style.json", &document.to_json_string_pretty()?)?;
    write(&cli.out, artifact.file_name, &artifact.contents)?;
    if !export.diagnostics.is_empty() {
        warn!("export finished with {} diagnostics", export.diagnostics.len());
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading `{}`", path.display()))
}

fn write(dir: &Path, name: &str, contents: &str) -> Result<()> {
    let path = dir.join(name);
    fs::write(&path, contents).with_context(|| format!("writing `{}`", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}
