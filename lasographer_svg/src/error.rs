// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::error::Error;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading export inputs or querying features.
///
/// Problems with individual features or icons during an export are not errors; they are reported
/// as [`crate::ExportDiagnostic`]s next to the document.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The upstream feature query failed.
    #[error("feature query failed")]
    FeatureQuery(#[source] Box<dyn Error + Send + Sync + 'static>),
    /// An icon file could not be read.
    #[error("failed to read icon `{}`", path.display())]
    Icon {
        /// The icon file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A directory could not be listed.
    #[error("failed to read directory `{}`", path.display())]
    Directory {
        /// The directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Feature input is not valid GeoJSON.
    #[error("invalid GeoJSON")]
    GeoJson(#[from] geojson::Error),
}
