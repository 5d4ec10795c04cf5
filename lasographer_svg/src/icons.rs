// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! POI icons, keyed by sprite name.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use kurbo::Size;
use log::{debug, warn};

use crate::ExportError;

/// Size assumed for icons that declare neither `width`/`height` nor a `viewBox`.
pub const DEFAULT_ICON_SIZE: f64 = 15.0;

/// File name suffix of the 15px Maki icon set.
const MAKI_SUFFIX: &str = "-15";

/// One icon: the inner markup of its SVG file, and its size.
#[derive(Clone, Debug, PartialEq)]
pub struct Icon {
    /// Icon size in pixels.
    pub size: Size,
    /// Children of the icon's root `<svg>` element.
    pub markup: String,
}

impl Icon {
    /// Extracts an icon from a standalone SVG file.
    ///
    /// Returns `None` if there is no root `<svg>` element.
    pub fn from_svg(svg: &str) -> Option<Self> {
        let start = svg.find("<svg")?;
        let open_end = start + svg[start..].find('>')?;
        let root = &svg[start..open_end];
        if root.ends_with('/') {
            return Some(Self {
                size: root_size(root),
                markup: String::new(),
            });
        }
        let close = svg.rfind("</svg>")?;
        if close <= open_end {
            return None;
        }
        Some(Self {
            size: root_size(root),
            markup: svg[open_end + 1..close].trim().to_string(),
        })
    }
}

fn root_size(root: &str) -> Size {
    let width = attr(root, "width").and_then(parse_length);
    let height = attr(root, "height").and_then(parse_length);
    if let (Some(w), Some(h)) = (width, height) {
        return Size::new(w, h);
    }
    if let Some(view_box) = attr(root, "viewBox") {
        let v: Vec<f64> = view_box
            .split([' ', ','])
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse().ok())
            .collect();
        if let &[_, _, w, h] = v.as_slice() {
            return Size::new(w, h);
        }
    }
    Size::new(DEFAULT_ICON_SIZE, DEFAULT_ICON_SIZE)
}

fn attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!(" {name}=\"");
    let start = tag.find(&needle)? + needle.len();
    let len = tag[start..].find('"')?;
    Some(&tag[start..start + len])
}

fn parse_length(value: &str) -> Option<f64> {
    value.trim_end_matches("px").parse().ok()
}

/// Icons by sprite name (`cafe`, `museum`, ...).
#[derive(Clone, Debug, Default)]
pub struct IconAtlas {
    icons: HashMap<String, Icon>,
}

impl IconAtlas {
    /// Creates an empty atlas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.svg` file in `dir`.
    ///
    /// The sprite name is the file stem without the Maki `-15` suffix, so `cafe-15.svg` is
    /// `cafe`. Files without a root `<svg>` element are skipped with a warning.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, ExportError> {
        let dir = dir.as_ref();
        let directory_error = |source| ExportError::Directory {
            path: dir.to_path_buf(),
            source,
        };
        let mut atlas = Self::new();
        for entry in fs::read_dir(dir).map_err(directory_error)? {
            let path = entry.map_err(directory_error)?.path();
            if path.extension().is_none_or(|ext| ext != "svg") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let name = stem.strip_suffix(MAKI_SUFFIX).unwrap_or(stem).to_string();
            let text = fs::read_to_string(&path).map_err(|source| ExportError::Icon {
                path: path.clone(),
                source,
            })?;
            match Icon::from_svg(&text) {
                Some(icon) => {
                    atlas.insert(name, icon);
                }
                None => warn!("skipping `{}`: no <svg> root element", path.display()),
            }
        }
        debug!("loaded {} icons from `{}`", atlas.len(), dir.display());
        Ok(atlas)
    }

    /// Adds or replaces an icon.
    pub fn insert(&mut self, name: impl Into<String>, icon: Icon) -> Option<Icon> {
        self.icons.insert(name.into(), icon)
    }

    /// Looks up an icon.
    pub fn get(&self, name: &str) -> Option<&Icon> {
        self.icons.get(name)
    }

    /// Number of icons.
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Returns `true` if the atlas has no icons.
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAFE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" id="cafe-15" width="15px" height="15px" viewBox="0 0 15 15">
  <path d="M12,5h-2V3H2v4c0,2,2,3,3,3"/>
</svg>
"#;

    #[test]
    fn extracts_inner_markup_and_size() {
        let icon = Icon::from_svg(CAFE).unwrap();
        assert_eq!(icon.size, Size::new(15.0, 15.0));
        assert_eq!(icon.markup, r#"<path d="M12,5h-2V3H2v4c0,2,2,3,3,3"/>"#);
    }

    #[test]
    fn falls_back_to_view_box_size() {
        let icon = Icon::from_svg(r#"<svg viewBox="0 0 11 13"><circle r="1"/></svg>"#).unwrap();
        assert_eq!(icon.size, Size::new(11.0, 13.0));
        let icon = Icon::from_svg("<svg><circle r=\"1\"/></svg>").unwrap();
        assert_eq!(icon.size, Size::new(DEFAULT_ICON_SIZE, DEFAULT_ICON_SIZE));
    }

    #[test]
    fn rejects_non_svg() {
        assert!(Icon::from_svg("<html></html>").is_none());
    }

    #[test]
    fn loads_directories_and_strips_maki_suffix() {
        let dir = std::env::temp_dir().join(format!("lasographer-icons-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("cafe-15.svg"), CAFE).unwrap();
        fs::write(dir.join("museum.svg"), "<svg/>").unwrap();
        fs::write(dir.join("notes.txt"), "not an icon").unwrap();
        let atlas = IconAtlas::load_dir(&dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();
        assert_eq!(atlas.len(), 2);
        assert!(atlas.get("cafe").is_some());
        assert_eq!(atlas.get("museum").unwrap().markup, "");
    }

    #[test]
    fn missing_directory_is_an_error() {
        assert!(matches!(
            IconAtlas::load_dir("/definitely/not/here"),
            Err(ExportError::Directory { .. })
        ));
    }
}
