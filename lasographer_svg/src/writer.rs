// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG serialization for [`SvgDocument`].

use kurbo::{Affine, BezPath, PathEl, Point};
use peniko::Color;

use crate::tree::{SvgDocument, SvgGroup, SvgNode, SvgPath, SvgText, TextAnchor};

/// XML namespace of Inkscape's layer attributes.
pub const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";

impl SvgDocument {
    /// Serializes the document as a standalone SVG file.
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        out.push_str(&format!(r#"xmlns:inkscape="{INKSCAPE_NS}" "#));
        out.push_str(&format!(
            r#"viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
            w = num(self.size.width),
            h = num(self.size.height),
        ));
        out.push('\n');
        for node in &self.children {
            write_node(&mut out, node, 1);
        }
        out.push_str("</svg>\n");
        out
    }
}

fn write_node(out: &mut String, node: &SvgNode, depth: usize) {
    indent(out, depth);
    match node {
        SvgNode::Group(g) => write_group(out, g, depth),
        SvgNode::Path(p) => write_path(out, p),
        SvgNode::Text(t) => write_text(out, t),
        SvgNode::Raw(markup) => {
            out.push_str(markup.trim());
            out.push('\n');
        }
    }
}

fn write_group(out: &mut String, g: &SvgGroup, depth: usize) {
    out.push_str("<g");
    if let Some(label) = &g.label {
        out.push_str(&format!(r#" inkscape:label="{}""#, escape_xml(label)));
    }
    if g.layer {
        out.push_str(r#" inkscape:groupmode="layer""#);
    }
    if let Some(transform) = g.transform {
        out.push_str(&format!(r#" transform="{}""#, transform_attr(transform)));
    }
    if g.children.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");
    for child in &g.children {
        write_node(out, child, depth + 1);
    }
    indent(out, depth);
    out.push_str("</g>\n");
}

fn write_path(out: &mut String, p: &SvgPath) {
    out.push_str(&format!(r#"<path d="{}""#, path_data(&p.data)));
    match &p.fill {
        Some(color) => write_paint_attr(out, "fill", color),
        None => out.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = &p.stroke {
        write_paint_attr(out, "stroke", &stroke.color);
        out.push_str(&format!(r#" stroke-width="{}""#, num(stroke.width)));
        if let Some([dash, gap]) = stroke.dasharray {
            out.push_str(&format!(r#" stroke-dasharray="{},{}""#, num(dash), num(gap)));
        }
    }
    out.push_str("/>\n");
}

fn write_text(out: &mut String, t: &SvgText) {
    out.push_str(&format!(
        r#"<text x="{}" y="{}" font-size="{}""#,
        num(t.position.x),
        num(t.position.y),
        num(t.font_size)
    ));
    out.push_str(match t.anchor {
        TextAnchor::Start => r#" text-anchor="start""#,
        TextAnchor::Middle => r#" text-anchor="middle""#,
        TextAnchor::End => r#" text-anchor="end""#,
    });
    write_paint_attr(out, "fill", &t.fill);
    out.push('>');
    out.push_str(&escape_xml(&t.text));
    out.push_str("</text>\n");
}

/// Formats path data as `M x y L x y ... Z`.
pub fn path_data(path: &BezPath) -> String {
    let mut d = String::new();
    for el in path.elements() {
        if !d.is_empty() {
            d.push(' ');
        }
        match *el {
            PathEl::MoveTo(p) => write_cmd(&mut d, 'M', &[p]),
            PathEl::LineTo(p) => write_cmd(&mut d, 'L', &[p]),
            PathEl::QuadTo(p1, p2) => write_cmd(&mut d, 'Q', &[p1, p2]),
            PathEl::CurveTo(p1, p2, p3) => write_cmd(&mut d, 'C', &[p1, p2, p3]),
            PathEl::ClosePath => d.push('Z'),
        }
    }
    d
}

fn write_cmd(d: &mut String, cmd: char, points: &[Point]) {
    d.push(cmd);
    for p in points {
        d.push_str(&format!(" {} {}", num(p.x), num(p.y)));
    }
}

fn transform_attr(transform: Affine) -> String {
    let [a, b, c, d, e, f] = transform.as_coeffs();
    if (a, b, c, d) == (1.0, 0.0, 0.0, 1.0) {
        format!("translate({} {})", num(e), num(f))
    } else {
        format!(
            "matrix({} {} {} {} {} {})",
            num(a),
            num(b),
            num(c),
            num(d),
            num(e),
            num(f)
        )
    }
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
fn num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    // Avoid "-0".
    if rounded == 0.0 {
        return "0".into();
    }
    format!("{rounded}")
}

fn write_paint_attr(out: &mut String, name: &str, color: &Color) {
    let rgba = color.to_rgba8();
    out.push_str(&format!(
        r##" {name}="#{:02x}{:02x}{:02x}""##,
        rgba.r, rgba.g, rgba.b
    ));
    if rgba.a != u8::MAX {
        out.push_str(&format!(
            r#" {name}-opacity="{}""#,
            num(f64::from(rgba.a) / 255.0)
        ));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Size, Vec2};
    use peniko::color::palette::css;

    use super::*;
    use crate::tree::SvgStroke;

    fn square() -> BezPath {
        let mut path = BezPath::new();
        path.move_to((1.0, 2.0));
        path.line_to((3.5, 2.0));
        path.line_to((3.5, 4.0));
        path.close_path();
        path
    }

    #[test]
    fn path_data_uses_spaced_commands() {
        assert_eq!(path_data(&square()), "M 1 2 L 3.5 2 L 3.5 4 Z");
    }

    #[test]
    fn numbers_are_rounded() {
        assert_eq!(num(1.23456), "1.235");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(12.0), "12");
    }

    #[test]
    fn writes_layers_paths_and_text() {
        let mut layer = SvgGroup::layer("Highway <Motorway>");
        layer.push(SvgPath {
            data: square(),
            fill: Some(css::RED),
            stroke: Some(SvgStroke {
                color: css::BLACK.with_alpha(0.5),
                width: 2.0,
                dasharray: Some([5.0, 2.5]),
            }),
        });
        let mut poi = SvgGroup::new().with_transform(Affine::translate(Vec2::new(10.0, 20.0)));
        poi.push(SvgText {
            position: Point::new(0.0, 5.0),
            text: "Fish & Chips".into(),
            font_size: 12.0,
            anchor: TextAnchor::Middle,
            fill: css::BLACK,
        });
        let doc = SvgDocument {
            size: Size::new(800.0, 600.0),
            children: vec![layer.into(), poi.into(), SvgGroup::layer("Empty").into()],
        };
        let svg = doc.to_svg_string();
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" viewBox="0 0 800 600" width="800" height="600">"#));
        assert!(svg.contains(r#"<g inkscape:label="Highway &lt;Motorway&gt;" inkscape:groupmode="layer">"#));
        assert!(svg.contains(r##"<path d="M 1 2 L 3.5 2 L 3.5 4 Z" fill="#ff0000" stroke="#000000" stroke-opacity="0.502" stroke-width="2" stroke-dasharray="5,2.5"/>"##));
        assert!(svg.contains(r#"<g transform="translate(10 20)">"#));
        assert!(svg.contains(r##"<text x="0" y="5" font-size="12" text-anchor="middle" fill="#000000">Fish &amp; Chips</text>"##));
        assert!(svg.contains(r#"<g inkscape:label="Empty" inkscape:groupmode="layer"/>"#));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn unfilled_paths_say_so() {
        let mut out = String::new();
        write_path(
            &mut out,
            &SvgPath {
                data: square(),
                fill: None,
                stroke: None,
            },
        );
        assert!(out.contains(r#"fill="none""#));
        assert!(!out.contains("stroke"));
    }
}
