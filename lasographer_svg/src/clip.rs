// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clipping geometry to the exported viewport.
//!
//! Both clippers work in `(lng, lat)` before projection, against a rectangle whose `x` range is
//! longitude and `y` range is latitude. Points on the boundary count as inside.

use kurbo::{Point, Rect};

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

fn outcode(p: Point, r: Rect) -> u8 {
    let mut code = INSIDE;
    if p.x < r.x0 {
        code |= LEFT;
    } else if p.x > r.x1 {
        code |= RIGHT;
    }
    if p.y < r.y0 {
        code |= BOTTOM;
    } else if p.y > r.y1 {
        code |= TOP;
    }
    code
}

/// Clips one segment with Cohen-Sutherland. Returns `None` if nothing of it is inside.
pub fn clip_segment(mut a: Point, mut b: Point, r: Rect) -> Option<(Point, Point)> {
    let mut code_a = outcode(a, r);
    let mut code_b = outcode(b, r);
    loop {
        if code_a | code_b == INSIDE {
            return Some((a, b));
        }
        if code_a & code_b != INSIDE {
            return None;
        }
        let out = if code_a != INSIDE { code_a } else { code_b };
        let p = if out & TOP != 0 {
            Point::new(a.x + (b.x - a.x) * (r.y1 - a.y) / (b.y - a.y), r.y1)
        } else if out & BOTTOM != 0 {
            Point::new(a.x + (b.x - a.x) * (r.y0 - a.y) / (b.y - a.y), r.y0)
        } else if out & RIGHT != 0 {
            Point::new(r.x1, a.y + (b.y - a.y) * (r.x1 - a.x) / (b.x - a.x))
        } else {
            Point::new(r.x0, a.y + (b.y - a.y) * (r.x0 - a.x) / (b.x - a.x))
        };
        if out == code_a {
            a = p;
            code_a = outcode(a, r);
        } else {
            b = p;
            code_b = outcode(b, r);
        }
    }
}

/// Clips a polyline, returning the pieces that lie inside `r`.
///
/// A line leaving and re-entering the rectangle comes back as several pieces. Every piece has at
/// least two points.
pub fn clip_line(points: &[Point], r: Rect) -> Vec<Vec<Point>> {
    let mut pieces = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for segment in points.windows(2) {
        let (start, end) = (segment[0], segment[1]);
        let Some((a, b)) = clip_segment(start, end, r) else {
            flush(&mut pieces, &mut current);
            continue;
        };
        if current.last() != Some(&a) {
            flush(&mut pieces, &mut current);
            current.push(a);
        }
        current.push(b);
        if b != end {
            flush(&mut pieces, &mut current);
        }
    }
    flush(&mut pieces, &mut current);
    pieces
}

fn flush(pieces: &mut Vec<Vec<Point>>, current: &mut Vec<Point>) {
    if current.len() >= 2 {
        pieces.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Clips a polygon ring with Sutherland-Hodgman.
///
/// The result is closed (first point repeated at the end), or empty if less than a triangle
/// remains.
pub fn clip_ring(ring: &[Point], r: Rect) -> Vec<Point> {
    let mut points: Vec<Point> = ring.to_vec();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    let edges: [(fn(Point, Rect) -> bool, fn(Point, Point, Rect) -> Point); 4] = [
        (|p, r| p.x >= r.x0, |a, b, r| at_x(a, b, r.x0)),
        (|p, r| p.x <= r.x1, |a, b, r| at_x(a, b, r.x1)),
        (|p, r| p.y >= r.y0, |a, b, r| at_y(a, b, r.y0)),
        (|p, r| p.y <= r.y1, |a, b, r| at_y(a, b, r.y1)),
    ];
    for (inside, intersect) in edges {
        if points.is_empty() {
            break;
        }
        let input = std::mem::take(&mut points);
        let mut prev = input[input.len() - 1];
        for &p in &input {
            match (inside(p, r), inside(prev, r)) {
                (true, true) => points.push(p),
                (true, false) => {
                    points.push(intersect(prev, p, r));
                    points.push(p);
                }
                (false, true) => points.push(intersect(prev, p, r)),
                (false, false) => {}
            }
            prev = p;
        }
    }
    points.dedup();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if points.len() < 3 {
        return Vec::new();
    }
    points.push(points[0]);
    points
}

fn at_x(a: Point, b: Point, x: f64) -> Point {
    Point::new(x, a.y + (b.y - a.y) * (x - a.x) / (b.x - a.x))
}

fn at_y(a: Point, b: Point, y: f64) -> Point {
    Point::new(a.x + (b.x - a.x) * (y - a.y) / (b.y - a.y), y)
}
