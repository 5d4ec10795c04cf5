// Copyright 2025 the Lasographer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geographic to screen projection.

use std::f64::consts::PI;

use kurbo::{Point, Rect, Size, Vec2};

/// Latitude limit of the square Web Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Width of the whole world, in pixels, at zoom 0.
pub const WORLD_TILE_SIZE: f64 = 512.0;

/// Maps `(longitude, latitude)` to screen coordinates.
///
/// The exporter projects with the same transform the on-screen map uses, so exported geometry
/// lines up with what the user saw.
pub trait Projector {
    /// Projects a `(lng, lat)` point to screen pixels, y down.
    fn project(&self, lng_lat: Point) -> Point;
}

impl<F: Fn(Point) -> Point> Projector for F {
    fn project(&self, lng_lat: Point) -> Point {
        self(lng_lat)
    }
}

/// A Web Mercator map view: a center, a fractional zoom, and a screen size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WebMercatorViewport {
    /// View center as `(lng, lat)`.
    pub center: Point,
    /// Zoom level. The world is `512 * 2^zoom` pixels wide.
    pub zoom: f64,
    /// Screen size in pixels.
    pub size: Size,
}

impl WebMercatorViewport {
    /// Creates a viewport.
    pub fn new(center: Point, zoom: f64, size: Size) -> Self {
        Self { center, zoom, size }
    }

    /// World width in pixels at this zoom.
    pub fn world_size(&self) -> f64 {
        WORLD_TILE_SIZE * self.zoom.exp2()
    }

    /// Maps a screen point back to `(lng, lat)`.
    pub fn unproject(&self, screen: Point) -> Point {
        let world = self.world_size();
        let p = self.to_world(self.center) + (screen - self.screen_center());
        let lng = p.x / world * 360.0 - 180.0;
        let y = PI * (1.0 - 2.0 * p.y / world);
        let lat = y.sinh().atan().to_degrees();
        Point::new(lng, lat)
    }

    /// Visible area as a `(lng, lat)` rectangle: `x0` west, `y0` south, `x1` east, `y1` north.
    pub fn bounds(&self) -> Rect {
        let nw = self.unproject(Point::ZERO);
        let se = self.unproject(Point::new(self.size.width, self.size.height));
        Rect::new(nw.x, se.y, se.x, nw.y)
    }

    fn screen_center(&self) -> Point {
        Point::new(self.size.width / 2.0, self.size.height / 2.0)
    }

    fn to_world(&self, lng_lat: Point) -> Point {
        let world = self.world_size();
        let lat = lng_lat.y.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = (lng_lat.x + 180.0) / 360.0;
        let y = 0.5 - (PI / 4.0 + lat / 2.0).tan().ln() / (2.0 * PI);
        Point::new(x * world, y * world)
    }
}

impl Projector for WebMercatorViewport {
    fn project(&self, lng_lat: Point) -> Point {
        let offset: Vec2 = self.to_world(lng_lat) - self.to_world(self.center);
        self.screen_center() + offset
    }
}
