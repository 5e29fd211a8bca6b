use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

pub fn normalize_point(point: Point) -> Option<Point> {
    if !point.x.is_finite() || !point.y.is_finite() {
        return None;
    }
    Some(point)
}

/// On-screen bounding rectangle of an element, in layout pixels relative to
/// the viewport (what `getBoundingClientRect()` reports).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Geometry of the drawing surface at the moment an event is handled.
///
/// Built fresh for every event: the element may be moving (window drag) and
/// the device pixel ratio may change when the window crosses monitors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub rect: ScreenRect,
    pub dpr: f64,
}

impl Viewport {
    pub fn new(rect: ScreenRect, dpr: f64) -> Self {
        Self {
            rect,
            dpr: sanitize_dpr(dpr),
        }
    }

    /// Backing-store dimensions for this geometry.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            backing_extent(self.rect.width, self.dpr),
            backing_extent(self.rect.height, self.dpr),
        )
    }

    /// Maps a layout-pixel viewport position into backing-store pixels.
    ///
    /// No clamping: points outside the element map outside the store and
    /// are clipped at render time.
    pub fn to_backing(&self, client: Point) -> Option<Point> {
        let x = (client.x as f64 - self.rect.left) * self.dpr;
        let y = (client.y as f64 - self.rect.top) * self.dpr;
        normalize_point(Point {
            x: x as f32,
            y: y as f32,
        })
    }
}

pub fn sanitize_dpr(dpr: f64) -> f64 {
    if dpr.is_finite() && dpr > 0.0 {
        dpr
    } else {
        1.0
    }
}

fn backing_extent(layout: f64, dpr: f64) -> u32 {
    let value = (layout * dpr).floor();
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.min(u32::MAX as f64) as u32
}

pub fn clamp_range(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}
