//! Raster drawing surface.
//!
//! Owns the backing store and the in-progress stroke. Every entry point takes
//! the geometry and tool settings of the current event instead of caching
//! them, so a window that moves or a pixel ratio that changes mid-gesture is
//! picked up on the next point.

use tiny_skia::{Color, FilterQuality, PathBuilder, Pixmap, PixmapPaint, Transform};

use crate::brush::{BrushParams, ToolState};
use crate::export::ExportError;
use crate::geometry::{Point, Viewport};
use crate::pointer::PointerInput;

/// One rendered line between two consecutive samples of a gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub width: f32,
}

impl Segment {
    /// Pixels the segment may have touched, clipped to a `width x height`
    /// store. `None` when it lies entirely outside.
    pub fn dirty_rect(&self, width: u32, height: u32) -> Option<DirtyRect> {
        let pad = self.width / 2.0 + 1.0;
        let left = self.from.x.min(self.to.x) - pad;
        let top = self.from.y.min(self.to.y) - pad;
        let right = self.from.x.max(self.to.x) + pad;
        let bottom = self.from.y.max(self.to.y) + pad;
        DirtyRect::clipped(left, top, right, bottom, width, height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirtyRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl DirtyRect {
    fn clipped(left: f32, top: f32, right: f32, bottom: f32, width: u32, height: u32) -> Option<Self> {
        let x0 = left.floor().max(0.0).min(width as f32) as u32;
        let y0 = top.floor().max(0.0).min(height as f32) as u32;
        let x1 = right.ceil().max(0.0).min(width as f32) as u32;
        let y1 = bottom.ceil().max(0.0).min(height as f32) as u32;
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// Target dimensions equal the current ones.
    Unchanged,
    /// Target has a zero dimension (surface hidden or not laid out yet).
    Skipped,
    Resized {
        from: (u32, u32),
        to: (u32, u32),
    },
}

struct StrokeSession {
    anchor: Point,
}

pub struct DrawingSurface {
    backing: Option<Pixmap>,
    stroke: Option<StrokeSession>,
}

impl Default for DrawingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSurface {
    pub fn new() -> Self {
        Self {
            backing: None,
            stroke: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.backing.as_ref().map_or(0, Pixmap::width)
    }

    pub fn height(&self) -> u32 {
        self.backing.as_ref().map_or(0, Pixmap::height)
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.backing.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    /// Starts a gesture at the mapped pointer position. Nothing is drawn.
    /// Returns `false` when the event carries no usable position.
    pub fn begin_stroke(&mut self, input: &PointerInput, view: &Viewport) -> bool {
        let Some(anchor) = input.position().and_then(|p| view.to_backing(p)) else {
            return false;
        };
        self.stroke = Some(StrokeSession { anchor });
        true
    }

    /// Draws one segment from the anchor to the new position and advances
    /// the anchor. Ignored when no gesture is active.
    pub fn continue_stroke(
        &mut self,
        input: &PointerInput,
        view: &Viewport,
        tools: &ToolState,
    ) -> Option<Segment> {
        let anchor = self.stroke.as_ref()?.anchor;
        let point = input.position().and_then(|p| view.to_backing(p))?;
        let brush = BrushParams::configure(tools, view.dpr);
        if let Some(pixmap) = self.backing.as_mut() {
            draw_segment(pixmap, &brush, anchor, point);
        }
        if let Some(stroke) = self.stroke.as_mut() {
            stroke.anchor = point;
        }
        Some(Segment {
            from: anchor,
            to: point,
            width: brush.width,
        })
    }

    /// Ends the gesture. Returns whether one was active.
    pub fn end_stroke(&mut self) -> bool {
        self.stroke.take().is_some()
    }

    /// Matches the backing store to `floor(rect * dpr)`, stretching the
    /// existing bitmap onto the new store.
    ///
    /// The in-progress anchor is left untouched: later points of the same
    /// gesture map against the new geometry.
    pub fn resize(&mut self, view: &Viewport) -> ResizeOutcome {
        let (w1, h1) = view.backing_size();
        let (w0, h0) = (self.width(), self.height());
        if (w1, h1) == (w0, h0) {
            return ResizeOutcome::Unchanged;
        }
        let Some(mut next) = Pixmap::new(w1, h1) else {
            return ResizeOutcome::Skipped;
        };
        if let Some(old) = self.backing.take() {
            let paint = PixmapPaint {
                quality: FilterQuality::Bilinear,
                ..Default::default()
            };
            let scale = Transform::from_scale(
                w1 as f32 / old.width() as f32,
                h1 as f32 / old.height() as f32,
            );
            next.draw_pixmap(0, 0, old.as_ref(), &paint, scale, None);
        }
        self.backing = Some(next);
        ResizeOutcome::Resized {
            from: (w0, h0),
            to: (w1, h1),
        }
    }

    /// Wipes every pixel to transparent. Dimensions are kept.
    pub fn clear(&mut self) {
        if let Some(pixmap) = self.backing.as_mut() {
            pixmap.fill(Color::TRANSPARENT);
        }
    }

    /// Full-resolution PNG of the backing store.
    pub fn export_png(&self) -> Result<Vec<u8>, ExportError> {
        let pixmap = self.backing.as_ref().ok_or(ExportError::EmptySurface)?;
        pixmap
            .encode_png()
            .map_err(|error| ExportError::Encode(error.to_string()))
    }

    /// Straight-alpha RGBA bytes of a region, row-major, for presenting on a
    /// 2D canvas. Empty when the region does not fit the store.
    pub fn rgba_region(&self, rect: DirtyRect) -> Vec<u8> {
        let Some(pixmap) = self.backing.as_ref() else {
            return Vec::new();
        };
        if rect.x + rect.width > pixmap.width() || rect.y + rect.height > pixmap.height() {
            return Vec::new();
        }
        let stride = pixmap.width() as usize;
        let pixels = pixmap.pixels();
        let mut out = Vec::with_capacity(rect.width as usize * rect.height as usize * 4);
        for row in rect.y..rect.y + rect.height {
            let start = row as usize * stride + rect.x as usize;
            for pixel in &pixels[start..start + rect.width as usize] {
                let color = pixel.demultiply();
                out.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
            }
        }
        out
    }

    /// The whole store as a region, if it is allocated.
    pub fn full_rect(&self) -> Option<DirtyRect> {
        let pixmap = self.backing.as_ref()?;
        Some(DirtyRect {
            x: 0,
            y: 0,
            width: pixmap.width(),
            height: pixmap.height(),
        })
    }
}

fn draw_segment(pixmap: &mut Pixmap, brush: &BrushParams, from: Point, to: Point) {
    let mut builder = PathBuilder::new();
    builder.move_to(from.x, from.y);
    builder.line_to(to.x, to.y);
    let Some(path) = builder.finish() else {
        return;
    };
    pixmap.stroke_path(&path, &brush.paint(), &brush.stroke(), Transform::identity(), None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::{Rgb, ToolMode};
    use crate::geometry::ScreenRect;

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };

    fn view(width: f64, height: f64, dpr: f64) -> Viewport {
        Viewport::new(ScreenRect::new(0.0, 0.0, width, height), dpr)
    }

    fn tools(size: u32, mode: ToolMode) -> ToolState {
        ToolState {
            color: RED,
            size,
            mode,
        }
    }

    fn sized(view: &Viewport) -> DrawingSurface {
        let mut surface = DrawingSurface::new();
        surface.resize(view);
        surface
    }

    fn stroke(
        surface: &mut DrawingSurface,
        view: &Viewport,
        tools: &ToolState,
        points: &[(f64, f64)],
    ) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut iter = points.iter();
        if let Some(&(x, y)) = iter.next() {
            surface.begin_stroke(&PointerInput::mouse(x, y), view);
        }
        for &(x, y) in iter {
            if let Some(segment) = surface.continue_stroke(&PointerInput::mouse(x, y), view, tools) {
                segments.push(segment);
            }
        }
        surface.end_stroke();
        segments
    }

    fn alpha(surface: &DrawingSurface, x: u32, y: u32) -> u8 {
        surface.pixmap().unwrap().pixel(x, y).unwrap().alpha()
    }

    fn opaque_rows_in_column(surface: &DrawingSurface, x: u32) -> u32 {
        (0..surface.height()).filter(|&y| alpha(surface, x, y) > 127).count() as u32
    }

    #[test]
    fn first_resize_allocates_store() {
        let mut surface = DrawingSurface::new();
        let outcome = surface.resize(&view(100.0, 50.0, 2.0));
        assert_eq!(
            outcome,
            ResizeOutcome::Resized {
                from: (0, 0),
                to: (200, 100)
            }
        );
        assert_eq!((surface.width(), surface.height()), (200, 100));
    }

    #[test]
    fn resize_is_idempotent() {
        let view = view(100.0, 50.0, 1.0);
        let mut surface = sized(&view);
        stroke(&mut surface, &view, &tools(6, ToolMode::Draw), &[(10.0, 10.0), (80.0, 40.0)]);
        let before = surface.pixmap().unwrap().data().to_vec();

        assert_eq!(surface.resize(&view), ResizeOutcome::Unchanged);
        assert_eq!(surface.resize(&view), ResizeOutcome::Unchanged);
        assert_eq!(surface.pixmap().unwrap().data(), &before[..]);
    }

    #[test]
    fn zero_sized_target_keeps_content() {
        let view = view(100.0, 50.0, 1.0);
        let mut surface = sized(&view);
        stroke(&mut surface, &view, &tools(10, ToolMode::Draw), &[(10.0, 25.0), (90.0, 25.0)]);

        let hidden = Viewport::new(ScreenRect::new(0.0, 0.0, 0.0, 0.0), 1.0);
        assert_eq!(surface.resize(&hidden), ResizeOutcome::Skipped);
        assert_eq!((surface.width(), surface.height()), (100, 50));
        assert_eq!(alpha(&surface, 50, 25), 255);
    }

    #[test]
    fn enlarging_stretches_existing_content() {
        let small = view(100.0, 50.0, 1.0);
        let mut surface = sized(&small);
        stroke(&mut surface, &small, &tools(10, ToolMode::Draw), &[(10.0, 25.0), (90.0, 25.0)]);

        let large = view(200.0, 100.0, 1.0);
        assert!(matches!(surface.resize(&large), ResizeOutcome::Resized { .. }));

        let pixmap = surface.pixmap().unwrap();
        for x in 30..170 {
            let pixel = pixmap.pixel(x, 50).unwrap();
            assert!(pixel.alpha() > 250, "gap at x={x}");
            assert!(pixel.red() > 250, "color shift at x={x}");
            assert_eq!(pixel.green(), 0);
        }
        assert_eq!(pixmap.pixel(100, 5).unwrap().alpha(), 0);
    }

    #[test]
    fn dpr_change_rescales_store() {
        let mut surface = sized(&view(100.0, 50.0, 1.0));
        let outcome = surface.resize(&view(100.0, 50.0, 2.0));
        assert_eq!(
            outcome,
            ResizeOutcome::Resized {
                from: (100, 50),
                to: (200, 100)
            }
        );
    }

    #[test]
    fn apparent_width_is_dpr_invariant() {
        let tools = tools(4, ToolMode::Draw);
        let points = [(10.0, 20.0), (50.0, 20.0)];

        let one = view(100.0, 50.0, 1.0);
        let mut low = sized(&one);
        stroke(&mut low, &one, &tools, &points);

        let two = view(100.0, 50.0, 2.0);
        let mut high = sized(&two);
        stroke(&mut high, &two, &tools, &points);

        let low_rows = opaque_rows_in_column(&low, 30);
        let high_rows = opaque_rows_in_column(&high, 60);
        assert_eq!(low_rows, 4);
        assert_eq!(high_rows, 8);
        assert_eq!(high_rows as f64 / 2.0, low_rows as f64);
    }

    #[test]
    fn erase_removes_and_draw_restores() {
        let view = view(100.0, 50.0, 1.0);
        let mut surface = sized(&view);
        let path = [(10.0, 25.0), (90.0, 25.0)];

        stroke(&mut surface, &view, &tools(20, ToolMode::Draw), &path);
        assert_eq!(alpha(&surface, 50, 25), 255);

        stroke(&mut surface, &view, &tools(20, ToolMode::Erase), &path);
        for x in 20..80 {
            assert_eq!(alpha(&surface, x, 25), 0, "leftover at x={x}");
        }

        stroke(&mut surface, &view, &tools(20, ToolMode::Draw), &path);
        let pixel = surface.pixmap().unwrap().pixel(50, 25).unwrap();
        assert_eq!(pixel.alpha(), 255);
        assert_eq!(pixel.red(), 255);
    }

    #[test]
    fn tap_leaves_no_mark() {
        let view = view(100.0, 50.0, 1.0);
        let mut surface = sized(&view);
        let before = surface.pixmap().unwrap().data().to_vec();

        assert!(surface.begin_stroke(&PointerInput::mouse(40.0, 20.0), &view));
        assert!(surface.end_stroke());
        assert_eq!(surface.pixmap().unwrap().data(), &before[..]);
    }

    #[test]
    fn segments_connect_consecutive_points() {
        let view = view(100.0, 100.0, 1.0);
        let mut surface = sized(&view);
        let points = [(5.0, 5.0), (20.0, 10.0), (40.0, 30.0), (60.0, 30.0), (70.0, 80.0)];

        let segments = stroke(&mut surface, &view, &tools(3, ToolMode::Draw), &points);
        assert_eq!(segments.len(), points.len() - 1);
        for (segment, pair) in segments.iter().zip(points.windows(2)) {
            assert_eq!(segment.from, Point::new(pair[0].0 as f32, pair[0].1 as f32));
            assert_eq!(segment.to, Point::new(pair[1].0 as f32, pair[1].1 as f32));
        }
    }

    #[test]
    fn move_without_gesture_is_ignored() {
        let view = view(100.0, 50.0, 1.0);
        let mut surface = sized(&view);
        let before = surface.pixmap().unwrap().data().to_vec();

        let segment =
            surface.continue_stroke(&PointerInput::mouse(10.0, 10.0), &view, &tools(10, ToolMode::Draw));
        assert!(segment.is_none());
        assert!(!surface.end_stroke());
        assert_eq!(surface.pixmap().unwrap().data(), &before[..]);
    }

    #[test]
    fn touch_without_points_does_not_start_gesture() {
        let view = view(100.0, 50.0, 1.0);
        let mut surface = sized(&view);
        assert!(!surface.begin_stroke(&PointerInput::touch(Vec::new()), &view));
        assert!(!surface.is_drawing());
    }

    #[test]
    fn moving_rect_changes_mapping_but_not_anchor() {
        let tools = tools(2, ToolMode::Draw);
        let mut surface = sized(&view(100.0, 50.0, 1.0));
        let at_origin = Viewport::new(ScreenRect::new(0.0, 0.0, 100.0, 50.0), 1.0);
        let shifted = Viewport::new(ScreenRect::new(30.0, 10.0, 100.0, 50.0), 1.0);

        surface.begin_stroke(&PointerInput::mouse(40.0, 20.0), &at_origin);
        let segment = surface
            .continue_stroke(&PointerInput::mouse(50.0, 20.0), &shifted, &tools)
            .unwrap();
        assert_eq!(segment.from, Point::new(40.0, 20.0));
        assert_eq!(segment.to, Point::new(20.0, 10.0));
    }

    #[test]
    fn brush_size_is_read_per_segment() {
        let view = view(100.0, 50.0, 1.0);
        let mut surface = sized(&view);
        surface.begin_stroke(&PointerInput::mouse(10.0, 25.0), &view);
        let thin = surface
            .continue_stroke(&PointerInput::mouse(20.0, 25.0), &view, &tools(2, ToolMode::Draw))
            .unwrap();
        let thick = surface
            .continue_stroke(&PointerInput::mouse(30.0, 25.0), &view, &tools(12, ToolMode::Draw))
            .unwrap();
        assert_eq!(thin.width, 2.0);
        assert_eq!(thick.width, 12.0);
    }

    #[test]
    fn clear_wipes_pixels_and_keeps_size() {
        let view = view(100.0, 50.0, 1.0);
        let mut surface = sized(&view);
        stroke(&mut surface, &view, &tools(10, ToolMode::Draw), &[(10.0, 25.0), (90.0, 25.0)]);
        surface.clear();
        assert_eq!((surface.width(), surface.height()), (100, 50));
        assert!(surface.pixmap().unwrap().data().iter().all(|&b| b == 0));
    }

    #[test]
    fn clear_on_empty_surface_is_a_no_op() {
        let mut surface = DrawingSurface::new();
        surface.clear();
        assert_eq!(surface.width(), 0);
    }

    #[test]
    fn export_round_trips_full_resolution() {
        let view = view(40.0, 30.0, 2.0);
        let mut surface = sized(&view);
        stroke(&mut surface, &view, &tools(6, ToolMode::Draw), &[(5.0, 15.0), (35.0, 15.0)]);

        let png = surface.export_png().unwrap();
        let decoded = Pixmap::decode_png(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (80, 60));
        assert_eq!(decoded.pixel(40, 30), surface.pixmap().unwrap().pixel(40, 30));
    }

    #[test]
    fn export_of_unallocated_surface_fails() {
        let surface = DrawingSurface::new();
        assert!(matches!(surface.export_png(), Err(ExportError::EmptySurface)));
    }

    #[test]
    fn rgba_region_is_straight_alpha() {
        let view = view(20.0, 20.0, 1.0);
        let mut surface = sized(&view);
        stroke(&mut surface, &view, &tools(8, ToolMode::Draw), &[(2.0, 10.0), (18.0, 10.0)]);

        let rect = DirtyRect {
            x: 10,
            y: 10,
            width: 1,
            height: 1,
        };
        assert_eq!(surface.rgba_region(rect), vec![255, 0, 0, 255]);

        let outside = DirtyRect {
            x: 15,
            y: 15,
            width: 10,
            height: 1,
        };
        assert!(surface.rgba_region(outside).is_empty());
    }

    #[test]
    fn dirty_rect_covers_and_clips_segment() {
        let segment = Segment {
            from: Point::new(10.0, 10.0),
            to: Point::new(30.0, 20.0),
            width: 4.0,
        };
        assert_eq!(
            segment.dirty_rect(100, 100),
            Some(DirtyRect {
                x: 7,
                y: 7,
                width: 26,
                height: 16
            })
        );

        let edge = Segment {
            from: Point::new(-50.0, 5.0),
            to: Point::new(5.0, 5.0),
            width: 2.0,
        };
        assert_eq!(
            edge.dirty_rect(100, 100),
            Some(DirtyRect {
                x: 0,
                y: 3,
                width: 7,
                height: 4
            })
        );

        let outside = Segment {
            from: Point::new(-50.0, -50.0),
            to: Point::new(-20.0, -40.0),
            width: 2.0,
        };
        assert_eq!(outside.dirty_rect(100, 100), None);
    }
}
