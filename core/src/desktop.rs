use crate::geometry::{clamp_range, Point};

pub const DRAG_MIN_LEFT: f64 = 10.0;
pub const DRAG_MIN_TOP: f64 = 52.0;
/// Part of a window that must stay inside the viewport on the right/bottom.
pub const DRAG_KEEP_VISIBLE: f64 = 80.0;

/// A window drag in progress, anchored at the pointer and window position
/// captured on pointer-down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    start: Point,
    origin_left: f64,
    origin_top: f64,
}

impl DragSession {
    pub fn start(pointer: Point, origin_left: f64, origin_top: f64) -> Self {
        Self {
            start: pointer,
            origin_left,
            origin_top,
        }
    }

    /// New `(left, top)` for the window, clamped roughly into the viewport.
    pub fn position(&self, pointer: Point, viewport_width: f64, viewport_height: f64) -> (f64, f64) {
        let dx = pointer.x as f64 - self.start.x as f64;
        let dy = pointer.y as f64 - self.start.y as f64;
        let left = clamp_range(
            self.origin_left + dx,
            DRAG_MIN_LEFT,
            viewport_width - DRAG_KEEP_VISIBLE,
        );
        let top = clamp_range(
            self.origin_top + dy,
            DRAG_MIN_TOP,
            viewport_height - DRAG_KEEP_VISIBLE,
        );
        (left, top)
    }
}

pub fn format_clock(hours: u32, minutes: u32) -> String {
    format!("{hours:02}:{minutes:02}")
}
