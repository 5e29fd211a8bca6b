use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use ricepaint_core::DrawingSurface;

/// The paint window's canvas and the surface whose backing store it shows.
pub struct PaintState {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub surface: DrawingSurface,
}

impl PaintState {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self {
            canvas,
            ctx,
            surface: DrawingSurface::new(),
        }
    }
}
