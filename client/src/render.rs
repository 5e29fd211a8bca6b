use wasm_bindgen::{Clamped, JsValue};
use web_sys::ImageData;

use ricepaint_core::DirtyRect;

use crate::state::PaintState;

/// Copies the whole backing store onto the canvas, matching the canvas
/// element's pixel size to it first.
pub fn present(state: &PaintState) -> Result<(), JsValue> {
    let width = state.surface.width();
    let height = state.surface.height();
    if state.canvas.width() != width {
        state.canvas.set_width(width);
    }
    if state.canvas.height() != height {
        state.canvas.set_height(height);
    }
    match state.surface.full_rect() {
        Some(rect) => present_region(state, rect),
        None => Ok(()),
    }
}

pub fn present_region(state: &PaintState, rect: DirtyRect) -> Result<(), JsValue> {
    let data = state.surface.rgba_region(rect);
    if data.is_empty() {
        return Ok(());
    }
    let image = ImageData::new_with_u8_clamped_array_and_sh(Clamped(&data[..]), rect.width, rect.height)?;
    state.ctx.put_image_data(&image, rect.x as f64, rect.y as f64)
}
