use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlCanvasElement,
    HtmlInputElement, HtmlSelectElement, HtmlSpanElement, KeyboardEvent, MouseEvent, TouchEvent,
    Window,
};

use ricepaint_core::{Point, PointerInput, ScreenRect, ToolState, Viewport};

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn update_size_label(input: &HtmlInputElement, value: &HtmlSpanElement) {
    value.set_text_content(Some(&input.value()));
}

pub fn set_hidden(element: &Element, hidden: bool) {
    let classes = element.class_list();
    let _ = if hidden {
        classes.add_1("hidden")
    } else {
        classes.remove_1("hidden")
    };
}

pub fn is_hidden(element: &Element) -> bool {
    element.class_list().contains("hidden")
}

/// Current on-screen geometry of the canvas. Read on every event.
pub fn read_viewport(window: &Window, canvas: &HtmlCanvasElement) -> Viewport {
    let rect = canvas.get_bounding_client_rect();
    Viewport::new(
        ScreenRect::new(rect.left(), rect.top(), rect.width(), rect.height()),
        window.device_pixel_ratio(),
    )
}

pub fn mouse_input(event: &MouseEvent) -> PointerInput {
    PointerInput::mouse(event.client_x() as f64, event.client_y() as f64)
}

pub fn touch_input(event: &TouchEvent) -> PointerInput {
    let list = event.touches();
    let touches = (0..list.length())
        .filter_map(|index| list.get(index))
        .map(|touch| Point::new(touch.client_x() as f32, touch.client_y() as f32))
        .collect();
    PointerInput::touch(touches)
}

/// The three paint toolbar controls, read together at stroke time.
pub struct ToolControls {
    pub color: HtmlInputElement,
    pub size: HtmlInputElement,
    pub mode: HtmlSelectElement,
}

impl ToolControls {
    pub fn read(&self) -> ToolState {
        ToolState::from_controls(&self.color.value(), &self.size.value(), &self.mode.value())
    }
}

pub fn listen<F>(target: &EventTarget, name: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

pub fn listen_mouse<F>(target: &EventTarget, name: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(MouseEvent) + 'static,
{
    let callback = Closure::<dyn FnMut(MouseEvent)>::new(handler);
    target.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

/// Touch listeners are registered non-passive so they can cancel scrolling.
pub fn listen_touch<F>(target: &EventTarget, name: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(TouchEvent) + 'static,
{
    let callback = Closure::<dyn FnMut(TouchEvent)>::new(handler);
    let options = AddEventListenerOptions::new();
    options.set_passive(false);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        name,
        callback.as_ref().unchecked_ref(),
        &options,
    )?;
    callback.forget();
    Ok(())
}

pub fn listen_enter<F>(input: &HtmlInputElement, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut(String) + 'static,
{
    let input_cb = input.clone();
    let callback = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        if event.key() != "Enter" {
            return;
        }
        let value = input_cb.value();
        input_cb.set_value("");
        handler(value);
    });
    input.add_event_listener_with_callback("keydown", callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}
