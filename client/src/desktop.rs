use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, Window};

use ricepaint_core::desktop::{format_clock, DragSession};
use ricepaint_core::PointerInput;

use crate::dom::{listen, listen_mouse, listen_touch, mouse_input, touch_input};
use crate::util::next_z_index;

pub fn raise(window_el: &HtmlElement) {
    let _ = window_el
        .style()
        .set_property("z-index", &next_z_index().to_string());
}

fn set_cursor(element: &HtmlElement, cursor: &str) {
    let _ = element.style().set_property("cursor", cursor);
}

/// Lets `window_el` be dragged by its `.win-bar`, with mouse or touch.
pub fn make_draggable(window: &Window, window_el: &HtmlElement) -> Result<(), JsValue> {
    let handle = window_el
        .query_selector(".win-bar")?
        .ok_or_else(|| JsValue::from_str("Missing element: .win-bar"))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str("Invalid element type: .win-bar"))?;
    set_cursor(&handle, "grab");

    let drag: Rc<Cell<Option<DragSession>>> = Rc::new(Cell::new(None));

    let start: Rc<dyn Fn(&PointerInput)> = Rc::new({
        let drag = drag.clone();
        let window_el = window_el.clone();
        let handle = handle.clone();
        move |input: &PointerInput| {
            let Some(pointer) = input.position() else {
                return;
            };
            raise(&window_el);
            let rect = window_el.get_bounding_client_rect();
            drag.set(Some(DragSession::start(pointer, rect.left(), rect.top())));
            set_cursor(&handle, "grabbing");
        }
    });

    let follow: Rc<dyn Fn(&PointerInput)> = Rc::new({
        let drag = drag.clone();
        let window_el = window_el.clone();
        let window = window.clone();
        move |input: &PointerInput| {
            let Some(session) = drag.get() else {
                return;
            };
            let Some(pointer) = input.position() else {
                return;
            };
            let viewport_width = window
                .inner_width()
                .ok()
                .and_then(|value| value.as_f64())
                .unwrap_or(0.0);
            let viewport_height = window
                .inner_height()
                .ok()
                .and_then(|value| value.as_f64())
                .unwrap_or(0.0);
            let (left, top) = session.position(pointer, viewport_width, viewport_height);
            let style = window_el.style();
            let _ = style.set_property("left", &format!("{left}px"));
            let _ = style.set_property("top", &format!("{top}px"));
        }
    });

    let stop: Rc<dyn Fn()> = Rc::new({
        let handle = handle.clone();
        move || {
            if drag.take().is_some() {
                set_cursor(&handle, "grab");
            }
        }
    });

    {
        let start = start.clone();
        listen_mouse(&handle, "mousedown", move |event| {
            start(&mouse_input(&event));
            event.prevent_default();
        })?;
    }
    {
        let start = start.clone();
        listen_touch(&handle, "touchstart", move |event| {
            start(&touch_input(&event));
            event.prevent_default();
        })?;
    }
    {
        let follow = follow.clone();
        listen_mouse(window, "mousemove", move |event| follow(&mouse_input(&event)))?;
    }
    listen_touch(window, "touchmove", move |event| follow(&touch_input(&event)))?;
    {
        let stop = stop.clone();
        listen(window, "mouseup", move |_| stop())?;
    }
    listen(window, "touchend", move |_| stop())?;
    Ok(())
}

pub fn tick_clock(clock: &Element) {
    let now = js_sys::Date::new_0();
    clock.set_text_content(Some(&format_clock(now.get_hours(), now.get_minutes())));
}

pub fn start_clock(window: &Window, clock: &Element) -> Result<(), JsValue> {
    tick_clock(clock);
    let clock = clock.clone();
    let ontick = Closure::<dyn FnMut()>::new(move || tick_clock(&clock));
    window.set_interval_with_callback_and_timeout_and_arguments_0(
        ontick.as_ref().unchecked_ref(),
        1000,
    )?;
    ontick.forget();
    Ok(())
}
