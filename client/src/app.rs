use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, HtmlButtonElement, HtmlCanvasElement,
    HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlSpanElement, Window,
};

use ricepaint_core::terminal::LOGIN_DELAY_MS;
use ricepaint_core::{export_file_name, Effect, PointerInput, ResizeOutcome, Session};

use crate::desktop::{make_draggable, raise, start_clock};
use crate::dom::{
    get_element, is_hidden, listen, listen_enter, listen_mouse, listen_touch, mouse_input,
    read_viewport, set_hidden, touch_input, update_size_label, ToolControls,
};
use crate::persistence::download_png;
use crate::render::{present, present_region};
use crate::state::PaintState;
use crate::terminal::{clear_output, print_lines};
use crate::util::now_ms;

fn debug_enabled(window: &Window) -> bool {
    let search = window.location().search().ok().unwrap_or_default();
    search.contains("debug=1")
        || search.contains("debug=true")
        || search.contains("log=1")
        || search.contains("log=true")
}

fn document_ready_state(document: &Document) -> Option<String> {
    Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

/// Every element the page wiring touches, plus the session and paint state.
struct App {
    window: Window,
    document: Document,
    debug: bool,
    boot: Element,
    desktop: Element,
    term_out: HtmlElement,
    term_input: HtmlInputElement,
    user_host: Element,
    desk_user_host: Element,
    wm_title: Element,
    paint_win: HtmlElement,
    mini_term_win: HtmlElement,
    mini_out: HtmlElement,
    mini_input: HtmlInputElement,
    tools: ToolControls,
    session: RefCell<Session>,
    paint: RefCell<PaintState>,
}

impl App {
    fn log(&self, message: &str) {
        if self.debug {
            web_sys::console::log_1(&message.into());
        }
    }

    fn boot_prompt(&self) {
        let label = self.session.borrow().host_label();
        self.user_host.set_text_content(Some(&label));
    }

    fn boot_banner(&self) {
        if let Err(err) = print_lines(&self.document, &self.term_out, &Session::banner()) {
            web_sys::console::error_1(&err);
        }
        self.boot_prompt();
    }

    fn enter_desktop(self: &Rc<Self>) {
        set_hidden(&self.boot, true);
        set_hidden(&self.desktop, false);
        {
            let session = self.session.borrow();
            self.desk_user_host
                .set_text_content(Some(&session.host_label()));
            self.wm_title.set_text_content(Some(&session.window_title()));
        }
        self.focus_paint();
    }

    fn schedule_enter_desktop(self: &Rc<Self>) {
        let app = self.clone();
        let onlogin = Closure::once_into_js(move || app.enter_desktop());
        if let Err(err) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                onlogin.unchecked_ref(),
                LOGIN_DELAY_MS,
            )
        {
            web_sys::console::error_1(&err);
        }
    }

    fn logout(&self) {
        if self.paint.borrow_mut().surface.end_stroke() {
            self.log("stroke canceled by logout");
        }
        set_hidden(&self.desktop, true);
        set_hidden(&self.boot, false);
        clear_output(&self.term_out);
        self.session.borrow_mut().logout();
        self.boot_banner();
        let _ = self.term_input.focus();
    }

    fn open_paint(self: &Rc<Self>) {
        set_hidden(&self.paint_win, false);
        self.focus_paint();
    }

    /// Raises the paint window and re-checks the canvas size once layout has
    /// settled.
    fn focus_paint(self: &Rc<Self>) {
        raise(&self.paint_win);
        let app = self.clone();
        let onsettled = Closure::once_into_js(move || app.resize_paint());
        if let Err(err) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(onsettled.unchecked_ref(), 0)
        {
            web_sys::console::error_1(&err);
        }
    }

    fn resize_paint(&self) {
        let mut paint = self.paint.borrow_mut();
        let view = read_viewport(&self.window, &paint.canvas);
        match paint.surface.resize(&view) {
            ResizeOutcome::Resized { from, to } => {
                self.log(&format!(
                    "Resized canvas from {}x{} to {}x{} (dpr {})",
                    from.0, from.1, to.0, to.1, view.dpr
                ));
                if let Err(err) = present(&paint) {
                    web_sys::console::error_1(&err);
                }
            }
            ResizeOutcome::Skipped => self.log("Canvas has no size yet, keeping backing store"),
            ResizeOutcome::Unchanged => {}
        }
    }

    fn begin_stroke(&self, input: &PointerInput) -> bool {
        let mut paint = self.paint.borrow_mut();
        let view = read_viewport(&self.window, &paint.canvas);
        paint.surface.begin_stroke(input, &view)
    }

    fn continue_stroke(&self, input: &PointerInput) -> bool {
        let tools = self.tools.read();
        let mut paint = self.paint.borrow_mut();
        if !paint.surface.is_drawing() {
            return false;
        }
        let view = read_viewport(&self.window, &paint.canvas);
        let Some(segment) = paint.surface.continue_stroke(input, &view, &tools) else {
            return false;
        };
        if let Some(rect) = segment.dirty_rect(paint.surface.width(), paint.surface.height()) {
            if let Err(err) = present_region(&paint, rect) {
                web_sys::console::error_1(&err);
            }
        }
        true
    }

    fn end_stroke(&self) {
        if self.paint.borrow_mut().surface.end_stroke() {
            self.log("stroke end");
        }
    }

    fn clear_paint(&self) {
        let mut paint = self.paint.borrow_mut();
        paint.surface.clear();
        if let Err(err) = present(&paint) {
            web_sys::console::error_1(&err);
        }
    }

    fn save_paint(&self) {
        let bytes = match self.paint.borrow().surface.export_png() {
            Ok(bytes) => bytes,
            Err(error) => {
                web_sys::console::warn_1(&format!("Export skipped: {error}").into());
                return;
            }
        };
        let file_name = export_file_name(now_ms());
        self.log(&format!("Exporting {file_name} ({} bytes)", bytes.len()));
        if let Err(err) = download_png(&self.window, &self.document, &bytes, &file_name) {
            web_sys::console::error_1(&err);
        }
    }

    fn run_boot_command(self: &Rc<Self>, raw: &str) {
        let Some(output) = self.session.borrow_mut().run_boot(raw) else {
            return;
        };
        if let Err(err) = print_lines(&self.document, &self.term_out, &output.lines) {
            web_sys::console::error_1(&err);
        }
        match output.effect {
            Some(Effect::ClearOutput) => clear_output(&self.term_out),
            Some(Effect::EnterDesktop) => {
                self.boot_prompt();
                self.schedule_enter_desktop();
            }
            Some(Effect::OpenPaint) => self.open_paint(),
            Some(Effect::Logout) => self.logout(),
            None => {}
        }
    }

    fn run_mini_command(self: &Rc<Self>, raw: &str) {
        let Some(output) = self.session.borrow().run_mini(raw) else {
            return;
        };
        if let Err(err) = print_lines(&self.document, &self.mini_out, &output.lines) {
            web_sys::console::error_1(&err);
        }
        match output.effect {
            Some(Effect::ClearOutput) => clear_output(&self.mini_out),
            Some(Effect::OpenPaint) => self.open_paint(),
            Some(Effect::Logout) => self.logout(),
            Some(Effect::EnterDesktop) => self.enter_desktop(),
            None => {}
        }
    }
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let started = Rc::new(Cell::new(false));

    if document_ready_state(&document).as_deref() == Some("complete") {
        started.set(true);
        return start_app();
    }

    let onload_started = started.clone();
    let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
        if onload_started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            web_sys::console::error_1(&err);
        }
    });
    window.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
    onload.forget();

    Ok(())
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let debug = debug_enabled(&window);
    if debug {
        web_sys::console::log_1(&"ricepaint debug logging enabled".into());
    }

    let canvas: HtmlCanvasElement = get_element(&document, "canvas")?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("Invalid 2d context"))?;

    let size_input: HtmlInputElement = get_element(&document, "size")?;
    let size_value: HtmlSpanElement = get_element(&document, "sizeVal")?;
    let clock: Element = get_element(&document, "clock")?;
    let open_paint_button: HtmlButtonElement = get_element(&document, "btnOpenPaint")?;
    let close_paint_button: HtmlButtonElement = get_element(&document, "btnClosePaint")?;
    let open_terminal_button: HtmlButtonElement = get_element(&document, "btnOpenTerminal")?;
    let close_terminal_button: HtmlButtonElement = get_element(&document, "btnCloseMiniTerm")?;
    let logout_button: HtmlButtonElement = get_element(&document, "btnLogout")?;
    let clear_button: HtmlButtonElement = get_element(&document, "btnClear")?;
    let save_button: HtmlButtonElement = get_element(&document, "btnSave")?;

    let app = Rc::new(App {
        window: window.clone(),
        document: document.clone(),
        debug,
        boot: get_element(&document, "boot")?,
        desktop: get_element(&document, "desktop")?,
        term_out: get_element(&document, "termOut")?,
        term_input: get_element(&document, "termInput")?,
        user_host: get_element(&document, "userHost")?,
        desk_user_host: get_element(&document, "deskUserHost")?,
        wm_title: get_element(&document, "wmTitle")?,
        paint_win: get_element(&document, "paintWin")?,
        mini_term_win: get_element(&document, "miniTermWin")?,
        mini_out: get_element(&document, "miniOut")?,
        mini_input: get_element(&document, "miniInput")?,
        tools: ToolControls {
            color: get_element::<HtmlInputElement>(&document, "color")?,
            size: size_input.clone(),
            mode: get_element::<HtmlSelectElement>(&document, "mode")?,
        },
        session: RefCell::new(Session::new()),
        paint: RefCell::new(PaintState::new(canvas.clone(), ctx)),
    });

    {
        let app_cb = app.clone();
        listen_enter(&app.term_input, move |value| app_cb.run_boot_command(&value))?;
    }
    {
        let app_cb = app.clone();
        listen_enter(&app.mini_input, move |value| app_cb.run_mini_command(&value))?;
    }

    app.boot_banner();
    start_clock(&window, &clock)?;

    {
        let app_cb = app.clone();
        listen(&open_paint_button, "click", move |_| app_cb.open_paint())?;
    }
    {
        let app_cb = app.clone();
        listen(&close_paint_button, "click", move |_| {
            app_cb.end_stroke();
            set_hidden(&app_cb.paint_win, true);
        })?;
    }
    {
        let app_cb = app.clone();
        listen(&open_terminal_button, "click", move |_| {
            set_hidden(&app_cb.mini_term_win, false);
            raise(&app_cb.mini_term_win);
            let _ = app_cb.mini_input.focus();
        })?;
    }
    {
        let app_cb = app.clone();
        listen(&close_terminal_button, "click", move |_| {
            set_hidden(&app_cb.mini_term_win, true);
        })?;
    }
    {
        let app_cb = app.clone();
        listen(&logout_button, "click", move |_| app_cb.logout())?;
    }

    make_draggable(&window, &app.paint_win)?;
    make_draggable(&window, &app.mini_term_win)?;

    {
        let app_cb = app.clone();
        listen(&window, "resize", move |_| {
            if !is_hidden(&app_cb.desktop) {
                app_cb.resize_paint();
            }
        })?;
    }

    {
        let size_value_cb = size_value.clone();
        let size_input_cb = size_input.clone();
        listen(&size_input, "input", move |_| {
            update_size_label(&size_input_cb, &size_value_cb);
        })?;
        update_size_label(&size_input, &size_value);
    }

    {
        let app_cb = app.clone();
        listen_mouse(&canvas, "mousedown", move |event| {
            if app_cb.begin_stroke(&mouse_input(&event)) {
                app_cb.log("stroke start (mouse)");
            }
            event.prevent_default();
        })?;
    }
    {
        let app_cb = app.clone();
        listen_mouse(&canvas, "mousemove", move |event| {
            if app_cb.continue_stroke(&mouse_input(&event)) {
                event.prevent_default();
            }
        })?;
    }
    {
        let app_cb = app.clone();
        listen_touch(&canvas, "touchstart", move |event| {
            if app_cb.begin_stroke(&touch_input(&event)) {
                app_cb.log("stroke start (touch)");
            }
            event.prevent_default();
        })?;
    }
    {
        let app_cb = app.clone();
        listen_touch(&canvas, "touchmove", move |event| {
            if app_cb.continue_stroke(&touch_input(&event)) {
                event.prevent_default();
            }
        })?;
    }
    // Releases are caught on the window so strokes that leave the canvas still end.
    for name in ["mouseup", "touchend", "touchcancel", "blur"] {
        let app_cb = app.clone();
        listen(&window, name, move |_| app_cb.end_stroke())?;
    }

    {
        let app_cb = app.clone();
        listen(&clear_button, "click", move |_| app_cb.clear_paint())?;
    }
    {
        let app_cb = app.clone();
        listen(&save_button, "click", move |_| app_cb.save_paint())?;
    }

    app.focus_paint();
    let _ = app.term_input.focus();

    Ok(())
}
