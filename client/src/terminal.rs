use wasm_bindgen::JsValue;
use web_sys::{Document, HtmlElement};

use ricepaint_core::Line;

pub fn print_lines(document: &Document, out: &HtmlElement, lines: &[Line]) -> Result<(), JsValue> {
    for line in lines {
        let div = document.create_element("div")?;
        div.set_class_name("line");
        div.set_inner_html(&line.to_html());
        out.append_child(&div)?;
    }
    out.set_scroll_top(out.scroll_height());
    Ok(())
}

pub fn clear_output(out: &HtmlElement) {
    out.set_inner_html("");
}
