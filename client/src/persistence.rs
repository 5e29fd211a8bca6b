use js_sys::{Array, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, Document, HtmlAnchorElement, Url, Window};

/// Hands `bytes` to the browser as a PNG download named `file_name`.
pub fn download_png(
    window: &Window,
    document: &Document,
    bytes: &[u8],
    file_name: &str,
) -> Result<(), JsValue> {
    let parts = Array::of1(&Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type("image/png");
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let href = Url::create_object_url_with_blob(&blob)?;

    let anchor = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| JsValue::from_str("Invalid element type: a"))?;
    anchor.set_href(&href);
    anchor.set_download(file_name);
    anchor.click();

    // The download has started by the next tick; release the blob then.
    let revoke = Closure::once_into_js(move || {
        let _ = Url::revoke_object_url(&href);
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(revoke.unchecked_ref(), 0)?;
    Ok(())
}
