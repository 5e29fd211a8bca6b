use std::cell::Cell;

thread_local! {
    static NEXT_Z_INDEX: Cell<u32> = Cell::new(10);
}

/// Stacking order for the window being raised. Always above every window
/// raised before it.
pub fn next_z_index() -> u32 {
    NEXT_Z_INDEX.with(|next| {
        let value = next.get();
        next.set(value.saturating_add(1));
        value
    })
}

pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}
