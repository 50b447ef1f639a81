// Utility helpers shared across components.

use wasm_bindgen::JsValue;

pub fn clog(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

/// Milliseconds since the Unix epoch, from the host clock.
/// Drag velocity timestamps come from here so the gesture core itself
/// never touches the clock.
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}
