//! Browser bindings.
//!
//! [`CanvasSurface`] implements [`crate::surface::Surface`] over an
//! `HtmlCanvasElement`; [`WebSignaturePad`] is the JavaScript-facing pad that
//! wires pointer events, `requestAnimationFrame` and image loading to the
//! engine's [`crate::engine::Action`]s.

mod canvas;
mod pad;

use std::sync::Once;

use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;

use crate::surface::SurfaceError;

pub use canvas::CanvasSurface;
pub use pad::WebSignaturePad;

static LOGGING: Once = Once::new();

/// Install the console logger and panic hook. Safe to call repeatedly.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
        }
    });
}

/// Map a rejected browser call into a [`SurfaceError`].
pub(crate) fn js_error(op: &'static str, err: &JsValue) -> SurfaceError {
    let message = err.as_string().unwrap_or_else(|| format!("{err:?}"));
    SurfaceError::Call { op, message }
}

/// Surface an engine error to JavaScript as an `Error`.
pub(crate) fn to_js(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}
