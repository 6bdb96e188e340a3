//! JavaScript-facing signature pad.
//!
//! The engine lives in an `Rc<RefCell<Host>>`. DOM listeners, animation
//! frames and image loads hold only a `Weak` to it, so dropping the pad from
//! JavaScript frees everything. Engine calls happen under a short
//! `borrow_mut`; the returned actions are dispatched after the borrow is
//! released so user callbacks may call back into the pad.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Function, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, HtmlCanvasElement, HtmlImageElement, PointerEvent, Url};

use super::{CanvasSurface, to_js};
use crate::capture::PointerInput;
use crate::config::{ConfigPatch, PadConfig};
use crate::consts::DEFAULT_EXPORT_QUALITY;
use crate::engine::{Action, ImageSlot, PadState, SignaturePad};
use crate::error::PadError;
use crate::export::{ExportBody, ExportFormat, RasterFormat};
use crate::surface::Surface;
use crate::util::filters::{self, FilterType};

const DEFAULT_FILE_NAME: &str = "signature";

#[derive(Debug, Clone, Copy)]
enum PointerKind {
    Down,
    Move,
    Up,
    Cancel,
    Leave,
}

const POINTER_EVENTS: [(&str, PointerKind); 5] = [
    ("pointerdown", PointerKind::Down),
    ("pointermove", PointerKind::Move),
    ("pointerup", PointerKind::Up),
    ("pointercancel", PointerKind::Cancel),
    ("pointerleave", PointerKind::Leave),
];

/// User callbacks read from the options object.
#[derive(Default)]
struct Callbacks {
    on_begin: Option<Function>,
    on_change: Option<Function>,
    on_end: Option<Function>,
    on_state_change: Option<Function>,
}

impl Callbacks {
    /// Replace every callback key present on `options`; `null` clears one.
    fn update(&mut self, options: &JsValue) {
        for (key, slot) in [
            ("onBegin", &mut self.on_begin),
            ("onChange", &mut self.on_change),
            ("onEnd", &mut self.on_end),
            ("onStateChange", &mut self.on_state_change),
        ] {
            if let Some(callback) = read_callback(options, key) {
                *slot = callback;
            }
        }
    }
}

/// `None` if `key` is absent, `Some(None)` if present but not a function.
fn read_callback(options: &JsValue, key: &str) -> Option<Option<Function>> {
    let value = match Reflect::get(options, &JsValue::from_str(key)) {
        Ok(value) if !value.is_undefined() => value,
        _ => return None,
    };
    match value.dyn_into::<Function>() {
        Ok(callback) => Some(Some(callback)),
        Err(_) => Some(None),
    }
}

struct PendingFrame {
    id: i32,
    _callback: Closure<dyn FnMut(f64)>,
}

struct Host {
    pad: SignaturePad<CanvasSurface>,
    callbacks: Callbacks,
    frame: Option<PendingFrame>,
    listeners: Vec<(&'static str, Closure<dyn FnMut(PointerEvent)>)>,
}

impl Host {
    fn detach(&mut self) {
        let canvas = self.pad.surface().canvas().clone();
        for (name, listener) in self.listeners.drain(..) {
            if let Err(err) = canvas.remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref()) {
                log::warn!("failed to remove {name} listener: {err:?}");
            }
        }
    }

    fn cancel_frame(&mut self) {
        let Some(frame) = self.frame.take() else {
            return;
        };
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.cancel_animation_frame(frame.id) {
                log::warn!("cancelAnimationFrame failed: {err:?}");
            }
        }
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.detach();
        self.cancel_frame();
    }
}

/// Signature pad bound to a `<canvas>`.
#[wasm_bindgen(js_name = SignaturePad)]
pub struct WebSignaturePad {
    host: Rc<RefCell<Host>>,
}

#[wasm_bindgen(js_class = SignaturePad)]
impl WebSignaturePad {
    /// `options` is a plain object with the config fields plus optional
    /// `onBegin`, `onChange`, `onEnd` and `onStateChange` callbacks.
    ///
    /// # Errors
    ///
    /// Throws if the options are malformed or the canvas has no 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, options: JsValue) -> Result<WebSignaturePad, JsValue> {
        let config: PadConfig = if options.is_undefined() || options.is_null() {
            PadConfig::default()
        } else {
            serde_json::from_str(&stringify(&options)?).map_err(to_js)?
        };
        let mut callbacks = Callbacks::default();
        if options.is_object() {
            callbacks.update(&options);
        }

        let surface = CanvasSurface::new(canvas, config.width, config.height).map_err(to_js)?;
        let pad = SignaturePad::new(surface, config).map_err(to_js)?;
        let requests = pad.image_requests();

        let host = Rc::new(RefCell::new(Host { pad, callbacks, frame: None, listeners: Vec::new() }));
        attach_listeners(&host)?;
        dispatch(&host, requests, None);
        Ok(Self { host })
    }

    /// # Errors
    ///
    /// Throws after `destroy`.
    pub fn clear(&self) -> Result<(), JsValue> {
        self.run(SignaturePad::clear)
    }

    /// # Errors
    ///
    /// Throws after `destroy`.
    pub fn undo(&self) -> Result<(), JsValue> {
        self.run(SignaturePad::undo)
    }

    /// # Errors
    ///
    /// Throws after `destroy`.
    pub fn redo(&self) -> Result<(), JsValue> {
        self.run(SignaturePad::redo)
    }

    #[wasm_bindgen(js_name = isEmpty)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.host.borrow().pad.is_empty()
    }

    #[wasm_bindgen(js_name = canUndo)]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.host.borrow().pad.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.host.borrow().pad.can_redo()
    }

    #[wasm_bindgen(js_name = isEnabled)]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.host.borrow().pad.is_enabled()
    }

    /// Toggle input; a disabled pad also ignores pointer events at the CSS level.
    ///
    /// # Errors
    ///
    /// Throws after `destroy`.
    #[wasm_bindgen(js_name = setEnabled)]
    pub fn set_enabled(&self, enabled: bool) -> Result<(), JsValue> {
        self.run(|pad| pad.set_enabled(enabled))?;
        let canvas = self.canvas();
        canvas.style().set_property("pointer-events", if enabled { "auto" } else { "none" })
    }

    /// # Errors
    ///
    /// Throws after `destroy` or if the browser refuses to encode.
    #[wasm_bindgen(js_name = toDataURL)]
    pub fn to_data_url(&self, format: Option<String>, quality: Option<f64>) -> Result<String, JsValue> {
        let format = match format.as_deref().map(ExportFormat::parse) {
            Some(ExportFormat::Jpeg) => RasterFormat::Jpeg,
            _ => RasterFormat::Png,
        };
        let quality = quality.unwrap_or(DEFAULT_EXPORT_QUALITY);
        self.host.borrow().pad.to_data_url(format, quality).map_err(to_js)
    }

    /// # Errors
    ///
    /// Throws after `destroy`.
    #[wasm_bindgen(js_name = toSVG)]
    pub fn to_svg(&self) -> Result<String, JsValue> {
        self.host.borrow().pad.to_svg().map_err(to_js)
    }

    /// The signature as a plain JavaScript object.
    ///
    /// # Errors
    ///
    /// Throws after `destroy`.
    #[wasm_bindgen(js_name = toJSON)]
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        let json = self.host.borrow().pad.to_json_string().map_err(to_js)?;
        js_sys::JSON::parse(&json)
    }

    /// Replace the drawing with `data`, given as an object or a JSON string.
    ///
    /// # Errors
    ///
    /// Throws after `destroy` or if `data` is not a valid signature document.
    #[wasm_bindgen(js_name = fromJSON)]
    pub fn from_json(&self, data: JsValue) -> Result<(), JsValue> {
        let json = match data.as_string() {
            Some(json) => json,
            None => stringify(&data)?,
        };
        self.run(|pad| pad.from_json_str(&json))
    }

    /// Shallow-merge `patch` into the config. Callback keys replace the
    /// registered callbacks; `width`/`height` resize the canvas.
    ///
    /// # Errors
    ///
    /// Throws after `destroy` or if the patch is malformed.
    #[wasm_bindgen(js_name = updateConfig)]
    pub fn update_config(&self, patch: JsValue) -> Result<(), JsValue> {
        let parsed: ConfigPatch = serde_json::from_str(&stringify(&patch)?).map_err(to_js)?;
        let resize = parsed.width.is_some() || parsed.height.is_some();
        let actions = {
            let mut host = self.host.borrow_mut();
            host.callbacks.update(&patch);
            let mut actions = host.pad.update_config(parsed).map_err(to_js)?;
            if resize {
                let (width, height) = (host.pad.config().width, host.pad.config().height);
                host.pad.surface_mut().resize(width, height).map_err(to_js)?;
                host.pad.render().map_err(to_js)?;
                actions.push(Action::StateChanged(host.pad.state()));
            }
            actions
        };
        dispatch(&self.host, actions, None);
        Ok(())
    }

    /// Re-measure the element and device pixel ratio, then repaint.
    ///
    /// # Errors
    ///
    /// Throws after `destroy`.
    pub fn resize(&self) -> Result<(), JsValue> {
        let mut host = self.host.borrow_mut();
        let (width, height) = (host.pad.config().width, host.pad.config().height);
        host.pad.surface_mut().resize(width, height).map_err(to_js)?;
        host.pad.render().map_err(to_js)
    }

    /// Apply a pixel filter (`grayscale`, `invert`, `sepia`, `sharpen`,
    /// `blur`, `contrast`, `brightness`) to the canvas in place. The next
    /// repaint restores the strokes.
    ///
    /// # Errors
    ///
    /// Throws on an unknown filter name or if the canvas pixels cannot be read.
    #[wasm_bindgen(js_name = applyFilter)]
    pub fn apply_filter(&self, name: &str, intensity: Option<f64>) -> Result<(), JsValue> {
        let filter: FilterType = serde_json::from_value(serde_json::Value::String(name.to_owned())).map_err(to_js)?;
        let mut host = self.host.borrow_mut();
        let surface = host.pad.surface_mut();
        let mut pixels = surface.pixels().map_err(to_js)?;
        filters::apply(&mut pixels, filter, intensity.unwrap_or(1.0));
        surface.put_pixels(&pixels).map_err(to_js)
    }

    #[wasm_bindgen(js_name = getCanvas)]
    #[must_use]
    pub fn canvas(&self) -> HtmlCanvasElement {
        self.host.borrow().pad.surface().canvas().clone()
    }

    /// Save the signature through a temporary download link.
    ///
    /// # Errors
    ///
    /// Throws after `destroy` or if the link cannot be created.
    pub fn download(&self, file_name: Option<String>, format: Option<String>, quality: Option<f64>) -> Result<(), JsValue> {
        let format = format.as_deref().map_or(ExportFormat::Png, ExportFormat::parse);
        let payload = self
            .host
            .borrow()
            .pad
            .export(format, quality.unwrap_or(DEFAULT_EXPORT_QUALITY))
            .map_err(to_js)?;
        let name = payload.file_name(file_name.as_deref().unwrap_or(DEFAULT_FILE_NAME));

        match &payload.body {
            ExportBody::DataUrl(url) => click_link(url, &name),
            ExportBody::Text(text) => {
                let parts = js_sys::Array::of1(&JsValue::from_str(text));
                let options = BlobPropertyBag::new();
                options.set_type(payload.mime());
                let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
                let url = Url::create_object_url_with_blob(&blob)?;
                let clicked = click_link(&url, &name);
                Url::revoke_object_url(&url)?;
                clicked
            }
        }
    }

    /// Detach listeners, cancel any pending frame and drop all drawing state.
    ///
    /// # Errors
    ///
    /// Throws if already destroyed.
    pub fn destroy(&self) -> Result<(), JsValue> {
        let mut host = self.host.borrow_mut();
        host.pad.destroy().map_err(to_js)?;
        host.cancel_frame();
        host.detach();
        Ok(())
    }
}

impl WebSignaturePad {
    fn run(&self, f: impl FnOnce(&mut SignaturePad<CanvasSurface>) -> Result<Vec<Action>, PadError>) -> Result<(), JsValue> {
        let actions = f(&mut self.host.borrow_mut().pad).map_err(to_js)?;
        dispatch(&self.host, actions, None);
        Ok(())
    }
}

// =============================================================
// Event wiring
// =============================================================

fn attach_listeners(host: &Rc<RefCell<Host>>) -> Result<(), JsValue> {
    let canvas = host.borrow().pad.surface().canvas().clone();
    for (name, kind) in POINTER_EVENTS {
        let weak = Rc::downgrade(host);
        let listener = Closure::wrap(Box::new(move |event: PointerEvent| {
            event.prevent_default();
            if let Some(host) = weak.upgrade() {
                on_pointer(&host, kind, &event);
            }
        }) as Box<dyn FnMut(PointerEvent)>);
        canvas.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
        host.borrow_mut().listeners.push((name, listener));
    }
    Ok(())
}

fn pointer_input(event: &PointerEvent) -> PointerInput {
    let input = PointerInput::new(f64::from(event.client_x()), f64::from(event.client_y()), event.time_stamp());
    let pressure = f64::from(event.pressure());
    if pressure > 0.0 { input.with_pressure(pressure) } else { input }
}

fn on_pointer(host: &Rc<RefCell<Host>>, kind: PointerKind, event: &PointerEvent) {
    let input = pointer_input(event);
    let result = {
        let mut guard = host.borrow_mut();
        let pad = &mut guard.pad;
        match kind {
            PointerKind::Down => pad.on_pointer_down(input),
            PointerKind::Move => pad.on_pointer_move(input),
            PointerKind::Up => pad.on_pointer_up(input),
            PointerKind::Cancel => pad.on_pointer_cancel(input),
            PointerKind::Leave => pad.on_pointer_leave(input),
        }
    };
    let event: &JsValue = event.as_ref();
    match result {
        Ok(actions) => dispatch(host, actions, Some(event)),
        Err(err) => log::error!("pointer {kind:?} failed: {err}"),
    }
}

fn dispatch(host: &Rc<RefCell<Host>>, actions: Vec<Action>, event: Option<&JsValue>) {
    let undefined = JsValue::UNDEFINED;
    let event = event.unwrap_or(&undefined);
    for action in actions {
        match action {
            Action::StrokeBegan(_) => fire(host, |c| c.on_begin.clone(), event),
            Action::StrokeChanged(_) => fire(host, |c| c.on_change.clone(), event),
            Action::StrokeEnded(_) => fire(host, |c| c.on_end.clone(), event),
            Action::FrameRequested => request_frame(host),
            Action::FrameCancelled => host.borrow_mut().cancel_frame(),
            Action::LoadImage { slot, url } => load_image(host, slot, url),
            Action::StateChanged(state) => fire(host, |c| c.on_state_change.clone(), &state_object(state)),
        }
    }
}

fn fire(host: &Rc<RefCell<Host>>, pick: impl FnOnce(&Callbacks) -> Option<Function>, arg: &JsValue) {
    let Some(callback) = pick(&host.borrow().callbacks) else {
        return;
    };
    if let Err(err) = callback.call1(&JsValue::NULL, arg) {
        log::error!("signature pad callback threw: {err:?}");
    }
}

fn state_object(state: PadState) -> JsValue {
    let obj = js_sys::Object::new();
    for (key, value) in [
        ("isEmpty", state.is_empty),
        ("canUndo", state.can_undo),
        ("canRedo", state.can_redo),
        ("isEnabled", state.is_enabled),
    ] {
        if let Err(err) = Reflect::set(&obj, &JsValue::from_str(key), &JsValue::from_bool(value)) {
            log::warn!("failed to set {key}: {err:?}");
        }
    }
    obj.into()
}

// =============================================================
// Frames and images
// =============================================================

fn run_frame(host: &Rc<RefCell<Host>>) {
    if let Err(err) = host.borrow_mut().pad.on_frame() {
        log::error!("frame failed: {err}");
    }
}

fn request_frame(host: &Rc<RefCell<Host>>) {
    if host.borrow().frame.is_some() {
        return;
    }
    let Some(window) = web_sys::window() else {
        run_frame(host);
        return;
    };

    let weak: Weak<RefCell<Host>> = Rc::downgrade(host);
    let callback = Closure::wrap(Box::new(move |_ts: f64| {
        let Some(host) = weak.upgrade() else {
            return;
        };
        let finished = host.borrow_mut().frame.take();
        run_frame(&host);
        drop(finished);
    }) as Box<dyn FnMut(f64)>);

    match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        Ok(id) => host.borrow_mut().frame = Some(PendingFrame { id, _callback: callback }),
        Err(err) => {
            log::warn!("requestAnimationFrame failed, painting now: {err:?}");
            run_frame(host);
        }
    }
}

fn load_image(host: &Rc<RefCell<Host>>, slot: ImageSlot, url: String) {
    let image = match HtmlImageElement::new() {
        Ok(image) => image,
        Err(err) => {
            log::error!("cannot create image element: {err:?}");
            return;
        }
    };
    // Keeps the canvas exportable when the image comes from another origin.
    image.set_cross_origin(Some("anonymous"));

    let weak = Rc::downgrade(host);
    let loaded = image.clone();
    let src = url.clone();
    let onload = Closure::once_into_js(move || {
        let Some(host) = weak.upgrade() else {
            return;
        };
        let result = host.borrow_mut().pad.set_image(slot, &src, loaded);
        match result {
            Ok(true) => log::debug!("{slot:?} image applied: {src}"),
            Ok(false) => {}
            Err(err) => log::error!("{slot:?} image failed to apply: {err}"),
        }
    });
    let failed = url.clone();
    let onerror = Closure::once_into_js(move || log::warn!("{slot:?} image failed to load: {failed}"));

    image.set_onload(Some(onload.unchecked_ref()));
    image.set_onerror(Some(onerror.unchecked_ref()));
    image.set_src(&url);
}

// =============================================================
// Helpers
// =============================================================

fn stringify(value: &JsValue) -> Result<String, JsValue> {
    Ok(String::from(js_sys::JSON::stringify(value)?))
}

fn click_link(href: &str, file_name: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document.body().ok_or_else(|| JsValue::from_str("no document body"))?;
    let link: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    link.set_href(href);
    link.set_download(file_name);
    body.append_child(&link)?;
    link.click();
    body.remove_child(&link)?;
    Ok(())
}
