//! `Surface` over a browser canvas.
//!
//! The backing store is sized in device pixels and the context transform is
//! scaled by the device pixel ratio, so every drawing call works in CSS
//! pixels. Pixel reads and writes (`pixels`, `put_pixels`) ignore the
//! transform and address the full device-pixel buffer.

use image::RgbaImage;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, ImageData};

use super::js_error;
use crate::consts::{FALLBACK_HEIGHT, FALLBACK_WIDTH};
use crate::surface::{LineCap, LineJoin, Surface, SurfaceError, SurfaceRect};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    dpr: f64,
}

impl CanvasSurface {
    /// Acquire the 2D context and size the canvas.
    ///
    /// The logical size comes from `width`/`height`, then the element's
    /// client size, then 300×150.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::ContextUnavailable`] if no 2D context can be
    /// obtained, or a call error if sizing fails.
    pub fn new(canvas: HtmlCanvasElement, width: Option<u32>, height: Option<u32>) -> Result<Self, SurfaceError> {
        let ctx = match canvas.get_context("2d") {
            Ok(Some(obj)) => obj.dyn_into::<CanvasRenderingContext2d>().map_err(|_| SurfaceError::ContextUnavailable)?,
            Ok(None) | Err(_) => return Err(SurfaceError::ContextUnavailable),
        };
        let mut surface = Self { canvas, ctx, width: 0.0, height: 0.0, dpr: 1.0 };
        surface.resize(width, height)?;
        surface
            .canvas
            .style()
            .set_property("touch-action", "none")
            .map_err(|e| js_error("style.touchAction", &e))?;
        Ok(surface)
    }

    /// Re-apply the logical size and device pixel ratio. Clears the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the style or transform cannot be set.
    pub fn resize(&mut self, width: Option<u32>, height: Option<u32>) -> Result<(), SurfaceError> {
        let width = width.or_else(|| client_size(self.canvas.client_width())).unwrap_or(FALLBACK_WIDTH);
        let height = height.or_else(|| client_size(self.canvas.client_height())).unwrap_or(FALLBACK_HEIGHT);
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio()).max(1.0);

        let style = self.canvas.style();
        style.set_property("width", &format!("{width}px")).map_err(|e| js_error("style.width", &e))?;
        style.set_property("height", &format!("{height}px")).map_err(|e| js_error("style.height", &e))?;

        self.canvas.set_width(device_size(width, dpr));
        self.canvas.set_height(device_size(height, dpr));
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0).map_err(|e| js_error("setTransform", &e))?;

        self.width = f64::from(width);
        self.height = f64::from(height);
        self.dpr = dpr;
        log::debug!("canvas sized to {width}x{height} @ {dpr}x");
        Ok(())
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    #[must_use]
    pub fn device_pixel_ratio(&self) -> f64 {
        self.dpr
    }
}

fn client_size(px: i32) -> Option<u32> {
    match u32::try_from(px) {
        Ok(v) if v > 0 => Some(v),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn device_size(logical: u32, dpr: f64) -> u32 {
    (f64::from(logical) * dpr).round() as u32
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;

    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn bounding_rect(&self) -> SurfaceRect {
        let rect = self.canvas.get_bounding_client_rect();
        SurfaceRect { left: rect.left(), top: rect.top(), width: rect.width(), height: rect.height() }
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_fill_color(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ctx.set_line_cap(cap.as_str());
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.ctx.set_line_join(join.as_str());
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn set_shadow(&mut self, blur: f64, color: &str) {
        self.ctx.set_shadow_blur(blur);
        self.ctx.set_shadow_color(color);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), SurfaceError> {
        let dash = js_sys::Array::new();
        for segment in segments {
            dash.push(&JsValue::from_f64(*segment));
        }
        self.ctx.set_line_dash(&dash).map_err(|e| js_error("setLineDash", &e))
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), SurfaceError> {
        self.ctx.arc(x, y, radius, start, end).map_err(|e| js_error("arc", &e))
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.fill_rect(x, y, width, height);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.stroke_rect(x, y, width, height);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.ctx.fill_text(text, x, y).map_err(|e| js_error("fillText", &e))
    }

    fn measure_text(&self, text: &str) -> Result<f64, SurfaceError> {
        self.ctx.measure_text(text).map(|m| m.width()).map_err(|e| js_error("measureText", &e))
    }

    fn draw_image(&mut self, image: &HtmlImageElement, x: f64, y: f64, width: f64, height: f64) -> Result<(), SurfaceError> {
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(image, x, y, width, height)
            .map_err(|e| js_error("drawImage", &e))
    }

    fn image_size(&self, image: &HtmlImageElement) -> (f64, f64) {
        (f64::from(image.natural_width()), f64::from(image.natural_height()))
    }

    fn pixels(&self) -> Result<RgbaImage, SurfaceError> {
        let (width, height) = (self.canvas.width(), self.canvas.height());
        let data = self
            .ctx
            .get_image_data(0.0, 0.0, f64::from(width), f64::from(height))
            .map_err(|e| js_error("getImageData", &e))?;
        let raw = data.data().0;
        let len = raw.len();
        RgbaImage::from_raw(width, height, raw).ok_or(SurfaceError::PixelBuffer { width, height, len })
    }

    fn put_pixels(&mut self, pixels: &RgbaImage) -> Result<(), SurfaceError> {
        let data = ImageData::new_with_u8_clamped_array_and_sh(Clamped(pixels.as_raw()), pixels.width(), pixels.height())
            .map_err(|e| js_error("new ImageData", &e))?;
        self.ctx.put_image_data(&data, 0.0, 0.0).map_err(|e| js_error("putImageData", &e))
    }

    fn to_data_url(&self, mime: &str, quality: f64) -> Result<String, SurfaceError> {
        self.canvas
            .to_data_url_with_type_and_encoder_options(mime, &JsValue::from_f64(quality))
            .map_err(|e| js_error("toDataURL", &e))
    }
}
