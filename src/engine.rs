//! The signature pad engine.
//!
//! `SignaturePad` owns the drawing surface and every piece of drawing state.
//! It never schedules work or calls back into the host itself: each input
//! handler returns a list of [`Action`]s and the host acts on them (requests
//! an animation frame, loads an image, fires a user callback). This keeps the
//! engine testable without a browser and avoids re-entrancy while the host
//! holds a borrow of the pad.
//!
//! Lifecycle: `Active` until [`SignaturePad::destroy`], then `Destroyed`.
//! Every mutating call on a destroyed pad fails with [`PadError::Destroyed`].

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::mem;

use crate::capture::{InputState, PointCapture, PointerInput};
use crate::config::{ConfigPatch, PadConfig};
use crate::error::PadError;
use crate::export::{ExportBody, ExportFormat, ExportPayload, RasterFormat, render_raster, render_svg};
use crate::history::HistoryManager;
use crate::render::{self, PendingStroke, Scene, StrokeRenderer};
use crate::smoothing::{SmoothAlgorithm, smooth};
use crate::stroke::{Point, SignatureData, Stroke};
use crate::surface::{Surface, SurfaceError};
use crate::util::clock;

/// Which decoded image a host is delivering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Background,
    Watermark,
}

/// Observable state mirrored by adapters after every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadState {
    pub is_empty: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    pub is_enabled: bool,
}

/// Work the host must perform on the engine's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A stroke started; fire the begin callback.
    StrokeBegan(PointerInput),
    /// The pointer moved while drawing; fire the change callback.
    StrokeChanged(PointerInput),
    /// A stroke finished; fire the end callback.
    StrokeEnded(PointerInput),
    /// Call [`SignaturePad::on_frame`] at the next animation frame.
    FrameRequested,
    /// Drop a previously requested frame.
    FrameCancelled,
    /// Load `url` and hand the decoded image to [`SignaturePad::set_image`].
    LoadImage { slot: ImageSlot, url: String },
    StateChanged(PadState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Active,
    Destroyed,
}

/// Freehand signature engine bound to one surface.
pub struct SignaturePad<S: Surface> {
    surface: S,
    config: PadConfig,
    strokes: Vec<Stroke>,
    current: Vec<Point>,
    input: InputState,
    enabled: bool,
    lifecycle: Lifecycle,
    frame_pending: bool,
    history: HistoryManager,
    capture: PointCapture,
    renderer: StrokeRenderer,
    background_image: Option<S::Image>,
    watermark_image: Option<S::Image>,
}

impl<S: Surface> SignaturePad<S> {
    /// Bind a new pad to `surface` and paint the initial (empty) scene.
    ///
    /// Images named in the config are not loaded yet; see
    /// [`SignaturePad::image_requests`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the initial paint fails.
    pub fn new(surface: S, config: PadConfig) -> Result<Self, PadError> {
        let mut pad = Self {
            surface,
            capture: PointCapture::new(config.capture_settings()),
            history: HistoryManager::new(config.max_history_size),
            renderer: StrokeRenderer::new(config.brush_style, config.velocity_filter_weight),
            config,
            strokes: Vec::new(),
            current: Vec::new(),
            input: InputState::Idle,
            enabled: true,
            lifecycle: Lifecycle::Active,
            frame_pending: false,
            background_image: None,
            watermark_image: None,
        };
        pad.paint()?;
        log::debug!("signature pad ready: {:?}", pad.surface.size());
        Ok(pad)
    }

    /// `LoadImage` actions for every image the current config references.
    #[must_use]
    pub fn image_requests(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(url) = self.config_url(ImageSlot::Background) {
            actions.push(Action::LoadImage { slot: ImageSlot::Background, url: url.to_owned() });
        }
        if let Some(url) = self.config_url(ImageSlot::Watermark) {
            actions.push(Action::LoadImage { slot: ImageSlot::Watermark, url: url.to_owned() });
        }
        actions
    }

    // --- Pointer input ---

    /// Start a stroke. Ignored while disabled.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] after `destroy`.
    pub fn on_pointer_down(&mut self, input: PointerInput) -> Result<Vec<Action>, PadError> {
        self.ensure_active()?;
        if !self.enabled {
            return Ok(Vec::new());
        }

        self.input = InputState::Drawing;
        self.current.clear();
        self.capture.reset();

        let rect = self.surface.bounding_rect();
        let first = self.capture.capture(&input, &rect);
        let mut actions = vec![Action::StrokeBegan(input)];
        if let Some(point) = first {
            self.current.push(point);
            self.request_frame(&mut actions);
        }
        Ok(actions)
    }

    /// Extend the current stroke. At most one frame is requested until it runs.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] after `destroy`.
    pub fn on_pointer_move(&mut self, input: PointerInput) -> Result<Vec<Action>, PadError> {
        self.ensure_active()?;
        if !self.enabled || self.input != InputState::Drawing {
            return Ok(Vec::new());
        }

        let mut actions = Vec::new();
        let rect = self.surface.bounding_rect();
        if let Some(point) = self.capture.capture(&input, &rect) {
            self.current.push(point);
            self.request_frame(&mut actions);
        }
        actions.push(Action::StrokeChanged(input));
        Ok(actions)
    }

    /// Finish the current stroke.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] after `destroy`, or a surface error
    /// from the final paint.
    pub fn on_pointer_up(&mut self, input: PointerInput) -> Result<Vec<Action>, PadError> {
        self.end_stroke(input)
    }

    /// Treated like pointer-up: whatever was drawn is kept.
    ///
    /// # Errors
    ///
    /// Same as [`SignaturePad::on_pointer_up`].
    pub fn on_pointer_cancel(&mut self, input: PointerInput) -> Result<Vec<Action>, PadError> {
        self.end_stroke(input)
    }

    /// Treated like pointer-up.
    ///
    /// # Errors
    ///
    /// Same as [`SignaturePad::on_pointer_up`].
    pub fn on_pointer_leave(&mut self, input: PointerInput) -> Result<Vec<Action>, PadError> {
        self.end_stroke(input)
    }

    /// Run a previously requested frame.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] after `destroy`, or a surface error.
    pub fn on_frame(&mut self) -> Result<(), PadError> {
        self.ensure_active()?;
        if !self.frame_pending {
            return Ok(());
        }
        self.frame_pending = false;
        self.paint()
    }

    /// Repaint immediately.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] after `destroy`, or a surface error.
    pub fn render(&mut self) -> Result<(), PadError> {
        self.ensure_active()?;
        self.paint()
    }

    // --- Editing ---

    /// Remove every stroke and forget history. Not undoable.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] after `destroy`, or a surface error.
    pub fn clear(&mut self) -> Result<Vec<Action>, PadError> {
        self.ensure_active()?;
        self.strokes.clear();
        self.current.clear();
        self.history.clear();
        self.paint()?;
        Ok(vec![self.state_changed()])
    }

    /// Step back one stroke. A no-op when there is nothing to undo.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] after `destroy`, or a surface error.
    pub fn undo(&mut self) -> Result<Vec<Action>, PadError> {
        self.ensure_active()?;
        if let Some(strokes) = self.history.undo() {
            self.strokes = strokes;
            self.paint()?;
        }
        Ok(vec![self.state_changed()])
    }

    /// Re-apply the last undone stroke. A no-op when there is nothing to redo.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] after `destroy`, or a surface error.
    pub fn redo(&mut self) -> Result<Vec<Action>, PadError> {
        self.ensure_active()?;
        if let Some(strokes) = self.history.redo() {
            self.strokes = strokes;
            self.paint()?;
        }
        Ok(vec![self.state_changed()])
    }

    /// Turn input handling on or off. Disabling mid-stroke discards the stroke.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] after `destroy`, or a surface error.
    pub fn set_enabled(&mut self, enabled: bool) -> Result<Vec<Action>, PadError> {
        self.ensure_active()?;
        self.enabled = enabled;
        if !enabled && self.input == InputState::Drawing {
            self.input = InputState::Idle;
            self.current.clear();
            self.capture.reset();
            self.paint()?;
        }
        Ok(vec![self.state_changed()])
    }

    /// Shallow-merge `patch` into the config and propagate it.
    ///
    /// Changed image URLs drop the old decoded image and yield a `LoadImage`
    /// action for the new one.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] after `destroy`, or a surface error.
    pub fn update_config(&mut self, patch: ConfigPatch) -> Result<Vec<Action>, PadError> {
        self.ensure_active()?;
        let old_background = self.config_url(ImageSlot::Background).map(str::to_owned);
        let old_watermark = self.config_url(ImageSlot::Watermark).map(str::to_owned);

        self.config.merge(patch);
        self.capture.set_settings(self.config.capture_settings());
        self.history.set_max_size(self.config.max_history_size);
        self.renderer.set_brush(self.config.brush_style);
        self.renderer.set_velocity_filter_weight(self.config.velocity_filter_weight);

        let mut actions = Vec::new();
        for (slot, old) in [(ImageSlot::Background, old_background), (ImageSlot::Watermark, old_watermark)] {
            let new = self.config_url(slot).map(str::to_owned);
            if new == old {
                continue;
            }
            *self.image_slot_mut(slot) = None;
            if let Some(url) = new {
                actions.push(Action::LoadImage { slot, url });
            }
        }

        self.paint()?;
        actions.push(self.state_changed());
        Ok(actions)
    }

    /// Deliver a decoded image for `slot`.
    ///
    /// Images for a URL the config no longer references are dropped. Returns
    /// whether the image was applied; applying repaints the whole scene so
    /// the background always lands beneath the strokes.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] after `destroy`, or a surface error.
    pub fn set_image(&mut self, slot: ImageSlot, url: &str, image: S::Image) -> Result<bool, PadError> {
        self.ensure_active()?;
        if self.config_url(slot) != Some(url) {
            log::debug!("ignoring stale {slot:?} image: {url}");
            return Ok(false);
        }
        *self.image_slot_mut(slot) = Some(image);
        self.paint()?;
        Ok(true)
    }

    // --- Export / import ---

    /// Encode the surface with its own raster encoder.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] after `destroy`, or a surface error.
    pub fn to_data_url(&self, format: RasterFormat, quality: f64) -> Result<String, PadError> {
        self.ensure_active()?;
        Ok(self.surface.to_data_url(format.mime(), quality)?)
    }

    /// Committed strokes as an SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] after `destroy`.
    pub fn to_svg(&self) -> Result<String, PadError> {
        let data = self.to_json()?;
        Ok(render_svg(&data, self.background_color()))
    }

    /// Snapshot of the committed strokes.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] after `destroy`.
    pub fn to_json(&self) -> Result<SignatureData, PadError> {
        self.ensure_active()?;
        let (width, height) = self.logical_size();
        Ok(SignatureData::new(self.strokes.clone(), width, height, clock::now_ms()))
    }

    /// [`SignaturePad::to_json`] serialized as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] after `destroy`.
    pub fn to_json_string(&self) -> Result<String, PadError> {
        Ok(serde_json::to_string_pretty(&self.to_json()?)?)
    }

    /// Replace the committed strokes with `data`.
    ///
    /// History is reset with the loaded strokes as its baseline, so the import
    /// itself cannot be undone. Strokes without points are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] after `destroy`, or a surface error.
    pub fn from_json(&mut self, data: SignatureData) -> Result<Vec<Action>, PadError> {
        self.ensure_active()?;
        let total = data.strokes.len();
        let strokes: Vec<Stroke> = data.strokes.into_iter().filter(|s| !s.points.is_empty()).collect();
        if strokes.len() < total {
            log::warn!("dropped {} empty strokes from imported signature", total - strokes.len());
        }

        self.input = InputState::Idle;
        self.current.clear();
        self.capture.reset();
        self.history.reset(&strokes);
        self.strokes = strokes;
        self.paint()?;
        Ok(vec![self.state_changed()])
    }

    /// Parse a JSON document and load it with [`SignaturePad::from_json`].
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Json`] for malformed input; otherwise as `from_json`.
    pub fn from_json_str(&mut self, json: &str) -> Result<Vec<Action>, PadError> {
        self.ensure_active()?;
        let data: SignatureData = serde_json::from_str(json)?;
        self.from_json(data)
    }

    /// Export in any format, ready to be saved under [`ExportPayload::file_name`].
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] after `destroy`, or an encoder error.
    pub fn export(&self, format: ExportFormat, quality: f64) -> Result<ExportPayload, PadError> {
        let body = match format.raster() {
            Some(raster) => ExportBody::DataUrl(self.to_data_url(raster, quality)?),
            None if format == ExportFormat::Svg => ExportBody::Text(self.to_svg()?),
            None => ExportBody::Text(self.to_json_string()?),
        };
        Ok(ExportPayload { format, body })
    }

    /// Repaint the committed strokes (plus solid background) onto another
    /// surface, e.g. an offscreen canvas used for post-processing.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] after `destroy`, or a surface error.
    pub fn draw_onto<T: Surface>(&self, target: &mut T) -> Result<(), PadError> {
        let data = self.to_json()?;
        render_raster(target, &self.renderer, &data, self.background_color())?;
        Ok(())
    }

    /// Tear down: cancel any pending frame and drop all drawing state. Terminal.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Destroyed`] if already destroyed.
    pub fn destroy(&mut self) -> Result<Vec<Action>, PadError> {
        self.ensure_active()?;
        let mut actions = Vec::new();
        if mem::take(&mut self.frame_pending) {
            actions.push(Action::FrameCancelled);
        }
        self.lifecycle = Lifecycle::Destroyed;
        self.input = InputState::Idle;
        self.strokes.clear();
        self.current.clear();
        self.history.clear();
        self.background_image = None;
        self.watermark_image = None;
        log::debug!("signature pad destroyed");
        Ok(actions)
    }

    // --- Queries ---

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled && self.lifecycle == Lifecycle::Active
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.lifecycle == Lifecycle::Destroyed
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.input == InputState::Drawing
    }

    #[must_use]
    pub fn state(&self) -> PadState {
        PadState {
            is_empty: self.is_empty(),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            is_enabled: self.is_enabled(),
        }
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Host-side surface maintenance such as resizing. Call
    /// [`SignaturePad::render`] afterwards.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn config(&self) -> &PadConfig {
        &self.config
    }

    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Points of the stroke in progress.
    #[must_use]
    pub fn current_points(&self) -> &[Point] {
        &self.current
    }

    // --- Internals ---

    fn ensure_active(&self) -> Result<(), PadError> {
        match self.lifecycle {
            Lifecycle::Active => Ok(()),
            Lifecycle::Destroyed => Err(PadError::Destroyed),
        }
    }

    fn state_changed(&self) -> Action {
        Action::StateChanged(self.state())
    }

    fn request_frame(&mut self, actions: &mut Vec<Action>) {
        if !self.frame_pending {
            self.frame_pending = true;
            actions.push(Action::FrameRequested);
        }
    }

    fn end_stroke(&mut self, input: PointerInput) -> Result<Vec<Action>, PadError> {
        self.ensure_active()?;
        if !self.enabled || self.input != InputState::Drawing {
            return Ok(Vec::new());
        }
        self.input = InputState::Idle;

        let rect = self.surface.bounding_rect();
        if let Some(point) = self.capture.capture(&input, &rect) {
            self.current.push(point);
        }

        let mut actions = Vec::new();
        if !self.current.is_empty() {
            self.commit_stroke();
            if mem::take(&mut self.frame_pending) {
                actions.push(Action::FrameCancelled);
            }
            self.paint()?;
        }
        self.capture.reset();

        actions.push(Action::StrokeEnded(input));
        actions.push(self.state_changed());
        Ok(actions)
    }

    fn commit_stroke(&mut self) {
        let raw = mem::take(&mut self.current);
        let (Some(first), Some(last)) = (raw.first(), raw.last()) else {
            return;
        };
        let (start_time, end_time) = (first.timestamp, last.timestamp);

        let algorithm = self.config.smooth_algorithm;
        let points = if algorithm == SmoothAlgorithm::None || raw.len() <= 2 {
            raw
        } else {
            smooth(&raw, algorithm, self.config.smooth_tension)
        };

        let Some(mut stroke) =
            Stroke::from_points(points, &self.config.pen_color, self.config.min_width, self.config.max_width)
        else {
            return;
        };
        stroke.start_time = start_time;
        stroke.end_time = end_time;

        log::debug!("stroke committed: {} points", stroke.points.len());
        self.strokes.push(stroke);
        self.history.save(&self.strokes);
    }

    fn paint(&mut self) -> Result<(), PadError> {
        let (width, height) = self.surface.size();
        let pending = (!self.current.is_empty()).then(|| PendingStroke {
            points: &self.current,
            color: &self.config.pen_color,
            min_width: self.config.min_width,
            max_width: self.config.max_width,
        });
        let scene = Scene {
            width,
            height,
            background: self.config.background.as_ref(),
            background_image: self.background_image.as_ref(),
            grid: self.config.grid.as_ref(),
            strokes: &self.strokes,
            pending,
            watermark: self.config.watermark.as_ref(),
            watermark_image: self.watermark_image.as_ref(),
        };
        render::draw(&mut self.surface, &self.renderer, &scene).map_err(|e: SurfaceError| {
            log::error!("render failed: {e}");
            PadError::from(e)
        })
    }

    fn config_url(&self, slot: ImageSlot) -> Option<&str> {
        match slot {
            ImageSlot::Background => self.config.background.as_ref().and_then(|b| b.image_url()),
            ImageSlot::Watermark => self.config.watermark.as_ref().and_then(|w| w.image_url.as_deref()),
        }
    }

    fn image_slot_mut(&mut self, slot: ImageSlot) -> &mut Option<S::Image> {
        match slot {
            ImageSlot::Background => &mut self.background_image,
            ImageSlot::Watermark => &mut self.watermark_image,
        }
    }

    fn background_color(&self) -> Option<&str> {
        self.config.background.as_ref().and_then(|b| b.color())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn logical_size(&self) -> (u32, u32) {
        let (w, h) = self.surface.size();
        let clamp = |v: f64| if v.is_finite() { v.round().clamp(0.0, f64::from(u32::MAX)) as u32 } else { 0 };
        (clamp(w), clamp(h))
    }
}
