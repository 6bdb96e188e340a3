//! Rendering: stroke painting and the full-surface scene pass.
//!
//! Rendering reads engine state but never mutates it. [`draw`] repaints the
//! whole surface from a [`Scene`] each time; there is no incremental damage
//! tracking. The per-segment width comes from [`stroke_width`] and the brush
//! decides how the segment looks.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::TAU;

use crate::brush::BrushStyle;
use crate::config::{Background, ImageFit, Watermark, WatermarkPosition};
use crate::consts::{DEFAULT_VELOCITY_FILTER_WEIGHT, WATERMARK_MARGIN};
use crate::smoothing::stroke_width;
use crate::stroke::{Point, Stroke};
use crate::surface::{Surface, SurfaceError};
use crate::util::grid::{GridOptions, draw_grid};

/// Paints strokes with the active brush.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeRenderer {
    brush: BrushStyle,
    velocity_filter_weight: f64,
}

impl Default for StrokeRenderer {
    fn default() -> Self {
        Self::new(BrushStyle::default(), DEFAULT_VELOCITY_FILTER_WEIGHT)
    }
}

impl StrokeRenderer {
    #[must_use]
    pub fn new(brush: BrushStyle, velocity_filter_weight: f64) -> Self {
        Self { brush, velocity_filter_weight }
    }

    #[must_use]
    pub fn brush(&self) -> BrushStyle {
        self.brush
    }

    pub fn set_brush(&mut self, brush: BrushStyle) {
        self.brush = brush;
    }

    pub fn set_velocity_filter_weight(&mut self, weight: f64) {
        self.velocity_filter_weight = weight;
    }

    /// Paint one committed stroke.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects a call.
    pub fn draw_stroke<S: Surface>(&self, surface: &mut S, stroke: &Stroke) -> Result<(), SurfaceError> {
        self.draw_points(surface, &stroke.points, &stroke.color, stroke.min_width, stroke.max_width)
    }

    /// Paint a point run with the given pen style. A single point becomes a
    /// dot of radius `max_width / 2`; an empty run paints nothing.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects a call.
    pub fn draw_points<S: Surface>(
        &self,
        surface: &mut S,
        points: &[Point],
        color: &str,
        min_width: f64,
        max_width: f64,
    ) -> Result<(), SurfaceError> {
        match points {
            [] => Ok(()),
            [only] => draw_dot(surface, only, color, max_width / 2.0),
            _ => {
                for pair in points.windows(2) {
                    let (p1, p2) = (&pair[0], &pair[1]);
                    let width =
                        stroke_width(p2.velocity_or_zero(), p2.pressure, min_width, max_width, self.velocity_filter_weight);
                    self.brush.draw_segment(surface, p1, p2, color, width);
                }
                Ok(())
            }
        }
    }

    /// Paint strokes in list order.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects a call.
    pub fn draw_strokes<S: Surface>(&self, surface: &mut S, strokes: &[Stroke]) -> Result<(), SurfaceError> {
        for stroke in strokes {
            self.draw_stroke(surface, stroke)?;
        }
        Ok(())
    }
}

/// Filled circle for single-point strokes.
///
/// # Errors
///
/// Returns `Err` if the surface rejects the arc.
pub fn draw_dot<S: Surface>(surface: &mut S, point: &Point, color: &str, radius: f64) -> Result<(), SurfaceError> {
    surface.save();
    surface.set_fill_color(color);
    surface.begin_path();
    let arc = surface.arc(point.x, point.y, radius, 0.0, TAU);
    if arc.is_ok() {
        surface.fill();
    }
    surface.restore();
    arc
}

/// Clear the full logical area.
pub fn clear<S: Surface>(surface: &mut S, width: f64, height: f64) {
    surface.clear_rect(0.0, 0.0, width, height);
}

/// Points of the stroke being drawn, with the pen style they will be committed with.
#[derive(Debug, Clone, Copy)]
pub struct PendingStroke<'a> {
    pub points: &'a [Point],
    pub color: &'a str,
    pub min_width: f64,
    pub max_width: f64,
}

/// Everything a full repaint needs, borrowed from the engine.
pub struct Scene<'a, I> {
    pub width: f64,
    pub height: f64,
    pub background: Option<&'a Background>,
    /// Decoded background image; `None` until the host delivers it.
    pub background_image: Option<&'a I>,
    pub grid: Option<&'a GridOptions>,
    pub strokes: &'a [Stroke],
    pub pending: Option<PendingStroke<'a>>,
    pub watermark: Option<&'a Watermark>,
    pub watermark_image: Option<&'a I>,
}

/// Repaint the whole surface.
///
/// # Errors
///
/// Returns `Err` if the surface rejects a call.
pub fn draw<S: Surface>(surface: &mut S, renderer: &StrokeRenderer, scene: &Scene<'_, S::Image>) -> Result<(), SurfaceError> {
    // Layer 1: clear.
    clear(surface, scene.width, scene.height);

    // Layer 2: background. Images are only drawn once decoded.
    if let Some(background) = scene.background {
        draw_background(surface, background, scene.background_image, scene.width, scene.height)?;
    }

    // Layer 3: guides.
    if let Some(grid) = scene.grid {
        draw_grid(surface, scene.width, scene.height, grid)?;
    }

    // Layer 4: committed strokes.
    renderer.draw_strokes(surface, scene.strokes)?;

    // Layer 5: stroke in progress.
    if let Some(pending) = scene.pending {
        renderer.draw_points(surface, pending.points, pending.color, pending.min_width, pending.max_width)?;
    }

    // Layer 6: watermark.
    if let Some(watermark) = scene.watermark {
        draw_watermark(surface, watermark, scene.watermark_image, scene.width, scene.height)?;
    }

    Ok(())
}

fn draw_background<S: Surface>(
    surface: &mut S,
    background: &Background,
    image: Option<&S::Image>,
    width: f64,
    height: f64,
) -> Result<(), SurfaceError> {
    match background {
        Background::Transparent => Ok(()),
        Background::Color { color } => {
            surface.save();
            surface.set_fill_color(color);
            surface.fill_rect(0.0, 0.0, width, height);
            surface.restore();
            Ok(())
        }
        Background::Image { image_fit, .. } => {
            let Some(image) = image else {
                return Ok(());
            };
            let (iw, ih) = surface.image_size(image);
            let (x, y, w, h) = fit_image(*image_fit, iw, ih, width, height);
            surface.save();
            let result = surface.draw_image(image, x, y, w, h);
            surface.restore();
            result
        }
    }
}

/// Destination rectangle `(x, y, w, h)` for an `iw` x `ih` image on a
/// `width` x `height` surface.
#[must_use]
pub fn fit_image(fit: ImageFit, iw: f64, ih: f64, width: f64, height: f64) -> (f64, f64, f64, f64) {
    if iw <= 0.0 || ih <= 0.0 {
        return (0.0, 0.0, width, height);
    }
    let scale = match fit {
        ImageFit::Fill => return (0.0, 0.0, width, height),
        ImageFit::Cover => (width / iw).max(height / ih),
        ImageFit::Contain => (width / iw).min(height / ih),
    };
    let (w, h) = (iw * scale, ih * scale);
    ((width - w) / 2.0, (height - h) / 2.0, w, h)
}

fn draw_watermark<S: Surface>(
    surface: &mut S,
    watermark: &Watermark,
    image: Option<&S::Image>,
    width: f64,
    height: f64,
) -> Result<(), SurfaceError> {
    surface.save();
    surface.set_global_alpha(watermark.opacity);
    let result = stamp_watermark(surface, watermark, image, width, height);
    surface.restore();
    result
}

fn stamp_watermark<S: Surface>(
    surface: &mut S,
    watermark: &Watermark,
    image: Option<&S::Image>,
    width: f64,
    height: f64,
) -> Result<(), SurfaceError> {
    if let Some(text) = watermark.text.as_deref().filter(|t| !t.is_empty()) {
        surface.set_font(&format!("{}px sans-serif", watermark.font_size));
        surface.set_fill_color(&watermark.color);
        let text_width = surface.measure_text(text)?;
        let (x, y) = text_anchor(watermark.position, text_width, watermark.font_size, width, height);
        surface.fill_text(text, x, y)?;
    }
    if let Some(image) = image {
        let (iw, ih) = surface.image_size(image);
        let (x, y) = image_anchor(watermark.position, iw, ih, width, height);
        surface.draw_image(image, x, y, iw, ih)?;
    }
    Ok(())
}

/// Baseline origin for watermark text.
#[must_use]
pub fn text_anchor(position: WatermarkPosition, text_width: f64, font_size: f64, width: f64, height: f64) -> (f64, f64) {
    let m = WATERMARK_MARGIN;
    match position {
        WatermarkPosition::TopLeft => (m, font_size + m),
        WatermarkPosition::TopRight => (width - text_width - m, font_size + m),
        WatermarkPosition::BottomLeft => (m, height - m),
        WatermarkPosition::BottomRight => (width - text_width - m, height - m),
        WatermarkPosition::Center => ((width - text_width) / 2.0, height / 2.0),
    }
}

/// Top-left origin for a watermark image of natural size `iw` x `ih`.
#[must_use]
pub fn image_anchor(position: WatermarkPosition, iw: f64, ih: f64, width: f64, height: f64) -> (f64, f64) {
    let m = WATERMARK_MARGIN;
    match position {
        WatermarkPosition::TopLeft => (m, m),
        WatermarkPosition::TopRight => (width - iw - m, m),
        WatermarkPosition::BottomLeft => (m, height - ih - m),
        WatermarkPosition::BottomRight => (width - iw - m, height - ih - m),
        WatermarkPosition::Center => ((width - iw) / 2.0, (height - ih) / 2.0),
    }
}
