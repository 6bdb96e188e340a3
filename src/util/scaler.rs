//! Resampling of rendered signatures.

#[cfg(test)]
#[path = "scaler_test.rs"]
mod scaler_test;

use image::RgbaImage;
use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// Fit inside the target box.
    #[default]
    Contain,
    /// Cover the target box.
    Cover,
    /// Stretch to the exact target box.
    Fill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScaleOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub maintain_aspect_ratio: bool,
    pub mode: ScaleMode,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self { width: None, height: None, maintain_aspect_ratio: true, mode: ScaleMode::Contain }
    }
}

/// Output dimensions for scaling a `width`×`height` image with `options`.
///
/// Missing target sides keep the source side. The aspect ratio is only
/// honored when both sides are given.
#[must_use]
pub fn target_size(width: u32, height: u32, options: &ScaleOptions) -> (u32, u32) {
    let mut tw = f64::from(options.width.unwrap_or(width));
    let mut th = f64::from(options.height.unwrap_or(height));

    if options.maintain_aspect_ratio && options.width.is_some() && options.height.is_some() && height > 0 {
        let aspect = f64::from(width) / f64::from(height);
        let wider = tw / th > aspect;
        match (options.mode, wider) {
            (ScaleMode::Contain, true) | (ScaleMode::Cover, false) => tw = th * aspect,
            (ScaleMode::Contain, false) | (ScaleMode::Cover, true) => th = tw / aspect,
            (ScaleMode::Fill, _) => {}
        }
    }

    (to_dimension(tw), to_dimension(th))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_dimension(v: f64) -> u32 {
    v.round().clamp(1.0, f64::from(u32::MAX)) as u32
}

#[must_use]
pub fn scale(pixels: &RgbaImage, options: &ScaleOptions) -> RgbaImage {
    let (w, h) = target_size(pixels.width(), pixels.height(), options);
    if (w, h) == pixels.dimensions() {
        return pixels.clone();
    }
    log::debug!("scaler: {}x{} -> {w}x{h}", pixels.width(), pixels.height());
    imageops::resize(pixels, w, h, FilterType::Triangle)
}

/// Stretch to exactly `width`×`height`.
#[must_use]
pub fn resize(pixels: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    scale(
        pixels,
        &ScaleOptions { width: Some(width), height: Some(height), maintain_aspect_ratio: false, mode: ScaleMode::Fill },
    )
}

/// Scale both sides by `percent` (100 keeps the size).
#[must_use]
pub fn scale_by_percent(pixels: &RgbaImage, percent: f64) -> RgbaImage {
    let width = to_dimension(f64::from(pixels.width()) * percent / 100.0);
    let height = to_dimension(f64::from(pixels.height()) * percent / 100.0);
    resize(pixels, width, height)
}
