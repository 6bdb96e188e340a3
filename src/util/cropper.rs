//! Trim empty space around a rendered signature.

#[cfg(test)]
#[path = "cropper_test.rs"]
mod cropper_test;

use image::{RgbaImage, imageops};
use serde::{Deserialize, Serialize};

use crate::util::color::resolve_fill;

/// Default margin kept by [`trim`].
pub const TRIM_PADDING: u32 = 10;

/// Pixel rectangle within an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropOptions {
    /// Margin added on every side of the content box.
    pub padding: u32,
    /// CSS color painted under the content; `transparent` leaves it clear.
    pub background_color: String,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self { padding: 0, background_color: "transparent".to_owned() }
    }
}

/// Tight box around every pixel with non-zero alpha, or `None` if the image
/// is fully transparent.
#[must_use]
pub fn detect_bounding_box(pixels: &RgbaImage) -> Option<BoundingBox> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in pixels.enumerate_pixels() {
        if px.0[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)),
        });
    }
    bounds.map(|(min_x, min_y, max_x, max_y)| BoundingBox {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

/// Copy the content box into a new image with `padding` on every side.
/// Returns `None` for a blank image.
#[must_use]
pub fn crop(pixels: &RgbaImage, options: &CropOptions) -> Option<RgbaImage> {
    let bbox = detect_bounding_box(pixels)?;
    let pad = options.padding;
    let content = imageops::crop_imm(pixels, bbox.x, bbox.y, bbox.width, bbox.height).to_image();

    let background = resolve_fill(&options.background_color);
    let mut out = RgbaImage::from_pixel(bbox.width + pad * 2, bbox.height + pad * 2, background);
    if background.0[3] == 0 {
        imageops::replace(&mut out, &content, i64::from(pad), i64::from(pad));
    } else {
        imageops::overlay(&mut out, &content, i64::from(pad), i64::from(pad));
    }
    Some(out)
}

/// Crop to content keeping `padding` transparent pixels around it.
#[must_use]
pub fn trim(pixels: &RgbaImage, padding: u32) -> Option<RgbaImage> {
    crop(pixels, &CropOptions { padding, ..CropOptions::default() })
}
