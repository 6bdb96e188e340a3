//! In-place pixel filters for exported rasters.

#[cfg(test)]
#[path = "filters_test.rs"]
mod filters_test;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

const SHARPEN_KERNEL: [f64; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    #[default]
    None,
    Grayscale,
    Invert,
    Sepia,
    Sharpen,
    Blur,
    Contrast,
    Brightness,
}

/// Apply `filter` to every pixel of `pixels`.
///
/// `intensity` is the blur radius factor for [`FilterType::Blur`] and the
/// multiplier for [`FilterType::Contrast`] and [`FilterType::Brightness`];
/// other filters ignore it. Alpha is never changed.
pub fn apply(pixels: &mut RgbaImage, filter: FilterType, intensity: f64) {
    match filter {
        FilterType::None => {}
        FilterType::Grayscale => map_rgb(pixels, |[r, g, b]| {
            let gray = 0.299 * r + 0.587 * g + 0.114 * b;
            [gray, gray, gray]
        }),
        FilterType::Invert => map_rgb(pixels, |[r, g, b]| [255.0 - r, 255.0 - g, 255.0 - b]),
        FilterType::Sepia => map_rgb(pixels, |[r, g, b]| {
            [
                0.393 * r + 0.769 * g + 0.189 * b,
                0.349 * r + 0.686 * g + 0.168 * b,
                0.272 * r + 0.534 * g + 0.131 * b,
            ]
        }),
        FilterType::Sharpen => convolve(pixels, &SHARPEN_KERNEL, 3),
        FilterType::Blur => {
            let size = blur_kernel_size(intensity);
            #[allow(clippy::cast_precision_loss)]
            let weight = 1.0 / (size * size) as f64;
            convolve(pixels, &vec![weight; size * size], size);
        }
        FilterType::Contrast => {
            let intercept = 128.0 * (1.0 - intensity);
            map_rgb(pixels, |c| c.map(|v| intensity * v + intercept));
        }
        FilterType::Brightness => {
            let offset = (intensity - 1.0) * 255.0;
            map_rgb(pixels, |c| c.map(|v| v + offset));
        }
    }
}

/// Side length of the box-blur kernel: `floor(intensity * 2) + 1`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn blur_kernel_size(intensity: f64) -> usize {
    (intensity * 2.0).floor().max(0.0) as usize + 1
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn map_rgb(pixels: &mut RgbaImage, f: impl Fn([f64; 3]) -> [f64; 3]) {
    for px in pixels.pixels_mut() {
        let Rgba([r, g, b, a]) = *px;
        let [r, g, b] = f([f64::from(r), f64::from(g), f64::from(b)]);
        *px = Rgba([to_channel(r), to_channel(g), to_channel(b), a]);
    }
}

/// Edge-clamped convolution of the RGB channels with a square `size`×`size` kernel.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn convolve(pixels: &mut RgbaImage, kernel: &[f64], size: usize) {
    let (width, height) = pixels.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let source = pixels.clone();
    let half = (size / 2) as i64;
    let max_x = i64::from(width) - 1;
    let max_y = i64::from(height) - 1;

    for (x, y, px) in pixels.enumerate_pixels_mut() {
        let mut acc = [0.0_f64; 3];
        for ky in 0..size {
            for kx in 0..size {
                let sx = (i64::from(x) + kx as i64 - half).clamp(0, max_x) as u32;
                let sy = (i64::from(y) + ky as i64 - half).clamp(0, max_y) as u32;
                let weight = kernel[ky * size + kx];
                let Rgba([r, g, b, _]) = *source.get_pixel(sx, sy);
                acc[0] += f64::from(r) * weight;
                acc[1] += f64::from(g) * weight;
                acc[2] += f64::from(b) * weight;
            }
        }
        px.0[0] = to_channel(acc[0]);
        px.0[1] = to_channel(acc[1]);
        px.0[2] = to_channel(acc[2]);
    }
}
