//! Pad configuration.
//!
//! `PadConfig` is the full, defaulted configuration. Hosts usually hand over a
//! partial JSON object; missing fields take the defaults from
//! [`crate::consts`]. Live changes arrive as a [`ConfigPatch`], where every
//! field is optional and only the present ones are merged.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Deserializer, Serialize};

use crate::brush::BrushStyle;
use crate::capture::CaptureSettings;
use crate::consts::{
    DEFAULT_DOT_SIZE, DEFAULT_MAX_HISTORY, DEFAULT_MAX_WIDTH, DEFAULT_MIN_POINT_DISTANCE, DEFAULT_MIN_WIDTH,
    DEFAULT_PEN_COLOR, DEFAULT_SMOOTH_TENSION, DEFAULT_THROTTLE_MS, DEFAULT_VELOCITY_FILTER_WEIGHT,
    DEFAULT_WATERMARK_COLOR, DEFAULT_WATERMARK_FONT_SIZE, DEFAULT_WATERMARK_OPACITY,
};
use crate::smoothing::SmoothAlgorithm;
use crate::util::grid::GridOptions;

/// How a background image is fitted to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    /// Scale to cover the whole surface, cropping overflow.
    Cover,
    /// Scale to fit inside the surface, centered.
    Contain,
    /// Stretch to the surface size.
    #[default]
    Fill,
}

/// Surface background painted beneath the strokes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Background {
    Transparent,
    Color {
        color: String,
    },
    Image {
        image_url: String,
        #[serde(default)]
        image_fit: ImageFit,
    },
}

impl Background {
    /// Solid fill color, if this is a color background.
    #[must_use]
    pub fn color(&self) -> Option<&str> {
        match self {
            Self::Color { color } => Some(color),
            _ => None,
        }
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Image { image_url, .. } => Some(image_url),
            _ => None,
        }
    }
}

/// Anchor for watermark text or image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

/// Translucent text or image stamped over the signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Watermark {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub position: WatermarkPosition,
    pub opacity: f64,
    pub font_size: f64,
    pub color: String,
}

impl Default for Watermark {
    fn default() -> Self {
        Self {
            text: None,
            image_url: None,
            position: WatermarkPosition::default(),
            opacity: DEFAULT_WATERMARK_OPACITY,
            font_size: DEFAULT_WATERMARK_FONT_SIZE,
            color: DEFAULT_WATERMARK_COLOR.to_owned(),
        }
    }
}

/// Full pad configuration with defaults for every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PadConfig {
    /// Logical width in CSS pixels; `None` sizes from the element.
    pub width: Option<u32>,
    /// Logical height in CSS pixels; `None` sizes from the element.
    pub height: Option<u32>,
    pub pen_color: String,
    pub min_width: f64,
    pub max_width: f64,
    pub velocity_filter_weight: f64,
    pub smooth_algorithm: SmoothAlgorithm,
    pub smooth_tension: f64,
    /// Declared capture throttle; rendering is frame-coalesced instead.
    pub throttle: f64,
    pub min_point_distance: f64,
    pub pressure_sensitive: bool,
    pub brush_style: BrushStyle,
    pub background: Option<Background>,
    pub watermark: Option<Watermark>,
    pub grid: Option<GridOptions>,
    /// Declared only; single-point strokes use `max_width / 2`.
    pub dot_size: f64,
    pub max_history_size: usize,
    /// Declared only; the host decides when to resize.
    pub auto_resize: bool,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            pen_color: DEFAULT_PEN_COLOR.to_owned(),
            min_width: DEFAULT_MIN_WIDTH,
            max_width: DEFAULT_MAX_WIDTH,
            velocity_filter_weight: DEFAULT_VELOCITY_FILTER_WEIGHT,
            smooth_algorithm: SmoothAlgorithm::default(),
            smooth_tension: DEFAULT_SMOOTH_TENSION,
            throttle: DEFAULT_THROTTLE_MS,
            min_point_distance: DEFAULT_MIN_POINT_DISTANCE,
            pressure_sensitive: true,
            brush_style: BrushStyle::default(),
            background: None,
            watermark: None,
            grid: None,
            dot_size: DEFAULT_DOT_SIZE,
            max_history_size: DEFAULT_MAX_HISTORY,
            auto_resize: true,
        }
    }
}

impl PadConfig {
    /// Capture parameters derived from this config.
    #[must_use]
    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            min_point_distance: self.min_point_distance,
            velocity_filter_weight: self.velocity_filter_weight,
            pressure_sensitive: self.pressure_sensitive,
        }
    }

    /// Shallow-merge `patch` into this config. Absent fields are left alone;
    /// nullable fields set to `null` are cleared.
    pub fn merge(&mut self, patch: ConfigPatch) {
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = patch.$field {
                    self.$field = value;
                })*
            };
        }
        take!(
            width,
            height,
            pen_color,
            min_width,
            max_width,
            velocity_filter_weight,
            smooth_algorithm,
            smooth_tension,
            throttle,
            min_point_distance,
            pressure_sensitive,
            brush_style,
            background,
            watermark,
            grid,
            dot_size,
            max_history_size,
            auto_resize,
        );
    }
}

/// Partial configuration for live updates.
///
/// For nullable fields the outer `Option` means "present" and the inner one is
/// the new value, so `{"background": null}` clears the background while an
/// absent key keeps it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigPatch {
    #[serde(deserialize_with = "double_option")]
    pub width: Option<Option<u32>>,
    #[serde(deserialize_with = "double_option")]
    pub height: Option<Option<u32>>,
    pub pen_color: Option<String>,
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    pub velocity_filter_weight: Option<f64>,
    pub smooth_algorithm: Option<SmoothAlgorithm>,
    pub smooth_tension: Option<f64>,
    pub throttle: Option<f64>,
    pub min_point_distance: Option<f64>,
    pub pressure_sensitive: Option<bool>,
    pub brush_style: Option<BrushStyle>,
    #[serde(deserialize_with = "double_option")]
    pub background: Option<Option<Background>>,
    #[serde(deserialize_with = "double_option")]
    pub watermark: Option<Option<Watermark>>,
    #[serde(deserialize_with = "double_option")]
    pub grid: Option<Option<GridOptions>>,
    pub dot_size: Option<f64>,
    pub max_history_size: Option<usize>,
    pub auto_resize: Option<bool>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
