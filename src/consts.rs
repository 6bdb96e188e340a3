//! Shared defaults and numeric constants for the signature pad.

// ── Capture ─────────────────────────────────────────────────────

/// Minimum distance in CSS pixels between two accepted points.
pub const DEFAULT_MIN_POINT_DISTANCE: f64 = 5.0;

/// Weight of the instantaneous velocity in the exponential velocity filter.
pub const DEFAULT_VELOCITY_FILTER_WEIGHT: f64 = 0.7;

/// Pressure used when the device reports none (or pressure sensitivity is off).
pub const DEFAULT_PRESSURE: f64 = 0.5;

// ── Pen ─────────────────────────────────────────────────────────

pub const DEFAULT_PEN_COLOR: &str = "#000000";
pub const DEFAULT_MIN_WIDTH: f64 = 0.5;
pub const DEFAULT_MAX_WIDTH: f64 = 2.5;
pub const DEFAULT_DOT_SIZE: f64 = 2.0;

/// Declared frame budget for point capture; rendering is coalesced per frame instead.
pub const DEFAULT_THROTTLE_MS: f64 = 16.0;

// ── Smoothing ───────────────────────────────────────────────────

pub const DEFAULT_SMOOTH_TENSION: f64 = 0.5;

/// Catmull-Rom emits one sample per this many pixels of segment length.
pub const CATMULL_ROM_SAMPLE_SPACING: f64 = 2.0;

/// Upper bound on Catmull-Rom samples for a single segment.
pub const CATMULL_ROM_MAX_SEGMENT_SAMPLES: u32 = 4096;

/// Fixed sample count per quadratic Bezier triple.
pub const QUADRATIC_BEZIER_STEPS: u32 = 10;

/// Fixed sample count per cubic Bezier quadruple.
pub const CUBIC_BEZIER_STEPS: u32 = 15;

// ── History ─────────────────────────────────────────────────────

pub const DEFAULT_MAX_HISTORY: usize = 50;

// ── Surface / export ────────────────────────────────────────────

/// Logical size used when neither the config nor the element provides one.
pub const FALLBACK_WIDTH: u32 = 300;
pub const FALLBACK_HEIGHT: u32 = 150;

/// `SignatureData.version` written by this engine.
pub const SIGNATURE_DATA_VERSION: &str = "1.0.0";

/// Default encoder quality for raster exports.
pub const DEFAULT_EXPORT_QUALITY: f64 = 0.92;

// ── Watermark ───────────────────────────────────────────────────

pub const WATERMARK_MARGIN: f64 = 10.0;
pub const DEFAULT_WATERMARK_OPACITY: f64 = 0.3;
pub const DEFAULT_WATERMARK_FONT_SIZE: f64 = 14.0;
pub const DEFAULT_WATERMARK_COLOR: &str = "#999999";
