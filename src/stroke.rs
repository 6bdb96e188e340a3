//! Data model: points, strokes, and the serialized signature document.
//!
//! `Point`s are produced by [`crate::capture::PointCapture`] while a stroke is
//! in progress. A `Stroke` is built exactly once, when the pointer is released,
//! and is immutable afterwards. `SignatureData` is the export/import unit: it
//! owns copies of the committed strokes plus the surface dimensions, and is the
//! shape written to and read from JSON.
//!
//! Field names on the wire are camelCase so documents produced by other
//! implementations of the same pad round-trip unchanged.

#[cfg(test)]
#[path = "stroke_test.rs"]
mod stroke_test;

use serde::{Deserialize, Serialize};

use crate::consts::SIGNATURE_DATA_VERSION;

/// A captured or interpolated sample on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    /// Horizontal position in surface-local CSS pixels.
    pub x: f64,
    /// Vertical position in surface-local CSS pixels.
    pub y: f64,
    /// Normalized pressure in `[0, 1]`.
    pub pressure: f64,
    /// Capture time in milliseconds. Interpolated points carry fractional values.
    pub timestamp: f64,
    /// Filtered speed in pixels per millisecond, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f64>,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64, pressure: f64, timestamp: f64) -> Self {
        Self { x, y, pressure, timestamp, velocity: None }
    }

    #[must_use]
    pub fn with_velocity(self, velocity: f64) -> Self {
        Self { velocity: Some(velocity), ..self }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Velocity, treating an unknown velocity as stationary.
    #[must_use]
    pub fn velocity_or_zero(&self) -> f64 {
        self.velocity.unwrap_or(0.0)
    }
}

/// One finished pointer-down-to-up gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    /// Smoothed points in drawing order.
    pub points: Vec<Point>,
    /// CSS color string.
    pub color: String,
    pub min_width: f64,
    pub max_width: f64,
    /// Timestamp of the first raw sample.
    pub start_time: f64,
    /// Timestamp of the last raw sample.
    pub end_time: f64,
}

impl Stroke {
    /// Build a stroke from its points and pen style.
    ///
    /// `start_time` and `end_time` are taken from the first and last points.
    /// Returns `None` for an empty point list: empty strokes never enter the
    /// committed list.
    #[must_use]
    pub fn from_points(points: Vec<Point>, color: &str, min_width: f64, max_width: f64) -> Option<Self> {
        let start_time = points.first()?.timestamp;
        let end_time = points.last()?.timestamp;
        Some(Self {
            points,
            color: color.to_owned(),
            min_width,
            max_width,
            start_time,
            end_time,
        })
    }

    /// A single-point stroke is painted as a dot rather than a line.
    #[must_use]
    pub fn is_dot(&self) -> bool {
        self.points.len() == 1
    }

    /// Total polyline length of the stroke.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance_to(&w[1])).sum()
    }

    /// Drawing time in milliseconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Serialized signature: committed strokes plus the surface they were drawn on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureData {
    pub strokes: Vec<Stroke>,
    /// Logical surface width in CSS pixels.
    pub width: u32,
    /// Logical surface height in CSS pixels.
    pub height: u32,
    /// Export time in milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub version: String,
}

impl SignatureData {
    /// Snapshot `strokes` into a new document stamped with the current version.
    #[must_use]
    pub fn new(strokes: Vec<Stroke>, width: u32, height: u32, timestamp: u64) -> Self {
        Self {
            strokes,
            width,
            height,
            timestamp,
            version: SIGNATURE_DATA_VERSION.to_owned(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Iterate every point of every stroke in drawing order.
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.strokes.iter().flat_map(|s| s.points.iter())
    }

    /// Total number of points across all strokes.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(|s| s.points.len()).sum()
    }
}
