//! Input model: pointer samples, point filtering, and the drawing state machine.
//!
//! `PointerInput` is the host-neutral shape of a pointer or touch event.
//! `PointCapture` turns those into surface-local [`Point`]s: it resolves
//! pressure, runs the exponential velocity filter, and drops near-duplicate
//! samples. `InputState` tracks whether a stroke is in progress between
//! pointer-down and pointer-up.

#[cfg(test)]
#[path = "capture_test.rs"]
mod capture_test;

use crate::consts::{DEFAULT_MIN_POINT_DISTANCE, DEFAULT_PRESSURE, DEFAULT_VELOCITY_FILTER_WEIGHT};
use crate::stroke::Point;
use crate::surface::SurfaceRect;

/// A raw pointer sample in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    /// Absolute horizontal position (e.g. `clientX`).
    pub client_x: f64,
    /// Absolute vertical position (e.g. `clientY`).
    pub client_y: f64,
    /// Reported pen pressure or touch force, if the device provides one.
    pub pressure: Option<f64>,
    /// Event time in milliseconds.
    pub timestamp: f64,
}

impl PointerInput {
    #[must_use]
    pub fn new(client_x: f64, client_y: f64, timestamp: f64) -> Self {
        Self { client_x, client_y, pressure: None, timestamp }
    }

    #[must_use]
    pub fn with_pressure(self, pressure: f64) -> Self {
        Self { pressure: Some(pressure), ..self }
    }

    /// A touch point; `force` is only reported by some devices.
    #[must_use]
    pub fn touch(client_x: f64, client_y: f64, force: Option<f64>, timestamp: f64) -> Self {
        Self { client_x, client_y, pressure: force, timestamp }
    }

    fn is_valid(&self) -> bool {
        self.client_x.is_finite() && self.client_y.is_finite() && self.timestamp.is_finite()
    }
}

/// Whether a stroke is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputState {
    /// Waiting for the next pointer-down.
    #[default]
    Idle,
    /// Pointer is down; moves extend the current stroke.
    Drawing,
}

/// Live-tunable capture parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureSettings {
    /// Candidates closer than this to the last accepted point are dropped.
    pub min_point_distance: f64,
    /// Weight of the instantaneous velocity in the exponential filter.
    pub velocity_filter_weight: f64,
    /// Use reported pressure/force instead of the fixed default.
    pub pressure_sensitive: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            min_point_distance: DEFAULT_MIN_POINT_DISTANCE,
            velocity_filter_weight: DEFAULT_VELOCITY_FILTER_WEIGHT,
            pressure_sensitive: true,
        }
    }
}

/// Converts pointer samples into filtered, velocity-annotated points.
#[derive(Debug, Clone, Default)]
pub struct PointCapture {
    settings: CaptureSettings,
    last_point: Option<Point>,
    last_velocity: f64,
}

impl PointCapture {
    #[must_use]
    pub fn new(settings: CaptureSettings) -> Self {
        Self { settings, last_point: None, last_velocity: 0.0 }
    }

    /// Turn `input` into a surface-local point.
    ///
    /// Returns `None` when the sample is too close to the last accepted point
    /// or the event carries non-finite values. A rejected sample leaves the
    /// last point and filtered velocity untouched.
    pub fn capture(&mut self, input: &PointerInput, rect: &SurfaceRect) -> Option<Point> {
        if !input.is_valid() {
            return None;
        }

        let pressure = self.resolve_pressure(input.pressure);
        let point = Point::new(input.client_x - rect.left, input.client_y - rect.top, pressure, input.timestamp);

        let Some(last) = self.last_point else {
            let first = point.with_velocity(0.0);
            self.last_velocity = 0.0;
            self.last_point = Some(first);
            return Some(first);
        };

        let distance = last.distance_to(&point);
        if distance < self.settings.min_point_distance {
            return None;
        }

        let elapsed = point.timestamp - last.timestamp;
        let velocity = if elapsed > 0.0 {
            let raw = distance / elapsed;
            let weight = self.settings.velocity_filter_weight;
            weight * raw + (1.0 - weight) * self.last_velocity
        } else {
            self.last_velocity
        };

        let accepted = point.with_velocity(velocity);
        self.last_velocity = velocity;
        self.last_point = Some(accepted);
        Some(accepted)
    }

    /// Forget the previous point so the next stroke starts fresh.
    pub fn reset(&mut self) {
        self.last_point = None;
        self.last_velocity = 0.0;
    }

    /// Replace the capture parameters without touching stroke state.
    pub fn set_settings(&mut self, settings: CaptureSettings) {
        self.settings = settings;
    }

    #[must_use]
    pub fn settings(&self) -> CaptureSettings {
        self.settings
    }

    #[must_use]
    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }

    #[must_use]
    pub fn last_velocity(&self) -> f64 {
        self.last_velocity
    }

    fn resolve_pressure(&self, reported: Option<f64>) -> f64 {
        match reported {
            Some(p) if self.settings.pressure_sensitive && p > 0.0 => p,
            _ => DEFAULT_PRESSURE,
        }
    }
}
