//! Curve smoothing and stroke-width math.
//!
//! Everything here is a pure function over point slices. Smoothing densifies a
//! raw capture into a visually continuous curve; [`stroke_width`] turns a
//! point's velocity and pressure into the line width for the segment ending
//! at that point.

#[cfg(test)]
#[path = "smoothing_test.rs"]
mod smoothing_test;

use serde::{Deserialize, Serialize};

use crate::consts::{CATMULL_ROM_MAX_SEGMENT_SAMPLES, CATMULL_ROM_SAMPLE_SPACING, CUBIC_BEZIER_STEPS, QUADRATIC_BEZIER_STEPS};
use crate::stroke::Point;

/// Curve fitted through a finished stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SmoothAlgorithm {
    /// Catmull-Rom spline through every captured point.
    #[default]
    CatmullRom,
    /// Quadratic Bezier over each consecutive triple. Cheaper, less smooth.
    BezierQuadratic,
    /// Cubic Bezier over each consecutive quadruple.
    BezierCubic,
    /// Keep the raw capture.
    None,
}

/// Apply `algorithm` to `points`. `tension` only affects Catmull-Rom.
#[must_use]
pub fn smooth(points: &[Point], algorithm: SmoothAlgorithm, tension: f64) -> Vec<Point> {
    if points.len() < 2 {
        return points.to_vec();
    }
    match algorithm {
        SmoothAlgorithm::CatmullRom => catmull_rom(points, tension),
        SmoothAlgorithm::BezierQuadratic => quadratic_bezier(points),
        SmoothAlgorithm::BezierCubic => cubic_bezier(points),
        SmoothAlgorithm::None => points.to_vec(),
    }
}

/// Catmull-Rom spline with boundary control points duplicated.
///
/// Each segment `p1 → p2` is sampled `max(ceil(len / 2), 1)` times. Output
/// starts with the first input point and ends with the last one, both exact.
/// Inputs shorter than three points are returned unchanged.
#[must_use]
pub fn catmull_rom(points: &[Point], tension: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let n = points.len();
    let a = tension;
    let mut out = Vec::with_capacity(n * 2);
    out.push(points[0]);

    for i in 0..n - 1 {
        let p0 = if i == 0 { points[0] } else { points[i - 1] };
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = if i == n - 2 { points[n - 1] } else { points[i + 2] };

        let steps = segment_steps(p1.distance_to(&p2));
        for step in 0..steps {
            let u = f64::from(step) / f64::from(steps);
            let uu = u * u;
            let uuu = uu * u;

            let q0 = -a * uuu + 2.0 * a * uu - a * u;
            let q1 = (2.0 - a) * uuu + (a - 3.0) * uu + 1.0;
            let q2 = (a - 2.0) * uuu + (3.0 - 2.0 * a) * uu + a * u;
            let q3 = a * uuu - a * uu;

            out.push(Point::new(
                q0 * p0.x + q1 * p1.x + q2 * p2.x + q3 * p3.x,
                q0 * p0.y + q1 * p1.y + q2 * p2.y + q3 * p3.y,
                lerp(p1.pressure, p2.pressure, u),
                lerp(p1.timestamp, p2.timestamp, u),
            ));
        }
    }

    out.push(points[n - 1]);
    out
}

/// Quadratic Bezier through each consecutive triple, middle point as control.
#[must_use]
pub fn quadratic_bezier(points: &[Point]) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let steps = QUADRATIC_BEZIER_STEPS;
    let mut out = vec![points[0]];
    for w in points.windows(3) {
        let (p0, p1, p2) = (w[0], w[1], w[2]);
        for step in 0..=steps {
            let u = f64::from(step) / f64::from(steps);
            let v = 1.0 - u;
            let (b0, b1, b2) = (v * v, 2.0 * v * u, u * u);
            out.push(Point::new(
                b0 * p0.x + b1 * p1.x + b2 * p2.x,
                b0 * p0.y + b1 * p1.y + b2 * p2.y,
                b0 * p0.pressure + b1 * p1.pressure + b2 * p2.pressure,
                lerp(p0.timestamp, p2.timestamp, u),
            ));
        }
    }
    if let Some(last) = points.last() {
        out.push(*last);
    }
    out
}

/// Cubic Bezier through each consecutive quadruple.
#[must_use]
pub fn cubic_bezier(points: &[Point]) -> Vec<Point> {
    if points.len() < 4 {
        return points.to_vec();
    }

    let steps = CUBIC_BEZIER_STEPS;
    let mut out = vec![points[0]];
    for w in points.windows(4) {
        let (p0, p1, p2, p3) = (w[0], w[1], w[2], w[3]);
        for step in 0..=steps {
            let u = f64::from(step) / f64::from(steps);
            let v = 1.0 - u;
            let (b0, b1, b2, b3) = (v * v * v, 3.0 * v * v * u, 3.0 * v * u * u, u * u * u);
            out.push(Point::new(
                b0 * p0.x + b1 * p1.x + b2 * p2.x + b3 * p3.x,
                b0 * p0.y + b1 * p1.y + b2 * p2.y + b3 * p3.y,
                b0 * p0.pressure + b1 * p1.pressure + b2 * p2.pressure + b3 * p3.pressure,
                lerp(p0.timestamp, p3.timestamp, u),
            ));
        }
    }
    if let Some(last) = points.last() {
        out.push(*last);
    }
    out
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(p1: &Point, p2: &Point) -> f64 {
    p1.distance_to(p2)
}

/// Speed between two points in pixels per millisecond; zero when no time elapsed.
#[must_use]
pub fn velocity_between(p1: &Point, p2: &Point) -> f64 {
    let elapsed = p2.timestamp - p1.timestamp;
    if elapsed == 0.0 {
        return 0.0;
    }
    distance(p1, p2) / elapsed
}

/// Line width for a segment given the end point's velocity and pressure.
///
/// Faster motion narrows the line, harder pressure widens it; the two terms
/// are averaged and clamped to `[min_width, max_width]`.
#[must_use]
pub fn stroke_width(velocity: f64, pressure: f64, min_width: f64, max_width: f64, velocity_filter_weight: f64) -> f64 {
    let velocity_width = max_width - velocity * velocity_filter_weight;
    let pressure_width = min_width + pressure * (max_width - min_width);
    let width = (velocity_width + pressure_width) / 2.0;
    width.max(min_width).min(max_width)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn segment_steps(length: f64) -> u32 {
    let steps = (length / CATMULL_ROM_SAMPLE_SPACING).ceil();
    if steps.is_finite() && steps >= 1.0 {
        steps.min(f64::from(CATMULL_ROM_MAX_SEGMENT_SAMPLES)) as u32
    } else {
        1
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
