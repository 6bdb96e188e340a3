//! Heuristic signature checks: feature extraction, similarity and
//! plausibility rules.

#[cfg(test)]
#[path = "validator_test.rs"]
mod validator_test;

use serde::Serialize;

use crate::stroke::{Point, SignatureData};

const MIN_STROKES: usize = 2;
const MIN_TOTAL_LENGTH: f64 = 100.0;
const MIN_BOX_SIDE: f64 = 20.0;
const MIN_TOTAL_TIME_MS: f64 = 500.0;

/// Axis-aligned extent of all points in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Extent {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Extent {
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureFeatures {
    pub stroke_count: usize,
    pub total_length: f64,
    /// Zero-sized at the origin when there are no points.
    pub bounding_box: Extent,
    pub avg_stroke_duration: f64,
    pub avg_pressure: f64,
    /// Sum of stroke durations in milliseconds.
    pub total_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDifferences {
    pub stroke_count: usize,
    pub total_length: f64,
    /// Absolute difference of bounding-box areas.
    pub bounding_box: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityResult {
    /// `1` for identical, `0` for unrelated.
    pub score: f64,
    pub hausdorff_distance: f64,
    pub feature_differences: FeatureDifferences,
}

/// A failed plausibility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationIssue {
    #[error("signature is empty")]
    Empty,
    #[error("signature has too few strokes (minimum 2 recommended)")]
    TooFewStrokes,
    #[error("signature is too short")]
    TooShort,
    #[error("signature is too small")]
    TooSmall,
    #[error("signature was drawn too quickly")]
    TooFast,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn extract_features(data: &SignatureData) -> SignatureFeatures {
    let mut total_length = 0.0;
    let mut total_time = 0.0;
    let mut total_pressure = 0.0;
    let mut point_count = 0_usize;
    let mut bounds: Option<(f64, f64, f64, f64)> = None;

    for stroke in &data.strokes {
        total_length += stroke.length();
        total_time += stroke.duration();
        for p in &stroke.points {
            total_pressure += p.pressure;
            point_count += 1;
            bounds = Some(match bounds {
                None => (p.x, p.y, p.x, p.y),
                Some((x0, y0, x1, y1)) => (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
            });
        }
    }

    let bounding_box = bounds.map_or_else(Extent::default, |(x0, y0, x1, y1)| Extent {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
    });
    let stroke_count = data.strokes.len();

    SignatureFeatures {
        stroke_count,
        total_length,
        bounding_box,
        avg_stroke_duration: if stroke_count > 0 { total_time / stroke_count as f64 } else { 0.0 },
        avg_pressure: if point_count > 0 { total_pressure / point_count as f64 } else { 0.0 },
        total_time,
    }
}

/// Symmetric Hausdorff distance between two point sets.
///
/// Two empty sets are at distance 0; an empty set is infinitely far from a
/// non-empty one.
#[must_use]
pub fn hausdorff_distance(a: &[&Point], b: &[&Point]) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => 0.0,
        (true, false) | (false, true) => f64::INFINITY,
        (false, false) => directed(a, b).max(directed(b, a)),
    }
}

fn directed(from: &[&Point], to: &[&Point]) -> f64 {
    from.iter()
        .map(|p| to.iter().map(|q| p.distance_to(q)).fold(f64::INFINITY, f64::min))
        .fold(0.0, f64::max)
}

/// `num / den` capped at 1, with `0 / 0` treated as no difference.
fn normalized(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        (num / den).min(1.0)
    } else if num > 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Weighted similarity of two signatures in `[0, 1]`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compare(a: &SignatureData, b: &SignatureData) -> SimilarityResult {
    let fa = extract_features(a);
    let fb = extract_features(b);
    let points_a: Vec<&Point> = a.points().collect();
    let points_b: Vec<&Point> = b.points().collect();
    let hausdorff = hausdorff_distance(&points_a, &points_b);

    let differences = FeatureDifferences {
        stroke_count: fa.stroke_count.abs_diff(fb.stroke_count),
        total_length: (fa.total_length - fb.total_length).abs(),
        bounding_box: (fa.bounding_box.area() - fb.bounding_box.area()).abs(),
    };

    let max_dimension = f64::from(a.width.max(a.height).max(b.width).max(b.height));
    let score = 1.0
        - (normalized(hausdorff, max_dimension) * 0.5
            + (differences.stroke_count as f64 / 10.0).min(1.0) * 0.25
            + normalized(differences.total_length, fa.total_length + fb.total_length) * 0.25);

    SimilarityResult { score: score.clamp(0.0, 1.0), hausdorff_distance: hausdorff, feature_differences: differences }
}

/// Apply the plausibility rules; every failing rule is reported.
#[must_use]
pub fn validate(data: &SignatureData) -> ValidationReport {
    let features = extract_features(data);
    let mut errors = Vec::new();

    if data.strokes.is_empty() {
        errors.push(ValidationIssue::Empty);
    }
    if data.strokes.len() < MIN_STROKES {
        errors.push(ValidationIssue::TooFewStrokes);
    }
    if features.total_length < MIN_TOTAL_LENGTH {
        errors.push(ValidationIssue::TooShort);
    }
    if features.bounding_box.width.min(features.bounding_box.height) < MIN_BOX_SIDE {
        errors.push(ValidationIssue::TooSmall);
    }
    if features.total_time < MIN_TOTAL_TIME_MS {
        errors.push(ValidationIssue::TooFast);
    }

    ValidationReport { is_valid: errors.is_empty(), errors }
}

/// Rough complexity in `[0, 100]` from stroke count, length, time and pressure.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn complexity_score(data: &SignatureData) -> f64 {
    let f = extract_features(data);
    let strokes = (f.stroke_count as f64 * 10.0).min(30.0);
    let length = (f.total_length / 50.0).min(30.0);
    let time = (f.total_time / 100.0).min(20.0);
    let pressure = if f.avg_pressure > 0.3 { 20.0 } else { 10.0 };
    (strokes + length + time + pressure).min(100.0)
}
