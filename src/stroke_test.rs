#![allow(clippy::float_cmp)]

use super::*;

fn pt(x: f64, y: f64, t: f64) -> Point {
    Point::new(x, y, 0.5, t)
}

// =============================================================
// Point
// =============================================================

#[test]
fn point_new_has_no_velocity() {
    let p = pt(1.0, 2.0, 3.0);
    assert!(p.velocity.is_none());
    assert_eq!(p.velocity_or_zero(), 0.0);
}

#[test]
fn point_with_velocity_keeps_other_fields() {
    let p = pt(1.0, 2.0, 3.0).with_velocity(0.25);
    assert_eq!(p.velocity, Some(0.25));
    assert_eq!(p.x, 1.0);
    assert_eq!(p.timestamp, 3.0);
}

#[test]
fn point_distance_is_euclidean() {
    assert_eq!(pt(0.0, 0.0, 0.0).distance_to(&pt(3.0, 4.0, 0.0)), 5.0);
}

#[test]
fn point_serializes_camel_case_and_omits_missing_velocity() {
    let json = serde_json::to_value(pt(1.0, 2.0, 3.0)).unwrap();
    assert_eq!(json["pressure"], 0.5);
    assert!(json.get("velocity").is_none());
}

#[test]
fn point_deserializes_without_velocity() {
    let p: Point = serde_json::from_str(r#"{"x":1,"y":2,"pressure":0.4,"timestamp":10}"#).unwrap();
    assert_eq!(p.x, 1.0);
    assert!(p.velocity.is_none());
}

// =============================================================
// Stroke
// =============================================================

#[test]
fn stroke_from_empty_points_is_none() {
    assert!(Stroke::from_points(Vec::new(), "#000", 0.5, 2.5).is_none());
}

#[test]
fn stroke_times_come_from_first_and_last_points() {
    let s = Stroke::from_points(vec![pt(0.0, 0.0, 5.0), pt(10.0, 0.0, 25.0)], "#f00", 1.0, 3.0).unwrap();
    assert_eq!(s.start_time, 5.0);
    assert_eq!(s.end_time, 25.0);
    assert_eq!(s.duration(), 20.0);
    assert_eq!(s.color, "#f00");
}

#[test]
fn stroke_single_point_is_dot() {
    let s = Stroke::from_points(vec![pt(1.0, 1.0, 0.0)], "#000", 0.5, 2.5).unwrap();
    assert!(s.is_dot());
    assert_eq!(s.length(), 0.0);
}

#[test]
fn stroke_length_sums_segments() {
    let s = Stroke::from_points(
        vec![pt(0.0, 0.0, 0.0), pt(3.0, 4.0, 1.0), pt(3.0, 10.0, 2.0)],
        "#000",
        0.5,
        2.5,
    )
    .unwrap();
    assert_eq!(s.length(), 11.0);
}

#[test]
fn stroke_wire_names_are_camel_case() {
    let s = Stroke::from_points(vec![pt(0.0, 0.0, 0.0)], "#000", 0.5, 2.5).unwrap();
    let json = serde_json::to_value(&s).unwrap();
    assert_eq!(json["minWidth"], 0.5);
    assert_eq!(json["maxWidth"], 2.5);
    assert!(json.get("startTime").is_some());
    assert!(json.get("endTime").is_some());
}

// =============================================================
// SignatureData
// =============================================================

#[test]
fn signature_data_stamps_version() {
    let data = SignatureData::new(Vec::new(), 300, 150, 42);
    assert_eq!(data.version, "1.0.0");
    assert!(data.is_empty());
    assert_eq!(data.point_count(), 0);
}

#[test]
fn signature_data_counts_points_across_strokes() {
    let a = Stroke::from_points(vec![pt(0.0, 0.0, 0.0), pt(9.0, 0.0, 1.0)], "#000", 0.5, 2.5).unwrap();
    let b = Stroke::from_points(vec![pt(5.0, 5.0, 2.0)], "#000", 0.5, 2.5).unwrap();
    let data = SignatureData::new(vec![a, b], 100, 100, 0);
    assert_eq!(data.point_count(), 3);
    assert_eq!(data.points().count(), 3);
}

#[test]
fn signature_data_parses_foreign_document() {
    let raw = r##"{
        "strokes": [{
            "points": [{"x": 1.5, "y": 2, "pressure": 0.5, "timestamp": 1700000000000.5, "velocity": 0.1}],
            "color": "#000000", "minWidth": 0.5, "maxWidth": 2.5,
            "startTime": 1700000000000, "endTime": 1700000000100
        }],
        "width": 600, "height": 200, "timestamp": 1700000000200, "version": "1.0.0"
    }"##;
    let data: SignatureData = serde_json::from_str(raw).unwrap();
    assert_eq!(data.strokes.len(), 1);
    assert_eq!(data.strokes[0].points[0].velocity, Some(0.1));
    assert_eq!(data.width, 600);
}
