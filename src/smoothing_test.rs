#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64, t: f64) -> Point {
    Point::new(x, y, 0.5, t)
}

fn zigzag(n: u32) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let x = f64::from(i) * 9.0;
            let y = if i % 2 == 0 { 0.0 } else { 12.0 };
            Point::new(x, y, 0.2 + f64::from(i % 5) * 0.1, f64::from(i) * 16.0)
        })
        .collect()
}

// =============================================================
// Dispatch
// =============================================================

#[test]
fn default_algorithm_is_catmull_rom() {
    assert_eq!(SmoothAlgorithm::default(), SmoothAlgorithm::CatmullRom);
}

#[test]
fn algorithm_wire_names() {
    assert_eq!(serde_json::to_string(&SmoothAlgorithm::CatmullRom).unwrap(), "\"catmull-rom\"");
    assert_eq!(serde_json::to_string(&SmoothAlgorithm::BezierQuadratic).unwrap(), "\"bezier-quadratic\"");
    assert_eq!(serde_json::to_string(&SmoothAlgorithm::BezierCubic).unwrap(), "\"bezier-cubic\"");
    assert_eq!(serde_json::to_string(&SmoothAlgorithm::None).unwrap(), "\"none\"");
}

#[test]
fn none_is_identity() {
    let input = zigzag(6);
    assert_eq!(smooth(&input, SmoothAlgorithm::None, 0.5), input);
}

#[test]
fn single_point_passes_through_every_algorithm() {
    let input = vec![pt(1.0, 1.0, 0.0)];
    for algo in [
        SmoothAlgorithm::CatmullRom,
        SmoothAlgorithm::BezierQuadratic,
        SmoothAlgorithm::BezierCubic,
        SmoothAlgorithm::None,
    ] {
        assert_eq!(smooth(&input, algo, 0.5), input);
    }
}

// =============================================================
// Catmull-Rom
// =============================================================

#[test]
fn catmull_rom_two_points_unchanged() {
    let input = vec![pt(0.0, 0.0, 0.0), pt(50.0, 0.0, 10.0)];
    assert_eq!(catmull_rom(&input, 0.5), input);
}

#[test]
fn catmull_rom_preserves_endpoints() {
    for n in 3..12 {
        let input = zigzag(n);
        let out = catmull_rom(&input, 0.5);
        let first = out.first().unwrap();
        let last = out.last().unwrap();
        assert_eq!((first.x, first.y), (input[0].x, input[0].y));
        let end = input.last().unwrap();
        assert_eq!((last.x, last.y), (end.x, end.y));
    }
}

#[test]
fn catmull_rom_sample_count_follows_segment_length() {
    // Segments of length 10 and 3 → ceil(5) + ceil(1.5) samples, plus both endpoints.
    let input = vec![pt(0.0, 0.0, 0.0), pt(10.0, 0.0, 10.0), pt(13.0, 0.0, 20.0)];
    let out = catmull_rom(&input, 0.5);
    assert_eq!(out.len(), 1 + 5 + 2 + 1);
}

#[test]
fn catmull_rom_zero_length_segment_still_samples_once() {
    let input = vec![pt(0.0, 0.0, 0.0), pt(0.0, 0.0, 5.0), pt(4.0, 0.0, 10.0)];
    let out = catmull_rom(&input, 0.5);
    assert_eq!(out.len(), 1 + 1 + 2 + 1);
}

#[test]
fn catmull_rom_caps_samples_on_huge_segments() {
    let input = vec![pt(0.0, 0.0, 0.0), pt(1.0e9, 0.0, 10.0), pt(1.0e9 + 2.0, 0.0, 20.0)];
    let out = catmull_rom(&input, 0.5);
    assert_eq!(out.len(), 1 + CATMULL_ROM_MAX_SEGMENT_SAMPLES as usize + 1 + 1);
    assert_eq!(out.last(), input.last());
}

#[test]
fn catmull_rom_interpolates_pressure_and_time_linearly() {
    let input = vec![
        Point::new(0.0, 0.0, 0.0, 0.0),
        Point::new(4.0, 0.0, 1.0, 100.0),
        Point::new(8.0, 0.0, 1.0, 200.0),
    ];
    let out = catmull_rom(&input, 0.5);
    // Samples of segment 0: u = 0, 0.5
    assert_eq!(out[1].pressure, 0.0);
    assert_eq!(out[2].pressure, 0.5);
    assert_eq!(out[2].timestamp, 50.0);
}

#[test]
fn catmull_rom_collinear_input_stays_on_line() {
    let input = vec![pt(0.0, 5.0, 0.0), pt(10.0, 5.0, 1.0), pt(20.0, 5.0, 2.0), pt(30.0, 5.0, 3.0)];
    for p in catmull_rom(&input, 0.5) {
        assert!((p.y - 5.0).abs() < 1e-9);
    }
}

#[test]
fn catmull_rom_synthesized_points_have_no_velocity() {
    let input: Vec<Point> = zigzag(4).into_iter().map(|p| p.with_velocity(1.0)).collect();
    let out = catmull_rom(&input, 0.5);
    assert!(out[1..out.len() - 1].iter().all(|p| p.velocity.is_none()));
    assert_eq!(out[0].velocity, Some(1.0));
}

// =============================================================
// Bezier
// =============================================================

#[test]
fn quadratic_needs_three_points() {
    let input = vec![pt(0.0, 0.0, 0.0), pt(10.0, 0.0, 1.0)];
    assert_eq!(quadratic_bezier(&input), input);
}

#[test]
fn quadratic_emits_eleven_samples_per_triple() {
    let input = zigzag(5);
    let out = quadratic_bezier(&input);
    assert_eq!(out.len(), 1 + 3 * 11 + 1);
    assert_eq!(out[0], input[0]);
    assert_eq!(*out.last().unwrap(), input[4]);
}

#[test]
fn quadratic_midpoint_matches_formula() {
    let input = vec![pt(0.0, 0.0, 0.0), pt(10.0, 10.0, 10.0), pt(20.0, 0.0, 20.0)];
    let out = quadratic_bezier(&input);
    // u = 0.5 is the 6th sample of the first triple (after the leading point).
    let mid = out[1 + 5];
    assert!((mid.x - 10.0).abs() < 1e-12);
    assert!((mid.y - 5.0).abs() < 1e-12);
    assert!((mid.timestamp - 10.0).abs() < 1e-12);
}

#[test]
fn cubic_needs_four_points() {
    let input = zigzag(3);
    assert_eq!(cubic_bezier(&input), input);
}

#[test]
fn cubic_emits_sixteen_samples_per_quadruple() {
    let input = zigzag(6);
    let out = cubic_bezier(&input);
    assert_eq!(out.len(), 1 + 3 * 16 + 1);
}

// =============================================================
// Velocity / width
// =============================================================

#[test]
fn distance_is_euclidean() {
    assert_eq!(distance(&pt(0.0, 0.0, 0.0), &pt(3.0, 4.0, 0.0)), 5.0);
}

#[test]
fn velocity_between_guards_zero_elapsed() {
    assert_eq!(velocity_between(&pt(0.0, 0.0, 5.0), &pt(10.0, 0.0, 5.0)), 0.0);
    assert_eq!(velocity_between(&pt(0.0, 0.0, 0.0), &pt(10.0, 0.0, 5.0)), 2.0);
}

#[test]
fn width_at_rest_full_pressure_is_max() {
    assert_eq!(stroke_width(0.0, 1.0, 0.5, 2.5, 0.7), 2.5);
}

#[test]
fn width_is_always_clamped() {
    for vi in 0..50 {
        for pi in 0..=10 {
            let v = f64::from(vi) * 0.37;
            let p = f64::from(pi) / 10.0;
            let w = stroke_width(v, p, 0.5, 2.5, 0.7);
            assert!((0.5..=2.5).contains(&w), "v={v} p={p} w={w}");
        }
    }
}

#[test]
fn width_clamp_handles_extreme_inputs() {
    assert_eq!(stroke_width(1e9, 0.0, 0.5, 2.5, 0.7), 0.5);
    assert_eq!(stroke_width(-1e9, 1.0, 0.5, 2.5, 0.7), 2.5);
}

#[test]
fn width_non_increasing_in_velocity() {
    let mut prev = f64::INFINITY;
    for vi in 0..100 {
        let w = stroke_width(f64::from(vi) * 0.05, 0.5, 0.5, 2.5, 0.7);
        assert!(w <= prev);
        prev = w;
    }
}

#[test]
fn width_non_decreasing_in_pressure() {
    let mut prev = f64::NEG_INFINITY;
    for pi in 0..=100 {
        let w = stroke_width(1.0, f64::from(pi) / 100.0, 0.5, 2.5, 0.7);
        assert!(w >= prev);
        prev = w;
    }
}
