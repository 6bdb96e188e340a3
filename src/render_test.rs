#![allow(clippy::float_cmp)]

use super::*;
use crate::recording::{Op, RecordingSurface, TestImage};

// =============================================================
// Helpers
// =============================================================

fn stroke(points: Vec<Point>) -> Stroke {
    Stroke::from_points(points, "#000000", 0.5, 2.5).unwrap()
}

fn line_points(n: u32) -> Vec<Point> {
    (0..n).map(|i| Point::new(f64::from(i) * 10.0, 20.0, 0.5, f64::from(i) * 16.0).with_velocity(0.5)).collect()
}

fn empty_scene(strokes: &[Stroke]) -> Scene<'_, TestImage> {
    Scene {
        width: 300.0,
        height: 150.0,
        background: None,
        background_image: None,
        grid: None,
        strokes,
        pending: None,
        watermark: None,
        watermark_image: None,
    }
}

// =============================================================
// StrokeRenderer
// =============================================================

#[test]
fn single_point_is_a_dot_of_half_max_width() {
    let mut s = RecordingSurface::new(300.0, 150.0);
    let r = StrokeRenderer::default();
    r.draw_stroke(&mut s, &stroke(vec![Point::new(5.0, 6.0, 0.5, 0.0)])).unwrap();
    assert!(s.ops.contains(&Op::Arc { x: 5.0, y: 6.0, radius: 1.25 }));
    assert!(s.ops.contains(&Op::Fill));
    assert_eq!(s.strokes(), 0);
}

#[test]
fn multi_point_draws_one_segment_per_pair() {
    let mut s = RecordingSurface::new(300.0, 150.0);
    let r = StrokeRenderer::default();
    r.draw_stroke(&mut s, &stroke(line_points(5))).unwrap();
    assert_eq!(s.strokes(), 4);
    assert_eq!(s.arcs(), 0);
}

#[test]
fn segment_width_uses_second_point() {
    let mut s = RecordingSurface::new(300.0, 150.0);
    let r = StrokeRenderer::new(BrushStyle::Default, 0.7);
    let points = vec![Point::new(0.0, 0.0, 0.0, 0.0).with_velocity(100.0), Point::new(10.0, 0.0, 1.0, 10.0).with_velocity(0.0)];
    r.draw_points(&mut s, &points, "#000", 0.5, 2.5).unwrap();
    assert_eq!(s.line_widths(), vec![2.5]);
}

#[test]
fn missing_velocity_counts_as_zero() {
    let mut s = RecordingSurface::new(300.0, 150.0);
    let r = StrokeRenderer::new(BrushStyle::Default, 0.7);
    let points = vec![Point::new(0.0, 0.0, 1.0, 0.0), Point::new(10.0, 0.0, 1.0, 10.0)];
    r.draw_points(&mut s, &points, "#000", 0.5, 2.5).unwrap();
    assert_eq!(s.line_widths(), vec![2.5]);
}

#[test]
fn empty_points_draw_nothing() {
    let mut s = RecordingSurface::new(300.0, 150.0);
    StrokeRenderer::default().draw_points(&mut s, &[], "#000", 0.5, 2.5).unwrap();
    assert!(s.ops.is_empty());
}

#[test]
fn brush_is_swappable() {
    let mut s = RecordingSurface::new(300.0, 150.0);
    let mut r = StrokeRenderer::default();
    r.set_brush(BrushStyle::Brush);
    assert_eq!(r.brush(), BrushStyle::Brush);
    r.draw_stroke(&mut s, &stroke(line_points(2))).unwrap();
    assert_eq!(s.strokes(), 3);
}

#[test]
fn dot_failure_still_restores_and_propagates() {
    let mut s = RecordingSurface::new(300.0, 150.0);
    s.fail_arc = true;
    let err = draw_dot(&mut s, &Point::new(0.0, 0.0, 0.5, 0.0), "#000", 1.0);
    assert!(err.is_err());
    assert_eq!(s.ops.last(), Some(&Op::Restore));
    assert!(!s.ops.contains(&Op::Fill));
}

// =============================================================
// Scene layering
// =============================================================

#[test]
fn empty_scene_only_clears() {
    let mut s = RecordingSurface::new(300.0, 150.0);
    draw(&mut s, &StrokeRenderer::default(), &empty_scene(&[])).unwrap();
    assert_eq!(s.ops, vec![Op::ClearRect(0.0, 0.0, 300.0, 150.0)]);
}

#[test]
fn background_color_is_beneath_strokes() {
    let strokes = vec![stroke(line_points(3))];
    let background = Background::Color { color: "#ffffff".into() };
    let scene = Scene { background: Some(&background), ..empty_scene(&strokes) };
    let mut s = RecordingSurface::new(300.0, 150.0);
    draw(&mut s, &StrokeRenderer::default(), &scene).unwrap();

    let bg = s.position(|op| *op == Op::FillRect(0.0, 0.0, 300.0, 150.0)).unwrap();
    let first_stroke = s.position(|op| *op == Op::Stroke).unwrap();
    assert!(bg < first_stroke);
}

#[test]
fn unloaded_background_image_is_skipped() {
    let background = Background::Image { image_url: "bg.png".into(), image_fit: ImageFit::Cover };
    let scene = Scene { background: Some(&background), ..empty_scene(&[]) };
    let mut s = RecordingSurface::new(300.0, 150.0);
    draw(&mut s, &StrokeRenderer::default(), &scene).unwrap();
    assert_eq!(s.count(|op| matches!(op, Op::DrawImage { .. })), 0);
}

#[test]
fn loaded_background_image_precedes_strokes() {
    let strokes = vec![stroke(line_points(3))];
    let background = Background::Image { image_url: "bg.png".into(), image_fit: ImageFit::Fill };
    let image = TestImage { width: 50.0, height: 50.0 };
    let scene = Scene { background: Some(&background), background_image: Some(&image), ..empty_scene(&strokes) };
    let mut s = RecordingSurface::new(300.0, 150.0);
    draw(&mut s, &StrokeRenderer::default(), &scene).unwrap();

    let img = s.position(|op| matches!(op, Op::DrawImage { width, height, .. } if *width == 300.0 && *height == 150.0));
    let first_stroke = s.position(|op| *op == Op::Stroke).unwrap();
    assert!(img.unwrap() < first_stroke);
}

#[test]
fn pending_points_draw_after_committed() {
    let strokes = vec![stroke(vec![Point::new(1.0, 1.0, 0.5, 0.0)])];
    let pending = line_points(2);
    let scene = Scene {
        pending: Some(PendingStroke { points: &pending, color: "#ff0000", min_width: 0.5, max_width: 2.5 }),
        ..empty_scene(&strokes)
    };
    let mut s = RecordingSurface::new(300.0, 150.0);
    draw(&mut s, &StrokeRenderer::default(), &scene).unwrap();
    let dot = s.position(|op| matches!(op, Op::Arc { .. })).unwrap();
    let seg = s.position(|op| *op == Op::StrokeColor("#ff0000".into())).unwrap();
    assert!(dot < seg);
}

#[test]
fn grid_draws_between_background_and_strokes() {
    let strokes = vec![stroke(line_points(2))];
    let background = Background::Color { color: "#fafafa".into() };
    let grid = GridOptions { show_grid: false, show_baseline: false, ..GridOptions::default() };
    let scene = Scene { background: Some(&background), grid: Some(&grid), ..empty_scene(&strokes) };
    let mut s = RecordingSurface::new(300.0, 150.0);
    draw(&mut s, &StrokeRenderer::default(), &scene).unwrap();
    let border = s.position(|op| matches!(op, Op::StrokeRect(..))).unwrap();
    let bg = s.position(|op| matches!(op, Op::FillRect(..))).unwrap();
    let segment = s.position(|op| *op == Op::StrokeColor("#000000".into())).unwrap();
    assert!(bg < border && border < segment);
}

#[test]
fn watermark_text_is_last_and_translucent() {
    let strokes = vec![stroke(line_points(2))];
    let watermark = Watermark { text: Some("SIGNED".into()), ..Watermark::default() };
    let scene = Scene { watermark: Some(&watermark), ..empty_scene(&strokes) };
    let mut s = RecordingSurface::new(300.0, 150.0);
    draw(&mut s, &StrokeRenderer::default(), &scene).unwrap();

    // 6 chars * 6px = 36px; bottom-right anchor.
    let text = Op::FillText { text: "SIGNED".into(), x: 300.0 - 36.0 - 10.0, y: 140.0 };
    let at = s.position(|op| *op == text).unwrap();
    assert!(s.position(|op| *op == Op::Stroke).unwrap() < at);
    assert!(s.ops.contains(&Op::Alpha(0.3)));
    assert!(s.ops.contains(&Op::Font("14px sans-serif".into())));
}

#[test]
fn watermark_image_is_anchored() {
    let watermark = Watermark { position: WatermarkPosition::TopLeft, ..Watermark::default() };
    let logo = TestImage { width: 40.0, height: 20.0 };
    let scene = Scene { watermark: Some(&watermark), watermark_image: Some(&logo), ..empty_scene(&[]) };
    let mut s = RecordingSurface::new(300.0, 150.0);
    draw(&mut s, &StrokeRenderer::default(), &scene).unwrap();
    assert!(s.ops.contains(&Op::DrawImage { image: logo, x: 10.0, y: 10.0, width: 40.0, height: 20.0 }));
}

// =============================================================
// Geometry helpers
// =============================================================

#[test]
fn fit_fill_stretches() {
    assert_eq!(fit_image(ImageFit::Fill, 10.0, 10.0, 300.0, 150.0), (0.0, 0.0, 300.0, 150.0));
}

#[test]
fn fit_cover_overflows_and_centers() {
    assert_eq!(fit_image(ImageFit::Cover, 100.0, 100.0, 300.0, 150.0), (0.0, -75.0, 300.0, 300.0));
}

#[test]
fn fit_contain_letterboxes_and_centers() {
    assert_eq!(fit_image(ImageFit::Contain, 100.0, 100.0, 300.0, 150.0), (75.0, 0.0, 150.0, 150.0));
}

#[test]
fn fit_degenerate_image_stretches() {
    assert_eq!(fit_image(ImageFit::Cover, 0.0, 10.0, 300.0, 150.0), (0.0, 0.0, 300.0, 150.0));
}

#[test]
fn text_anchors() {
    assert_eq!(text_anchor(WatermarkPosition::TopLeft, 50.0, 14.0, 300.0, 150.0), (10.0, 24.0));
    assert_eq!(text_anchor(WatermarkPosition::TopRight, 50.0, 14.0, 300.0, 150.0), (240.0, 24.0));
    assert_eq!(text_anchor(WatermarkPosition::BottomLeft, 50.0, 14.0, 300.0, 150.0), (10.0, 140.0));
    assert_eq!(text_anchor(WatermarkPosition::Center, 50.0, 14.0, 300.0, 150.0), (125.0, 75.0));
}

#[test]
fn image_anchors() {
    assert_eq!(image_anchor(WatermarkPosition::BottomRight, 40.0, 20.0, 300.0, 150.0), (250.0, 120.0));
    assert_eq!(image_anchor(WatermarkPosition::Center, 40.0, 20.0, 300.0, 150.0), (130.0, 65.0));
}
