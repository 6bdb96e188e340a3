#![allow(clippy::float_cmp)]

use super::*;
use crate::recording::{Op, RecordingSurface};

fn only(show_grid: bool, show_baseline: bool, show_border: bool) -> GridOptions {
    GridOptions { show_grid, show_baseline, show_border, ..GridOptions::default() }
}

#[test]
fn defaults_match_guide_palette() {
    let opts = GridOptions::default();
    assert_eq!(opts.grid_size, 20.0);
    assert_eq!(opts.grid_color, "#e0e0e0");
    assert_eq!(opts.baseline_color, "#409eff");
    assert!(opts.show_grid && opts.show_baseline && opts.show_border);
}

#[test]
fn grid_lines_cover_both_axes_inclusive() {
    let mut s = RecordingSurface::new(100.0, 40.0);
    draw_grid(&mut s, 100.0, 40.0, &only(true, false, false)).unwrap();
    // x = 0..=100 step 20 → 6, y = 0..=40 step 20 → 3
    assert_eq!(s.strokes(), 9);
    assert!(s.ops.contains(&Op::LineWidth(0.5)));
    assert!(s.ops.contains(&Op::Alpha(0.5)));
}

#[test]
fn baseline_is_dashed_and_reset() {
    let mut s = RecordingSurface::new(200.0, 100.0);
    draw_grid(&mut s, 200.0, 100.0, &only(false, true, false)).unwrap();
    assert!(s.ops.contains(&Op::LineDash(vec![5.0, 5.0])));
    assert!(s.ops.contains(&Op::MoveTo(0.0, 50.0)));
    assert!(s.ops.contains(&Op::LineTo(200.0, 50.0)));
    assert_eq!(s.ops.iter().rev().find(|op| matches!(op, Op::LineDash(_))), Some(&Op::LineDash(vec![])));
}

#[test]
fn border_is_inset() {
    let mut s = RecordingSurface::new(200.0, 100.0);
    draw_grid(&mut s, 200.0, 100.0, &only(false, false, true)).unwrap();
    assert!(s.ops.contains(&Op::StrokeRect(10.0, 10.0, 180.0, 80.0)));
    assert!(s.ops.contains(&Op::LineWidth(2.0)));
}

#[test]
fn state_is_saved_and_restored() {
    let mut s = RecordingSurface::new(50.0, 50.0);
    draw_grid(&mut s, 50.0, 50.0, &GridOptions::default()).unwrap();
    assert_eq!(s.ops.first(), Some(&Op::Save));
    assert_eq!(s.ops.last(), Some(&Op::Restore));
}

#[test]
fn zero_grid_size_draws_no_grid() {
    let mut s = RecordingSurface::new(50.0, 50.0);
    let opts = GridOptions { grid_size: 0.0, ..only(true, false, false) };
    draw_grid(&mut s, 50.0, 50.0, &opts).unwrap();
    assert_eq!(s.strokes(), 0);
}

#[test]
fn options_deserialize_from_partial_camel_case() {
    let opts: GridOptions = serde_json::from_str(r#"{"gridSize": 10, "showBorder": false}"#).unwrap();
    assert_eq!(opts.grid_size, 10.0);
    assert!(!opts.show_border);
    assert!(opts.show_grid);
}
