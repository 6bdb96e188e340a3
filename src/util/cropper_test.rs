use image::Rgba;

use super::*;

// =============================================================
// Helpers
// =============================================================

const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// 20x10 transparent image with ink at (5,3) and (8,6).
fn sample() -> RgbaImage {
    let mut img = RgbaImage::new(20, 10);
    img.put_pixel(5, 3, INK);
    img.put_pixel(8, 6, INK);
    img
}

// =============================================================
// Bounding box
// =============================================================

#[test]
fn blank_image_has_no_box() {
    assert_eq!(detect_bounding_box(&RgbaImage::new(8, 8)), None);
    assert!(crop(&RgbaImage::new(8, 8), &CropOptions::default()).is_none());
}

#[test]
fn box_is_inclusive() {
    assert_eq!(detect_bounding_box(&sample()), Some(BoundingBox { x: 5, y: 3, width: 4, height: 4 }));
}

#[test]
fn faint_alpha_counts_as_content() {
    let mut img = RgbaImage::new(4, 4);
    img.put_pixel(2, 1, Rgba([255, 255, 255, 1]));
    assert_eq!(detect_bounding_box(&img), Some(BoundingBox { x: 2, y: 1, width: 1, height: 1 }));
}

// =============================================================
// Crop / trim
// =============================================================

#[test]
fn crop_without_padding_is_tight() {
    let out = crop(&sample(), &CropOptions::default()).unwrap();
    assert_eq!(out.dimensions(), (4, 4));
    assert_eq!(*out.get_pixel(0, 0), INK);
    assert_eq!(*out.get_pixel(3, 3), INK);
    assert_eq!(out.get_pixel(1, 1).0[3], 0);
}

#[test]
fn trim_pads_with_transparency() {
    let out = trim(&sample(), TRIM_PADDING).unwrap();
    assert_eq!(out.dimensions(), (24, 24));
    assert_eq!(out.get_pixel(0, 0).0[3], 0);
    assert_eq!(*out.get_pixel(10, 10), INK);
    assert_eq!(detect_bounding_box(&out), Some(BoundingBox { x: 10, y: 10, width: 4, height: 4 }));
}

#[test]
fn crop_fills_background() {
    let options = CropOptions { padding: 2, background_color: "#ffffff".to_owned() };
    let out = crop(&sample(), &options).unwrap();
    assert_eq!(out.dimensions(), (8, 8));
    assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(out.get_pixel(3, 3).0, [255, 255, 255, 255]);
    assert_eq!(*out.get_pixel(2, 2), INK);
}
