#![allow(clippy::float_cmp)]

use super::*;
use crate::recording::RecordingSurface;

// =============================================================
// Helpers
// =============================================================

/// Encoder whose payload shrinks linearly with quality: 1000 chars at 1.0.
fn fake_encoder(calls: &mut Vec<f64>) -> impl FnMut(RasterFormat, f64) -> Result<String, SurfaceError> + '_ {
    move |format, quality| {
        calls.push(quality);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let len = (quality * 1000.0).round() as usize;
        Ok(format!("data:{};base64,{}", format.mime(), "A".repeat(len)))
    }
}

// =============================================================
// Compress
// =============================================================

#[test]
fn png_is_encoded_once() {
    let mut calls = Vec::new();
    let opts = CompressOptions { max_size: Some(1), ..CompressOptions::default() };
    let url = compress(fake_encoder(&mut calls), RasterFormat::Png, &opts).unwrap();
    assert!(url.starts_with("data:image/png;base64,"));
    assert_eq!(calls.len(), 1);
}

#[test]
fn no_limit_uses_starting_quality() {
    let mut calls = Vec::new();
    compress(fake_encoder(&mut calls), RasterFormat::Jpeg, &CompressOptions::default()).unwrap();
    assert_eq!(calls, vec![0.8]);
}

#[test]
fn quality_steps_down_until_it_fits() {
    let mut calls = Vec::new();
    let opts = CompressOptions { max_size: Some(400), ..CompressOptions::default() };
    let url = compress(fake_encoder(&mut calls), RasterFormat::Jpeg, &opts).unwrap();
    assert_eq!(calls.len(), 4);
    assert!(data_url_size(&url) <= 400);
}

#[test]
fn iteration_budget_is_respected() {
    let mut calls = Vec::new();
    let opts = CompressOptions { quality: 0.9, max_size: Some(1), max_iterations: 2 };
    compress(fake_encoder(&mut calls), RasterFormat::Jpeg, &opts).unwrap();
    assert_eq!(calls.len(), 3);
}

#[test]
fn quality_floor_stops_loop() {
    let mut calls = Vec::new();
    let opts = CompressOptions { quality: 0.3, max_size: Some(1), max_iterations: 50 };
    compress(fake_encoder(&mut calls), RasterFormat::Jpeg, &opts).unwrap();
    // 0.3, 0.2, then ~0.1 where the floor stops the loop.
    assert_eq!(calls.len(), 3);
    assert!((calls[2] - 0.1).abs() < 1e-9);
}

#[test]
fn encoder_error_propagates() {
    let result = compress(|_, _| Err(SurfaceError::Unsupported("toDataURL")), RasterFormat::Jpeg, &CompressOptions::default());
    assert!(matches!(result, Err(SurfaceError::Unsupported(_))));
}

#[test]
fn optimize_for_web_uses_jpeg() {
    let surface = RecordingSurface::new(10.0, 10.0);
    let url = optimize_for_web(&surface).unwrap();
    assert!(url.starts_with("data:image/jpeg;base64,"));
    assert!(url.ends_with("0.85"));
}

// =============================================================
// Data URLs
// =============================================================

#[test]
fn size_estimate() {
    assert_eq!(data_url_size("data:image/png;base64,AAAA"), 3);
    assert_eq!(data_url_size("data:image/png;base64,AA"), 2);
    assert_eq!(data_url_size("AAAAAAAA"), 6);
}

#[test]
fn split_parts() {
    assert_eq!(split_data_url("data:image/png;base64,QUJD"), Some(("image/png", "QUJD")));
    assert_eq!(split_data_url("image/png;base64,QUJD"), None);
    assert_eq!(split_data_url("data:text/plain,hi"), None);
}

#[test]
fn decode_payload() {
    let (mime, bytes) = decode_data_url("data:image/png;base64,QUJD").unwrap();
    assert_eq!(mime, "image/png");
    assert_eq!(bytes, b"ABC");
    assert!(matches!(decode_data_url("nope"), Err(DataUrlError::Malformed)));
    assert!(matches!(decode_data_url("data:image/png;base64,***"), Err(DataUrlError::Decode(_))));
}
