//! Size-bounded raster export and data URL helpers.

#[cfg(test)]
#[path = "compressor_test.rs"]
mod compressor_test;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::export::RasterFormat;
use crate::surface::{Surface, SurfaceError};

const QUALITY_STEP: f64 = 0.1;
const MIN_QUALITY: f64 = 0.1;
const WEB_QUALITY: f64 = 0.85;
const WEB_MAX_SIZE: usize = 500 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressOptions {
    /// Starting JPEG quality in `0..=1`.
    pub quality: f64,
    /// Target upper bound on the decoded size in bytes.
    pub max_size: Option<usize>,
    pub max_iterations: u32,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self { quality: 0.8, max_size: None, max_iterations: 10 }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DataUrlError {
    #[error("not a base64 data URL")]
    Malformed,
    #[error(transparent)]
    Decode(#[from] base64::DecodeError),
}

/// Encode with `encoder`, lowering JPEG quality in steps of 0.1 until the
/// estimated size fits `max_size`, the iteration budget runs out, or quality
/// reaches 0.1. PNG is encoded once as-is.
///
/// # Errors
///
/// Propagates the first encoder failure.
pub fn compress<F>(mut encoder: F, format: RasterFormat, options: &CompressOptions) -> Result<String, SurfaceError>
where
    F: FnMut(RasterFormat, f64) -> Result<String, SurfaceError>,
{
    if format == RasterFormat::Png {
        return encoder(format, 1.0);
    }

    let mut quality = options.quality;
    let mut url = encoder(format, quality)?;
    let Some(max_size) = options.max_size else {
        return Ok(url);
    };

    let mut iterations = 0;
    while data_url_size(&url) > max_size && iterations < options.max_iterations && quality > MIN_QUALITY {
        quality -= QUALITY_STEP;
        url = encoder(format, quality)?;
        iterations += 1;
    }
    log::debug!("compressor: {} bytes at quality {quality:.2} after {iterations} passes", data_url_size(&url));
    Ok(url)
}

/// [`compress`] using the surface's own encoder.
///
/// # Errors
///
/// Propagates the first encoder failure.
pub fn compress_surface<S: Surface>(surface: &S, format: RasterFormat, options: &CompressOptions) -> Result<String, SurfaceError> {
    compress(|fmt, quality| surface.to_data_url(fmt.mime(), quality), format, options)
}

/// JPEG at quality 0.85, bounded to 500 KiB.
///
/// # Errors
///
/// Propagates the first encoder failure.
pub fn optimize_for_web<S: Surface>(surface: &S) -> Result<String, SurfaceError> {
    let options = CompressOptions { quality: WEB_QUALITY, max_size: Some(WEB_MAX_SIZE), ..CompressOptions::default() };
    compress_surface(surface, RasterFormat::Jpeg, &options)
}

/// Split `data:<mime>;base64,<payload>` into mime and payload.
#[must_use]
pub fn split_data_url(url: &str) -> Option<(&str, &str)> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    Some((mime, payload))
}

/// Decoded size in bytes estimated from the base64 length. Strings that are
/// not data URLs are measured whole.
#[must_use]
pub fn data_url_size(url: &str) -> usize {
    let payload = url.split_once(',').map_or(url, |(_, payload)| payload);
    (payload.len() * 3 + 2) / 4
}

/// Mime type and decoded bytes of a base64 data URL.
///
/// # Errors
///
/// Returns `Err` if `url` is not a base64 data URL or the payload is invalid.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>), DataUrlError> {
    let (mime, payload) = split_data_url(url).ok_or(DataUrlError::Malformed)?;
    let bytes = STANDARD.decode(payload)?;
    Ok((mime.to_owned(), bytes))
}
