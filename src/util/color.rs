//! CSS color parsing for pixel-level utilities.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use image::Rgba;

/// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` into RGBA channels.
#[must_use]
pub fn parse_hex_rgba(raw: &str) -> Option<Rgba<u8>> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = channel(&hex[0..1].repeat(2))?;
            let g = channel(&hex[1..2].repeat(2))?;
            let b = channel(&hex[2..3].repeat(2))?;
            Some(Rgba([r, g, b, 255]))
        }
        6 | 8 => {
            let r = channel(&hex[0..2])?;
            let g = channel(&hex[2..4])?;
            let b = channel(&hex[4..6])?;
            let a = if hex.len() == 8 { channel(&hex[6..8])? } else { 255 };
            Some(Rgba([r, g, b, a]))
        }
        _ => None,
    }
}

fn channel(digits: &str) -> Option<u8> {
    match u8::from_str_radix(digits, 16) {
        Ok(value) => Some(value),
        Err(_) => None,
    }
}

/// Resolve a fill color for pixel work. `transparent` and unparseable values
/// become fully transparent black.
#[must_use]
pub fn resolve_fill(raw: &str) -> Rgba<u8> {
    if raw.trim().eq_ignore_ascii_case("transparent") {
        return Rgba([0, 0, 0, 0]);
    }
    parse_hex_rgba(raw).unwrap_or(Rgba([0, 0, 0, 0]))
}
