//! Export formats and the vector/raster re-renderers.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use serde::{Deserialize, Serialize};

use crate::render::{StrokeRenderer, clear};
use crate::stroke::SignatureData;
use crate::surface::{Surface, SurfaceError};

/// Every format a signature can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Svg,
    Json,
}

impl ExportFormat {
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Svg => "image/svg+xml",
            Self::Json => "application/json",
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Svg => "svg",
            Self::Json => "json",
        }
    }

    /// The raster encoder for this format, if it is a raster format.
    #[must_use]
    pub fn raster(self) -> Option<RasterFormat> {
        match self {
            Self::Png => Some(RasterFormat::Png),
            Self::Jpeg => Some(RasterFormat::Jpeg),
            Self::Svg | Self::Json => None,
        }
    }

    /// Parse a host-supplied format name; unknown names fall back to PNG.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Self::Jpeg,
            "svg" => Self::Svg,
            "json" => Self::Json,
            _ => Self::Png,
        }
    }
}

/// Formats produced by the surface's own encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterFormat {
    #[default]
    Png,
    Jpeg,
}

impl RasterFormat {
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Export body: raster formats are data URLs, vector and JSON formats are text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportBody {
    DataUrl(String),
    Text(String),
}

/// A ready-to-save export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub format: ExportFormat,
    pub body: ExportBody,
}

impl ExportPayload {
    #[must_use]
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    /// `<base>.<extension>` for downloads.
    #[must_use]
    pub fn file_name(&self, base: &str) -> String {
        format!("{base}.{}", self.format.extension())
    }
}

/// Serialize a signature as an SVG document.
///
/// Multi-point strokes become `<path>` polylines at `max_width`; single-point
/// strokes become `<circle>`s of radius `max_width / 2`. A solid background
/// color is emitted as a full-size `<rect>` first.
#[must_use]
pub fn render_svg(data: &SignatureData, background_color: Option<&str>) -> String {
    let (w, h) = (data.width, data.height);
    let mut svg = format!(r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#);

    if let Some(color) = background_color {
        svg.push_str(&format!(r#"<rect width="{w}" height="{h}" fill="{}"/>"#, escape_attr(color)));
    }

    for stroke in &data.strokes {
        let color = escape_attr(&stroke.color);
        match stroke.points.as_slice() {
            [] => {}
            [p] => {
                svg.push_str(&format!(r#"<circle cx="{}" cy="{}" r="{}" fill="{color}"/>"#, p.x, p.y, stroke.max_width / 2.0));
            }
            [first, rest @ ..] => {
                let mut d = format!("M {} {}", first.x, first.y);
                for p in rest {
                    d.push_str(&format!(" L {} {}", p.x, p.y));
                }
                svg.push_str(&format!(
                    r#"<path d="{d}" stroke="{color}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round" fill="none"/>"#,
                    stroke.max_width
                ));
            }
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Repaint `data` onto `surface` from scratch: clear, optional solid
/// background, then every stroke with per-segment widths.
///
/// # Errors
///
/// Returns `Err` if the surface rejects a call.
pub fn render_raster<S: Surface>(
    surface: &mut S,
    renderer: &StrokeRenderer,
    data: &SignatureData,
    background_color: Option<&str>,
) -> Result<(), SurfaceError> {
    let (w, h) = (f64::from(data.width), f64::from(data.height));
    clear(surface, w, h);
    if let Some(color) = background_color {
        surface.save();
        surface.set_fill_color(color);
        surface.fill_rect(0.0, 0.0, w, h);
        surface.restore();
    }
    renderer.draw_strokes(surface, &data.strokes)
}

fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
