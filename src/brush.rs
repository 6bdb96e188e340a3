//! Brush styles.
//!
//! A brush paints one segment between two points at a given width. Each style
//! is a variant of [`BrushStyle`] and [`BrushStyle::draw_segment`] dispatches
//! to the matching painter. Every painter saves and restores surface state so
//! alpha, shadow and cap settings never leak into the next segment.

#[cfg(test)]
#[path = "brush_test.rs"]
mod brush_test;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::stroke::Point;
use crate::surface::{LineCap, LineJoin, Surface};

// Pencil grain: one 1x1 mark per this many pixels of segment length.
const PENCIL_GRAIN_SPACING: f64 = 3.0;
const PENCIL_GRAIN_MAX_ALPHA: f64 = 0.3;
const NEON_GLOW_BLUR: f64 = 20.0;

/// Visual style used to paint stroke segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushStyle {
    /// Plain line with round caps and joins.
    #[default]
    Default,
    /// Thinner uniform line with square ends.
    Pen,
    /// Three soft overlapping passes.
    Brush,
    /// Light line plus scattered grain.
    Pencil,
    /// Wide translucent line.
    Marker,
    /// Blurred glow under a thin solid core.
    Neon,
}

impl BrushStyle {
    /// Paint the segment `p1 → p2` in `color` at nominal `width`.
    pub fn draw_segment<S: Surface>(self, surface: &mut S, p1: &Point, p2: &Point, color: &str, width: f64) {
        surface.save();
        surface.set_stroke_color(color);
        match self {
            Self::Default => {
                surface.set_line_width(width);
                surface.set_line_cap(LineCap::Round);
                surface.set_line_join(LineJoin::Round);
                line(surface, p1, p2);
            }
            Self::Pen => {
                surface.set_line_width(width * 0.8);
                surface.set_line_cap(LineCap::Butt);
                surface.set_line_join(LineJoin::Miter);
                line(surface, p1, p2);
            }
            Self::Brush => {
                surface.set_line_cap(LineCap::Round);
                surface.set_line_join(LineJoin::Round);
                for layer in 0..3u8 {
                    let i = f64::from(layer);
                    surface.set_global_alpha(0.3 + i * 0.2);
                    surface.set_line_width(width * (1.0 - i * 0.15));
                    line(surface, p1, p2);
                }
            }
            Self::Pencil => draw_pencil(surface, p1, p2, color, width),
            Self::Marker => {
                surface.set_line_width(width * 1.5);
                surface.set_line_cap(LineCap::Round);
                surface.set_line_join(LineJoin::Round);
                surface.set_global_alpha(0.6);
                line(surface, p1, p2);
            }
            Self::Neon => {
                surface.set_line_cap(LineCap::Round);
                surface.set_line_join(LineJoin::Round);

                surface.set_line_width(width * 2.0);
                surface.set_shadow(NEON_GLOW_BLUR, color);
                surface.set_global_alpha(0.5);
                line(surface, p1, p2);

                surface.set_shadow(0.0, color);
                surface.set_line_width(width * 0.5);
                surface.set_global_alpha(1.0);
                line(surface, p1, p2);
            }
        }
        surface.restore();
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn draw_pencil<S: Surface>(surface: &mut S, p1: &Point, p2: &Point, color: &str, width: f64) {
    surface.set_line_width(width * 0.6);
    surface.set_line_cap(LineCap::Round);
    surface.set_global_alpha(0.7);
    line(surface, p1, p2);

    let grains = (p1.distance_to(p2) / PENCIL_GRAIN_SPACING).floor();
    if !grains.is_finite() || grains < 1.0 {
        return;
    }
    let count = grains as u32;

    // Same segment, same grain: re-renders must not flicker.
    let mut rng = SmallRng::seed_from_u64(segment_seed(p1, p2));
    surface.set_fill_color(color);
    for i in 0..count {
        let t = f64::from(i) / grains;
        let x = p1.x + (p2.x - p1.x) * t + (rng.random::<f64>() - 0.5) * width;
        let y = p1.y + (p2.y - p1.y) * t + (rng.random::<f64>() - 0.5) * width;
        surface.set_global_alpha(rng.random::<f64>() * PENCIL_GRAIN_MAX_ALPHA);
        surface.fill_rect(x, y, 1.0, 1.0);
    }
}

fn segment_seed(p1: &Point, p2: &Point) -> u64 {
    [p1.x, p1.y, p2.x, p2.y]
        .iter()
        .fold(0xcbf2_9ce4_8422_2325_u64, |hash, v| (hash ^ v.to_bits()).wrapping_mul(0x0100_0000_01b3))
}

fn line<S: Surface>(surface: &mut S, p1: &Point, p2: &Point) {
    surface.begin_path();
    surface.move_to(p1.x, p1.y);
    surface.line_to(p2.x, p2.y);
    surface.stroke();
}
