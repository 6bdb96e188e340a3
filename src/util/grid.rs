//! Guide overlay: background grid, dashed baseline and signing border.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use serde::{Deserialize, Serialize};

use crate::surface::{Surface, SurfaceError};

const GRID_LINE_WIDTH: f64 = 0.5;
const BASELINE_ALPHA: f64 = 0.8;
const BASELINE_DASH: [f64; 2] = [5.0, 5.0];
const BORDER_WIDTH: f64 = 2.0;
const BORDER_INSET: f64 = 10.0;

/// Which guides to paint and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridOptions {
    pub show_grid: bool,
    /// Spacing between grid lines in CSS pixels.
    pub grid_size: f64,
    pub grid_color: String,
    pub grid_opacity: f64,
    pub show_baseline: bool,
    /// Baseline height as a fraction of the surface height.
    pub baseline_position: f64,
    pub baseline_color: String,
    pub show_border: bool,
    pub border_color: String,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            show_grid: true,
            grid_size: 20.0,
            grid_color: "#e0e0e0".to_owned(),
            grid_opacity: 0.5,
            show_baseline: true,
            baseline_position: 0.5,
            baseline_color: "#409eff".to_owned(),
            show_border: true,
            border_color: "#409eff".to_owned(),
        }
    }
}

/// Paint the enabled guides over a `width` x `height` area.
///
/// Surface state (alpha, dash, colors) is restored afterwards.
///
/// # Errors
///
/// Returns `Err` if the surface rejects the baseline dash pattern.
pub fn draw_grid<S: Surface>(surface: &mut S, width: f64, height: f64, options: &GridOptions) -> Result<(), SurfaceError> {
    surface.save();
    let result = draw_guides(surface, width, height, options);
    surface.restore();
    result
}

fn draw_guides<S: Surface>(surface: &mut S, width: f64, height: f64, options: &GridOptions) -> Result<(), SurfaceError> {
    if options.show_grid && options.grid_size > 0.0 {
        surface.set_stroke_color(&options.grid_color);
        surface.set_global_alpha(options.grid_opacity);
        surface.set_line_width(GRID_LINE_WIDTH);

        let mut x = 0.0;
        while x <= width {
            line(surface, x, 0.0, x, height);
            x += options.grid_size;
        }
        let mut y = 0.0;
        while y <= height {
            line(surface, 0.0, y, width, y);
            y += options.grid_size;
        }
    }

    if options.show_baseline {
        let y = height * options.baseline_position;
        surface.set_stroke_color(&options.baseline_color);
        surface.set_global_alpha(BASELINE_ALPHA);
        surface.set_line_width(1.0);
        surface.set_line_dash(&BASELINE_DASH)?;
        line(surface, 0.0, y, width, y);
        surface.set_line_dash(&[])?;
    }

    if options.show_border {
        surface.set_stroke_color(&options.border_color);
        surface.set_global_alpha(1.0);
        surface.set_line_width(BORDER_WIDTH);
        surface.stroke_rect(BORDER_INSET, BORDER_INSET, width - 2.0 * BORDER_INSET, height - 2.0 * BORDER_INSET);
    }

    Ok(())
}

fn line<S: Surface>(surface: &mut S, x1: f64, y1: f64, x2: f64, y2: f64) {
    surface.begin_path();
    surface.move_to(x1, y1);
    surface.line_to(x2, y2);
    surface.stroke();
}
