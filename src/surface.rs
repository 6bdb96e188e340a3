//! The 2D raster target the engine paints on.
//!
//! [`Surface`] mirrors the subset of the HTML canvas 2D API the pad needs. Every
//! rendering routine takes the surface as an explicit `&mut` argument; nothing
//! holds on to a shared drawing context. The browser implementation lives in
//! [`crate::web`]; tests use a recording implementation.
//!
//! Calls that can fail in the browser return `Result<(), SurfaceError>`; state
//! setters are infallible.

use image::RgbaImage;

/// Shape drawn at the ends of open lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

impl LineCap {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

/// Shape drawn where two line segments meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Round,
    Miter,
    Bevel,
}

impl LineJoin {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Round => "round",
            Self::Miter => "miter",
            Self::Bevel => "bevel",
        }
    }
}

/// Position and size of the surface in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Error returned by fallible [`Surface`] calls.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// No 2D context could be obtained from the surface handle.
    #[error("2D rendering context is unavailable")]
    ContextUnavailable,
    /// A drawing call was rejected by the underlying surface.
    #[error("surface call `{op}` failed: {message}")]
    Call { op: &'static str, message: String },
    /// A pixel buffer did not match the declared dimensions.
    #[error("pixel buffer of {len} bytes does not match {width}x{height}")]
    PixelBuffer { width: u32, height: u32, len: usize },
    /// The surface cannot perform this operation.
    #[error("surface does not support `{0}`")]
    Unsupported(&'static str),
}

/// A mutable 2D raster target.
pub trait Surface {
    /// Decoded image handle accepted by [`Surface::draw_image`].
    type Image;

    /// Logical (CSS pixel) width and height.
    fn size(&self) -> (f64, f64);

    /// Viewport rectangle, used to translate absolute pointer coordinates.
    fn bounding_rect(&self) -> SurfaceRect;

    fn save(&mut self);
    fn restore(&mut self);

    fn set_stroke_color(&mut self, color: &str);
    fn set_fill_color(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_shadow(&mut self, blur: f64, color: &str);
    fn set_font(&mut self, font: &str);

    /// # Errors
    ///
    /// Returns `Err` if the dash pattern is rejected.
    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), SurfaceError>;

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);

    /// # Errors
    ///
    /// Returns `Err` for a negative radius.
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), SurfaceError>;

    fn fill(&mut self);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// # Errors
    ///
    /// Returns `Err` if the text cannot be drawn.
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), SurfaceError>;

    /// Rendered width of `text` in the current font.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the text cannot be measured.
    fn measure_text(&self, text: &str) -> Result<f64, SurfaceError>;

    /// # Errors
    ///
    /// Returns `Err` if the image is not drawable (e.g. still decoding).
    fn draw_image(&mut self, image: &Self::Image, x: f64, y: f64, width: f64, height: f64) -> Result<(), SurfaceError>;

    /// Natural width and height of a decoded image.
    fn image_size(&self, image: &Self::Image) -> (f64, f64);

    /// Copy the full backing pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the pixels cannot be read (e.g. a tainted canvas).
    fn pixels(&self) -> Result<RgbaImage, SurfaceError>;

    /// Overwrite the backing pixel buffer starting at the origin.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the buffer cannot be written.
    fn put_pixels(&mut self, pixels: &RgbaImage) -> Result<(), SurfaceError>;

    /// Encode the current contents with the surface's own encoder.
    ///
    /// # Errors
    ///
    /// Returns `Err` if encoding fails.
    fn to_data_url(&self, mime: &str, quality: f64) -> Result<String, SurfaceError>;
}
