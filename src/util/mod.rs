//! Auxiliary helpers layered on top of the engine.
//!
//! None of these are required to capture a signature. They cover the
//! surrounding workflow: guide overlays while drawing, animated replay,
//! pixel post-processing on exported rasters, persistence, and simple
//! signature comparison.

pub mod clock;
pub mod color;
pub mod compressor;
pub mod cropper;
pub mod filters;
pub mod grid;
pub mod replay;
pub mod scaler;
pub mod storage;
pub mod validator;
