//! Freehand signature capture and rendering engine.
//!
//! This crate is compiled to WebAssembly and runs in the browser, but the
//! whole pointer-to-stroke pipeline is written against the [`surface::Surface`]
//! trait so it can be driven (and tested) without a DOM. The engine owns the
//! lifecycle of a drawing: translating raw pointer events into filtered,
//! velocity-annotated points, smoothing finished strokes, keeping undo/redo
//! history, and painting everything with the selected brush. The host layer
//! is responsible only for wiring DOM events to the engine and acting on the
//! returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::SignaturePad`] orchestrator |
//! | [`stroke`] | Points, strokes and the `SignatureData` export unit |
//! | [`capture`] | Pointer input, point filtering and the drawing state machine |
//! | [`smoothing`] | Spline smoothing and stroke-width math |
//! | [`history`] | Bounded undo/redo snapshot stacks |
//! | [`brush`] | Brush styles and their segment painters |
//! | [`render`] | Stroke renderer and the full scene pass |
//! | [`export`] | SVG / raster re-rendering and export payloads |
//! | [`config`] | Pad configuration and live config patches |
//! | [`surface`] | The 2D raster target abstraction |
//! | [`error`] | Engine error type |
//! | [`util`] | Grid, replay, filters, storage, crop/scale/compress, validation |
//! | [`web`] | Browser bindings (`web` feature) |
//! | [`consts`] | Shared defaults and numeric constants |

pub mod brush;
pub mod capture;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod export;
pub mod history;
pub mod render;
pub mod smoothing;
pub mod stroke;
pub mod surface;
pub mod util;
#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
#[path = "recording_test.rs"]
pub(crate) mod recording;
