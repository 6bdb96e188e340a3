//! Engine error type.

use crate::surface::SurfaceError;

/// Errors returned by [`crate::engine::SignaturePad`] operations.
#[derive(Debug, thiserror::Error)]
pub enum PadError {
    /// The pad was destroyed; no further calls are accepted.
    #[error("signature pad has been destroyed")]
    Destroyed,
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    /// A signature document could not be parsed or serialized.
    #[error("invalid signature json: {0}")]
    Json(#[from] serde_json::Error),
}
