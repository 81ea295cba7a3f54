//! Error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::GlyphId;

/// Errors that can occur when converting an outline to a path.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecomposeError {
    /// Contour end point at this index was out of order or out of bounds.
    #[error("contour end point for contour {0} is out of order or out of bounds")]
    ContourOrder(usize),
    /// Expected number of points to == number of tags.
    #[error("number of points ({num_points}) and tags ({num_tags}) must match")]
    PointTagMismatch { num_points: usize, num_tags: usize },
    /// The contour starting at this point index begins with a cubic control point.
    #[error("contour starting at point {0} begins with a cubic control point")]
    CubicStart(usize),
    /// Expected a second cubic control point at this index.
    #[error("expected a cubic control point at index {0}")]
    ExpectedCubic(usize),
    /// Expected a conic control point or an on-curve point at this index.
    #[error("expected a conic control or on-curve point at index {0}")]
    ExpectedConicOrOnCurve(usize),
}

/// Errors reported by a font library backend.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LibraryError {
    /// The library could not be initialized.
    #[error("font library initialization failed: {0}")]
    Init(String),
    /// The font data could not be opened as a face.
    #[error("invalid or unsupported font data: {0}")]
    InvalidFace(String),
    /// The font file could not be read.
    #[error("unable to read font file {path:?}: {reason}")]
    Io { path: PathBuf, reason: String },
    /// Setting the character size failed.
    #[error("unable to set character size: {0}")]
    CharSize(String),
    /// The glyph could not be loaded.
    #[error("unable to load glyph {glyph}: {reason}")]
    GlyphLoad { glyph: GlyphId, reason: String },
    /// The glyph could not be rendered to a bitmap.
    #[error("unable to render glyph {glyph}: {reason}")]
    Render { glyph: GlyphId, reason: String },
    /// The kerning table lookup failed.
    #[error("kerning lookup failed: {0}")]
    Kerning(String),
}

/// Errors that can occur when loading a face.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The font library failed to initialize when the engine was created.
    #[error("font engine is not initialized")]
    NotInitialized,
    /// The font library rejected the request.
    #[error(transparent)]
    Library(#[from] LibraryError),
}

/// Errors that can occur when preparing a glyph.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PrepareError {
    /// Another prepared glyph still holds the engine's glyph builder.
    #[error("another glyph is still in flight on this engine")]
    GlyphInFlight,
    /// The glyph slot carries no outline for a vector based mode.
    #[error("glyph {0} has no outline")]
    MissingOutline(GlyphId),
    /// Font library failure.
    #[error(transparent)]
    Library(#[from] LibraryError),
    /// The outline was malformed.
    #[error(transparent)]
    Decompose(#[from] DecomposeError),
    /// Rasterizing the outline needed more cells than the rasterizer holds.
    #[error("glyph {0} exceeds the rasterizer cell limit")]
    TooManyCells(GlyphId),
}

/// Errors that can occur when serializing a prepared glyph.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WriteError {
    /// The output buffer cannot hold the serialized glyph.
    #[error("buffer of {actual} bytes is too small, {required} bytes required")]
    BufferTooSmall { required: usize, actual: usize },
}
