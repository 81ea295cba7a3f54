//! Glyph preparation on top of a font library.
//!
//! The engine loads glyphs through a [`FontLibrary`] (FreeType by default)
//! and turns them into one of three compact representations that can be
//! cached and drawn later:
//!
//! * binary scanlines, from the library's 1-bit bitmaps or by rasterizing
//!   the outline,
//! * anti-aliased scanlines, from 8-bit bitmaps or by rasterizing the
//!   outline,
//! * integer paths, by decomposing the outline.
//!
//! See [`FontEngine`] for the entry point and [`GlyphCacheManager`] for
//! caching the results.

#![deny(rustdoc::broken_intra_doc_links)]

pub mod data;
pub mod engine;
pub mod error;
#[cfg(feature = "freetype")]
pub mod ft;
pub mod library;
pub mod outline;
pub mod path;
pub mod raster;
pub mod scanline;

#[cfg(test)]
mod testing;

pub use data::FontData;
pub use engine::{
    CachedGlyph, FaceSettings, FaceSignature, FontEngine, GlyphAdaptor, GlyphCacheManager,
    GlyphDataType, GlyphMetrics, GlyphRendering, LoadedFace, PreparedGlyph,
};
pub use library::{FontFace, FontLibrary, GlyphSlot};
pub use path::CoordWidth;

/// Font engine backed by FreeType.
#[cfg(feature = "freetype")]
pub type FtFontEngine = FontEngine<ft::FtLibrary>;

pub use glyph_types::{BoundingBox, F26Dot6, GlyphId, Point};
