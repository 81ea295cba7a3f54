//! Interface to the font library that loads and renders glyphs.
//!
//! The engine only needs a small part of a font library: character to
//! glyph mapping, glyph loading at a character size, outline and bitmap
//! access for the loaded glyph, kerning and names. These are described by
//! the [`FontLibrary`], [`FontFace`] and [`GlyphSlot`] traits. FreeType
//! implements them behind the `freetype` feature.

use std::path::Path;

use crate::{
    data::FontData, error::LibraryError, outline::Outline, scanline::Bitmap, F26Dot6, GlyphId,
    Point,
};

/// A font library instance.
pub trait FontLibrary: Sized {
    type Face: FontFace;

    /// Initializes the library.
    fn init() -> Result<Self, LibraryError>;

    /// Opens face `face_index` of the font in `data`.
    fn new_memory_face(&self, data: FontData, face_index: usize)
        -> Result<Self::Face, LibraryError>;

    /// Opens face `face_index` of the font file at `path`.
    fn new_file_face(&self, path: &Path, face_index: usize) -> Result<Self::Face, LibraryError> {
        self.new_memory_face(FontData::map_file(path)?, face_index)
    }
}

/// Requested character size.
///
/// Width and height are in 26.6 points, or pixels when `resolution` is 0.
/// A width of 0 means the same as the height.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct CharSize {
    pub width: F26Dot6,
    pub height: F26Dot6,
    pub resolution: u32,
}

/// Design unit metrics of a face.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct FaceMetrics {
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    pub height: i16,
    pub num_glyphs: u32,
}

/// Bitmap format produced by [`GlyphSlot::render`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BitmapMode {
    /// One bit per pixel, most significant bit first.
    Mono,
    /// One coverage byte per pixel.
    Gray8,
}

/// Rendered glyph bitmap with its position relative to the pen.
///
/// `top` is the distance from the baseline up to the top row.
#[derive(Copy, Clone, Debug)]
pub struct RenderedBitmap<'a> {
    pub bitmap: Bitmap<'a>,
    pub left: i32,
    pub top: i32,
}

/// A face opened by a [`FontLibrary`].
pub trait FontFace {
    /// Maps a character code to a glyph. Unmapped codes give
    /// [`GlyphId::NOTDEF`].
    fn char_index(&mut self, code: u32) -> GlyphId;

    fn set_char_size(&mut self, size: CharSize) -> Result<(), LibraryError>;

    /// Loads a glyph into the face's glyph slot.
    fn load_glyph(&mut self, glyph: GlyphId, hinting: bool)
        -> Result<&mut dyn GlyphSlot, LibraryError>;

    fn has_kerning(&self) -> bool;

    /// Returns the kerning between two glyphs in 26.6 pixels.
    fn kerning(&mut self, left: GlyphId, right: GlyphId) -> Result<Point<F26Dot6>, LibraryError>;

    fn family_name(&self) -> Option<String>;

    fn style_name(&self) -> Option<String>;

    fn metrics(&self) -> FaceMetrics;
}

/// The most recently loaded glyph of a face.
pub trait GlyphSlot {
    fn glyph_id(&self) -> GlyphId;

    /// Advance in 26.6 pixels.
    fn advance(&self) -> Point<F26Dot6>;

    /// The scaled outline, if the glyph has one.
    fn outline(&self) -> Option<Outline<'_>>;

    /// Renders the glyph to a bitmap.
    fn render(&mut self, mode: BitmapMode) -> Result<RenderedBitmap<'_>, LibraryError>;
}
