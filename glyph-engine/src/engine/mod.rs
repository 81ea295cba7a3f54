//! Font engine, loaded faces and glyph preparation.
//!
//! A [`FontEngine`] owns a font library instance and the scratch buffers
//! glyphs are built in. Faces loaded from it share those buffers, so only
//! one [`PreparedGlyph`] can exist per engine at a time; it has to be
//! written out or dropped before the next glyph is prepared.
//!
//! ```ignore
//! let engine = FontEngine::<FtLibrary>::new(CoordWidth::Int32);
//! let mut face = engine.load_face_file("Roboto-Regular.ttf".as_ref(), 0)?;
//! face.set_rendering(GlyphRendering::AggGray8).set_height(24.0);
//! let glyph = face.prepare_glyph('g' as u32)?;
//! let data = glyph.to_vec();
//! ```

mod builder;
mod cache;
mod face;
mod glyph;
mod rendering;

pub use cache::{CachedGlyph, GlyphAdaptor, GlyphCacheManager, DEFAULT_MAX_FONTS};
pub use face::{FaceSettings, FaceSignature, LoadedFace};
pub use glyph::PreparedGlyph;
pub use rendering::GlyphRendering;

use std::{cell::RefCell, path::Path};

use kurbo::Vec2;

use crate::{
    data::FontData,
    error::{EngineError, LibraryError},
    library::FontLibrary,
    path::CoordWidth,
    raster::Gamma,
    BoundingBox, GlyphId,
};
use builder::GlyphBuilder;

/// Kind of data a prepared glyph serializes to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug)]
pub enum GlyphDataType {
    #[default]
    Invalid,
    /// Binary scanlines.
    Mono,
    /// Anti-aliased scanlines.
    Gray8,
    /// Integer path.
    Outline,
}

/// Description of a prepared glyph.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct GlyphMetrics {
    pub glyph_index: GlyphId,
    /// The character code the glyph was prepared for.
    pub glyph_code: u32,
    pub data_type: GlyphDataType,
    /// Size in bytes of the serialized glyph data.
    pub data_size: usize,
    /// End-exclusive bounds in pixels.
    pub bounds: BoundingBox<i32>,
    pub advance_x: f64,
    pub advance_y: f64,
}

impl GlyphMetrics {
    pub fn advance(&self) -> Vec2 {
        Vec2::new(self.advance_x, self.advance_y)
    }
}

/// Font library instance with the buffers glyphs are built in.
pub struct FontEngine<L> {
    library: Option<L>,
    last_error: Option<LibraryError>,
    coord_width: CoordWidth,
    builder: RefCell<GlyphBuilder>,
}

impl<L: FontLibrary> FontEngine<L> {
    /// Initializes the font library.
    ///
    /// Failure does not prevent construction; it is reported by
    /// [`last_error`](Self::last_error) and every face load fails.
    pub fn new(coord_width: CoordWidth) -> Self {
        match L::init() {
            Ok(library) => Self::with_library(library, coord_width),
            Err(e) => {
                log::debug!("font library initialization failed: {e}");
                Self {
                    library: None,
                    last_error: Some(e),
                    coord_width,
                    builder: RefCell::new(GlyphBuilder::new(coord_width)),
                }
            }
        }
    }

    /// Creates an engine for an initialized library.
    pub fn with_library(library: L, coord_width: CoordWidth) -> Self {
        Self {
            library: Some(library),
            last_error: None,
            coord_width,
            builder: RefCell::new(GlyphBuilder::new(coord_width)),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.library.is_some()
    }

    /// The initialization error, if any.
    pub fn last_error(&self) -> Option<&LibraryError> {
        self.last_error.as_ref()
    }

    pub fn coord_width(&self) -> CoordWidth {
        self.coord_width
    }

    /// Sets the gamma applied to anti-aliased coverage.
    pub fn set_gamma(&mut self, gamma: Gamma) -> &mut Self {
        self.builder.get_mut().set_gamma(&gamma);
        self
    }

    /// Sets the curve approximation scale used when rasterizing outlines.
    pub fn set_approximation_scale(&mut self, scale: f64) -> &mut Self {
        self.builder.get_mut().set_approximation_scale(scale);
        self
    }

    pub fn approximation_scale(&self) -> f64 {
        self.builder
            .try_borrow()
            .map(|builder| builder.curves.scale())
            .unwrap_or(crate::raster::DEFAULT_APPROXIMATION_SCALE)
    }

    fn library(&self) -> Result<&L, EngineError> {
        self.library.as_ref().ok_or(EngineError::NotInitialized)
    }

    /// Loads the first face of the font in `bytes`.
    pub fn load_face(&self, bytes: &[u8]) -> Result<LoadedFace<'_, L>, EngineError> {
        self.load_face_data(FontData::new(bytes), 0)
    }

    /// Loads face `face_index` of the font in `data`.
    pub fn load_face_data(
        &self,
        data: FontData,
        face_index: usize,
    ) -> Result<LoadedFace<'_, L>, EngineError> {
        let face = self
            .library()?
            .new_memory_face(data, face_index)
            .inspect_err(|e| log::debug!("unable to load face {face_index}: {e}"))?;
        Ok(LoadedFace::new(self, face))
    }

    /// Loads face `face_index` of the font file at `path`.
    pub fn load_face_file(
        &self,
        path: &Path,
        face_index: usize,
    ) -> Result<LoadedFace<'_, L>, EngineError> {
        let face = self
            .library()?
            .new_file_face(path, face_index)
            .inspect_err(|e| log::debug!("unable to load face {face_index} of {path:?}: {e}"))?;
        Ok(LoadedFace::new(self, face))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingLibrary, FakeFace, FakeLibrary};
    use pretty_assertions::assert_eq;

    #[test]
    fn failed_init() {
        let engine = FontEngine::<FailingLibrary>::new(CoordWidth::Int32);
        assert!(!engine.is_initialized());
        assert_eq!(
            engine.last_error(),
            Some(&LibraryError::Init("out of memory".into()))
        );
        assert!(matches!(
            engine.load_face(b"font"),
            Err(EngineError::NotInitialized)
        ));
        assert!(matches!(
            engine.load_face_file(Path::new("font.ttf"), 0),
            Err(EngineError::NotInitialized)
        ));
    }

    #[test]
    fn load_faces() {
        let library = FakeLibrary::default().with_face(b"font", FakeFace::test_sans());
        let engine = FontEngine::with_library(library, CoordWidth::Int16);
        assert!(engine.is_initialized());
        assert_eq!(engine.last_error(), None);
        assert_eq!(engine.coord_width(), CoordWidth::Int16);
        assert!(engine.load_face(b"font").is_ok());
        assert!(matches!(
            engine.load_face(b"garbage"),
            Err(EngineError::Library(LibraryError::InvalidFace(_)))
        ));
        assert!(matches!(
            engine.load_face_data(FontData::new(&b"font"[..]), 1),
            Err(EngineError::Library(LibraryError::InvalidFace(_)))
        ));
        assert!(matches!(
            engine.load_face_file(Path::new("/no/such/font.ttf"), 0),
            Err(EngineError::Library(LibraryError::Io { .. }))
        ));
    }

    #[test]
    fn default_init() {
        let engine = FontEngine::<FakeLibrary>::new(CoordWidth::Int32);
        assert!(engine.is_initialized());
    }

    #[test]
    fn approximation_scale() {
        let mut engine = FontEngine::<FakeLibrary>::new(CoordWidth::Int32);
        assert_eq!(engine.approximation_scale(), 4.0);
        engine.set_approximation_scale(8.0).set_gamma(Gamma::Power(1.2));
        assert_eq!(engine.approximation_scale(), 8.0);
    }
}
