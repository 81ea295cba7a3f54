//! FreeType backend.

use ::freetype::{
    face::{KerningMode, LoadFlag},
    ffi::FT_ULong,
    Face, Library, RenderMode,
};

use crate::{
    data::FontData,
    error::LibraryError,
    library::{BitmapMode, CharSize, FaceMetrics, FontFace, FontLibrary, GlyphSlot, RenderedBitmap},
    outline::{Outline, OutlineBuf, PointTag},
    scanline::Bitmap,
    F26Dot6, GlyphId, Point,
};

/// A FreeType library instance.
pub struct FtLibrary {
    library: Library,
}

impl FontLibrary for FtLibrary {
    type Face = FtFace;

    fn init() -> Result<Self, LibraryError> {
        let library = Library::init().map_err(|e| LibraryError::Init(e.to_string()))?;
        Ok(Self { library })
    }

    fn new_memory_face(&self, data: FontData, face_index: usize) -> Result<FtFace, LibraryError> {
        let face = self
            .library
            .new_memory_face2(data, face_index as isize)
            .map_err(|e| LibraryError::InvalidFace(e.to_string()))?;
        Ok(FtFace {
            face,
            glyph: GlyphId::NOTDEF,
            outline: OutlineBuf::new(),
            has_outline: false,
        })
    }
}

/// A FreeType face together with a copy of the loaded glyph's outline.
pub struct FtFace {
    face: Face<FontData>,
    glyph: GlyphId,
    outline: OutlineBuf,
    has_outline: bool,
}

fn to_point(v: ::freetype::Vector) -> Point<F26Dot6> {
    Point::new(
        F26Dot6::from_bits(v.x as i32),
        F26Dot6::from_bits(v.y as i32),
    )
}

impl FontFace for FtFace {
    fn char_index(&mut self, code: u32) -> GlyphId {
        let index =
            unsafe { ::freetype::ffi::FT_Get_Char_Index(self.face.raw_mut(), code as FT_ULong) };
        GlyphId::new(index as u32)
    }

    fn set_char_size(&mut self, size: CharSize) -> Result<(), LibraryError> {
        let result = if size.resolution != 0 {
            self.face.set_char_size(
                size.width.to_bits() as isize,
                size.height.to_bits() as isize,
                size.resolution,
                size.resolution,
            )
        } else {
            self.face.set_pixel_sizes(
                (size.width.to_bits() >> 6).max(0) as u32,
                (size.height.to_bits() >> 6).max(0) as u32,
            )
        };
        result.map_err(|e| LibraryError::CharSize(e.to_string()))
    }

    fn load_glyph(
        &mut self,
        glyph: GlyphId,
        hinting: bool,
    ) -> Result<&mut dyn GlyphSlot, LibraryError> {
        let flags = if hinting {
            LoadFlag::DEFAULT
        } else {
            LoadFlag::NO_HINTING
        };
        self.glyph = glyph;
        self.outline.clear();
        self.has_outline = false;
        self.face
            .load_glyph(glyph.to_u32(), flags)
            .map_err(|e| LibraryError::GlyphLoad {
                glyph,
                reason: e.to_string(),
            })?;
        if let Some(outline) = self.face.glyph().outline() {
            let buf = &mut self.outline;
            buf.points
                .extend(outline.points().iter().map(|&p| to_point(p)));
            buf.tags
                .extend(outline.tags().iter().map(|&tag| PointTag::from_bits(tag as u8)));
            // negative end points become huge and are rejected as out of order
            buf.contours
                .extend(outline.contours().iter().map(|&end| end as u16 as usize));
            self.has_outline = true;
        }
        Ok(self)
    }

    fn has_kerning(&self) -> bool {
        self.face.has_kerning()
    }

    fn kerning(&mut self, left: GlyphId, right: GlyphId) -> Result<Point<F26Dot6>, LibraryError> {
        self.face
            .get_kerning(left.to_u32(), right.to_u32(), KerningMode::KerningDefault)
            .map(to_point)
            .map_err(|e| LibraryError::Kerning(e.to_string()))
    }

    fn family_name(&self) -> Option<String> {
        self.face.family_name()
    }

    fn style_name(&self) -> Option<String> {
        self.face.style_name()
    }

    fn metrics(&self) -> FaceMetrics {
        let raw = self.face.raw();
        FaceMetrics {
            units_per_em: raw.units_per_EM as u16,
            ascender: raw.ascender as i16,
            descender: raw.descender as i16,
            height: raw.height as i16,
            num_glyphs: raw.num_glyphs as u32,
        }
    }
}

impl GlyphSlot for FtFace {
    fn glyph_id(&self) -> GlyphId {
        self.glyph
    }

    fn advance(&self) -> Point<F26Dot6> {
        to_point(self.face.glyph().advance())
    }

    fn outline(&self) -> Option<Outline<'_>> {
        self.has_outline.then(|| self.outline.as_outline())
    }

    fn render(&mut self, mode: BitmapMode) -> Result<RenderedBitmap<'_>, LibraryError> {
        let render_mode = match mode {
            BitmapMode::Mono => RenderMode::Mono,
            BitmapMode::Gray8 => RenderMode::Normal,
        };
        let slot = self.face.glyph();
        slot.render_glyph(render_mode)
            .map_err(|e| LibraryError::Render {
                glyph: self.glyph,
                reason: e.to_string(),
            })?;
        let raw = &slot.raw().bitmap;
        let len = raw.rows as usize * raw.pitch.unsigned_abs() as usize;
        let buffer = if raw.buffer.is_null() || len == 0 {
            &[][..]
        } else {
            // Safety: FreeType owns a buffer of rows * |pitch| bytes that
            // lives until the next glyph is loaded into this slot.
            unsafe { std::slice::from_raw_parts(raw.buffer as *const u8, len) }
        };
        Ok(RenderedBitmap {
            bitmap: Bitmap::new(raw.width as u32, raw.rows as u32, raw.pitch as i32, buffer),
            left: slot.bitmap_left(),
            top: slot.bitmap_top(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use kurbo::Vec2;
    use pretty_assertions::assert_eq;

    use crate::{
        error::{EngineError, LibraryError},
        BoundingBox, CoordWidth, FtFontEngine, GlyphDataType, GlyphId, GlyphRendering,
    };

    // 2048 units per em: at 32 pixels one font unit is one 26.6 unit
    static GLYPH_TEST: &[u8] = include_bytes!("../test-data/GlyphTest-Bold.ttf");

    fn engine() -> FtFontEngine {
        FtFontEngine::new(CoordWidth::Int32)
    }

    #[test]
    fn names_and_metrics() {
        let engine = engine();
        assert!(engine.is_initialized());
        let mut face = engine.load_face(GLYPH_TEST).unwrap();
        assert_eq!(face.face_name(), "Glyph Test Bold");
        assert_eq!(face.num_glyphs(), 4);
        face.set_height(32.0);
        assert_eq!(face.ascender(), 25.0);
        assert_eq!(face.descender(), -6.25);
        assert_eq!(face.line_height(), 31.25);
        assert_eq!(face.glyph_index('A' as u32), GlyphId::new(1));
        assert_eq!(face.glyph_index(' ' as u32), GlyphId::new(3));
        assert_eq!(face.glyph_index('?' as u32), GlyphId::NOTDEF);
    }

    #[test]
    fn square_in_every_mode() {
        let engine = engine();
        let mut face = engine.load_face(GLYPH_TEST).unwrap();
        face.set_height(32.0).set_hinting(false);
        for (mode, data_type, data_size) in [
            // header + 8 rows of (row header + span header + 8 covers)
            (GlyphRendering::NativeGray8, GlyphDataType::Gray8, 16 + 8 * 28),
            (GlyphRendering::AggGray8, GlyphDataType::Gray8, 16 + 8 * 28),
            // header + 8 rows of (row header + span)
            (GlyphRendering::NativeMono, GlyphDataType::Mono, 16 + 8 * 16),
            (GlyphRendering::AggMono, GlyphDataType::Mono, 16 + 8 * 16),
            (GlyphRendering::Outline, GlyphDataType::Outline, 4 * 8),
        ] {
            face.set_rendering(mode);
            let glyph = face.prepare_glyph('A' as u32).unwrap();
            assert_eq!(glyph.glyph_index, GlyphId::new(1), "{mode:?}");
            assert_eq!(glyph.data_type, data_type, "{mode:?}");
            assert_eq!(glyph.data_size, data_size, "{mode:?}");
            assert_eq!(glyph.bounds, BoundingBox::new(1, 0, 9, 8), "{mode:?}");
            assert_eq!(glyph.advance(), Vec2::new(10.0, 0.0), "{mode:?}");
            assert_eq!(glyph.to_vec().len(), data_size, "{mode:?}");
        }
    }

    #[test]
    fn hinted_square_is_unchanged() {
        let engine = engine();
        let mut face = engine.load_face(GLYPH_TEST).unwrap();
        face.set_height(32.0).set_rendering(GlyphRendering::AggGray8);
        let glyph = face.prepare_glyph('A' as u32).unwrap().into_metrics();
        assert_eq!(glyph.bounds, BoundingBox::new(1, 0, 9, 8));
        assert_eq!(glyph.advance(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn points_at_72_dpi_match_pixels() {
        let engine = engine();
        let mut face = engine.load_face(GLYPH_TEST).unwrap();
        face.set_rendering(GlyphRendering::AggMono)
            .set_hinting(false)
            .set_height(32.0)
            .set_resolution(72);
        let glyph = face.prepare_glyph('A' as u32).unwrap().into_metrics();
        assert_eq!(glyph.bounds, BoundingBox::new(1, 0, 9, 8));
        face.set_resolution(144);
        let glyph = face.prepare_glyph('A' as u32).unwrap().into_metrics();
        assert_eq!(glyph.bounds, BoundingBox::new(2, 0, 18, 16));
    }

    #[test]
    fn conic_outline_is_rasterized() {
        let engine = engine();
        let mut face = engine.load_face(GLYPH_TEST).unwrap();
        face.set_height(32.0)
            .set_hinting(false)
            .set_rendering(GlyphRendering::AggGray8);
        // the arch peaks halfway to its control point
        let glyph = face.prepare_glyph('B' as u32).unwrap().into_metrics();
        assert_eq!(glyph.bounds, BoundingBox::new(0, 0, 8, 6));
        assert_eq!(glyph.advance(), Vec2::new(9.0, 0.0));
        face.set_flip_y(true);
        let glyph = face.prepare_glyph('B' as u32).unwrap().into_metrics();
        assert_eq!(glyph.bounds, BoundingBox::new(0, -6, 8, 0));
    }

    #[test]
    fn empty_glyphs() {
        let engine = engine();
        let mut face = engine.load_face(GLYPH_TEST).unwrap();
        face.set_height(32.0);
        for mode in [GlyphRendering::AggGray8, GlyphRendering::NativeGray8] {
            face.set_rendering(mode);
            let glyph = face.prepare_glyph(' ' as u32).unwrap().into_metrics();
            assert_eq!(glyph.data_size, 16, "{mode:?}");
            assert_eq!(glyph.advance(), Vec2::new(4.0, 0.0), "{mode:?}");
            // unmapped codes fall back to .notdef
            let glyph = face.prepare_glyph('?' as u32).unwrap().into_metrics();
            assert_eq!(glyph.glyph_index, GlyphId::NOTDEF, "{mode:?}");
            assert_eq!(glyph.advance(), Vec2::new(8.0, 0.0), "{mode:?}");
        }
    }

    #[test]
    fn kerning_pairs() {
        let engine = engine();
        let mut face = engine.load_face(GLYPH_TEST).unwrap();
        face.set_height(32.0);
        // the size is applied with the first prepared glyph
        face.prepare_glyph('A' as u32).unwrap();
        let (a, b) = (GlyphId::new(1), GlyphId::new(2));
        assert_eq!(face.kerning(a, b), Some(Vec2::new(-1.0, 0.0)));
        assert_eq!(face.kerning(b, a), Some(Vec2::ZERO));
        assert_eq!(face.kerning(GlyphId::NOTDEF, b), None);
        face.set_rendering(GlyphRendering::Outline)
            .set_transform(kurbo::Affine::scale(2.0));
        assert_eq!(face.kerning(a, b), Some(Vec2::new(-2.0, 0.0)));
    }

    #[test]
    fn load_from_file() {
        let engine = engine();
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data/GlyphTest-Bold.ttf");
        let face = engine.load_face_file(&path, 0).unwrap();
        assert_eq!(face.face_name(), "Glyph Test Bold");
        assert!(matches!(
            engine.load_face_file(&path, 3),
            Err(EngineError::Library(LibraryError::InvalidFace(_)))
        ));
    }

    #[test]
    fn invalid_data() {
        let engine = engine();
        assert!(matches!(
            engine.load_face(b"not a font"),
            Err(EngineError::Library(LibraryError::InvalidFace(_)))
        ));
    }
}
