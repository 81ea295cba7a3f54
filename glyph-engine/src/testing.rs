//! In-memory font library for tests.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use crate::{
    data::FontData,
    error::LibraryError,
    library::{
        BitmapMode, CharSize, FaceMetrics, FontFace, FontLibrary, GlyphSlot, RenderedBitmap,
    },
    outline::{Outline, OutlineBuf, PointTag},
    scanline::Bitmap,
    F26Dot6, GlyphId, Point,
};

#[derive(Clone, Debug)]
struct FakeBitmap {
    width: u32,
    rows: u32,
    pitch: i32,
    buffer: Vec<u8>,
}

impl FakeBitmap {
    fn as_bitmap(&self) -> Bitmap<'_> {
        Bitmap::new(self.width, self.rows, self.pitch, &self.buffer)
    }
}

/// Glyph with a fixed outline, advance and bitmaps.
#[derive(Clone, Debug)]
pub struct FakeGlyph {
    id: GlyphId,
    advance: Point<F26Dot6>,
    outline: Option<OutlineBuf>,
    mono: Option<FakeBitmap>,
    gray: Option<FakeBitmap>,
    top: i32,
    render_fails: bool,
}

impl FakeGlyph {
    /// Glyph without pixels: an empty outline, empty bitmaps and an
    /// advance of `advance` pixels.
    pub fn empty(id: GlyphId, advance: i32) -> Self {
        Self {
            id,
            advance: Point::new(F26Dot6::from_i32(advance), F26Dot6::ZERO),
            outline: Some(OutlineBuf::new()),
            mono: None,
            gray: None,
            top: 0,
            render_fails: false,
        }
    }

    /// A `size` pixel square sitting on the baseline with an advance of
    /// `size + 1` and fully covered bitmaps.
    pub fn square(id: GlyphId, size: u32) -> Self {
        let units = size as i32 * 64;
        let pitch = size.div_ceil(8);
        let mono_row: Vec<u8> = (0..pitch)
            .map(|byte| {
                (0..8)
                    .filter(|bit| byte * 8 + bit < size)
                    .fold(0u8, |acc, bit| acc | (0x80 >> bit))
            })
            .collect();
        let glyph = Self::empty(id, size as i32 + 1)
            .with_outline(|buf| {
                buf.push_contour(
                    [(0, 0), (units, 0), (units, units), (0, units)]
                        .map(|(x, y)| (x, y, PointTag::OnCurve)),
                );
            })
            .with_mono(size, size, mono_row.repeat(size as usize))
            .with_gray(size, size, vec![255; (size * size) as usize]);
        Self {
            top: size as i32,
            ..glyph
        }
    }

    pub fn with_outline(mut self, f: impl FnOnce(&mut OutlineBuf)) -> Self {
        let mut buf = OutlineBuf::new();
        f(&mut buf);
        self.outline = Some(buf);
        self
    }

    pub fn without_outline(mut self) -> Self {
        self.outline = None;
        self
    }

    /// Sets a 1-bit bitmap with rows of `ceil(width / 8)` bytes.
    pub fn with_mono(mut self, width: u32, rows: u32, buffer: Vec<u8>) -> Self {
        self.mono = Some(FakeBitmap {
            width,
            rows,
            pitch: width.div_ceil(8) as i32,
            buffer,
        });
        self
    }

    /// Sets an 8-bit bitmap with rows of `width` bytes.
    pub fn with_gray(mut self, width: u32, rows: u32, buffer: Vec<u8>) -> Self {
        self.gray = Some(FakeBitmap {
            width,
            rows,
            pitch: width as i32,
            buffer,
        });
        self
    }

    pub fn with_failing_render(mut self) -> Self {
        self.render_fails = true;
        self
    }
}

impl GlyphSlot for FakeGlyph {
    fn glyph_id(&self) -> GlyphId {
        self.id
    }

    fn advance(&self) -> Point<F26Dot6> {
        self.advance
    }

    fn outline(&self) -> Option<Outline<'_>> {
        self.outline.as_ref().map(OutlineBuf::as_outline)
    }

    fn render(&mut self, mode: BitmapMode) -> Result<RenderedBitmap<'_>, LibraryError> {
        if self.render_fails {
            return Err(LibraryError::Render {
                glyph: self.id,
                reason: "render failed".into(),
            });
        }
        let bitmap = match mode {
            BitmapMode::Mono => self.mono.as_ref(),
            BitmapMode::Gray8 => self.gray.as_ref(),
        };
        Ok(RenderedBitmap {
            bitmap: bitmap.map(FakeBitmap::as_bitmap).unwrap_or_default(),
            left: 0,
            top: self.top,
        })
    }
}

/// Calls observed by a [`FakeFace`] and all of its clones.
#[derive(Default, Debug)]
pub struct FaceStats {
    pub loads: Cell<usize>,
    pub char_sizes: RefCell<Vec<CharSize>>,
}

/// Face with a character map, glyphs and kerning pairs.
#[derive(Clone, Debug)]
pub struct FakeFace {
    pub family: Option<String>,
    pub style: Option<String>,
    pub metrics: FaceMetrics,
    pub cmap: HashMap<u32, GlyphId>,
    pub glyphs: HashMap<GlyphId, FakeGlyph>,
    pub kerning: Option<HashMap<(GlyphId, GlyphId), Point<F26Dot6>>>,
    pub kerning_fails: bool,
    pub stats: Rc<FaceStats>,
    slot: FakeGlyph,
}

impl Default for FakeFace {
    fn default() -> Self {
        Self {
            family: None,
            style: None,
            metrics: FaceMetrics::default(),
            cmap: HashMap::new(),
            glyphs: HashMap::new(),
            kerning: None,
            kerning_fails: false,
            stats: Rc::default(),
            slot: FakeGlyph::empty(GlyphId::NOTDEF, 0),
        }
    }
}

pub const SQUARE_A: u32 = 'A' as u32;
pub const SQUARE_B: u32 = 'B' as u32;
pub const SPACE: u32 = ' ' as u32;
pub const MALFORMED: u32 = 'X' as u32;
pub const NO_RENDER: u32 = 'R' as u32;

impl FakeFace {
    /// "Test Sans Regular" with these glyphs:
    ///
    /// * 'A' (1): 2 pixel square
    /// * 'B' (2): 3 pixel square
    /// * ' ' (3): empty, advance 4
    /// * 'X' (4): outline starting with a cubic control point
    /// * 'R' (5): 2 pixel square that fails to render
    ///
    /// The pair (1, 2) kerns by (-1, 0) pixels.
    pub fn test_sans() -> Self {
        let glyphs = [
            (SQUARE_A, FakeGlyph::square(GlyphId::new(1), 2)),
            (SQUARE_B, FakeGlyph::square(GlyphId::new(2), 3)),
            (SPACE, FakeGlyph::empty(GlyphId::new(3), 4)),
            (
                MALFORMED,
                FakeGlyph::empty(GlyphId::new(4), 2).with_outline(|buf| {
                    buf.push_contour([
                        (0, 0, PointTag::Cubic),
                        (64, 0, PointTag::Cubic),
                        (64, 64, PointTag::OnCurve),
                    ]);
                }),
            ),
            (
                NO_RENDER,
                FakeGlyph::square(GlyphId::new(5), 2).with_failing_render(),
            ),
        ];
        let mut face = Self {
            family: Some("Test Sans".into()),
            style: Some("Regular".into()),
            metrics: FaceMetrics {
                units_per_em: 1000,
                ascender: 800,
                descender: -200,
                height: 1200,
                num_glyphs: 6,
            },
            kerning: Some(HashMap::from([(
                (GlyphId::new(1), GlyphId::new(2)),
                Point::new(F26Dot6::from_i32(-1), F26Dot6::ZERO),
            )])),
            ..Default::default()
        };
        for (code, glyph) in glyphs {
            face.cmap.insert(code, glyph.id);
            face.glyphs.insert(glyph.id, glyph);
        }
        face
    }

    pub fn with_names(mut self, family: Option<&str>, style: Option<&str>) -> Self {
        self.family = family.map(Into::into);
        self.style = style.map(Into::into);
        self
    }

    /// Drops the kerning table.
    pub fn without_kerning(mut self) -> Self {
        self.kerning = None;
        self
    }

    /// Keeps the kerning table but makes every lookup fail.
    pub fn with_failing_kerning(mut self) -> Self {
        self.kerning_fails = true;
        self
    }
}

impl FontFace for FakeFace {
    fn char_index(&mut self, code: u32) -> GlyphId {
        self.cmap.get(&code).copied().unwrap_or(GlyphId::NOTDEF)
    }

    fn set_char_size(&mut self, size: CharSize) -> Result<(), LibraryError> {
        if size.height <= F26Dot6::ZERO {
            return Err(LibraryError::CharSize("invalid pixel size".into()));
        }
        self.stats.char_sizes.borrow_mut().push(size);
        Ok(())
    }

    fn load_glyph(
        &mut self,
        glyph: GlyphId,
        _hinting: bool,
    ) -> Result<&mut dyn GlyphSlot, LibraryError> {
        self.stats.loads.set(self.stats.loads.get() + 1);
        self.slot = self
            .glyphs
            .get(&glyph)
            .cloned()
            .ok_or_else(|| LibraryError::GlyphLoad {
                glyph,
                reason: "invalid glyph index".into(),
            })?;
        Ok(&mut self.slot)
    }

    fn has_kerning(&self) -> bool {
        self.kerning.is_some()
    }

    fn kerning(&mut self, left: GlyphId, right: GlyphId) -> Result<Point<F26Dot6>, LibraryError> {
        if self.kerning_fails {
            return Err(LibraryError::Kerning("broken kern table".into()));
        }
        Ok(self
            .kerning
            .as_ref()
            .and_then(|pairs| pairs.get(&(left, right)).copied())
            .unwrap_or_default())
    }

    fn family_name(&self) -> Option<String> {
        self.family.clone()
    }

    fn style_name(&self) -> Option<String> {
        self.style.clone()
    }

    fn metrics(&self) -> FaceMetrics {
        self.metrics
    }
}

/// Library that opens registered faces by their font data.
#[derive(Default, Debug)]
pub struct FakeLibrary {
    faces: HashMap<Vec<u8>, FakeFace>,
}

impl FakeLibrary {
    /// Registers `face` to be opened from `data`.
    pub fn with_face(mut self, data: &[u8], face: FakeFace) -> Self {
        self.faces.insert(data.to_vec(), face);
        self
    }
}

impl FontLibrary for FakeLibrary {
    type Face = FakeFace;

    fn init() -> Result<Self, LibraryError> {
        Ok(Self::default())
    }

    fn new_memory_face(&self, data: FontData, face_index: usize) -> Result<FakeFace, LibraryError> {
        if face_index != 0 {
            return Err(LibraryError::InvalidFace("face index out of range".into()));
        }
        self.faces
            .get(data.as_bytes())
            .cloned()
            .ok_or_else(|| LibraryError::InvalidFace("unknown file format".into()))
    }
}

/// Library whose initialization always fails.
#[derive(Debug)]
pub struct FailingLibrary;

impl FontLibrary for FailingLibrary {
    type Face = FakeFace;

    fn init() -> Result<Self, LibraryError> {
        Err(LibraryError::Init("out of memory".into()))
    }

    fn new_memory_face(&self, _data: FontData, _face_index: usize) -> Result<FakeFace, LibraryError> {
        Err(LibraryError::InvalidFace("unreachable".into()))
    }
}
