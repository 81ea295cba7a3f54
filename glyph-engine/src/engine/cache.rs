//! Caching of serialized glyphs.

use std::collections::{hash_map::Entry, HashMap, VecDeque};

use log::trace;

use super::{FaceSignature, GlyphDataType, GlyphMetrics, LoadedFace};
use crate::{
    library::FontLibrary,
    path::{CoordWidth, SerializedPath},
    scanline::{SerializedAaScanlines, SerializedBinScanlines},
    GlyphId,
};

/// Default number of face signatures kept by a [`GlyphCacheManager`].
pub const DEFAULT_MAX_FONTS: usize = 32;

/// A glyph with its serialized data.
#[derive(Clone, PartialEq, Debug)]
pub struct CachedGlyph {
    pub metrics: GlyphMetrics,
    pub data: Vec<u8>,
    pub coord_width: CoordWidth,
}

/// Reader for the data of a cached glyph.
#[derive(Copy, Clone, Debug)]
pub enum GlyphAdaptor<'a> {
    Mono(SerializedBinScanlines<'a>),
    Gray8(SerializedAaScanlines<'a>),
    Outline(SerializedPath<'a>),
}

impl CachedGlyph {
    /// Returns a reader for the glyph data positioned at (x, y), or `None`
    /// for glyphs without data.
    pub fn adaptor(&self, x: f64, y: f64) -> Option<GlyphAdaptor<'_>> {
        let data = &self.data[..];
        match self.metrics.data_type {
            GlyphDataType::Invalid => None,
            _ if data.is_empty() => None,
            GlyphDataType::Mono => Some(GlyphAdaptor::Mono(SerializedBinScanlines::new(data, x, y))),
            GlyphDataType::Gray8 => Some(GlyphAdaptor::Gray8(SerializedAaScanlines::new(data, x, y))),
            GlyphDataType::Outline => Some(GlyphAdaptor::Outline(SerializedPath::new(
                data,
                self.coord_width,
                x,
                y,
            ))),
        }
    }
}

#[derive(Debug)]
struct FontCache {
    signature: FaceSignature,
    glyphs: HashMap<u32, CachedGlyph>,
}

/// Glyph caches for a number of face configurations.
///
/// Glyphs are keyed by the face [`signature`](LoadedFace::signature) and
/// character code. When more signatures than the limit are in use the
/// oldest cache is dropped.
#[derive(Debug)]
pub struct GlyphCacheManager {
    caches: VecDeque<FontCache>,
    max_fonts: usize,
    current: Option<FaceSignature>,
    prev_glyph: Option<GlyphId>,
    last_glyph: Option<GlyphId>,
}

impl Default for GlyphCacheManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FONTS)
    }
}

impl GlyphCacheManager {
    /// Creates a manager holding caches for at most `max_fonts` signatures.
    pub fn new(max_fonts: usize) -> Self {
        Self {
            caches: VecDeque::new(),
            max_fonts: max_fonts.max(1),
            current: None,
            prev_glyph: None,
            last_glyph: None,
        }
    }

    fn select(&mut self, signature: FaceSignature) -> usize {
        if self.current.as_ref() != Some(&signature) {
            self.reset_last_glyph();
            self.current = Some(signature.clone());
        }
        if let Some(index) = self.caches.iter().position(|c| c.signature == signature) {
            return index;
        }
        if self.caches.len() >= self.max_fonts {
            self.caches.pop_front();
        }
        self.caches.push_back(FontCache {
            signature,
            glyphs: HashMap::new(),
        });
        self.caches.len() - 1
    }

    /// Returns the glyph for `code`, preparing and caching it on first use.
    ///
    /// Glyphs that fail to prepare are not cached and give `None`.
    pub fn glyph<L: FontLibrary>(
        &mut self,
        face: &mut LoadedFace<'_, L>,
        code: u32,
    ) -> Option<&CachedGlyph> {
        let index = self.select(face.signature());
        let glyph = match self.caches[index].glyphs.entry(code) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let prepared = face.prepare_glyph(code).ok()?;
                trace!("caching glyph {} for code {code}", prepared.glyph_index);
                entry.insert(CachedGlyph {
                    metrics: *prepared.metrics(),
                    data: prepared.to_vec(),
                    coord_width: prepared.coord_width(),
                })
            }
        };
        self.prev_glyph = self.last_glyph;
        self.last_glyph = Some(glyph.metrics.glyph_index);
        Some(&*glyph)
    }

    /// Adds the kerning between the two most recent glyphs to (x, y).
    pub fn add_kerning<L: FontLibrary>(
        &self,
        face: &mut LoadedFace<'_, L>,
        x: &mut f64,
        y: &mut f64,
    ) -> bool {
        match (self.prev_glyph, self.last_glyph) {
            (Some(prev), Some(last)) => face.add_kerning(prev, last, x, y),
            _ => false,
        }
    }

    /// Forgets the recent glyphs so the next glyph is not kerned.
    pub fn reset_last_glyph(&mut self) {
        self.prev_glyph = None;
        self.last_glyph = None;
    }

    /// Number of cached glyphs over all signatures.
    pub fn len(&self) -> usize {
        self.caches.iter().map(|c| c.glyphs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of signatures with a cache.
    pub fn num_fonts(&self) -> usize {
        self.caches.len()
    }

    /// Drops every cache.
    pub fn clear(&mut self) {
        self.caches.clear();
        self.current = None;
        self.reset_last_glyph();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{FontEngine, GlyphRendering},
        testing::{FakeFace, FakeLibrary, MALFORMED, SQUARE_A, SQUARE_B},
    };
    use kurbo::Vec2;
    use pretty_assertions::assert_eq;

    fn engine() -> FontEngine<FakeLibrary> {
        FontEngine::with_library(
            FakeLibrary::default().with_face(b"font", FakeFace::test_sans()),
            CoordWidth::Int32,
        )
    }

    #[test]
    fn cached_glyph_is_not_prepared_again() {
        let face = FakeFace::test_sans();
        let stats = face.stats.clone();
        let engine = FontEngine::with_library(
            FakeLibrary::default().with_face(b"font", face),
            CoordWidth::Int32,
        );
        let mut face = engine.load_face(b"font").unwrap();
        let mut cache = GlyphCacheManager::default();
        let first = cache.glyph(&mut face, SQUARE_A).cloned().unwrap();
        let second = cache.glyph(&mut face, SQUARE_A).cloned().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.data.len(), first.metrics.data_size);
        assert_eq!(cache.len(), 1);
        assert_eq!(stats.loads.get(), 1);
    }

    #[test]
    fn settings_select_caches() {
        let engine = engine();
        let mut face = engine.load_face(b"font").unwrap();
        let mut cache = GlyphCacheManager::default();
        cache.glyph(&mut face, SQUARE_A);
        face.set_rendering(GlyphRendering::Outline);
        let outline = cache.glyph(&mut face, SQUARE_A).unwrap();
        assert_eq!(outline.metrics.data_type, GlyphDataType::Outline);
        assert_eq!(cache.num_fonts(), 2);
        assert_eq!(cache.len(), 2);
        face.set_rendering(GlyphRendering::NativeGray8);
        let gray = cache.glyph(&mut face, SQUARE_A).unwrap();
        assert_eq!(gray.metrics.data_type, GlyphDataType::Gray8);
        assert_eq!(cache.num_fonts(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn oldest_cache_is_evicted() {
        let engine = engine();
        let mut face = engine.load_face(b"font").unwrap();
        let mut cache = GlyphCacheManager::new(2);
        for height in [10.0, 11.0, 12.0] {
            face.set_height(height);
            cache.glyph(&mut face, SQUARE_A);
        }
        assert_eq!(cache.num_fonts(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn kerning_between_last_two_glyphs() {
        let engine = engine();
        let mut face = engine.load_face(b"font").unwrap();
        let mut cache = GlyphCacheManager::default();
        let (mut x, mut y) = (0.0, 0.0);
        cache.glyph(&mut face, SQUARE_A);
        assert!(!cache.add_kerning(&mut face, &mut x, &mut y));
        cache.glyph(&mut face, SQUARE_B);
        assert!(cache.add_kerning(&mut face, &mut x, &mut y));
        assert_eq!(Vec2::new(x, y), Vec2::new(-1.0, 0.0));
        assert!(cache.glyph(&mut face, MALFORMED).is_some());
        // a new signature starts without history and failed glyphs leave
        // it alone
        face.set_rendering(GlyphRendering::Outline);
        cache.glyph(&mut face, SQUARE_A);
        cache.glyph(&mut face, SQUARE_B);
        assert!(cache.glyph(&mut face, MALFORMED).is_none());
        let (mut x, mut y) = (0.0, 0.0);
        assert!(cache.add_kerning(&mut face, &mut x, &mut y));
        assert_eq!(x, -1.0);
        cache.reset_last_glyph();
        assert!(!cache.add_kerning(&mut face, &mut x, &mut y));
    }

    #[test]
    fn adaptors() {
        let engine = engine();
        let mut face = engine.load_face(b"font").unwrap();
        let mut cache = GlyphCacheManager::default();
        for (mode, expected) in [
            (GlyphRendering::NativeMono, "mono"),
            (GlyphRendering::AggGray8, "gray8"),
            (GlyphRendering::Outline, "outline"),
        ] {
            face.set_rendering(mode);
            let glyph = cache.glyph(&mut face, SQUARE_A).unwrap();
            let kind = match glyph.adaptor(0.0, 0.0) {
                Some(GlyphAdaptor::Mono(scanlines)) => {
                    assert_eq!(scanlines.rows().count(), 2);
                    "mono"
                }
                Some(GlyphAdaptor::Gray8(scanlines)) => {
                    assert_eq!(scanlines.rows().count(), 2);
                    "gray8"
                }
                Some(GlyphAdaptor::Outline(path)) => {
                    assert_eq!(path.num_vertices(), 4);
                    "outline"
                }
                None => "none",
            };
            assert_eq!(kind, expected);
        }
        let empty = CachedGlyph {
            metrics: GlyphMetrics::default(),
            data: vec![],
            coord_width: CoordWidth::Int32,
        };
        assert!(empty.adaptor(0.0, 0.0).is_none());
    }
}
