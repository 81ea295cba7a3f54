//! Faces loaded by a font engine.

use std::cell::OnceCell;

use kurbo::{Affine, Vec2};
use log::{debug, trace};

use super::{
    rendering::{GlyphRendering, RenderParams},
    FontEngine, GlyphMetrics, PreparedGlyph,
};
use crate::{
    error::PrepareError,
    library::{CharSize, FontFace, FontLibrary},
    path::CoordWidth,
    F26Dot6, GlyphId,
};

/// Per face configuration.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FaceSettings {
    pub rendering: GlyphRendering,
    pub hinting: bool,
    pub flip_y: bool,
    pub transform: Affine,
    /// Character height in pixels, or points when `resolution` is set.
    pub height: f64,
    /// Character width; 0 means the same as the height.
    pub width: f64,
    /// Resolution in dpi; 0 means sizes are in pixels.
    pub resolution: u32,
}

impl Default for FaceSettings {
    fn default() -> Self {
        Self {
            rendering: GlyphRendering::NativeGray8,
            hinting: true,
            flip_y: false,
            transform: Affine::IDENTITY,
            height: 12.0,
            width: 0.0,
            resolution: 0,
        }
    }
}

impl FaceSettings {
    fn char_size(&self) -> CharSize {
        CharSize {
            width: F26Dot6::from_f64(self.width),
            height: F26Dot6::from_f64(self.height),
            resolution: self.resolution,
        }
    }
}

/// Identifies the settings that affect glyph output, for keying caches.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FaceSignature {
    pub name: String,
    pub rendering: GlyphRendering,
    pub hinting: bool,
    pub flip_y: bool,
    pub size: CharSize,
    pub coord_width: CoordWidth,
    /// Bit patterns of the affine coefficients, so the signature can be
    /// hashed.
    pub transform: [u64; 6],
}

/// A face opened through a [`FontEngine`].
///
/// Settings take effect on the next [`prepare_glyph`](Self::prepare_glyph).
pub struct LoadedFace<'e, L: FontLibrary> {
    engine: &'e FontEngine<L>,
    face: L::Face,
    settings: FaceSettings,
    name: OnceCell<String>,
    size_changed: bool,
}

impl<'e, L: FontLibrary> LoadedFace<'e, L> {
    pub(crate) fn new(engine: &'e FontEngine<L>, face: L::Face) -> Self {
        Self {
            engine,
            face,
            settings: FaceSettings::default(),
            name: OnceCell::new(),
            size_changed: true,
        }
    }

    pub fn settings(&self) -> &FaceSettings {
        &self.settings
    }

    /// Replaces all settings at once.
    pub fn set_settings(&mut self, settings: FaceSettings) -> &mut Self {
        if settings.char_size() != self.settings.char_size() {
            self.size_changed = true;
        }
        self.settings = settings;
        self
    }

    pub fn rendering(&self) -> GlyphRendering {
        self.settings.rendering
    }

    pub fn set_rendering(&mut self, rendering: GlyphRendering) -> &mut Self {
        self.settings.rendering = rendering;
        self
    }

    pub fn hinting(&self) -> bool {
        self.settings.hinting
    }

    pub fn set_hinting(&mut self, hinting: bool) -> &mut Self {
        self.settings.hinting = hinting;
        self
    }

    pub fn flip_y(&self) -> bool {
        self.settings.flip_y
    }

    pub fn set_flip_y(&mut self, flip_y: bool) -> &mut Self {
        self.settings.flip_y = flip_y;
        self
    }

    pub fn transform(&self) -> Affine {
        self.settings.transform
    }

    /// Sets the transform applied to outlines in the vector modes.
    pub fn set_transform(&mut self, transform: Affine) -> &mut Self {
        self.settings.transform = transform;
        self
    }

    pub fn height(&self) -> f64 {
        self.settings.height
    }

    pub fn set_height(&mut self, height: f64) -> &mut Self {
        self.set_settings(FaceSettings {
            height,
            ..self.settings
        })
    }

    pub fn width(&self) -> f64 {
        self.settings.width
    }

    pub fn set_width(&mut self, width: f64) -> &mut Self {
        self.set_settings(FaceSettings {
            width,
            ..self.settings
        })
    }

    pub fn resolution(&self) -> u32 {
        self.settings.resolution
    }

    pub fn set_resolution(&mut self, resolution: u32) -> &mut Self {
        self.set_settings(FaceSettings {
            resolution,
            ..self.settings
        })
    }

    /// Display name: the family name, followed by the style name unless
    /// the style is "Regular".
    pub fn face_name(&self) -> &str {
        self.name.get_or_init(|| {
            let family = self.face.family_name().unwrap_or_default();
            match self.face.style_name() {
                Some(style) if !style.eq_ignore_ascii_case("regular") => {
                    format!("{family} {style}")
                }
                _ => family,
            }
        })
    }

    pub fn num_glyphs(&self) -> u32 {
        self.face.metrics().num_glyphs
    }

    fn design_to_pixels(&self, value: i16) -> f64 {
        let upem = self.face.metrics().units_per_em;
        if upem == 0 {
            return 0.0;
        }
        value as f64 * self.settings.height / upem as f64
    }

    /// Ascender at the current height.
    pub fn ascender(&self) -> f64 {
        self.design_to_pixels(self.face.metrics().ascender)
    }

    /// Descender at the current height. Usually negative.
    pub fn descender(&self) -> f64 {
        self.design_to_pixels(self.face.metrics().descender)
    }

    /// Baseline to baseline distance at the current height.
    pub fn line_height(&self) -> f64 {
        self.design_to_pixels(self.face.metrics().height)
    }

    /// Returns the cache key for the current settings.
    pub fn signature(&self) -> FaceSignature {
        FaceSignature {
            name: self.face_name().to_owned(),
            rendering: self.settings.rendering,
            hinting: self.settings.hinting,
            flip_y: self.settings.flip_y,
            size: self.settings.char_size(),
            coord_width: self.engine.coord_width(),
            transform: self.settings.transform.as_coeffs().map(f64::to_bits),
        }
    }

    /// Maps a character code to a glyph index.
    pub fn glyph_index(&mut self, code: u32) -> GlyphId {
        self.face.char_index(code)
    }

    /// Loads and renders the glyph for `code` into the engine's glyph
    /// builder.
    ///
    /// Fails with [`PrepareError::GlyphInFlight`] while another prepared
    /// glyph of the same engine is alive.
    pub fn prepare_glyph(&mut self, code: u32) -> Result<PreparedGlyph<'e>, PrepareError> {
        self.prepare(code)
            .inspect(|glyph| {
                trace!(
                    "prepared {} for code {code}: {:?} {} bytes {:?}",
                    glyph.glyph_index,
                    glyph.data_type,
                    glyph.data_size,
                    glyph.bounds
                )
            })
            .inspect_err(|e| debug!("unable to prepare glyph for code {code}: {e}"))
    }

    fn prepare(&mut self, code: u32) -> Result<PreparedGlyph<'e>, PrepareError> {
        let engine: &'e FontEngine<L> = self.engine;
        let mut builder = engine
            .builder
            .try_borrow_mut()
            .map_err(|_| PrepareError::GlyphInFlight)?;
        if self.size_changed {
            self.face.set_char_size(self.settings.char_size())?;
            self.size_changed = false;
        }
        let glyph_index = self.face.char_index(code);
        let params = RenderParams {
            flip_y: self.settings.flip_y,
            transform: self.settings.transform,
        };
        let strategy = self.settings.rendering.strategy();
        let slot = self.face.load_glyph(glyph_index, self.settings.hinting)?;
        let output = strategy.render(slot, &mut builder, &params)?;
        let metrics = GlyphMetrics {
            glyph_index,
            glyph_code: code,
            data_type: output.data_type,
            data_size: output.data_size,
            bounds: output.bounds,
            advance_x: output.advance.x,
            advance_y: output.advance.y,
        };
        Ok(PreparedGlyph::new(metrics, builder))
    }

    /// Adds the kerning between two glyphs to (x, y).
    ///
    /// Returns false if either glyph is `.notdef` or the face has no
    /// kerning. In the vector modes the adjustment goes through the linear
    /// part of the transform.
    pub fn add_kerning(
        &mut self,
        first: GlyphId,
        second: GlyphId,
        x: &mut f64,
        y: &mut f64,
    ) -> bool {
        if first.is_notdef() || second.is_notdef() || !self.face.has_kerning() {
            return false;
        }
        match self.face.kerning(first, second) {
            Ok(delta) => {
                let mut delta = Vec2::new(delta.x.to_f64(), delta.y.to_f64());
                if self.settings.rendering.is_vector() {
                    let [a, b, c, d, _, _] = self.settings.transform.as_coeffs();
                    delta = Vec2::new(a * delta.x + c * delta.y, b * delta.x + d * delta.y);
                }
                *x += delta.x;
                *y += delta.y;
            }
            Err(e) => debug!("kerning {first} {second}: {e}"),
        }
        true
    }

    /// Returns the kerning between two glyphs, if any.
    pub fn kerning(&mut self, first: GlyphId, second: GlyphId) -> Option<Vec2> {
        let (mut x, mut y) = (0.0, 0.0);
        self.add_kerning(first, second, &mut x, &mut y)
            .then(|| Vec2::new(x, y))
    }
}
