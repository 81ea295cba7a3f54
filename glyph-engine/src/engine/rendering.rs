//! Glyph rendering modes.
//!
//! Each [`GlyphRendering`] mode is implemented by a strategy that turns the
//! glyph in a face's glyph slot into data in the engine's glyph builder and
//! reports what was produced.

use kurbo::{Affine, Vec2};

use super::{builder::GlyphBuilder, GlyphDataType};
use crate::{
    error::PrepareError,
    library::{BitmapMode, GlyphSlot},
    scanline::{convert_gray8, convert_mono, ScanlineStorage},
    BoundingBox,
};

/// How glyphs of a face are rendered.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug)]
pub enum GlyphRendering {
    /// 1-bit bitmap rendered by the font library.
    NativeMono,
    /// 8-bit coverage bitmap rendered by the font library.
    #[default]
    NativeGray8,
    /// Vector path.
    Outline,
    /// 1-bit scanlines rasterized from the outline.
    AggMono,
    /// Anti-aliased scanlines rasterized from the outline.
    AggGray8,
}

impl GlyphRendering {
    pub const ALL: [Self; 5] = [
        Self::NativeMono,
        Self::NativeGray8,
        Self::Outline,
        Self::AggMono,
        Self::AggGray8,
    ];

    /// Returns true for modes that work on the outline and therefore honor
    /// the face transform.
    pub fn is_vector(self) -> bool {
        matches!(self, Self::Outline | Self::AggMono | Self::AggGray8)
    }

    pub(crate) fn strategy(self) -> &'static dyn RenderStrategy {
        match self {
            Self::NativeMono => &NativeMono,
            Self::NativeGray8 => &NativeGray8,
            Self::Outline => &OutlinePath,
            Self::AggMono => &AggMono,
            Self::AggGray8 => &AggGray8,
        }
    }
}

/// Face state that affects rendering.
#[derive(Copy, Clone, Debug)]
pub(crate) struct RenderParams {
    pub flip_y: bool,
    pub transform: Affine,
}

/// What a strategy left in the builder.
#[derive(Copy, Clone, PartialEq, Debug)]
pub(crate) struct RenderOutput {
    pub data_type: GlyphDataType,
    pub data_size: usize,
    pub bounds: BoundingBox<i32>,
    pub advance: Vec2,
}

pub(crate) trait RenderStrategy {
    fn render(
        &self,
        slot: &mut dyn GlyphSlot,
        builder: &mut GlyphBuilder,
        params: &RenderParams,
    ) -> Result<RenderOutput, PrepareError>;
}

fn raw_advance(slot: &dyn GlyphSlot) -> Vec2 {
    let advance = slot.advance();
    Vec2::new(advance.x.to_f64(), advance.y.to_f64())
}

fn transformed_advance(slot: &dyn GlyphSlot, transform: &Affine) -> Vec2 {
    (*transform * raw_advance(slot).to_point()).to_vec2()
}

// Zero height box along the advance, used for glyphs without pixels.
fn empty_raster_bounds(advance: Vec2) -> BoundingBox<i32> {
    BoundingBox::new(0, 0, advance.x as i32, 0)
}

fn raster_output(
    storage: &impl ScanlineStorage,
    data_type: GlyphDataType,
    advance: Vec2,
) -> RenderOutput {
    RenderOutput {
        data_type,
        data_size: storage.byte_size(),
        bounds: storage
            .bounds()
            .unwrap_or_else(|| empty_raster_bounds(advance)),
        advance,
    }
}

/// Places a library bitmap relative to the pen. With a flipped y axis the
/// top bearing points down.
fn bitmap_origin(left: i32, top: i32, flip_y: bool) -> (i32, i32) {
    (left, if flip_y { -top } else { top })
}

struct NativeMono;

impl RenderStrategy for NativeMono {
    fn render(
        &self,
        slot: &mut dyn GlyphSlot,
        builder: &mut GlyphBuilder,
        params: &RenderParams,
    ) -> Result<RenderOutput, PrepareError> {
        let advance = raw_advance(slot);
        let rendered = slot.render(BitmapMode::Mono)?;
        let (x, y) = bitmap_origin(rendered.left, rendered.top, params.flip_y);
        convert_mono(
            &rendered.bitmap,
            x,
            y,
            params.flip_y,
            &mut builder.scanline_bin,
            &mut builder.storage_bin,
        );
        Ok(raster_output(
            &builder.storage_bin,
            GlyphDataType::Mono,
            advance,
        ))
    }
}

struct NativeGray8;

impl RenderStrategy for NativeGray8 {
    fn render(
        &self,
        slot: &mut dyn GlyphSlot,
        builder: &mut GlyphBuilder,
        params: &RenderParams,
    ) -> Result<RenderOutput, PrepareError> {
        let advance = raw_advance(slot);
        let rendered = slot.render(BitmapMode::Gray8)?;
        let (x, y) = bitmap_origin(rendered.left, rendered.top, params.flip_y);
        let rasterizer = &builder.rasterizer;
        convert_gray8(
            &rendered.bitmap,
            x,
            y,
            params.flip_y,
            |cover| rasterizer.apply_gamma(cover),
            &mut builder.scanline_aa,
            &mut builder.storage_aa,
        );
        let mut output = raster_output(&builder.storage_aa, GlyphDataType::Gray8, advance);
        if rendered.bitmap.is_empty() {
            output.bounds = empty_raster_bounds(advance);
        }
        Ok(output)
    }
}

/// Decomposes the slot's outline into the builder's path.
fn decompose_into_path(
    slot: &dyn GlyphSlot,
    builder: &mut GlyphBuilder,
    params: &RenderParams,
) -> Result<(), PrepareError> {
    let outline = slot
        .outline()
        .ok_or_else(|| PrepareError::MissingOutline(slot.glyph_id()))?;
    builder
        .path
        .decompose(&outline, params.flip_y, &params.transform)?;
    Ok(())
}

struct OutlinePath;

impl RenderStrategy for OutlinePath {
    fn render(
        &self,
        slot: &mut dyn GlyphSlot,
        builder: &mut GlyphBuilder,
        params: &RenderParams,
    ) -> Result<RenderOutput, PrepareError> {
        decompose_into_path(slot, builder, params)?;
        let rect = builder.path.bounding_rect();
        Ok(RenderOutput {
            data_type: GlyphDataType::Outline,
            data_size: builder.path.byte_size(),
            bounds: BoundingBox::new(
                rect.x0.floor() as i32,
                rect.y0.floor() as i32,
                rect.x1.ceil() as i32,
                rect.y1.ceil() as i32,
            ),
            advance: transformed_advance(slot, &params.transform),
        })
    }
}

struct AggMono;

impl RenderStrategy for AggMono {
    fn render(
        &self,
        slot: &mut dyn GlyphSlot,
        builder: &mut GlyphBuilder,
        params: &RenderParams,
    ) -> Result<RenderOutput, PrepareError> {
        decompose_into_path(slot, builder, params)?;
        if !builder.rasterize_bin() {
            return Err(PrepareError::TooManyCells(slot.glyph_id()));
        }
        Ok(raster_output(
            &builder.storage_bin,
            GlyphDataType::Mono,
            transformed_advance(slot, &params.transform),
        ))
    }
}

struct AggGray8;

impl RenderStrategy for AggGray8 {
    fn render(
        &self,
        slot: &mut dyn GlyphSlot,
        builder: &mut GlyphBuilder,
        params: &RenderParams,
    ) -> Result<RenderOutput, PrepareError> {
        decompose_into_path(slot, builder, params)?;
        if !builder.rasterize_aa() {
            return Err(PrepareError::TooManyCells(slot.glyph_id()));
        }
        Ok(raster_output(
            &builder.storage_aa,
            GlyphDataType::Gray8,
            transformed_advance(slot, &params.transform),
        ))
    }
}
