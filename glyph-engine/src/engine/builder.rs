//! Scratch buffers shared by every face of an engine.

use kurbo::{Affine, Rect};

use crate::{
    error::{DecomposeError, WriteError},
    outline::Outline,
    path::{CoordWidth, PathStorage},
    raster::{render_scanlines, CurveApproximation, Gamma, Rasterizer},
    scanline::{ScanlineBin, ScanlineStorage, ScanlineStorageAa, ScanlineStorageBin, ScanlineU8},
};

/// Path storage of the width chosen for the engine.
#[derive(Clone, Debug)]
pub(crate) enum PathBuffer {
    Int16(PathStorage<i16>),
    Int32(PathStorage<i32>),
}

impl PathBuffer {
    pub fn new(width: CoordWidth) -> Self {
        match width {
            CoordWidth::Int16 => Self::Int16(PathStorage::new()),
            CoordWidth::Int32 => Self::Int32(PathStorage::new()),
        }
    }

    pub fn width(&self) -> CoordWidth {
        match self {
            Self::Int16(_) => CoordWidth::Int16,
            Self::Int32(_) => CoordWidth::Int32,
        }
    }

    /// Replaces the contents with the decomposed outline.
    pub fn decompose(
        &mut self,
        outline: &Outline,
        flip_y: bool,
        transform: &Affine,
    ) -> Result<(), DecomposeError> {
        match self {
            Self::Int16(path) => {
                path.remove_all();
                path.decompose(outline, flip_y, transform)
            }
            Self::Int32(path) => {
                path.remove_all();
                path.decompose(outline, flip_y, transform)
            }
        }
    }

    pub fn bounding_rect(&self) -> Rect {
        match self {
            Self::Int16(path) => path.bounding_rect(),
            Self::Int32(path) => path.bounding_rect(),
        }
    }

    pub fn byte_size(&self) -> usize {
        match self {
            Self::Int16(path) => path.byte_size(),
            Self::Int32(path) => path.byte_size(),
        }
    }

    pub fn serialize(&self, buf: &mut [u8]) -> Result<usize, WriteError> {
        match self {
            Self::Int16(path) => path.serialize(buf),
            Self::Int32(path) => path.serialize(buf),
        }
    }

    /// Feeds the path into the rasterizer, flattening curves.
    fn rasterize(&self, rasterizer: &mut Rasterizer, curves: &CurveApproximation) {
        match self {
            Self::Int16(path) => rasterizer.add_path(path.elements(), curves),
            Self::Int32(path) => rasterizer.add_path(path.elements(), curves),
        }
    }
}

/// The path, scanline and rasterizer state a glyph is built in.
///
/// Only one glyph can be built at a time; the engine hands the builder out
/// to one prepared glyph until that glyph is dropped.
#[derive(Clone, Debug)]
pub(crate) struct GlyphBuilder {
    pub path: PathBuffer,
    pub scanline_aa: ScanlineU8,
    pub scanline_bin: ScanlineBin,
    pub storage_aa: ScanlineStorageAa,
    pub storage_bin: ScanlineStorageBin,
    pub rasterizer: Rasterizer,
    pub curves: CurveApproximation,
}

impl GlyphBuilder {
    pub fn new(width: CoordWidth) -> Self {
        Self {
            path: PathBuffer::new(width),
            scanline_aa: ScanlineU8::new(),
            scanline_bin: ScanlineBin::new(),
            storage_aa: ScanlineStorageAa::new(),
            storage_bin: ScanlineStorageBin::new(),
            rasterizer: Rasterizer::new(),
            curves: CurveApproximation::default(),
        }
    }

    pub fn set_gamma(&mut self, gamma: &Gamma) {
        self.rasterizer.set_gamma(gamma);
    }

    pub fn set_approximation_scale(&mut self, scale: f64) {
        self.curves = CurveApproximation::new(scale);
    }

    /// Sweeps the current path into the anti-aliased storage.
    ///
    /// Returns false, leaving the storage empty, if the path needs more
    /// than [`MAX_CELLS`](crate::raster::MAX_CELLS) cells.
    pub fn rasterize_aa(&mut self) -> bool {
        self.rasterizer.reset();
        self.path.rasterize(&mut self.rasterizer, &self.curves);
        self.storage_aa.prepare();
        render_scanlines(
            &mut self.rasterizer,
            &mut self.scanline_aa,
            &mut self.storage_aa,
        );
        !self.rasterizer.overflowed()
    }

    /// Sweeps the current path into the binary storage. Fails like
    /// [`rasterize_aa`](Self::rasterize_aa).
    pub fn rasterize_bin(&mut self) -> bool {
        self.rasterizer.reset();
        self.path.rasterize(&mut self.rasterizer, &self.curves);
        self.storage_bin.prepare();
        render_scanlines(
            &mut self.rasterizer,
            &mut self.scanline_bin,
            &mut self.storage_bin,
        );
        !self.rasterizer.overflowed()
    }
}
