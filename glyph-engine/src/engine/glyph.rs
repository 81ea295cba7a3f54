//! Prepared glyphs and their serialization.

use std::{cell::RefMut, ops::Deref};

use super::{builder::GlyphBuilder, GlyphDataType, GlyphMetrics};
use crate::{error::WriteError, path::CoordWidth, scanline::ScanlineStorage};

/// A glyph whose data sits in the engine's glyph builder.
///
/// The builder stays checked out until this value is dropped, so the data
/// can be written any number of times but no other glyph can be prepared
/// on the same engine in the meantime.
#[derive(Debug)]
pub struct PreparedGlyph<'e> {
    metrics: GlyphMetrics,
    builder: RefMut<'e, GlyphBuilder>,
}

impl<'e> PreparedGlyph<'e> {
    pub(crate) fn new(metrics: GlyphMetrics, builder: RefMut<'e, GlyphBuilder>) -> Self {
        Self { metrics, builder }
    }

    pub fn metrics(&self) -> &GlyphMetrics {
        &self.metrics
    }

    /// Width of the coordinates in outline data.
    pub fn coord_width(&self) -> CoordWidth {
        self.builder.path.width()
    }

    /// Writes the glyph data to the front of `buf`.
    ///
    /// Returns the number of bytes written, which is always `data_size`.
    /// Nothing is written for glyphs without data.
    pub fn write_to(&self, buf: &mut [u8]) -> Result<usize, WriteError> {
        if self.metrics.data_size == 0 {
            return Ok(0);
        }
        match self.metrics.data_type {
            GlyphDataType::Invalid => Ok(0),
            GlyphDataType::Mono => self.builder.storage_bin.serialize(buf),
            GlyphDataType::Gray8 => self.builder.storage_aa.serialize(buf),
            GlyphDataType::Outline => self.builder.path.serialize(buf),
        }
    }

    /// Returns the serialized glyph data.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut data = vec![0; self.metrics.data_size];
        let len = self.write_to(&mut data).unwrap_or_default();
        data.truncate(len);
        data
    }

    /// Releases the glyph builder, keeping only the metrics.
    pub fn into_metrics(self) -> GlyphMetrics {
        self.metrics
    }
}

impl Deref for PreparedGlyph<'_> {
    type Target = GlyphMetrics;

    fn deref(&self) -> &Self::Target {
        &self.metrics
    }
}
