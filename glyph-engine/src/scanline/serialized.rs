//! Readers for serialized scanline storages.

use bytemuck::Pod;

use super::storage::{AaRowHeader, BinRowHeader, SpanHeader, StorageHeader, HEADER_SIZE};
use crate::BoundingBox;

fn read<T: Pod>(data: &[u8], offset: usize) -> Option<T> {
    let bytes = data.get(offset..offset.checked_add(size_of::<T>())?)?;
    Some(bytemuck::pod_read_unaligned(bytes))
}

fn header_bounds(data: &[u8], dx: i32, dy: i32) -> Option<BoundingBox<i32>> {
    let header: StorageHeader = read(data, 0)?;
    Some(BoundingBox::new(
        header.min_x + dx,
        header.min_y + dy,
        header.max_x + dx,
        header.max_y + dy,
    ))
}

/// Serialized anti-aliased scanlines positioned at an integer offset.
#[derive(Copy, Clone, Debug)]
pub struct SerializedAaScanlines<'a> {
    data: &'a [u8],
    dx: i32,
    dy: i32,
}

impl<'a> SerializedAaScanlines<'a> {
    /// Wraps serialized data. Coordinates are shifted by (x, y) pixels,
    /// rounded to the nearest integer.
    pub fn new(data: &'a [u8], x: f64, y: f64) -> Self {
        Self {
            data,
            dx: x.round() as i32,
            dy: y.round() as i32,
        }
    }

    /// Inclusive extents from the header, or `None` if the data is too short.
    pub fn bounds(&self) -> Option<BoundingBox<i32>> {
        header_bounds(self.data, self.dx, self.dy)
    }

    pub fn rows(&self) -> AaRows<'a> {
        AaRows {
            data: self.data.get(HEADER_SIZE..).unwrap_or_default(),
            dx: self.dx,
            dy: self.dy,
        }
    }
}

/// Iterator over serialized anti-aliased rows.
#[derive(Clone, Debug)]
pub struct AaRows<'a> {
    data: &'a [u8],
    dx: i32,
    dy: i32,
}

impl<'a> Iterator for AaRows<'a> {
    type Item = AaRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let header: AaRowHeader = read(self.data, 0)?;
        let row_bytes = usize::try_from(header.row_bytes).ok()?;
        let row = self.data.get(size_of::<AaRowHeader>()..row_bytes)?;
        self.data = self.data.get(row_bytes..)?;
        Some(AaRow {
            y: header.y + self.dy,
            num_spans: header.num_spans.max(0) as usize,
            data: row,
            dx: self.dx,
        })
    }
}

/// A serialized anti-aliased row.
#[derive(Copy, Clone, Debug)]
pub struct AaRow<'a> {
    pub y: i32,
    pub num_spans: usize,
    data: &'a [u8],
    dx: i32,
}

impl<'a> AaRow<'a> {
    pub fn spans(&self) -> AaSpans<'a> {
        AaSpans {
            data: self.data,
            remaining: self.num_spans,
            dx: self.dx,
        }
    }
}

/// A span of coverage values.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct AaSpan<'a> {
    pub x: i32,
    pub covers: &'a [u8],
}

/// Iterator over the spans of a serialized anti-aliased row.
#[derive(Clone, Debug)]
pub struct AaSpans<'a> {
    data: &'a [u8],
    remaining: usize,
    dx: i32,
}

impl<'a> Iterator for AaSpans<'a> {
    type Item = AaSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let span: SpanHeader = read(self.data, 0)?;
        let start = size_of::<SpanHeader>();
        let end = start + usize::try_from(span.len).ok()?;
        let covers = self.data.get(start..end)?;
        self.data = &self.data[end..];
        self.remaining -= 1;
        Some(AaSpan {
            x: span.x + self.dx,
            covers,
        })
    }
}

/// Serialized binary scanlines positioned at an integer offset.
#[derive(Copy, Clone, Debug)]
pub struct SerializedBinScanlines<'a> {
    data: &'a [u8],
    dx: i32,
    dy: i32,
}

impl<'a> SerializedBinScanlines<'a> {
    /// Wraps serialized data. Coordinates are shifted by (x, y) pixels,
    /// rounded to the nearest integer.
    pub fn new(data: &'a [u8], x: f64, y: f64) -> Self {
        Self {
            data,
            dx: x.round() as i32,
            dy: y.round() as i32,
        }
    }

    /// Inclusive extents from the header, or `None` if the data is too short.
    pub fn bounds(&self) -> Option<BoundingBox<i32>> {
        header_bounds(self.data, self.dx, self.dy)
    }

    pub fn rows(&self) -> BinRows<'a> {
        BinRows {
            data: self.data.get(HEADER_SIZE..).unwrap_or_default(),
            dx: self.dx,
            dy: self.dy,
        }
    }
}

/// Iterator over serialized binary rows.
#[derive(Clone, Debug)]
pub struct BinRows<'a> {
    data: &'a [u8],
    dx: i32,
    dy: i32,
}

impl<'a> Iterator for BinRows<'a> {
    type Item = BinRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let header: BinRowHeader = read(self.data, 0)?;
        let num_spans = usize::try_from(header.num_spans).ok()?;
        let start = size_of::<BinRowHeader>();
        let end = start + num_spans.checked_mul(size_of::<SpanHeader>())?;
        let spans = self.data.get(start..end)?;
        self.data = &self.data[end..];
        Some(BinRow {
            y: header.y + self.dy,
            spans,
            dx: self.dx,
        })
    }
}

/// A serialized binary row.
#[derive(Copy, Clone, Debug)]
pub struct BinRow<'a> {
    pub y: i32,
    spans: &'a [u8],
    dx: i32,
}

impl<'a> BinRow<'a> {
    pub fn num_spans(&self) -> usize {
        self.spans.len() / size_of::<SpanHeader>()
    }

    /// Returns the spans as `(x, len)` pairs.
    pub fn spans(&self) -> BinSpans<'a> {
        BinSpans {
            chunks: self.spans.chunks_exact(size_of::<SpanHeader>()),
            dx: self.dx,
        }
    }
}

/// Iterator over the spans of a serialized binary row.
#[derive(Clone, Debug)]
pub struct BinSpans<'a> {
    chunks: std::slice::ChunksExact<'a, u8>,
    dx: i32,
}

impl Iterator for BinSpans<'_> {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        let span: SpanHeader = bytemuck::pod_read_unaligned(self.chunks.next()?);
        Some((span.x + self.dx, span.len))
    }
}
