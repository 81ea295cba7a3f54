//! Storage of rendered scanlines and their serialized layout.
//!
//! Both storages serialize to a header followed by one record per row, all
//! integers native-endian `i32`:
//!
//! ```text
//! header:          min_x min_y max_x max_y
//! gray8 row:       row_bytes y num_spans (x len covers[len])*
//! mono row:        y num_spans (x len)*
//! ```
//!
//! `row_bytes` is the size of the whole gray8 row record including its own
//! three integers. The extents are inclusive; an empty storage writes an
//! all zero header.

use bytemuck::{Pod, Zeroable};

use super::{Scanline, ScanlineBin, ScanlineU8};
use crate::{error::WriteError, BoundingBox};

#[derive(Copy, Clone, Default, PartialEq, Eq, Debug, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct StorageHeader {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

#[derive(Copy, Clone, Default, PartialEq, Eq, Debug, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct AaRowHeader {
    pub row_bytes: i32,
    pub y: i32,
    pub num_spans: i32,
}

#[derive(Copy, Clone, Default, PartialEq, Eq, Debug, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct BinRowHeader {
    pub y: i32,
    pub num_spans: i32,
}

#[derive(Copy, Clone, Default, PartialEq, Eq, Debug, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct SpanHeader {
    pub x: i32,
    pub len: i32,
}

pub(crate) const HEADER_SIZE: usize = size_of::<StorageHeader>();

/// Common interface of the scanline storages.
pub trait ScanlineStorage {
    /// The scanline type this storage accepts.
    type Scanline: Scanline;

    /// Removes all rows.
    fn prepare(&mut self);

    /// Appends the finalized scanline as a new row.
    fn render(&mut self, scanline: &Self::Scanline);

    fn num_rows(&self) -> usize;

    fn min_x(&self) -> i32;
    fn min_y(&self) -> i32;
    fn max_x(&self) -> i32;
    fn max_y(&self) -> i32;

    /// Size in bytes of the serialized storage.
    fn byte_size(&self) -> usize;

    /// Writes the storage to the front of `buf`, returning the number of
    /// bytes written.
    fn serialize(&self, buf: &mut [u8]) -> Result<usize, WriteError>;

    /// End-exclusive extents of all stored cells, or `None` if empty.
    fn bounds(&self) -> Option<BoundingBox<i32>> {
        (self.num_rows() != 0).then(|| {
            BoundingBox::new(
                self.min_x(),
                self.min_y(),
                self.max_x() + 1,
                self.max_y() + 1,
            )
        })
    }
}

#[derive(Copy, Clone, Debug)]
struct Extents {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl Default for Extents {
    fn default() -> Self {
        Self {
            min_x: i32::MAX,
            min_y: i32::MAX,
            max_x: i32::MIN,
            max_y: i32::MIN,
        }
    }
}

impl Extents {
    fn add_row(&mut self, y: i32) {
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    fn add_span(&mut self, x: i32, len: i32) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x + len - 1);
    }

    fn header(&self, empty: bool) -> StorageHeader {
        if empty {
            return StorageHeader::default();
        }
        StorageHeader {
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.max_x,
            max_y: self.max_y,
        }
    }
}

struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    fn new(buf: &'a mut [u8], required: usize) -> Result<Self, WriteError> {
        if buf.len() < required {
            return Err(WriteError::BufferTooSmall {
                required,
                actual: buf.len(),
            });
        }
        Ok(Self { buf, pos: 0 })
    }

    fn put<T: Pod>(&mut self, value: &T) {
        self.put_bytes(bytemuck::bytes_of(value));
    }

    fn put_bytes(&mut self, bytes: &[u8]) {
        let end = self.pos + bytes.len();
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
    }
}

#[derive(Copy, Clone, Debug)]
struct StoredRow {
    y: i32,
    first_span: usize,
    num_spans: usize,
}

#[derive(Copy, Clone, Debug)]
struct StoredAaSpan {
    x: i32,
    len: i32,
    first_cover: usize,
}

/// Storage for anti-aliased scanlines.
#[derive(Clone, Default, Debug)]
pub struct ScanlineStorageAa {
    covers: Vec<u8>,
    spans: Vec<StoredAaSpan>,
    rows: Vec<StoredRow>,
    extents: Extents,
}

impl ScanlineStorageAa {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored rows as `(y, spans)` where each span is an
    /// `(x, covers)` pair.
    pub fn rows(&self) -> impl Iterator<Item = (i32, Vec<(i32, &[u8])>)> + '_ {
        self.rows.iter().map(|row| {
            let spans = self.spans[row.first_span..row.first_span + row.num_spans]
                .iter()
                .map(|span| {
                    (
                        span.x,
                        &self.covers[span.first_cover..span.first_cover + span.len as usize],
                    )
                })
                .collect();
            (row.y, spans)
        })
    }

    fn row_byte_size(&self, row: &StoredRow) -> usize {
        size_of::<AaRowHeader>()
            + self.spans[row.first_span..row.first_span + row.num_spans]
                .iter()
                .map(|span| size_of::<SpanHeader>() + span.len as usize)
                .sum::<usize>()
    }
}

impl ScanlineStorage for ScanlineStorageAa {
    type Scanline = ScanlineU8;

    fn prepare(&mut self) {
        self.covers.clear();
        self.spans.clear();
        self.rows.clear();
        self.extents = Extents::default();
    }

    fn render(&mut self, scanline: &ScanlineU8) {
        let y = scanline.y();
        self.extents.add_row(y);
        let first_span = self.spans.len();
        for (x, covers) in scanline.spans() {
            let len = covers.len() as i32;
            self.extents.add_span(x, len);
            self.spans.push(StoredAaSpan {
                x,
                len,
                first_cover: self.covers.len(),
            });
            self.covers.extend_from_slice(covers);
        }
        self.rows.push(StoredRow {
            y,
            first_span,
            num_spans: self.spans.len() - first_span,
        });
    }

    fn num_rows(&self) -> usize {
        self.rows.len()
    }

    fn min_x(&self) -> i32 {
        self.extents.min_x
    }

    fn min_y(&self) -> i32 {
        self.extents.min_y
    }

    fn max_x(&self) -> i32 {
        self.extents.max_x
    }

    fn max_y(&self) -> i32 {
        self.extents.max_y
    }

    fn byte_size(&self) -> usize {
        HEADER_SIZE
            + self
                .rows
                .iter()
                .map(|row| self.row_byte_size(row))
                .sum::<usize>()
    }

    fn serialize(&self, buf: &mut [u8]) -> Result<usize, WriteError> {
        let mut writer = Writer::new(buf, self.byte_size())?;
        writer.put(&self.extents.header(self.rows.is_empty()));
        for row in &self.rows {
            writer.put(&AaRowHeader {
                row_bytes: self.row_byte_size(row) as i32,
                y: row.y,
                num_spans: row.num_spans as i32,
            });
            for span in &self.spans[row.first_span..row.first_span + row.num_spans] {
                writer.put(&SpanHeader {
                    x: span.x,
                    len: span.len,
                });
                writer.put_bytes(
                    &self.covers[span.first_cover..span.first_cover + span.len as usize],
                );
            }
        }
        Ok(writer.pos)
    }
}

/// Storage for binary (mono) scanlines.
#[derive(Clone, Default, Debug)]
pub struct ScanlineStorageBin {
    spans: Vec<SpanHeader>,
    rows: Vec<StoredRow>,
    extents: Extents,
}

impl ScanlineStorageBin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored rows as `(y, spans)` where each span is an
    /// `(x, len)` pair.
    pub fn rows(&self) -> impl Iterator<Item = (i32, Vec<(i32, i32)>)> + '_ {
        self.rows.iter().map(|row| {
            let spans = self.spans[row.first_span..row.first_span + row.num_spans]
                .iter()
                .map(|span| (span.x, span.len))
                .collect();
            (row.y, spans)
        })
    }
}

impl ScanlineStorage for ScanlineStorageBin {
    type Scanline = ScanlineBin;

    fn prepare(&mut self) {
        self.spans.clear();
        self.rows.clear();
        self.extents = Extents::default();
    }

    fn render(&mut self, scanline: &ScanlineBin) {
        let y = scanline.y();
        self.extents.add_row(y);
        let first_span = self.spans.len();
        for span in scanline.spans() {
            self.extents.add_span(span.x, span.len);
            self.spans.push(SpanHeader {
                x: span.x,
                len: span.len,
            });
        }
        self.rows.push(StoredRow {
            y,
            first_span,
            num_spans: self.spans.len() - first_span,
        });
    }

    fn num_rows(&self) -> usize {
        self.rows.len()
    }

    fn min_x(&self) -> i32 {
        self.extents.min_x
    }

    fn min_y(&self) -> i32 {
        self.extents.min_y
    }

    fn max_x(&self) -> i32 {
        self.extents.max_x
    }

    fn max_y(&self) -> i32 {
        self.extents.max_y
    }

    fn byte_size(&self) -> usize {
        HEADER_SIZE
            + self.rows.len() * size_of::<BinRowHeader>()
            + self.spans.len() * size_of::<SpanHeader>()
    }

    fn serialize(&self, buf: &mut [u8]) -> Result<usize, WriteError> {
        let mut writer = Writer::new(buf, self.byte_size())?;
        writer.put(&self.extents.header(self.rows.is_empty()));
        for row in &self.rows {
            writer.put(&BinRowHeader {
                y: row.y,
                num_spans: row.num_spans as i32,
            });
            for span in &self.spans[row.first_span..row.first_span + row.num_spans] {
                writer.put(span);
            }
        }
        Ok(writer.pos)
    }
}
