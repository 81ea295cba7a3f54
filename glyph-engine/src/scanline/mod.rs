//! Scanline containers, storages and bitmap conversion.
//!
//! A scanline collects the covered cells of one pixel row and merges
//! horizontally adjacent cells into spans. Once a row is complete it is
//! finalized with its y coordinate and rendered into a storage, which keeps
//! every row of a glyph and can serialize them.

mod bitmap;
mod serialized;
mod storage;

pub use bitmap::{convert_gray8, convert_mono, Bitmap};
pub use serialized::{
    AaRow, AaRows, AaSpan, AaSpans, BinRow, BinRows, BinSpans, SerializedAaScanlines,
    SerializedBinScanlines,
};
pub use storage::{ScanlineStorage, ScanlineStorageAa, ScanlineStorageBin};

/// Full coverage value.
pub const COVER_FULL: u8 = 255;

/// Row of coverage cells being assembled.
pub trait Scanline {
    /// Prepares for rows with cells in `min_x..=max_x`.
    fn reset(&mut self, min_x: i32, max_x: i32);

    /// Drops the spans of the current row.
    fn reset_spans(&mut self);

    /// Adds a single cell.
    fn add_cell(&mut self, x: i32, cover: u8);

    /// Adds `len` cells starting at `x`, all with the same coverage.
    fn add_span(&mut self, x: i32, len: u32, cover: u8);

    /// Completes the current row and assigns its y coordinate.
    fn finalize(&mut self, y: i32);

    fn num_spans(&self) -> usize;

    /// The y coordinate assigned by the last [`finalize`](Self::finalize).
    fn y(&self) -> i32;
}

/// Horizontal run of cells without coverage.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BinSpan {
    pub x: i32,
    pub len: i32,
}

/// Scanline recording only which cells are covered.
#[derive(Clone, Debug)]
pub struct ScanlineBin {
    last_x: i32,
    y: i32,
    spans: Vec<BinSpan>,
}

impl Default for ScanlineBin {
    fn default() -> Self {
        Self {
            last_x: LAST_X_NONE,
            y: 0,
            spans: Vec::new(),
        }
    }
}

// A value no cell can follow.
const LAST_X_NONE: i32 = i32::MIN + 1;

impl ScanlineBin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spans(&self) -> &[BinSpan] {
        &self.spans
    }

    fn push(&mut self, x: i32, len: i32) {
        match self.spans.last_mut() {
            Some(span) if x == self.last_x + 1 => span.len += len,
            _ => self.spans.push(BinSpan { x, len }),
        }
        self.last_x = x + len - 1;
    }
}

impl Scanline for ScanlineBin {
    fn reset(&mut self, _min_x: i32, _max_x: i32) {
        self.reset_spans();
    }

    fn reset_spans(&mut self) {
        self.last_x = LAST_X_NONE;
        self.spans.clear();
    }

    fn add_cell(&mut self, x: i32, _cover: u8) {
        self.push(x, 1);
    }

    fn add_span(&mut self, x: i32, len: u32, _cover: u8) {
        if len > 0 {
            self.push(x, len as i32);
        }
    }

    fn finalize(&mut self, y: i32) {
        self.y = y;
    }

    fn num_spans(&self) -> usize {
        self.spans.len()
    }

    fn y(&self) -> i32 {
        self.y
    }
}

#[derive(Copy, Clone, Debug)]
struct AaSpanData {
    x: i32,
    len: i32,
    // index into the cover array
    start: usize,
}

/// Scanline with one coverage byte per cell.
///
/// Coverage is kept in a row wide array indexed by `x - min_x`, so cells
/// must be added in increasing x order.
#[derive(Clone, Debug)]
pub struct ScanlineU8 {
    min_x: i32,
    last_x: i32,
    y: i32,
    covers: Vec<u8>,
    spans: Vec<AaSpanData>,
}

impl Default for ScanlineU8 {
    fn default() -> Self {
        Self {
            min_x: 0,
            last_x: LAST_X_NONE,
            y: 0,
            covers: Vec::new(),
            spans: Vec::new(),
        }
    }
}

impl ScanlineU8 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the spans of the current row as `(x, covers)` pairs.
    pub fn spans(&self) -> impl Iterator<Item = (i32, &[u8])> + '_ {
        self.spans.iter().map(|span| {
            (
                span.x,
                &self.covers[span.start..span.start + span.len as usize],
            )
        })
    }

    fn cover_range(&mut self, x: i32, len: usize) -> Option<std::ops::Range<usize>> {
        let start = usize::try_from(x.checked_sub(self.min_x)?).ok()?;
        let end = start + len;
        if end > self.covers.len() {
            self.covers.resize(end, 0);
        }
        Some(start..end)
    }

    fn push(&mut self, x: i32, covers: std::ops::Range<usize>) {
        let len = covers.len() as i32;
        match self.spans.last_mut() {
            Some(span) if x == self.last_x + 1 => span.len += len,
            _ => self.spans.push(AaSpanData {
                x,
                len,
                start: covers.start,
            }),
        }
        self.last_x = x + len - 1;
    }
}

impl Scanline for ScanlineU8 {
    fn reset(&mut self, min_x: i32, max_x: i32) {
        let len = (max_x as i64 - min_x as i64 + 2).clamp(0, u16::MAX as i64) as usize;
        if len > self.covers.len() {
            self.covers.resize(len, 0);
        }
        self.min_x = min_x;
        self.reset_spans();
    }

    fn reset_spans(&mut self) {
        self.last_x = LAST_X_NONE;
        self.spans.clear();
    }

    fn add_cell(&mut self, x: i32, cover: u8) {
        if let Some(range) = self.cover_range(x, 1) {
            self.covers[range.start] = cover;
            self.push(x, range);
        }
    }

    fn add_span(&mut self, x: i32, len: u32, cover: u8) {
        if len == 0 {
            return;
        }
        if let Some(range) = self.cover_range(x, len as usize) {
            self.covers[range.clone()].fill(cover);
            self.push(x, range);
        }
    }

    fn finalize(&mut self, y: i32) {
        self.y = y;
    }

    fn num_spans(&self) -> usize {
        self.spans.len()
    }

    fn y(&self) -> i32 {
        self.y
    }
}
