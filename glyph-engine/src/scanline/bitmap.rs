//! Conversion of font library bitmaps to scanlines.

use super::{
    Scanline, ScanlineBin, ScanlineStorage, ScanlineStorageAa, ScanlineStorageBin, ScanlineU8,
    COVER_FULL,
};

/// Borrowed view of a rendered glyph bitmap.
///
/// Rows are `pitch` bytes apart. A negative pitch means the rows are stored
/// bottom to top in memory; [`row`](Self::row) always counts from the
/// visual top.
#[derive(Copy, Clone, Default, Debug)]
pub struct Bitmap<'a> {
    pub width: u32,
    pub rows: u32,
    pub pitch: i32,
    pub buffer: &'a [u8],
}

impl<'a> Bitmap<'a> {
    pub fn new(width: u32, rows: u32, pitch: i32, buffer: &'a [u8]) -> Self {
        Self {
            width,
            rows,
            pitch,
            buffer,
        }
    }

    /// Returns true if the bitmap has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.rows == 0
    }

    /// Returns the bytes of the row at `index` from the top. Rows outside
    /// the bitmap or the buffer are empty.
    pub fn row(&self, index: u32) -> &'a [u8] {
        if index >= self.rows {
            return &[];
        }
        let stride = self.pitch.unsigned_abs() as usize;
        let memory_row = if self.pitch >= 0 {
            index
        } else {
            self.rows - 1 - index
        };
        let start = memory_row as usize * stride;
        let end = (start + stride).min(self.buffer.len());
        self.buffer.get(start..end).unwrap_or_default()
    }
}

/// Walks the bitmap rows in output order, calling `emit` for each source
/// row and finalizing rows that produced spans.
fn convert<S: ScanlineStorage>(
    bitmap: &Bitmap,
    x: i32,
    y: i32,
    flip_y: bool,
    scanline: &mut S::Scanline,
    storage: &mut S,
    mut emit: impl FnMut(&[u8], &mut S::Scanline),
) {
    scanline.reset(x, x + bitmap.width as i32);
    storage.prepare();
    let rows = bitmap.rows;
    let y = if flip_y { y + rows as i32 } else { y };
    for i in 0..rows {
        scanline.reset_spans();
        let source = if flip_y { rows - 1 - i } else { i };
        emit(bitmap.row(source), scanline);
        if scanline.num_spans() != 0 {
            scanline.finalize(y - i as i32 - 1);
            storage.render(scanline);
        }
    }
}

/// Converts a 1-bit bitmap with its top left corner at (x, y) into binary
/// scanlines.
///
/// Without `flip_y` the y axis points up: source row `i` lands on
/// `y - i - 1`. With `flip_y` the y axis points down and the bitmap is
/// walked from its bottom row, so the origin moves to `y + rows`.
pub fn convert_mono(
    bitmap: &Bitmap,
    x: i32,
    y: i32,
    flip_y: bool,
    scanline: &mut ScanlineBin,
    storage: &mut ScanlineStorageBin,
) {
    let width = bitmap.width;
    convert(bitmap, x, y, flip_y, scanline, storage, |row, scanline| {
        for j in 0..width {
            let byte = row.get((j / 8) as usize).copied().unwrap_or(0);
            if byte & (0x80 >> (j % 8)) != 0 {
                scanline.add_cell(x + j as i32, COVER_FULL);
            }
        }
    });
}

/// Converts an 8-bit coverage bitmap into anti-aliased scanlines.
///
/// Zero bytes are skipped; other values are mapped through `gamma`. Row
/// placement follows [`convert_mono`].
pub fn convert_gray8(
    bitmap: &Bitmap,
    x: i32,
    y: i32,
    flip_y: bool,
    gamma: impl Fn(u8) -> u8,
    scanline: &mut ScanlineU8,
    storage: &mut ScanlineStorageAa,
) {
    let width = bitmap.width as usize;
    convert(bitmap, x, y, flip_y, scanline, storage, |row, scanline| {
        for (j, &value) in row.iter().take(width).enumerate() {
            if value != 0 {
                scanline.add_cell(x + j as i32, gamma(value));
            }
        }
    });
}
