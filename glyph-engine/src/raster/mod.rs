//! Anti-aliased scanline rasterizer.
//!
//! Polygons are accumulated as area/cover cells with 8 bits of subpixel
//! precision and swept row by row into [`Scanline`]s using the non-zero
//! winding rule. Coverage is mapped through a gamma table before it is
//! stored.

mod cells;
mod curves;
mod gamma;

pub use cells::MAX_CELLS;
pub use curves::{CurveApproximation, DEFAULT_APPROXIMATION_SCALE};
pub use gamma::{Gamma, GammaLut};

use kurbo::PathEl;

use crate::scanline::{Scanline, ScanlineStorage};
use cells::{CellStorage, COORD_LIMIT};

pub(crate) const POLY_SUBPIXEL_SHIFT: i32 = 8;
pub(crate) const POLY_SUBPIXEL_SCALE: i32 = 1 << POLY_SUBPIXEL_SHIFT;
pub(crate) const POLY_SUBPIXEL_MASK: i32 = POLY_SUBPIXEL_SCALE - 1;

const AA_SHIFT: i32 = 8;
const AA_MASK: i32 = (1 << AA_SHIFT) - 1;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Status {
    Initial,
    MoveTo,
    LineTo,
    Closed,
}

/// Scanline polygon rasterizer.
#[derive(Clone, Debug)]
pub struct Rasterizer {
    cells: CellStorage,
    gamma: GammaLut,
    start: (i32, i32),
    current: (i32, i32),
    status: Status,
    scan_y: i32,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self {
            cells: CellStorage::default(),
            gamma: GammaLut::default(),
            start: (0, 0),
            current: (0, 0),
            status: Status::Initial,
            scan_y: 0,
        }
    }
}

fn upscale(v: f64) -> i32 {
    ((v * POLY_SUBPIXEL_SCALE as f64).round() as i32).clamp(-COORD_LIMIT, COORD_LIMIT)
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all accumulated polygons.
    pub fn reset(&mut self) {
        self.cells.reset();
        self.status = Status::Initial;
    }

    pub fn set_gamma(&mut self, gamma: &Gamma) {
        self.gamma = GammaLut::new(gamma);
    }

    /// Maps a coverage value through the gamma table.
    #[inline(always)]
    pub fn apply_gamma(&self, cover: u8) -> u8 {
        self.gamma.apply(cover)
    }

    /// Starts a new polygon at (x, y) pixels, closing the previous one.
    pub fn move_to_d(&mut self, x: f64, y: f64) {
        if self.cells.sorted() {
            self.reset();
        }
        self.close_polygon();
        self.start = (upscale(x), upscale(y));
        self.current = self.start;
        self.status = Status::MoveTo;
    }

    /// Adds an edge to (x, y) pixels.
    pub fn line_to_d(&mut self, x: f64, y: f64) {
        if self.cells.sorted() {
            self.reset();
        }
        let to = (upscale(x), upscale(y));
        self.cells.line(self.current.0, self.current.1, to.0, to.1);
        self.current = to;
        self.status = Status::LineTo;
    }

    /// Closes the current polygon with an edge back to its start.
    pub fn close_polygon(&mut self) {
        if self.status == Status::LineTo {
            let (x, y) = self.start;
            self.cells.line(self.current.0, self.current.1, x, y);
            self.current = self.start;
            self.status = Status::Closed;
        }
    }

    /// Adds a path, flattening its curves with `curves`.
    pub fn add_path(&mut self, path: impl IntoIterator<Item = PathEl>, curves: &CurveApproximation) {
        curves.flatten(path, |el| match el {
            PathEl::MoveTo(p) => self.move_to_d(p.x, p.y),
            PathEl::LineTo(p) => self.line_to_d(p.x, p.y),
            PathEl::ClosePath => self.close_polygon(),
            // flattening leaves no curves behind
            PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => self.line_to_d(p.x, p.y),
        });
    }

    pub fn min_x(&self) -> i32 {
        self.cells.min_x()
    }

    pub fn min_y(&self) -> i32 {
        self.cells.min_y()
    }

    pub fn max_x(&self) -> i32 {
        self.cells.max_x()
    }

    pub fn max_y(&self) -> i32 {
        self.cells.max_y()
    }

    /// Returns true if the accumulated polygons needed more than
    /// [`MAX_CELLS`] cells. Such a rasterizer sweeps nothing until reset.
    pub fn overflowed(&self) -> bool {
        self.cells.overflowed()
    }

    /// Closes and sorts the accumulated polygons. Returns false if nothing
    /// was accumulated or the cell limit was exceeded.
    pub fn rewind_scanlines(&mut self) -> bool {
        self.close_polygon();
        if self.cells.overflowed() {
            return false;
        }
        self.cells.sort_cells();
        if self.cells.total_cells() == 0 {
            return false;
        }
        self.scan_y = self.cells.min_y();
        true
    }

    fn calculate_alpha(&self, area: i32) -> u8 {
        let cover = (area >> (POLY_SUBPIXEL_SHIFT * 2 + 1 - AA_SHIFT))
            .unsigned_abs()
            .min(AA_MASK as u32);
        self.gamma.apply(cover as u8)
    }

    /// Fills `scanline` with the next row that has coverage. Returns false
    /// once all rows were swept.
    pub fn sweep_scanline<S: Scanline>(&mut self, scanline: &mut S) -> bool {
        loop {
            // skip empty rows
            match self.cells.next_row(self.scan_y) {
                Some(y) => self.scan_y = y,
                None => return false,
            }
            scanline.reset_spans();
            let cells = self.cells.scanline_cells(self.scan_y);
            let mut cover = 0;
            let mut ix = 0;
            while ix < cells.len() {
                let mut x = cells[ix].x;
                let mut area = cells[ix].area;
                cover += cells[ix].cover;
                ix += 1;
                // accumulate all cells with the same x
                while ix < cells.len() && cells[ix].x == x {
                    area += cells[ix].area;
                    cover += cells[ix].cover;
                    ix += 1;
                }
                if area != 0 {
                    let alpha = self.calculate_alpha((cover << (POLY_SUBPIXEL_SHIFT + 1)) - area);
                    if alpha != 0 {
                        scanline.add_cell(x, alpha);
                    }
                    x += 1;
                }
                if let Some(next) = cells.get(ix) {
                    if next.x > x {
                        let alpha = self.calculate_alpha(cover << (POLY_SUBPIXEL_SHIFT + 1));
                        if alpha != 0 {
                            scanline.add_span(x, (next.x - x) as u32, alpha);
                        }
                    }
                }
            }
            if scanline.num_spans() != 0 {
                break;
            }
            self.scan_y += 1;
        }
        scanline.finalize(self.scan_y);
        self.scan_y += 1;
        true
    }
}

/// Sweeps every row of the rasterizer into `storage`.
pub fn render_scanlines<St: ScanlineStorage>(
    rasterizer: &mut Rasterizer,
    scanline: &mut St::Scanline,
    storage: &mut St,
) {
    if rasterizer.rewind_scanlines() {
        scanline.reset(rasterizer.min_x(), rasterizer.max_x());
        while rasterizer.sweep_scanline(scanline) {
            storage.render(scanline);
        }
    }
}
