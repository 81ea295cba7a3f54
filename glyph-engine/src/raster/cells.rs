//! Accumulation of area and cover cells along polygon edges.
//!
//! Coordinates are in 24.8 subpixel units. Every edge is split at pixel
//! boundaries; each touched pixel cell receives the signed height of the
//! edge within it (`cover`) and twice the area to its right (`area`).

use super::{POLY_SUBPIXEL_MASK, POLY_SUBPIXEL_SCALE, POLY_SUBPIXEL_SHIFT};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct Cell {
    pub x: i32,
    pub y: i32,
    pub cover: i32,
    pub area: i32,
}

impl Cell {
    const NONE: Self = Self {
        x: i32::MAX,
        y: i32::MAX,
        cover: 0,
        area: 0,
    };
}

// Longer horizontal runs are split to keep the area products in range.
const DX_LIMIT: i32 = 16384 << POLY_SUBPIXEL_SHIFT;

/// Largest magnitude of a subpixel coordinate. Differences of two
/// coordinates stay within `i32`.
pub(crate) const COORD_LIMIT: i32 = i32::MAX >> 2;

/// Maximum number of cells accumulated before the storage gives up.
pub const MAX_CELLS: usize = 1 << 22;

#[derive(Clone, Debug)]
pub(crate) struct CellStorage {
    cells: Vec<Cell>,
    current: Cell,
    sorted: bool,
    overflowed: bool,
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl Default for CellStorage {
    fn default() -> Self {
        Self {
            cells: Vec::new(),
            current: Cell::NONE,
            sorted: false,
            overflowed: false,
            min_x: i32::MAX,
            min_y: i32::MAX,
            max_x: i32::MIN,
            max_y: i32::MIN,
        }
    }
}

impl CellStorage {
    pub fn reset(&mut self) {
        self.cells.clear();
        self.current = Cell::NONE;
        self.sorted = false;
        self.overflowed = false;
        self.min_x = i32::MAX;
        self.min_y = i32::MAX;
        self.max_x = i32::MIN;
        self.max_y = i32::MIN;
    }

    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    pub fn max_x(&self) -> i32 {
        self.max_x
    }

    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn sorted(&self) -> bool {
        self.sorted
    }

    /// Returns true once more than [`MAX_CELLS`] cells were needed. The
    /// accumulated cells are incomplete from then on.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Cells of row `y` ordered by x. Only valid after [`sort_cells`](Self::sort_cells).
    pub fn scanline_cells(&self, y: i32) -> &[Cell] {
        let start = self.cells.partition_point(|cell| cell.y < y);
        let len = self.cells[start..].partition_point(|cell| cell.y == y);
        &self.cells[start..start + len]
    }

    /// The first row at or after `y` that has cells. Only valid after
    /// [`sort_cells`](Self::sort_cells).
    pub fn next_row(&self, y: i32) -> Option<i32> {
        let ix = self.cells.partition_point(|cell| cell.y < y);
        self.cells.get(ix).map(|cell| cell.y)
    }

    fn add_current_cell(&mut self) {
        if self.current.area | self.current.cover != 0 {
            if self.cells.len() >= MAX_CELLS {
                self.overflowed = true;
                return;
            }
            self.cells.push(self.current);
        }
    }

    fn set_current_cell(&mut self, x: i32, y: i32) {
        if self.current.x != x || self.current.y != y {
            self.add_current_cell();
            self.current = Cell {
                x,
                y,
                cover: 0,
                area: 0,
            };
        }
    }

    fn update_extents(&mut self, ex: i32, ey: i32) {
        self.min_x = self.min_x.min(ex);
        self.max_x = self.max_x.max(ex);
        self.min_y = self.min_y.min(ey);
        self.max_y = self.max_y.max(ey);
    }

    /// Accumulates an edge on a single cell row.
    fn render_hline(&mut self, ey: i32, x1: i32, y1: i32, x2: i32, y2: i32) {
        let mut ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let fx1 = x1 & POLY_SUBPIXEL_MASK;
        let fx2 = x2 & POLY_SUBPIXEL_MASK;

        // trivial case; happens often
        if y1 == y2 {
            self.set_current_cell(ex2, ey);
            return;
        }

        // everything is located in a single cell
        if ex1 == ex2 {
            let delta = y2 - y1;
            self.current.cover += delta;
            self.current.area += (fx1 + fx2) * delta;
            return;
        }

        // run of adjacent cells on the same row
        let mut p = (POLY_SUBPIXEL_SCALE - fx1) * (y2 - y1);
        let mut first = POLY_SUBPIXEL_SCALE;
        let mut incr = 1;
        let mut dx = x2 - x1;
        if dx < 0 {
            p = fx1 * (y2 - y1);
            first = 0;
            incr = -1;
            dx = -dx;
        }
        let mut delta = p / dx;
        let mut modulo = p % dx;
        if modulo < 0 {
            delta -= 1;
            modulo += dx;
        }
        self.current.cover += delta;
        self.current.area += (fx1 + first) * delta;

        ex1 += incr;
        self.set_current_cell(ex1, ey);
        let mut y1 = y1 + delta;

        if ex1 != ex2 {
            p = POLY_SUBPIXEL_SCALE * (y2 - y1 + delta);
            let mut lift = p / dx;
            let mut rem = p % dx;
            if rem < 0 {
                lift -= 1;
                rem += dx;
            }
            modulo -= dx;
            while ex1 != ex2 {
                if self.overflowed {
                    return;
                }
                delta = lift;
                modulo += rem;
                if modulo >= 0 {
                    modulo -= dx;
                    delta += 1;
                }
                self.current.cover += delta;
                self.current.area += POLY_SUBPIXEL_SCALE * delta;
                y1 += delta;
                ex1 += incr;
                self.set_current_cell(ex1, ey);
            }
        }
        delta = y2 - y1;
        self.current.cover += delta;
        self.current.area += (fx2 + POLY_SUBPIXEL_SCALE - first) * delta;
    }

    /// Accumulates the edge from (x1, y1) to (x2, y2). Coordinates must be
    /// within [`COORD_LIMIT`].
    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        if self.overflowed {
            return;
        }
        let dx = x2 - x1;
        if dx >= DX_LIMIT || dx <= -DX_LIMIT {
            let cx = ((x1 as i64 + x2 as i64) >> 1) as i32;
            let cy = ((y1 as i64 + y2 as i64) >> 1) as i32;
            self.line(x1, y1, cx, cy);
            self.line(cx, cy, x2, y2);
            return;
        }
        let mut dy = y2 - y1;
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let mut ey1 = y1 >> POLY_SUBPIXEL_SHIFT;
        let ey2 = y2 >> POLY_SUBPIXEL_SHIFT;
        let fy1 = y1 & POLY_SUBPIXEL_MASK;
        let fy2 = y2 & POLY_SUBPIXEL_MASK;

        self.update_extents(ex1, ey1);
        self.update_extents(ex2, ey2);
        self.set_current_cell(ex1, ey1);

        // everything is on a single row
        if ey1 == ey2 {
            self.render_hline(ey1, x1, fy1, x2, fy2);
            return;
        }

        let mut incr = 1;

        // vertical line: one cell per row with the same area and cover
        if dx == 0 {
            let ex = x1 >> POLY_SUBPIXEL_SHIFT;
            let two_fx = (x1 - (ex << POLY_SUBPIXEL_SHIFT)) << 1;
            let mut first = POLY_SUBPIXEL_SCALE;
            if dy < 0 {
                first = 0;
                incr = -1;
            }
            let mut delta = first - fy1;
            self.current.cover += delta;
            self.current.area += two_fx * delta;
            ey1 += incr;
            self.set_current_cell(ex, ey1);

            delta = first + first - POLY_SUBPIXEL_SCALE;
            let area = two_fx * delta;
            while ey1 != ey2 && !self.overflowed {
                self.current.cover = delta;
                self.current.area = area;
                ey1 += incr;
                self.set_current_cell(ex, ey1);
            }
            delta = fy2 - POLY_SUBPIXEL_SCALE + first;
            self.current.cover += delta;
            self.current.area += two_fx * delta;
            return;
        }

        // several rows
        let mut p = (POLY_SUBPIXEL_SCALE - fy1) * dx;
        let mut first = POLY_SUBPIXEL_SCALE;
        if dy < 0 {
            p = fy1 * dx;
            first = 0;
            incr = -1;
            dy = -dy;
        }
        let mut delta = p / dy;
        let mut modulo = p % dy;
        if modulo < 0 {
            delta -= 1;
            modulo += dy;
        }
        let mut x_from = x1 + delta;
        self.render_hline(ey1, x1, fy1, x_from, first);
        ey1 += incr;
        self.set_current_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey1);

        if ey1 != ey2 {
            p = POLY_SUBPIXEL_SCALE * dx;
            let mut lift = p / dy;
            let mut rem = p % dy;
            if rem < 0 {
                lift -= 1;
                rem += dy;
            }
            modulo -= dy;
            while ey1 != ey2 {
                if self.overflowed {
                    return;
                }
                delta = lift;
                modulo += rem;
                if modulo >= 0 {
                    modulo -= dy;
                    delta += 1;
                }
                let x_to = x_from + delta;
                self.render_hline(ey1, x_from, POLY_SUBPIXEL_SCALE - first, x_to, first);
                x_from = x_to;
                ey1 += incr;
                self.set_current_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey1);
            }
        }
        self.render_hline(ey1, x_from, POLY_SUBPIXEL_SCALE - first, x2, fy2);
    }

    /// Flushes the current cell and orders all cells by row, then column.
    pub fn sort_cells(&mut self) {
        if self.sorted {
            return;
        }
        self.add_current_cell();
        self.current = Cell::NONE;
        self.sorted = true;
        self.cells.sort_unstable_by_key(|cell| (cell.y, cell.x));
    }
}
