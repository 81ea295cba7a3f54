//! Text renders of serialized scanlines.

use glyph_engine::{scanline::AaSpan, BoundingBox, GlyphAdaptor};

const RAMP: &[u8] = b" .:-=+*#%@";

/// Coverage values of a glyph, row by row from the lowest y.
struct Grid {
    bounds: BoundingBox<i32>,
    width: usize,
    cells: Vec<u8>,
}

impl Grid {
    fn new(bounds: BoundingBox<i32>) -> Self {
        let width = (bounds.x_max - bounds.x_min + 1).max(0) as usize;
        let height = (bounds.y_max - bounds.y_min + 1).max(0) as usize;
        Self {
            bounds,
            width,
            cells: vec![0; width * height],
        }
    }

    fn set(&mut self, x: i32, y: i32, cover: u8) {
        let (Ok(col), Ok(row)) = (
            usize::try_from(x - self.bounds.x_min),
            usize::try_from(y - self.bounds.y_min),
        ) else {
            return;
        };
        if col < self.width {
            if let Some(cell) = self.cells.get_mut(row * self.width + col) {
                *cell = cover;
            }
        }
    }

    fn render(&self, y_down: bool) -> String {
        let mut rows: Vec<&[u8]> = self.cells.chunks(self.width.max(1)).collect();
        if !y_down {
            rows.reverse();
        }
        let mut out = String::new();
        for row in rows {
            out.extend(
                row.iter()
                    .map(|&cover| RAMP[cover as usize * (RAMP.len() - 1) / 255] as char),
            );
            out.push('\n');
        }
        out
    }
}

/// Draws the glyph with one character per pixel, darker characters for
/// higher coverage. Returns `None` for outlines and glyphs without rows.
///
/// With `y_down` rows are printed from the lowest y, otherwise from the
/// highest.
pub fn render(adaptor: &GlyphAdaptor, y_down: bool) -> Option<String> {
    let grid = match adaptor {
        GlyphAdaptor::Mono(scanlines) => {
            scanlines.rows().next()?;
            let mut grid = Grid::new(scanlines.bounds()?);
            for row in scanlines.rows() {
                for (x, len) in row.spans() {
                    for x in x..x + len {
                        grid.set(x, row.y, 255);
                    }
                }
            }
            grid
        }
        GlyphAdaptor::Gray8(scanlines) => {
            scanlines.rows().next()?;
            let mut grid = Grid::new(scanlines.bounds()?);
            for row in scanlines.rows() {
                for AaSpan { x, covers } in row.spans() {
                    for (x, &cover) in (x..).zip(covers) {
                        grid.set(x, row.y, cover);
                    }
                }
            }
            grid
        }
        GlyphAdaptor::Outline(_) => return None,
    };
    Some(grid.render(y_down))
}
