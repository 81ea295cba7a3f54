//! SVG path data from decoded outlines.

use std::fmt::{self, Write};

use kurbo::PathEl;

/// Accumulates path elements as an SVG path string.
#[derive(Clone, Default, Debug)]
pub struct SvgPath(String, Option<usize>);

impl SvgPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Formats coordinates with `precision` digits after the decimal.
    pub fn with_precision(precision: usize) -> Self {
        Self(String::default(), Some(precision))
    }

    fn point(&mut self, command: Option<char>, p: kurbo::Point) {
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        if let Some(command) = command {
            self.0.push(command);
        }
        let _ = if let Some(prec) = self.1 {
            write!(self.0, "{:.2$},{:.2$}", p.x, p.y, prec)
        } else {
            write!(self.0, "{},{}", p.x, p.y)
        };
    }

    pub fn push(&mut self, el: PathEl) {
        match el {
            PathEl::MoveTo(p) => self.point(Some('M'), p),
            PathEl::LineTo(p) => self.point(Some('L'), p),
            PathEl::QuadTo(c, p) => {
                self.point(Some('Q'), c);
                self.point(None, p);
            }
            PathEl::CurveTo(c0, c1, p) => {
                self.point(Some('C'), c0);
                self.point(None, c1);
                self.point(None, p);
            }
            PathEl::ClosePath => {
                if !self.0.is_empty() {
                    self.0.push(' ');
                }
                self.0.push('Z');
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Extend<PathEl> for SvgPath {
    fn extend<T: IntoIterator<Item = PathEl>>(&mut self, iter: T) {
        for el in iter {
            self.push(el);
        }
    }
}

impl From<SvgPath> for String {
    fn from(value: SvgPath) -> Self {
        value.0
    }
}

impl fmt::Display for SvgPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
