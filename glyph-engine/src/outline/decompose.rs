//! FreeType style outline to path conversion.

use kurbo::Affine;

use super::{Outline, PointTag};
use crate::{error::DecomposeError, F26Dot6, Point};

/// Interface for accepting a sequence of path commands in 26.6 fixed point.
pub trait PathSink {
    /// Begin a new contour at (x, y).
    fn move_to(&mut self, x: F26Dot6, y: F26Dot6);

    /// Line segment from the current point to (x, y).
    fn line_to(&mut self, x: F26Dot6, y: F26Dot6);

    /// Quadratic segment with a control point at (cx, cy) ending at (x, y).
    fn curve3(&mut self, cx: F26Dot6, cy: F26Dot6, x: F26Dot6, y: F26Dot6);

    /// Cubic segment with control points at (cx0, cy0) and (cx1, cy1)
    /// ending at (x, y).
    fn curve4(
        &mut self,
        cx0: F26Dot6,
        cy0: F26Dot6,
        cx1: F26Dot6,
        cy1: F26Dot6,
        x: F26Dot6,
        y: F26Dot6,
    );

    /// Close the current contour with a straight line to its start.
    fn close_polygon(&mut self);
}

/// Single path command.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PathCommand {
    MoveTo {
        x: F26Dot6,
        y: F26Dot6,
    },
    LineTo {
        x: F26Dot6,
        y: F26Dot6,
    },
    Curve3 {
        cx: F26Dot6,
        cy: F26Dot6,
        x: F26Dot6,
        y: F26Dot6,
    },
    Curve4 {
        cx0: F26Dot6,
        cy0: F26Dot6,
        cx1: F26Dot6,
        cy1: F26Dot6,
        x: F26Dot6,
        y: F26Dot6,
    },
    Close,
}

impl PathSink for Vec<PathCommand> {
    fn move_to(&mut self, x: F26Dot6, y: F26Dot6) {
        self.push(PathCommand::MoveTo { x, y })
    }

    fn line_to(&mut self, x: F26Dot6, y: F26Dot6) {
        self.push(PathCommand::LineTo { x, y })
    }

    fn curve3(&mut self, cx: F26Dot6, cy: F26Dot6, x: F26Dot6, y: F26Dot6) {
        self.push(PathCommand::Curve3 { cx, cy, x, y })
    }

    fn curve4(
        &mut self,
        cx0: F26Dot6,
        cy0: F26Dot6,
        cx1: F26Dot6,
        cy1: F26Dot6,
        x: F26Dot6,
        y: F26Dot6,
    ) {
        self.push(PathCommand::Curve4 {
            cx0,
            cy0,
            cx1,
            cy1,
            x,
            y,
        })
    }

    fn close_polygon(&mut self) {
        self.push(PathCommand::Close)
    }
}

/// How a contour walk terminated.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum ContourEnd {
    /// All points were consumed; the contour needs an explicit close.
    Close,
    /// The last segment was a curve back to the start point.
    CurveClose,
}

/// Converts an outline to path commands, invoking the appropriate callback
/// on the given sink for each.
///
/// Every coordinate is converted to pixels, negated in y if `flip_y` is set,
/// mapped through `transform` and converted back to 26.6 fixed point.
///
/// This is roughly equivalent to [`FT_Outline_Decompose`](https://freetype.org/freetype2/docs/reference/ft2-outline_processing.html#ft_outline_decompose).
///
/// On error, commands for previous contours (and possibly a prefix of the
/// failing one) have already been sent to the sink. Callers that need an
/// all or nothing result should roll the sink back.
pub fn decompose(
    outline: &Outline,
    flip_y: bool,
    transform: &Affine,
    sink: &mut impl PathSink,
) -> Result<(), DecomposeError> {
    if outline.points.len() != outline.tags.len() {
        return Err(DecomposeError::PointTagMismatch {
            num_points: outline.points.len(),
            num_tags: outline.tags.len(),
        });
    }
    let mut walker = ContourWalker {
        points: outline.points,
        tags: outline.tags,
        flip_y,
        transform: *transform,
        sink,
    };
    let mut first = 0;
    for (contour_ix, &last) in outline.contours.iter().enumerate() {
        if last < first || last >= outline.points.len() {
            return Err(DecomposeError::ContourOrder(contour_ix));
        }
        if walker.contour(first, last)? == ContourEnd::Close {
            walker.sink.close_polygon();
        }
        first = last + 1;
    }
    Ok(())
}

struct ContourWalker<'a, S> {
    points: &'a [Point<F26Dot6>],
    tags: &'a [PointTag],
    flip_y: bool,
    transform: Affine,
    sink: &'a mut S,
}

impl<S: PathSink> ContourWalker<'_, S> {
    /// Walks the points in `first..=last`.
    fn contour(&mut self, first: usize, last: usize) -> Result<ContourEnd, DecomposeError> {
        let points = self.points;
        let tags = self.tags;
        let mut start = points[first];
        let mut limit = last;
        let mut next = first + 1;
        match tags[first] {
            PointTag::Cubic => return Err(DecomposeError::CubicStart(first)),
            PointTag::Conic => {
                let last_point = points[last];
                if tags[last] == PointTag::OnCurve {
                    // start at the last point and leave it out of the walk
                    start = last_point;
                    limit = last - 1;
                } else {
                    start = midpoint(start, last_point);
                }
                next = first;
            }
            PointTag::OnCurve => {}
        }
        self.move_to(start);
        while next <= limit {
            match tags[next] {
                PointTag::OnCurve => {
                    self.line_to(points[next]);
                    next += 1;
                }
                PointTag::Conic => {
                    let mut control = points[next];
                    let mut ix = next;
                    loop {
                        if ix == limit {
                            self.curve3(control, start);
                            return Ok(ContourEnd::CurveClose);
                        }
                        ix += 1;
                        let point = points[ix];
                        match tags[ix] {
                            PointTag::OnCurve => {
                                self.curve3(control, point);
                                break;
                            }
                            PointTag::Conic => {
                                self.curve3(control, midpoint(control, point));
                                control = point;
                            }
                            PointTag::Cubic => {
                                return Err(DecomposeError::ExpectedConicOrOnCurve(ix))
                            }
                        }
                    }
                    next = ix + 1;
                }
                PointTag::Cubic => {
                    if next + 1 > limit || tags[next + 1] != PointTag::Cubic {
                        return Err(DecomposeError::ExpectedCubic(next + 1));
                    }
                    let (control0, control1) = (points[next], points[next + 1]);
                    let end = next + 2;
                    if end > limit {
                        self.curve4(control0, control1, start);
                        return Ok(ContourEnd::CurveClose);
                    }
                    self.curve4(control0, control1, points[end]);
                    next = end + 1;
                }
            }
        }
        Ok(ContourEnd::Close)
    }

    fn map(&self, point: Point<F26Dot6>) -> (F26Dot6, F26Dot6) {
        let x = point.x.to_f64();
        let mut y = point.y.to_f64();
        if self.flip_y {
            y = -y;
        }
        let p = self.transform * kurbo::Point::new(x, y);
        (F26Dot6::from_f64(p.x), F26Dot6::from_f64(p.y))
    }

    fn move_to(&mut self, p: Point<F26Dot6>) {
        let (x, y) = self.map(p);
        self.sink.move_to(x, y);
    }

    fn line_to(&mut self, p: Point<F26Dot6>) {
        let (x, y) = self.map(p);
        self.sink.line_to(x, y);
    }

    fn curve3(&mut self, control: Point<F26Dot6>, p: Point<F26Dot6>) {
        let (cx, cy) = self.map(control);
        let (x, y) = self.map(p);
        self.sink.curve3(cx, cy, x, y);
    }

    fn curve4(&mut self, control0: Point<F26Dot6>, control1: Point<F26Dot6>, p: Point<F26Dot6>) {
        let (cx0, cy0) = self.map(control0);
        let (cx1, cy1) = self.map(control1);
        let (x, y) = self.map(p);
        self.sink.curve4(cx0, cy0, cx1, cy1, x, y);
    }
}

fn midpoint(a: Point<F26Dot6>, b: Point<F26Dot6>) -> Point<F26Dot6> {
    Point::new(a.x.midpoint(b.x), a.y.midpoint(b.y))
}
