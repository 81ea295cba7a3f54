//! Glyph outlines as described by a font library and their conversion to
//! paths.

mod decompose;

pub use decompose::{decompose, PathCommand, PathSink};

use crate::{F26Dot6, Point};

/// Classification of an outline point.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum PointTag {
    /// Point on the curve.
    OnCurve,
    /// Quadratic control point.
    Conic,
    /// Cubic control point. These always appear in pairs.
    Cubic,
}

impl PointTag {
    /// Decodes a FreeType style point tag.
    ///
    /// Only the low two bits are significant: 1 for on-curve, 0 for a
    /// conic control and anything else for a cubic control.
    pub fn from_bits(tag: u8) -> Self {
        match tag & 3 {
            1 => Self::OnCurve,
            0 => Self::Conic,
            _ => Self::Cubic,
        }
    }
}

/// Borrowed view of a glyph outline.
///
/// Coordinates are in 26.6 fixed point. Each entry in `contours` is the
/// inclusive index of the last point of a contour.
#[derive(Copy, Clone, Default, Debug)]
pub struct Outline<'a> {
    pub points: &'a [Point<F26Dot6>],
    pub tags: &'a [PointTag],
    pub contours: &'a [usize],
}

impl<'a> Outline<'a> {
    pub fn new(
        points: &'a [Point<F26Dot6>],
        tags: &'a [PointTag],
        contours: &'a [usize],
    ) -> Self {
        Self {
            points,
            tags,
            contours,
        }
    }

    /// Returns true if the outline has no contours.
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }
}

/// Owned outline storage.
///
/// Font library backends copy the outline of the current glyph here so it
/// can be handed out as an [`Outline`].
#[derive(Clone, Default, Debug)]
pub struct OutlineBuf {
    pub points: Vec<Point<F26Dot6>>,
    pub tags: Vec<PointTag>,
    pub contours: Vec<usize>,
}

impl OutlineBuf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.tags.clear();
        self.contours.clear();
    }

    /// Appends a contour given as raw 26.6 coordinates with their tags.
    pub fn push_contour(
        &mut self,
        points: impl IntoIterator<Item = (i32, i32, PointTag)>,
    ) -> &mut Self {
        let start = self.points.len();
        for (x, y, tag) in points {
            self.points
                .push(Point::new(F26Dot6::from_bits(x), F26Dot6::from_bits(y)));
            self.tags.push(tag);
        }
        if self.points.len() > start {
            self.contours.push(self.points.len() - 1);
        }
        self
    }

    pub fn as_outline(&self) -> Outline<'_> {
        Outline::new(&self.points, &self.tags, &self.contours)
    }
}
