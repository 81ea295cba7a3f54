/// Minimum and maximum extents of a rectangular region.
///
/// Integer boxes produced by the glyph engine are end-exclusive: a box with
/// `x_min == x_max` is empty along x.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox<T> {
    pub x_min: T,
    /// Bottom edge when y points up, top edge when it points down.
    pub y_min: T,
    pub x_max: T,
    pub y_max: T,
}

impl<T> BoundingBox<T> {
    /// Creates a box from its extents.
    pub const fn new(x_min: T, y_min: T, x_max: T, y_max: T) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }
}
