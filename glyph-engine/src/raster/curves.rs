//! Curve flattening ahead of rasterization.

use kurbo::PathEl;

/// Default approximation scale.
pub const DEFAULT_APPROXIMATION_SCALE: f64 = 4.0;

/// Converts quadratic and cubic segments to line segments.
///
/// The maximum distance between a curve and its approximation is
/// `0.5 / scale` pixels, so larger scales produce more segments.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct CurveApproximation {
    scale: f64,
}

impl Default for CurveApproximation {
    fn default() -> Self {
        Self {
            scale: DEFAULT_APPROXIMATION_SCALE,
        }
    }
}

impl CurveApproximation {
    /// Creates an approximation with the given scale. Non-positive or non
    /// finite values fall back to the default.
    pub fn new(scale: f64) -> Self {
        if scale.is_finite() && scale > 0.0 {
            Self { scale }
        } else {
            Self::default()
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn tolerance(&self) -> f64 {
        0.5 / self.scale
    }

    /// Flattens `path`, passing move, line and close elements to `sink`.
    pub fn flatten(&self, path: impl IntoIterator<Item = PathEl>, sink: impl FnMut(PathEl)) {
        kurbo::flatten(path, self.tolerance(), sink);
    }
}
