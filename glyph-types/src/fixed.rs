//! 26.6 fixed point numbers.

/// 32-bit signed fixed point number with 6 bits of fraction.
///
/// This is the coordinate format used by FreeType for outlines, advances
/// and kerning: one unit is 1/64 of a pixel.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct F26Dot6(i32);

impl F26Dot6 {
    /// Minimum value.
    pub const MIN: Self = Self(i32::MIN);

    /// Maximum value.
    pub const MAX: Self = Self(i32::MAX);

    /// The value 0.
    pub const ZERO: Self = Self(0);

    /// The value 1.0.
    pub const ONE: Self = Self(1 << Self::FRACT_BITS);

    const FRACT_BITS: u32 = 6;
    const SCALE: f64 = 64.0;

    /// Creates a value from its raw bit representation.
    #[inline(always)]
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// Returns the raw bit representation.
    #[inline(always)]
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    /// Creates a value with the given integral part.
    pub const fn from_i32(value: i32) -> Self {
        Self(value << Self::FRACT_BITS)
    }

    /// Converts from pixels.
    ///
    /// The scaled value is biased by half a unit and truncated toward zero.
    /// Out of range values saturate.
    #[inline(always)]
    pub fn from_f64(value: f64) -> Self {
        Self((value * Self::SCALE + 0.5) as i32)
    }

    /// Converts to pixels.
    #[inline(always)]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE
    }

    /// Returns the midpoint of two values.
    ///
    /// The sum is halved with truncation toward zero, the way an implied
    /// on-curve point between two conic controls is computed.
    pub fn midpoint(self, other: Self) -> Self {
        Self(((self.0 as i64 + other.0 as i64) / 2) as i32)
    }
}

impl std::fmt::Debug for F26Dot6 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl std::fmt::Display for F26Dot6 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}
