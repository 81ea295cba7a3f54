//! Gamma correction of coverage values.

/// Gamma function applied to anti-aliased coverage.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub enum Gamma {
    /// Coverage is used as is.
    #[default]
    None,
    /// `x.powf(gamma)`.
    Power(f64),
    /// Coverage below the threshold maps to 0, everything else to 1.
    Threshold(f64),
    /// Linear ramp from 0 at `start` to 1 at `end`.
    Linear { start: f64, end: f64 },
    /// `min(x * factor, 1)`.
    Multiply(f64),
}

impl Gamma {
    /// Evaluates the function for a coverage in `0.0..=1.0`.
    pub fn eval(&self, x: f64) -> f64 {
        match *self {
            Self::None => x,
            Self::Power(gamma) => x.powf(gamma),
            Self::Threshold(threshold) => {
                if x < threshold {
                    0.0
                } else {
                    1.0
                }
            }
            Self::Linear { start, end } => {
                if x < start {
                    0.0
                } else if x > end {
                    1.0
                } else {
                    (x - start) / (end - start)
                }
            }
            Self::Multiply(factor) => (x * factor).min(1.0),
        }
    }
}

/// Lookup table for a [`Gamma`] function over 8-bit coverage.
#[derive(Clone, Debug)]
pub struct GammaLut {
    table: [u8; 256],
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new(&Gamma::None)
    }
}

impl GammaLut {
    pub fn new(gamma: &Gamma) -> Self {
        let mut table = [0u8; 256];
        for (i, value) in table.iter_mut().enumerate() {
            let v = gamma.eval(i as f64 / 255.0) * 255.0;
            *value = if v.is_nan() {
                0
            } else {
                (v + 0.5).clamp(0.0, 255.0) as u8
            };
        }
        Self { table }
    }

    #[inline(always)]
    pub fn apply(&self, cover: u8) -> u8 {
        self.table[cover as usize]
    }
}
