use super::model::Model;
use rug::Float;

/// Significand bits of IEEE-754 binary32; the rounding unit is `2^-24`
pub const SINGLE_UNIT_BITS: u32 = 24;

/// Significand bits of IEEE-754 binary64; the rounding unit is `2^-53`
pub const DOUBLE_UNIT_BITS: u32 = 53;

/// Working precision for centers and error bounds
pub const DEFAULT_PRECISION: u32 = 256;

/// Smallest working precision a model accepts
pub const MIN_PRECISION: u32 = 53;

/// `2^-bits` at precision `prec`; exact for every `prec >= 1`
pub fn unit_from_bits(bits: u32, prec: u32) -> Float {
    Float::with_val(prec, 1) >> bits
}

impl Model {
    /// Rounding unit of binary32 arithmetic
    pub fn single() -> Self {
        Model::from_parts(unit_from_bits(SINGLE_UNIT_BITS, DEFAULT_PRECISION), DEFAULT_PRECISION)
    }

    /// Rounding unit of binary64 arithmetic
    pub fn double() -> Self {
        Model::from_parts(unit_from_bits(DOUBLE_UNIT_BITS, DEFAULT_PRECISION), DEFAULT_PRECISION)
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::single()
    }
}
