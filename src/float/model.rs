//! Rounding model: the unit added by each rounding step and the working
//! precision used to derive bounds

use super::constants::{DEFAULT_PRECISION, MIN_PRECISION, SINGLE_UNIT_BITS, unit_from_bits};
use super::value::AbstractFloat;
use crate::mpfr::{binary, mpfr_add};
use rug::{Assign, Float, float::Round};
use tracing::{debug, trace};

/// Parameters shared by every derivation: the rounding unit of the target
/// format and the MPFR precision that centers and bounds are carried at
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    unit: Float,
    prec: u32,
}

impl Model {
    pub(crate) fn from_parts(unit: Float, prec: u32) -> Self {
        Model { unit, prec }
    }

    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }

    /// Relative error introduced by one final rounding step
    #[inline]
    pub fn unit(&self) -> &Float {
        &self.unit
    }

    #[inline]
    pub fn prec(&self) -> u32 {
        self.prec
    }

    /// An exact literal: no rounding history, zero error
    pub fn literal<T>(&self, value: T) -> AbstractFloat
    where
        Float: Assign<T>,
    {
        let value = Float::with_val(self.prec, value);
        if !value.is_finite() {
            return AbstractFloat::Any;
        }
        AbstractFloat::Valued {
            value,
            error: self.zero(),
        }
    }

    /// A computed value with a caller-supplied relative error bound.
    ///
    /// Fails on a negative or NaN bound. A bound of 1 or more carries no
    /// information and yields `Any`; a zero center forces the bound to 0.
    pub fn bounded<T>(&self, value: T, error: f64) -> Result<AbstractFloat, FloatError>
    where
        Float: Assign<T>,
    {
        if error.is_nan() {
            return Err(FloatError::NanError);
        }
        if error < 0.0 {
            return Err(FloatError::NegativeError { error });
        }
        Ok(self.make(
            Float::with_val(self.prec, value),
            Float::with_val::<f64>(self.prec, error),
        ))
    }

    /// Normalize a derived (value, error) pair into an abstract float
    pub(crate) fn make(&self, value: Float, error: Float) -> AbstractFloat {
        debug_assert!(error.is_zero() || (!error.is_nan() && error.is_sign_positive()));
        if !value.is_finite() {
            trace!(%value, "non-finite center, widening to Any");
            return AbstractFloat::Any;
        }
        if value.is_zero() {
            return AbstractFloat::Valued {
                value,
                error: self.zero(),
            };
        }
        if error.is_nan() || error >= 1 {
            trace!(%error, "error bound reached 1, widening to Any");
            return AbstractFloat::Any;
        }
        AbstractFloat::Valued { value, error }
    }

    /// Add the rounding unit to a stretched bound, then normalize
    pub(crate) fn rounded(&self, value: Float, stretch: Float) -> AbstractFloat {
        let error = binary(mpfr_add, &stretch, &self.unit, self.prec, Round::Up);
        self.make(value, error)
    }

    pub(crate) fn exact_zero(&self) -> AbstractFloat {
        AbstractFloat::Valued {
            value: self.zero(),
            error: self.zero(),
        }
    }

    #[inline]
    pub(crate) fn zero(&self) -> Float {
        Float::with_val(self.prec, 0)
    }
}

/// Builder for [`Model`], defaulting to the binary32 rounding unit
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    unit: Option<f64>,
    unit_bits: u32,
    prec: u32,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        ModelBuilder::new()
    }
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self {
            unit: None,
            unit_bits: SINGLE_UNIT_BITS,
            prec: DEFAULT_PRECISION,
        }
    }

    /// Set the rounding unit directly
    pub fn rounding_unit(mut self, unit: f64) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Set the rounding unit to `2^-bits`
    pub fn unit_bits(mut self, bits: u32) -> Self {
        self.unit = None;
        self.unit_bits = bits;
        self
    }

    /// Set the working precision in bits
    pub fn precision(mut self, prec: u32) -> Self {
        self.prec = prec;
        self
    }

    pub fn build(self) -> Result<Model, FloatError> {
        if self.prec < MIN_PRECISION || self.prec > rug::float::prec_max() {
            return Err(FloatError::InvalidPrecision {
                precision: self.prec,
            });
        }
        let unit = match self.unit {
            Some(unit) => {
                if !(unit > 0.0 && unit < 1.0) {
                    return Err(FloatError::InvalidRoundingUnit { unit });
                }
                Float::with_val(self.prec, unit)
            }
            None => {
                if self.unit_bits == 0 {
                    return Err(FloatError::InvalidRoundingUnit { unit: 1.0 });
                }
                unit_from_bits(self.unit_bits, self.prec)
            }
        };
        debug!(unit = %unit, precision = self.prec, "built rounding model");
        Ok(Model::from_parts(unit, self.prec))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FloatError {
    #[error("relative error bound {error} is negative")]
    NegativeError { error: f64 },
    #[error("relative error bound is NaN")]
    NanError,
    #[error("rounding unit {unit} is outside (0, 1)")]
    InvalidRoundingUnit { unit: f64 },
    #[error("working precision of {precision} bits is unsupported")]
    InvalidPrecision { precision: u32 },
}
