use crate::mpfr::{binary, mpfr_add, mpfr_mul, mpfr_sub, one};
use rug::{Float, float::Round};
use std::fmt;

/// An abstract floating-point result: either a center with a relative error
/// bound, or `Any` when nothing useful is known about the bit pattern.
///
/// `Valued { value, error }` models `[(1-error)*value, (1+error)*value]` for a
/// positive center, the mirrored interval for a negative one, and the single
/// point `{0}` for a zero center. Every `Valued` keeps `0 <= error < 1` and a
/// zero center always carries a zero bound.
#[derive(Debug, Clone, PartialEq)]
pub enum AbstractFloat {
    Any,
    Valued { value: Float, error: Float },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignClass {
    Pos,
    Neg,
    Zero,
}

/// Sign of a center; a `Valued` interval never straddles zero
pub fn classify(value: &Float) -> SignClass {
    if value.is_zero() {
        SignClass::Zero
    } else if value.is_sign_negative() {
        SignClass::Neg
    } else {
        SignClass::Pos
    }
}

impl AbstractFloat {
    #[inline]
    pub fn is_any(&self) -> bool {
        matches!(self, AbstractFloat::Any)
    }

    #[inline]
    pub fn value(&self) -> Option<&Float> {
        match self {
            AbstractFloat::Any => None,
            AbstractFloat::Valued { value, .. } => Some(value),
        }
    }

    #[inline]
    pub fn error(&self) -> Option<&Float> {
        match self {
            AbstractFloat::Any => None,
            AbstractFloat::Valued { error, .. } => Some(error),
        }
    }

    #[inline]
    pub fn parts(&self) -> Option<(&Float, &Float)> {
        match self {
            AbstractFloat::Any => None,
            AbstractFloat::Valued { value, error } => Some((value, error)),
        }
    }

    /// True when this is a point with no rounding history
    pub fn is_exact(&self) -> bool {
        self.error().is_some_and(Float::is_zero)
    }

    /// Closed interval `(lo, hi)` this value models, rounded outward.
    /// `None` for `Any`.
    pub fn endpoints(&self) -> Option<(Float, Float)> {
        let (value, error) = self.parts()?;
        let prec = value.prec().max(error.prec());
        let shrink = binary(mpfr_sub, &one(prec), error, prec, Round::Down);
        let grow = binary(mpfr_add, &one(prec), error, prec, Round::Up);

        let (lo_scale, hi_scale) = match classify(value) {
            SignClass::Zero => return Some((value.clone(), value.clone())),
            SignClass::Pos => (shrink, grow),
            SignClass::Neg => (grow, shrink),
        };
        Some((
            binary(mpfr_mul, value, &lo_scale, prec, Round::Down),
            binary(mpfr_mul, value, &hi_scale, prec, Round::Up),
        ))
    }

    /// Whether a real number lies inside the modeled interval
    pub fn contains(&self, x: &Float) -> bool {
        match self.endpoints() {
            None => true,
            Some((lo, hi)) => lo <= *x && *x <= hi,
        }
    }
}

impl fmt::Display for AbstractFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbstractFloat::Any => write!(f, "any"),
            AbstractFloat::Valued { value, error } => {
                write!(f, "{} (rel. err {:e})", value.to_f64(), error.to_f64_round(Round::Up))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::Model;

    #[test]
    fn endpoints_follow_center_sign() {
        let model = Model::single();
        let (lo, hi) = model.bounded(10.0, 0.25).unwrap().endpoints().unwrap();
        assert_eq!((lo.to_f64(), hi.to_f64()), (7.5, 12.5));

        let (lo, hi) = model.bounded(-10.0, 0.25).unwrap().endpoints().unwrap();
        assert_eq!((lo.to_f64(), hi.to_f64()), (-12.5, -7.5));

        let (lo, hi) = model.literal(0.0).endpoints().unwrap();
        assert!(lo.is_zero() && hi.is_zero());

        assert!(AbstractFloat::Any.endpoints().is_none());
    }

    #[test]
    fn contains_checks_the_closed_interval() {
        let model = Model::single();
        let x = model.bounded(4.0, 0.5).unwrap();
        assert!(x.contains(&Float::with_val(64, 2)));
        assert!(x.contains(&Float::with_val(64, 6)));
        assert!(!x.contains(&Float::with_val(64, 6.5)));
        assert!(AbstractFloat::Any.contains(&Float::with_val(64, f64::NAN)));
    }

    #[test]
    fn display_names_any() {
        assert_eq!(AbstractFloat::Any.to_string(), "any");
        assert_eq!(Model::single().literal(1.5).to_string(), "1.5 (rel. err 0e0)");
    }
}
