//! Unary operations and their error derivations

use super::model::Model;
use super::value::{AbstractFloat, SignClass, classify};
use crate::mpfr::{
    binary, mpfr_add, mpfr_div, mpfr_exp, mpfr_expm1, mpfr_log, mpfr_log1p, mpfr_mul, mpfr_pow2,
    mpfr_sqrt, mpfr_sub, one, unary,
};
use rug::{Float, float::Round};
use tracing::trace;

impl AbstractFloat {
    /// Sign flip; exact, so the bound carries over without a rounding step
    pub fn negate(&self) -> AbstractFloat {
        match self {
            AbstractFloat::Any => AbstractFloat::Any,
            AbstractFloat::Valued { value, error } => AbstractFloat::Valued {
                value: -value.clone(),
                error: error.clone(),
            },
        }
    }

    pub fn abs(&self) -> AbstractFloat {
        match self {
            AbstractFloat::Any => AbstractFloat::Any,
            AbstractFloat::Valued { value, error } => AbstractFloat::Valued {
                value: value.clone().abs(),
                error: error.clone(),
            },
        }
    }

    /// Multiply by two; an exponent bump, exact
    pub fn double(&self) -> AbstractFloat {
        match self {
            AbstractFloat::Any => AbstractFloat::Any,
            AbstractFloat::Valued { value, error } => AbstractFloat::Valued {
                value: value.clone() << 1u32,
                error: error.clone(),
            },
        }
    }

    /// Divide by two; an exponent drop, exact
    pub fn halve(&self) -> AbstractFloat {
        match self {
            AbstractFloat::Any => AbstractFloat::Any,
            AbstractFloat::Valued { value, error } => AbstractFloat::Valued {
                value: value.clone() >> 1u32,
                error: error.clone(),
            },
        }
    }
}

impl Model {
    pub fn sqrt(&self, x: &AbstractFloat) -> AbstractFloat {
        let Some((v, e)) = x.parts() else {
            return AbstractFloat::Any;
        };
        let prec = self.prec();
        match classify(v) {
            SignClass::Neg => {
                trace!(op = "sqrt", "negative center");
                AbstractFloat::Any
            }
            SignClass::Zero => self.exact_zero(),
            SignClass::Pos => {
                let value = unary(mpfr_sqrt, v, prec, Round::Nearest);
                // The lower end shrinks faster than the upper end grows: 1 - sqrt(1 - e)
                let shrunk = binary(mpfr_sub, &one(prec), e, prec, Round::Down);
                let root = unary(mpfr_sqrt, &shrunk, prec, Round::Down);
                let stretch = binary(mpfr_sub, &one(prec), &root, prec, Round::Up);
                self.rounded(value, stretch)
            }
        }
    }

    pub fn square(&self, x: &AbstractFloat) -> AbstractFloat {
        let Some((v, e)) = x.parts() else {
            return AbstractFloat::Any;
        };
        if v.is_zero() {
            return self.exact_zero();
        }
        let prec = self.prec();
        let value = unary(mpfr_pow2, v, prec, Round::Nearest);
        // (1 + e)^2 - 1, expanded as e * (2 + e)
        let two = Float::with_val(prec, 2);
        let factor = binary(mpfr_add, &two, e, prec, Round::Up);
        let stretch = binary(mpfr_mul, e, &factor, prec, Round::Up);
        self.rounded(value, stretch)
    }

    /// Natural logarithm.
    ///
    /// The absolute divergence is at most `-log1p(-e)`, reached at the lower
    /// end of the input interval; it is divided by `|ln v|`, which is rounded
    /// toward zero on either side of 1.
    pub fn log(&self, x: &AbstractFloat) -> AbstractFloat {
        let Some((v, e)) = x.parts() else {
            return AbstractFloat::Any;
        };
        if classify(v) != SignClass::Pos {
            trace!(op = "log", "non-positive center");
            return AbstractFloat::Any;
        }
        if *v == 1 {
            if e.is_zero() {
                return self.exact_zero();
            }
            trace!(op = "log", "inexact center at 1");
            return AbstractFloat::Any;
        }

        let prec = self.prec();
        let value = unary(mpfr_log, v, prec, Round::Nearest);
        let spread = neg_log1p_neg(e, prec);
        let magnitude = if *v > 1 {
            unary(mpfr_log, v, prec, Round::Down)
        } else {
            -unary(mpfr_log, v, prec, Round::Up)
        };
        let stretch = binary(mpfr_div, &spread, &magnitude, prec, Round::Up);
        self.rounded(value, stretch)
    }

    /// Exponential: the output stretches by `expm1(|v| * e)` in either direction
    pub fn exp(&self, x: &AbstractFloat) -> AbstractFloat {
        let Some((v, e)) = x.parts() else {
            return AbstractFloat::Any;
        };
        let prec = self.prec();
        let magnitude = match classify(v) {
            SignClass::Zero => return self.literal(1),
            SignClass::Pos => v.clone(),
            SignClass::Neg => -v.clone(),
        };
        let value = unary(mpfr_exp, v, prec, Round::Nearest);
        let reach = binary(mpfr_mul, &magnitude, e, prec, Round::Up);
        let stretch = unary(mpfr_expm1, &reach, prec, Round::Up);
        self.rounded(value, stretch)
    }

    /// `ln(1 + x)`.
    ///
    /// With `t = |v| * e / (1 + v)` the output diverges by at most
    /// `-log1p(-t)`, relative to `|log1p(v)|`. Undefined once the lower end of
    /// the input reaches -1.
    pub fn log1p(&self, x: &AbstractFloat) -> AbstractFloat {
        let Some((v, e)) = x.parts() else {
            return AbstractFloat::Any;
        };
        let prec = self.prec();
        let magnitude = match classify(v) {
            SignClass::Zero => return self.exact_zero(),
            SignClass::Pos => v.clone(),
            SignClass::Neg => {
                let grow = binary(mpfr_add, &one(prec), e, prec, Round::Up);
                let lower = binary(mpfr_mul, v, &grow, prec, Round::Down);
                if lower <= -1 {
                    trace!(op = "log1p", %lower, "interval reaches -1");
                    return AbstractFloat::Any;
                }
                -v.clone()
            }
        };

        let value = unary(mpfr_log1p, v, prec, Round::Nearest);
        let reach = binary(mpfr_mul, &magnitude, e, prec, Round::Up);
        let base = binary(mpfr_add, &one(prec), v, prec, Round::Down);
        let t = binary(mpfr_div, &reach, &base, prec, Round::Up);
        if t >= 1 {
            trace!(op = "log1p", "perturbation reaches the pole");
            return AbstractFloat::Any;
        }
        let spread = neg_log1p_neg(&t, prec);
        let denom = unary(mpfr_log1p, v, prec, Round::Zero).abs();
        let stretch = binary(mpfr_div, &spread, &denom, prec, Round::Up);
        self.rounded(value, stretch)
    }

    /// `exp(x) - 1`.
    ///
    /// Positive centers stretch by `expm1(v*e) / -expm1(-v)`, negative ones by
    /// `expm1(-v*e) / expm1(-v)`.
    pub fn expm1(&self, x: &AbstractFloat) -> AbstractFloat {
        let Some((v, e)) = x.parts() else {
            return AbstractFloat::Any;
        };
        let prec = self.prec();
        let neg_v = -v.clone();
        let (magnitude, denom) = match classify(v) {
            SignClass::Zero => return self.exact_zero(),
            SignClass::Pos => (v.clone(), -unary(mpfr_expm1, &neg_v, prec, Round::Up)),
            SignClass::Neg => (neg_v.clone(), unary(mpfr_expm1, &neg_v, prec, Round::Down)),
        };
        let value = unary(mpfr_expm1, v, prec, Round::Nearest);
        let reach = binary(mpfr_mul, &magnitude, e, prec, Round::Up);
        let spread = unary(mpfr_expm1, &reach, prec, Round::Up);
        let stretch = binary(mpfr_div, &spread, &denom, prec, Round::Up);
        self.rounded(value, stretch)
    }
}

/// `-log1p(-t)` rounded up, for `0 <= t < 1`
fn neg_log1p_neg(t: &Float, prec: u32) -> Float {
    let neg = Float::with_val(prec, -t);
    -unary(mpfr_log1p, &neg, prec, Round::Down)
}
