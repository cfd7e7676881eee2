use super::model::Model;
use super::value::{AbstractFloat, SignClass, classify};
use crate::mpfr::{binary, mpfr_add, mpfr_div, mpfr_mul, mpfr_sub, one};
use rug::{Float, float::Round};
use tracing::{error, trace};

impl Model {
    pub fn add(&self, x: &AbstractFloat, y: &AbstractFloat) -> AbstractFloat {
        let (Some((vx, ex)), Some((vy, ey))) = (x.parts(), y.parts()) else {
            return AbstractFloat::Any;
        };
        if vx.is_zero() {
            return y.clone();
        }
        if vy.is_zero() {
            return x.clone();
        }

        let prec = self.prec();
        let value = binary(mpfr_add, vx, vy, prec, Round::Nearest);
        if value.is_zero() {
            // Exact additive inverses
            if ex.is_zero() && ey.is_zero() {
                return self.exact_zero();
            }
            trace!(op = "add", "cancellation of inexact operands");
            return AbstractFloat::Any;
        }
        let stretch = combined_error(vx, ex, vy, ey, prec);
        self.rounded(value, stretch)
    }

    pub fn sub(&self, x: &AbstractFloat, y: &AbstractFloat) -> AbstractFloat {
        self.add(x, &y.negate())
    }

    /// Product. A zero operand wins even over `Any`.
    pub fn mul(&self, x: &AbstractFloat, y: &AbstractFloat) -> AbstractFloat {
        if is_zero(x) || is_zero(y) {
            return self.exact_zero();
        }
        let (Some((vx, ex)), Some((vy, ey))) = (x.parts(), y.parts()) else {
            return AbstractFloat::Any;
        };
        let prec = self.prec();
        let value = binary(mpfr_mul, vx, vy, prec, Round::Nearest);
        // (1 + ex)(1 + ey) - 1 = ex + ey + ex*ey
        let cross = binary(mpfr_mul, ex, ey, prec, Round::Up);
        let sum = binary(mpfr_add, ex, ey, prec, Round::Up);
        let stretch = binary(mpfr_add, &sum, &cross, prec, Round::Up);
        self.rounded(value, stretch)
    }

    /// Quotient. A zero numerator wins unless the denominator is exactly zero.
    pub fn div(&self, x: &AbstractFloat, y: &AbstractFloat) -> AbstractFloat {
        if is_zero(y) {
            trace!(op = "div", "zero denominator");
            return AbstractFloat::Any;
        }
        if is_zero(x) {
            return self.exact_zero();
        }
        let (Some((vx, ex)), Some((vy, ey))) = (x.parts(), y.parts()) else {
            return AbstractFloat::Any;
        };
        let prec = self.prec();
        let value = binary(mpfr_div, vx, vy, prec, Round::Nearest);
        // (1 + ex)/(1 - ey) - 1 = (ex + ey)/(1 - ey)
        let sum = binary(mpfr_add, ex, ey, prec, Round::Up);
        let slack = binary(mpfr_sub, &one(prec), ey, prec, Round::Down);
        let stretch = binary(mpfr_div, &sum, &slack, prec, Round::Up);
        self.rounded(value, stretch)
    }
}

fn is_zero(x: &AbstractFloat) -> bool {
    x.value().is_some_and(Float::is_zero)
}

/// Relative error of `vx + vy` before the final rounding, for nonzero
/// operands that are not exact inverses.
///
/// Same signs: the sum is a weighted average of the two relative errors, so
/// the larger one bounds it. Opposite signs: with `z = 1 + small/large`,
/// `(ex + ey) / z` bounds it, where `large` is the operand of larger magnitude.
fn combined_error(vx: &Float, ex: &Float, vy: &Float, ey: &Float, prec: u32) -> Float {
    if classify(vx) == classify(vy) {
        return if ex >= ey { ex.clone() } else { ey.clone() };
    }

    let sum = binary(mpfr_add, ex, ey, prec, Round::Up);
    if sum.is_zero() {
        return sum;
    }

    let (first, second) = match classify(vx) {
        SignClass::Pos => ((vx, vy), (vy, vx)),
        _ => ((vy, vx), (vx, vy)),
    };
    for (large, small) in [first, second] {
        // Rounded down, so z never drops below 0 when |small| <= |large|
        let ratio = binary(mpfr_div, small, large, prec, Round::Down);
        let z = binary(mpfr_add, &one(prec), &ratio, prec, Round::Down);
        if z.is_zero() {
            return Float::with_val(prec, f64::INFINITY);
        }
        if z > 0 {
            return binary(mpfr_div, &sum, &z, prec, Round::Up);
        }
    }

    error!(%vx, %vy, "both cancellation factors negative");
    unreachable!("combined error reached with exact inverses {vx} and {vy}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(x: &AbstractFloat) -> f64 {
        x.error().unwrap().to_f64()
    }

    #[test]
    fn exact_inverses_cancel_only_without_error() {
        let model = Model::single();
        assert_eq!(
            model.add(&model.literal(5.0), &model.literal(-5.0)),
            model.literal(0.0)
        );
        let x = model.bounded(5.0, 0.1).unwrap();
        let y = model.bounded(-5.0, 0.05).unwrap();
        assert!(model.add(&x, &y).is_any());
        assert!(model.sub(&x, &x).is_any());
    }

    #[test]
    fn zero_is_the_additive_identity() {
        let model = Model::single();
        let x = model.bounded(7.0, 0.3).unwrap();
        assert_eq!(model.add(&model.literal(0.0), &x), x);
        assert_eq!(model.add(&x, &model.literal(0.0)), x);
        assert!(model.add(&model.literal(0.0), &AbstractFloat::Any).is_any());
    }

    #[test]
    fn same_sign_addition_takes_the_larger_bound() {
        let model = Model::single();
        let r = model.add(
            &model.bounded(-1.0, 0.25).unwrap(),
            &model.bounded(-3.0, 0.125).unwrap(),
        );
        assert_eq!(r.value().unwrap(), &-4.0);
        assert_eq!(rel(&r), 0.25 + 2f64.powi(-24));
    }

    #[test]
    fn opposite_sign_addition_divides_by_the_cancellation_factor() {
        let model = Model::single();
        // z = 1 + (-1)/4 = 0.75, (0.125 + 0.25) / 0.75 = 0.5
        let expected = 0.5 + 2f64.powi(-24);
        let r = model.add(
            &model.bounded(4.0, 0.125).unwrap(),
            &model.bounded(-1.0, 0.25).unwrap(),
        );
        assert_eq!(r.value().unwrap(), &3.0);
        assert_eq!(rel(&r), expected);

        // The larger magnitude on the negative side mirrors the same factor
        let r = model.add(
            &model.bounded(1.0, 0.25).unwrap(),
            &model.bounded(-4.0, 0.125).unwrap(),
        );
        assert_eq!(r.value().unwrap(), &-3.0);
        assert_eq!(rel(&r), expected);
    }

    #[test]
    fn near_cancellation_loses_everything() {
        let model = Model::single();
        let r = model.add(
            &model.bounded(1.0, 0.01).unwrap(),
            &model.bounded(-0.99, 0.01).unwrap(),
        );
        assert!(r.is_any());
    }

    #[test]
    fn tight_bounds_survive_near_cancellation() {
        let model = Model::single();
        let vy = -(1.0 - 1e-9);
        let x = model.bounded(1.0, 1e-12).unwrap();
        let y = model.bounded(vy, 1e-12).unwrap();
        // z is about 1e-9, so the bound is about 2e-12 / 1e-9
        for r in [model.add(&x, &y), model.add(&y, &x)] {
            assert!(!r.is_any());
            assert!(rel(&r) > 1.9999e-3 && rel(&r) < 2.0001e-3);

            // Opposite extremes of both inputs stay inside the result
            let (x_lo, x_hi) = x.endpoints().unwrap();
            let (y_lo, y_hi) = y.endpoints().unwrap();
            for (a, b) in [(&x_lo, &y_lo), (&x_lo, &y_hi), (&x_hi, &y_lo), (&x_hi, &y_hi)] {
                let exact = Float::with_val(1024, a + b);
                assert!(r.contains(&exact), "{exact} outside {r}");
            }
        }

        // The larger magnitude on the negative side takes the second factor
        let y = model.bounded(-(1.0 + 1e-9), 1e-12).unwrap();
        let r = model.add(&x, &y);
        assert!(r.value().unwrap() < &0);
        assert!(rel(&r) > 1.9999e-3 && rel(&r) < 2.0001e-3);
    }

    #[test]
    fn multiplication_zero_beats_any() {
        let model = Model::single();
        let zero = model.literal(0.0);
        assert_eq!(model.mul(&AbstractFloat::Any, &zero), zero);
        assert_eq!(model.mul(&zero, &AbstractFloat::Any), zero);
        assert!(model.mul(&AbstractFloat::Any, &model.literal(2.0)).is_any());

        let r = model.mul(
            &model.bounded(2.0, 0.5).unwrap(),
            &model.bounded(3.0, 0.25).unwrap(),
        );
        assert_eq!(r.value().unwrap(), &6.0);
        assert_eq!(rel(&r), 0.875 + 2f64.powi(-24));
    }

    #[test]
    fn division_edges() {
        let model = Model::single();
        let zero = model.literal(0.0);
        assert_eq!(model.div(&zero, &model.bounded(2.0, 0.1).unwrap()), zero);
        assert!(model.div(&model.literal(2.0), &zero).is_any());
        assert!(model.div(&zero, &zero).is_any());
        assert_eq!(model.div(&zero, &AbstractFloat::Any), zero);
        assert!(model.div(&AbstractFloat::Any, &model.literal(2.0)).is_any());

        // (0.25 + 0.5) / (1 - 0.5) = 1.5: no information left
        let wide = model.div(
            &model.bounded(1.0, 0.25).unwrap(),
            &model.bounded(3.0, 0.5).unwrap(),
        );
        assert!(wide.is_any());

        let r = model.div(&model.literal(1.0), &model.bounded(4.0, 0.25).unwrap());
        assert_eq!(r.value().unwrap(), &0.25);
        assert!(rel(&r) > 1.0 / 3.0 && rel(&r) < 1.0 / 3.0 + 1e-6);
    }
}
