//! Directed-rounding wrappers around MPFR operations, through `rug`.
//! Every wrapper writes into `out` at `out`'s precision and returns how the
//! stored result compares to the exact one, so callers pick the rounding
//! direction per bound.
use rug::Float;
use rug::float::Round;
use rug::ops::AssignRound;
use std::cmp::Ordering;

pub type UnaryOp = fn(&Float, &mut Float, Round) -> Ordering;
pub type BinaryOp = fn(&Float, &Float, &mut Float, Round) -> Ordering;

macro_rules! mpfr_unary_op {
    ($name:ident, $method:ident) => {
        pub fn $name(input: &Float, out: &mut Float, rnd: Round) -> Ordering {
            out.assign_round(input.$method(), rnd)
        }
    };
}

macro_rules! mpfr_binary_op {
    ($name:ident, $op:tt) => {
        pub fn $name(lhs: &Float, rhs: &Float, out: &mut Float, rnd: Round) -> Ordering {
            out.assign_round(lhs $op rhs, rnd)
        }
    };
}

// Roots and powers
mpfr_unary_op!(mpfr_sqrt, sqrt_ref);
mpfr_unary_op!(mpfr_pow2, square_ref);

// Exponential and logarithmic functions
mpfr_unary_op!(mpfr_exp, exp_ref);
mpfr_unary_op!(mpfr_expm1, exp_m1_ref);
mpfr_unary_op!(mpfr_log, ln_ref);
mpfr_unary_op!(mpfr_log1p, ln_1p_ref);

// Field operations
mpfr_binary_op!(mpfr_add, +);
mpfr_binary_op!(mpfr_sub, -);
mpfr_binary_op!(mpfr_mul, *);
mpfr_binary_op!(mpfr_div, /);

/// Apply a unary operation into a fresh float of precision `prec`
pub fn unary(op: UnaryOp, input: &Float, prec: u32, rnd: Round) -> Float {
    let mut out = zero(prec);
    let dir = op(input, &mut out, rnd);
    debug_assert!(rounded_toward(dir, rnd, &out), "{dir:?} under {rnd:?}");
    out
}

/// Apply a binary operation into a fresh float of precision `prec`
pub fn binary(op: BinaryOp, lhs: &Float, rhs: &Float, prec: u32, rnd: Round) -> Float {
    let mut out = zero(prec);
    let dir = op(lhs, rhs, &mut out, rnd);
    debug_assert!(rounded_toward(dir, rnd, &out), "{dir:?} under {rnd:?}");
    out
}

/// Whether a stored result that compares to the exact one as `dir` honors `rnd`
pub fn rounded_toward(dir: Ordering, rnd: Round, out: &Float) -> bool {
    match rnd {
        Round::Up => dir != Ordering::Less,
        Round::Down => dir != Ordering::Greater,
        Round::Zero if out.is_sign_negative() => dir != Ordering::Less,
        Round::Zero => dir != Ordering::Greater,
        _ => true,
    }
}

pub fn zero(prec: u32) -> Float {
    Float::with_val(prec, 0)
}

pub fn one(prec: u32) -> Float {
    Float::with_val(prec, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directed_rounding_brackets_inexact_results() {
        let three = Float::with_val(64, 3);
        let down = unary(mpfr_sqrt, &three, 64, Round::Down);
        let up = unary(mpfr_sqrt, &three, 64, Round::Up);
        assert!(down < up);

        let exact = Float::with_val(64, 4);
        let mut out = zero(64);
        assert_eq!(mpfr_sqrt(&exact, &mut out, Round::Up), Ordering::Equal);
        assert_eq!(out, 2);
    }

    #[test]
    fn binary_ops_report_exactness() {
        let a = Float::with_val(64, 1);
        let b = Float::with_val(64, 3);
        let mut out = zero(64);
        assert_eq!(mpfr_div(&a, &b, &mut out, Round::Down), Ordering::Less);
        assert!(rounded_toward(Ordering::Less, Round::Down, &out));
        assert_eq!(mpfr_div(&a, &b, &mut out, Round::Up), Ordering::Greater);
        assert_eq!(mpfr_add(&a, &b, &mut out, Round::Up), Ordering::Equal);
        assert_eq!(out, 4);
    }

    #[test]
    fn rounding_direction_is_checked_against_the_mode() {
        let pos = Float::with_val(64, 1);
        let neg = Float::with_val(64, -1);
        assert!(rounded_toward(Ordering::Greater, Round::Up, &pos));
        assert!(!rounded_toward(Ordering::Less, Round::Up, &pos));
        assert!(!rounded_toward(Ordering::Greater, Round::Down, &pos));
        assert!(rounded_toward(Ordering::Less, Round::Zero, &pos));
        assert!(rounded_toward(Ordering::Greater, Round::Zero, &neg));
        assert!(!rounded_toward(Ordering::Less, Round::Zero, &neg));
        assert!(rounded_toward(Ordering::Equal, Round::Down, &neg));

        let shrunk = unary(mpfr_log1p, &Float::with_val(64, -0.5), 64, Round::Zero);
        assert!(shrunk < 0);
    }
}
