//! Three-valued comparisons over abstract floats

use super::value::{AbstractFloat, SignClass, classify};
use crate::oracle::Oracle;
use std::ops::Not;

/// Outcome of a comparison between two abstract floats. `Uncertain` means the
/// modeled intervals overlap and the bounds alone cannot decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Truth {
    True,
    False,
    Uncertain,
}

impl From<bool> for Truth {
    fn from(b: bool) -> Self {
        if b { Truth::True } else { Truth::False }
    }
}

impl Not for Truth {
    type Output = Truth;

    fn not(self) -> Truth {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Uncertain => Truth::Uncertain,
        }
    }
}

impl Truth {
    /// Some(b) when decided, None when uncertain
    pub fn known(self) -> Option<bool> {
        match self {
            Truth::True => Some(true),
            Truth::False => Some(false),
            Truth::Uncertain => None,
        }
    }

    pub fn and(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::True, Truth::True) => Truth::True,
            _ => Truth::Uncertain,
        }
    }

    pub fn or(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::True, _) | (_, Truth::True) => Truth::True,
            (Truth::False, Truth::False) => Truth::False,
            _ => Truth::Uncertain,
        }
    }

    /// Collapse to a Boolean, flipping a fair coin when uncertain
    pub fn resolve<O: Oracle + ?Sized>(self, oracle: &mut O) -> bool {
        match self.known() {
            Some(b) => b,
            None => oracle.flip(0.5),
        }
    }
}

impl AbstractFloat {
    pub fn is_positive(&self) -> Truth {
        self.sign_is(SignClass::Pos)
    }

    pub fn is_negative(&self) -> Truth {
        self.sign_is(SignClass::Neg)
    }

    pub fn is_zero(&self) -> Truth {
        self.sign_is(SignClass::Zero)
    }

    fn sign_is(&self, class: SignClass) -> Truth {
        match self.value() {
            None => Truth::Uncertain,
            Some(v) => Truth::from(classify(v) == class),
        }
    }

    pub fn less_than(&self, other: &AbstractFloat) -> Truth {
        let (Some(vx), Some(vy)) = (self.value(), other.value()) else {
            return Truth::Uncertain;
        };
        match (classify(vx), classify(vy)) {
            (SignClass::Zero, _) => other.is_positive(),
            (SignClass::Neg, SignClass::Zero | SignClass::Pos) => Truth::True,
            (SignClass::Pos, SignClass::Zero | SignClass::Neg) => Truth::False,
            _ => self.compare_disjoint(other),
        }
    }

    pub fn greater_than(&self, other: &AbstractFloat) -> Truth {
        other.less_than(self)
    }

    pub fn less_equal(&self, other: &AbstractFloat) -> Truth {
        !other.less_than(self)
    }

    pub fn greater_equal(&self, other: &AbstractFloat) -> Truth {
        !self.less_than(other)
    }

    /// True only for two exact, equal points; false for disjoint intervals
    pub fn equals(&self, other: &AbstractFloat) -> Truth {
        if self.is_exact() && other.is_exact() {
            return Truth::from(self.value() == other.value());
        }
        match self.compare_disjoint(other) {
            Truth::Uncertain => Truth::Uncertain,
            _ => Truth::False,
        }
    }

    pub fn not_equals(&self, other: &AbstractFloat) -> Truth {
        !self.equals(other)
    }

    /// `True` if self lies strictly below other, `False` if strictly above
    fn compare_disjoint(&self, other: &AbstractFloat) -> Truth {
        let (Some((x_lo, x_hi)), Some((y_lo, y_hi))) = (self.endpoints(), other.endpoints())
        else {
            return Truth::Uncertain;
        };
        if x_hi < y_lo {
            Truth::True
        } else if y_hi < x_lo {
            Truth::False
        } else {
            Truth::Uncertain
        }
    }

    /// The smaller operand, consulting the oracle when the order is uncertain
    pub fn min<O: Oracle + ?Sized>(&self, other: &AbstractFloat, oracle: &mut O) -> AbstractFloat {
        if self.less_than(other).resolve(oracle) {
            self.clone()
        } else {
            other.clone()
        }
    }

    /// The larger operand, consulting the oracle when the order is uncertain
    pub fn max<O: Oracle + ?Sized>(&self, other: &AbstractFloat, oracle: &mut O) -> AbstractFloat {
        if self.less_than(other).resolve(oracle) {
            other.clone()
        } else {
            self.clone()
        }
    }
}
