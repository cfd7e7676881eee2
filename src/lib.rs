//! Abstract floating-point arithmetic that bounds relative rounding error.
//!
//! An [`AbstractFloat`] stands for every result a real floating-point
//! evaluation could produce: a center and a relative error bound, or `Any`.
//! A [`Model`] fixes the rounding unit and derives new bounds for each
//! operation; comparisons return a three-valued [`Truth`].

pub mod float;
mod mpfr;
pub mod oracle;

pub use float::{AbstractFloat, FloatError, Model, ModelBuilder, Truth};
pub use oracle::{Constant, Oracle, RandomOracle};
