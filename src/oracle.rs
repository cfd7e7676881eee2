//! Host-side sources of nondeterministic Booleans, used to collapse an
//! uncertain comparison into a concrete branch

use rand::Rng;

/// Yields `true` with the requested probability
pub trait Oracle {
    fn flip(&mut self, probability: f64) -> bool;
}

/// Draws from a random number generator
#[derive(Debug, Clone)]
pub struct RandomOracle<R> {
    rng: R,
}

impl<R: Rng> RandomOracle<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> Oracle for RandomOracle<R> {
    fn flip(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }
}

/// Always answers the same way; replays one branch deterministically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant(pub bool);

impl Oracle for Constant {
    fn flip(&mut self, _probability: f64) -> bool {
        self.0
    }
}
