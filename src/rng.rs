//! Random source seam. Fills, refills and row/column picks all draw through [`RandomSource`]
//! so tests can substitute a fixed sequence.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait RandomSource {
    /// Uniform integer in `[0, n)`. `n` must be non-zero.
    fn below(&mut self, n: usize) -> usize;

    /// Fisher–Yates shuffle.
    fn shuffle<T>(&mut self, slice: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..slice.len()).rev() {
            let j = self.below(i + 1);
            slice.swap(i, j);
        }
    }
}

/// Production source: ChaCha8 seeded from a `u64`, so a seed replays a whole session.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn below(&mut self, n: usize) -> usize {
        assert!(n > 0, "below(0) has no valid result");
        self.rng.gen_range(0..n)
    }
}

/// Replays a fixed sequence (cycling), reducing each value modulo `n`.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<usize>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl Into<Vec<usize>>) -> Self {
        let values = values.into();
        assert!(!values.is_empty(), "scripted sequence must not be empty");
        Self { values, cursor: 0 }
    }

    /// Always yields zero.
    pub fn zeros() -> Self {
        Self::new(vec![0])
    }
}

impl RandomSource for ScriptedRandom {
    fn below(&mut self, n: usize) -> usize {
        assert!(n > 0, "below(0) has no valid result");
        let v = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        v % n
    }
}
