use std::collections::VecDeque;
use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform draw from a non-empty inclusive range.
    fn uniform(&mut self, range: RangeInclusive<i64>) -> i64;
}

#[derive(Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn uniform(&mut self, range: RangeInclusive<i64>) -> i64 {
        rand::rng().random_range(range)
    }
}

/// Reproducible secrets, e.g. from the `SEED` environment variable.
#[derive(Debug)]
pub struct SeededRandom {
    rng: StdRng,
    pub seed: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self, range: RangeInclusive<i64>) -> i64 {
        self.rng.random_range(range)
    }
}

/// Hands out a scripted sequence of values, clamped into the requested
/// range. Repeats the last value once the script runs out.
#[derive(Debug, Clone)]
pub struct FixedRandom {
    values: VecDeque<i64>,
    last: i64,
}

impl FixedRandom {
    pub fn new(value: i64) -> Self {
        Self::sequence([value])
    }

    pub fn sequence(values: impl IntoIterator<Item = i64>) -> Self {
        let values: VecDeque<i64> = values.into_iter().collect();
        let last = values.back().copied().unwrap_or_default();
        Self { values, last }
    }
}

impl RandomSource for FixedRandom {
    fn uniform(&mut self, range: RangeInclusive<i64>) -> i64 {
        let value = self.values.pop_front().unwrap_or(self.last);
        value.clamp(*range.start(), *range.end())
    }
}
