//! Injectable randomness
//!
//! Maze generation and adversary patrol draw from a `RandomSource` so tests
//! can seed or script them. Play uses an entropy-seeded PCG stream.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of the few random decisions the simulation makes
pub trait RandomSource {
    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool;
    /// Uniform index in `0..len` (`len` > 0)
    fn pick(&mut self, len: usize) -> usize;
}

/// PCG-backed random source
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: Pcg32,
}

impl SeededRandom {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Fresh non-reproducible stream; the seed is logged so a run can be replayed
    pub fn from_entropy() -> Self {
        let seed: u64 = rand::random();
        log::info!("Random seed: {}", seed);
        Self::seeded(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn chance(&mut self, p: f32) -> bool {
        self.rng.random::<f32>() < p
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}
