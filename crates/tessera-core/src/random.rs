//! The shared pseudo-random generator.
//!
//! One [`Random`] lives in the engine context and is handed out by shared
//! reference to every subsystem that needs randomness (spawners, particle
//! jitter, AI choices). It wraps a seeded PCG32 so runs are reproducible from
//! the configured seed.
//!
//! # Threading
//!
//! The generator state sits in a [`RefCell`], which makes `Random` `!Sync`.
//! This is a hard constraint of the engine, not an accident: the engine API
//! must only be driven from one thread, and the compiler enforces it here.

use std::cell::RefCell;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Seeded generator shared by reference across the engine.
pub struct Random {
    rng: RefCell<Pcg32>,
    seed: u64,
}

impl Random {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RefCell::new(Pcg32::seed_from_u64(seed)),
            seed,
        }
    }

    /// The seed this generator was last (re)seeded with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the sequence from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        *self.rng.get_mut() = Pcg32::seed_from_u64(seed);
    }

    /// Uniform integer in the half-open range `[min, max)`.
    ///
    /// # Panics
    ///
    /// Panics if `min >= max`.
    pub fn range(&self, min: i32, max: i32) -> i32 {
        assert!(min < max, "empty random range [{min}, {max})");
        self.rng.borrow_mut().gen_range(min..max)
    }

    /// Uniform float in the half-open range `[min, max)`.
    ///
    /// # Panics
    ///
    /// Panics if `min >= max` or either bound is not finite.
    pub fn range_f32(&self, min: f32, max: f32) -> f32 {
        assert!(
            min.is_finite() && max.is_finite() && min < max,
            "invalid random range [{min}, {max})"
        );
        self.rng.borrow_mut().gen_range(min..max)
    }

    /// Uniform float in `[0, 1)`.
    pub fn unit(&self) -> f32 {
        self.rng.borrow_mut().gen::<f32>()
    }

    /// `true` with probability `p` (clamped to `[0, 1]`).
    pub fn chance(&self, p: f32) -> bool {
        self.unit() < p.clamp(0.0, 1.0)
    }

    /// A uniformly chosen element, or `None` for an empty slice.
    pub fn pick<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.rng.borrow_mut().gen_range(0..items.len());
        items.get(idx)
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Debug for Random {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Random").field("seed", &self.seed).finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
