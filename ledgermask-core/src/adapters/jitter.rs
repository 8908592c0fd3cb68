//! Jitter source implementations
//!
//! - `ThreadJitter`: fresh OS-seeded randomness on every draw (production)
//! - `SeededJitter`: repeatable sequence from a fixed seed (tests, `--seed`)
//! - `ZeroJitter`: no perturbation at all

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ports::{JitterSource, MAX_CENT_SHIFT, MAX_DAY_SHIFT};

/// Draws from the thread-local generator, one fresh handle per draw
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadJitter;

impl JitterSource for ThreadJitter {
    fn day_shift(&self) -> i64 {
        rand::thread_rng().gen_range(-MAX_DAY_SHIFT..=MAX_DAY_SHIFT)
    }

    fn cent_shift(&self) -> i64 {
        rand::thread_rng().gen_range(-MAX_CENT_SHIFT..=MAX_CENT_SHIFT)
    }
}

/// Deterministic draws from a seeded generator
pub struct SeededJitter {
    rng: Mutex<StdRng>,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn draw(&self, bound: i64) -> i64 {
        // A poisoned lock still holds a usable generator
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(-bound..=bound)
    }
}

impl JitterSource for SeededJitter {
    fn day_shift(&self) -> i64 {
        self.draw(MAX_DAY_SHIFT)
    }

    fn cent_shift(&self) -> i64 {
        self.draw(MAX_CENT_SHIFT)
    }
}

/// Never perturbs anything
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroJitter;

impl JitterSource for ZeroJitter {
    fn day_shift(&self) -> i64 {
        0
    }

    fn cent_shift(&self) -> i64 {
        0
    }
}
