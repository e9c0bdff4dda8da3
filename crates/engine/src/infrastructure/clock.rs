//! Time and randomness sources.
//!
//! Randomness feeds placeholder keys and deferred dice rolls. `SeededRandom`
//! makes a whole spawn run reproducible.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::infrastructure::ports::{ClockPort, RandomPort};

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRandom;

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Deterministic RNG; the same seed yields the same sequence of rolls.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomPort for SeededRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        // A panic mid-roll cannot leave the RNG in a bad state
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(min..=max)
    }
}

#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Always rolls the same number, whatever the range.
#[cfg(test)]
pub struct FixedRandom(pub i32);

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, _min: i32, _max: i32) -> i32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_random_stays_in_range() {
        for _ in 0..200 {
            let n = SystemRandom.gen_range(1, 6);
            assert!((1..=6).contains(&n));
        }
        assert_eq!(SystemRandom.gen_range(4, 4), 4);
    }

    #[test]
    fn seeded_random_is_reproducible() {
        let a = SeededRandom::new(7);
        let b = SeededRandom::new(7);
        let rolls_a: Vec<i32> = (0..20).map(|_| a.gen_range(1, 100_000)).collect();
        let rolls_b: Vec<i32> = (0..20).map(|_| b.gen_range(1, 100_000)).collect();
        assert_eq!(rolls_a, rolls_b);
        assert!(rolls_a.iter().all(|n| (1..=100_000).contains(n)));
    }
}
