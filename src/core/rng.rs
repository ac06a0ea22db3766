//! Deterministic random number generation.
//!
//! The only randomness in a game is the optional seat shuffle. It is drawn
//! from a seeded ChaCha8 stream so that replaying a ledger always produces the
//! same seat order.
//!
//! ```
//! use oel_engine::core::GameRng;
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! let mut x = [0, 1, 2, 3];
//! let mut y = [0, 1, 2, 3];
//! a.shuffle(&mut x);
//! b.shuffle(&mut y);
//! assert_eq!(x, y);
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded RNG for the game.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_order() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        for _ in 0..5 {
            let mut x: Vec<u8> = (0..4).collect();
            let mut y = x.clone();
            a.shuffle(&mut x);
            b.shuffle(&mut y);
            assert_eq!(x, y);
        }
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = GameRng::new(3);
        let mut order: Vec<u8> = (0..4).collect();
        rng.shuffle(&mut order);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
    }
}
