//! Seeded RNG — xorshift32, the single source of nondeterminism in the engine.
//!
//! Every shuffle, every random selector in the Majors interpreter, and every
//! floor's boss-deck construction draws from this generator and nowhere else.
//! The output sequence is locked by regression test below; changing the
//! algorithm breaks replay parity across every stored action log.

use serde::{Deserialize, Serialize};

/// xorshift32 state, embedded directly in `RunState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    x: u32,
}

impl RngState {
    /// Seed must be nonzero; xorshift32 never recovers from a zero state.
    /// Zero seeds are remapped to a fixed nonzero constant so `create_run`
    /// never has to reject a caller-supplied seed.
    pub fn new(seed: u32) -> Self {
        Self {
            x: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    /// Advance the generator and return the new state.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.x;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.x = x;
        x
    }

    /// Fisher-Yates shuffle, high index downward, `j = next_u32() mod (i+1)`.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = (self.next_u32() as usize) % (i + 1);
            slice.swap(i, j);
        }
    }

    /// Uniform index in `[0, len)`. `None` if `len == 0`.
    pub fn random_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some((self.next_u32() as usize) % len)
    }

    /// The raw generator word, for mirroring into a save blob's
    /// top-level `rng_state` alongside the embedded copy in `RunState`.
    pub fn raw(&self) -> u32 {
        self.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Locked regression values from spec.md §4.1 / §8.1.
    const SEED_1_EXPECTED: [u32; 5] = [270369, 67634689, 2647435461, 307599695, 2398689233];

    #[test]
    fn xorshift32_seed_1_matches_locked_sequence() {
        let mut rng = RngState::new(1);
        for (i, &expected) in SEED_1_EXPECTED.iter().enumerate() {
            let actual = rng.next_u32();
            assert_eq!(actual, expected, "seed=1, index={i}");
        }
    }

    #[test]
    fn deterministic_same_seed() {
        let mut a = RngState::new(42);
        let mut b = RngState::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = RngState::new(42);
        let mut b = RngState::new(43);
        assert_ne!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn shuffle_empty_and_single_are_no_ops() {
        let mut rng = RngState::new(1);
        let mut empty: Vec<u32> = vec![];
        rng.shuffle(&mut empty);
        assert!(empty.is_empty());

        let mut single = vec![7u32];
        rng.shuffle(&mut single);
        assert_eq!(single, vec![7]);
    }

    #[test]
    fn random_index_empty_is_none() {
        let mut rng = RngState::new(1);
        assert_eq!(rng.random_index(0), None);
    }

    #[test]
    fn random_index_in_range() {
        let mut rng = RngState::new(1);
        for _ in 0..200 {
            let idx = rng.random_index(5).unwrap();
            assert!(idx < 5);
        }
    }

    #[test]
    fn zero_seed_is_remapped_and_still_deterministic() {
        let mut a = RngState::new(0);
        let mut b = RngState::new(0);
        assert_eq!(a.next_u32(), b.next_u32());
    }
}
