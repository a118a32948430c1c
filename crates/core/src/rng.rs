//! RNG module - seeded piece and garbage-hole generation
//!
//! A 64-bit LCG. The same seed always produces the same sequence, which is
//! what makes recorded sessions replayable. Piece kinds are drawn uniformly
//! (no bag), each draw independent of the previous ones.

use crate::types::PieceKind;

const MULTIPLIER: u64 = 6364136223846793005;
const INCREMENT: u64 = 1442695040888963407;

/// Mixed into the match seed to derive the garbage-hole stream
pub const GARBAGE_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses Knuth's MMIX constants and returns the high 32 bits of the state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generator for garbage-row holes, independent of the piece stream
    pub fn for_garbage(seed: u64) -> Self {
        Self::new(seed ^ GARBAGE_SEED_SALT)
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT);
        (self.state >> 32) as u32
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }

    /// Draw a piece kind uniformly from [`PieceKind::ALL`]
    pub fn next_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.next_range(PieceKind::ALL.len() as u32) as usize]
    }

    pub fn state(&self) -> u64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);

        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn zero_seed_still_advances() {
        let mut rng = SimpleRng::new(0);
        let first = rng.next_u32();
        let second = rng.next_u32();
        assert_ne!(first, second);
    }

    #[test]
    fn next_range_stays_in_bounds() {
        let mut rng = SimpleRng::new(42);
        for _ in 0..1000 {
            assert!(rng.next_range(10) < 10);
        }
        assert_eq!(rng.next_range(0), 0);
    }

    #[test]
    fn kind_draws_cover_all_seven() {
        let mut rng = SimpleRng::new(2024);
        let mut seen = [false; 7];
        for _ in 0..500 {
            let kind = rng.next_kind();
            let idx = PieceKind::ALL.iter().position(|k| *k == kind).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn garbage_stream_differs_from_piece_stream() {
        let mut pieces = SimpleRng::new(77);
        let mut garbage = SimpleRng::for_garbage(77);
        let a: Vec<u32> = (0..8).map(|_| pieces.next_u32()).collect();
        let b: Vec<u32> = (0..8).map(|_| garbage.next_u32()).collect();
        assert_ne!(a, b);
    }
}
