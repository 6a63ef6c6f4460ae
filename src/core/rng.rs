//! Seeded piece sequence generation.
//!
//! A small LCG drives Fisher-Yates shuffles of the seven piece kinds;
//! every bag contains each kind exactly once, so no piece can drought
//! for more than 12 draws. The generator state doubles as the seed
//! carried in [`GameState`](crate::core::game_state::GameState): each
//! bag advances it, and replaying from the same initial seed reproduces
//! the exact sequence.

use crate::types::PieceKind;

/// Number of pieces in one bag.
pub const BAG_SIZE: usize = 7;

/// Extra pieces kept beyond the preview window so the queue never runs
/// dry mid-lock.
pub const QUEUE_BUFFER: usize = BAG_SIZE;

/// Linear congruential generator (Numerical Recipes constants).
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Seed 0 would be indistinguishable from seed 1 anyway; map it
    /// there explicitly so the state is never the degenerate zero.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }

    /// Uniform-ish value in `[0, max)`.
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range(i as u32 + 1) as usize;
            slice.swap(i, j);
        }
    }

    /// Current generator state.
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// One shuffled bag plus the advanced seed.
pub fn shuffled_bag(seed: u32) -> ([PieceKind; BAG_SIZE], u32) {
    let mut rng = SeededRng::new(seed);
    let mut bag = PieceKind::ALL;
    rng.shuffle(&mut bag);
    (bag, rng.state())
}

/// Append whole shuffled bags until `queue` holds at least `min_len`
/// pieces. Returns the advanced seed.
pub fn refill_queue(queue: &mut Vec<PieceKind>, seed: u32, min_len: usize) -> u32 {
    let mut seed = seed;
    while queue.len() < min_len {
        let (bag, next_seed) = shuffled_bag(seed);
        queue.extend_from_slice(&bag);
        seed = next_seed;
    }
    seed
}
