//! Randomness seam for the engine.
//!
//! All shuffling and random insertion goes through this module so that
//! trial construction, queue shuffling, and tie-breaking are reproducible
//! in tests with a seeded generator while production seeds from entropy.
//! Functions return new vectors and never mutate their input.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The RNG used by production code paths.
pub type EngineRng = ChaCha8Rng;

/// Create a production RNG seeded from the system entropy source.
pub fn entropy_rng() -> EngineRng {
    EngineRng::from_entropy()
}

/// Create a deterministic RNG for tests and reproducible sessions.
pub fn seeded_rng(seed: u64) -> EngineRng {
    EngineRng::seed_from_u64(seed)
}

/// Return a shuffled copy of a slice (Fisher-Yates).
pub fn shuffled<T: Clone, R: Rng>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut copy = items.to_vec();
    copy.shuffle(rng);
    copy
}

/// Return a copy of a slice with an element inserted at a uniformly
/// random position.
pub fn insert_at_random<T: Clone, R: Rng>(items: &[T], element: T, rng: &mut R) -> Vec<T> {
    let mut copy = items.to_vec();
    let position = rng.gen_range(0..=copy.len());
    copy.insert(position, element);
    copy
}
