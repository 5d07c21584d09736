//! Cryptographic primitives for votedraw.
//!
//! Everything is Blake2b-256: the eligible-pool digest that binds a draw to
//! the exact voters it was taken over, the public commitment to a session
//! seed, and the per-draw randomness derived from seed and pool.

pub mod hash;

pub use hash::{
    blake2b_256, blake2b_256_multi, derive_draw_randomness, eligible_pool_digest,
    seed_commitment,
};
