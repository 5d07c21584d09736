//! Blake2b hashing for commitments, pool digests and draw randomness.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use votedraw_types::{Seed, VoterId};

type Blake2b256 = Blake2b<U32>;

const POOL_DOMAIN: &[u8] = b"votedraw/eligible-pool/v1";
const COMMIT_DOMAIN: &[u8] = b"votedraw/seed-commitment/v1";
const DRAW_DOMAIN: &[u8] = b"votedraw/draw/v1";

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Digest of an ordered eligible-voter pool.
///
/// Each token is length-prefixed so `["ab", "c"]` and `["a", "bc"]` hash
/// differently. Order matters: the pool is always taken in ledger order.
pub fn eligible_pool_digest<'a, I>(voters: I) -> [u8; 32]
where
    I: IntoIterator<Item = &'a VoterId>,
{
    let mut hasher = Blake2b256::new();
    hasher.update(POOL_DOMAIN);
    let mut count: u64 = 0;
    for voter in voters {
        let bytes = voter.as_bytes();
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(bytes);
        count += 1;
    }
    hasher.update(count.to_le_bytes());
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Public commitment to a session seed, published before voting closes.
pub fn seed_commitment(seed: &Seed) -> [u8; 32] {
    blake2b_256_multi(&[COMMIT_DOMAIN, seed.as_bytes()])
}

/// Randomness for one draw: binds the session seed to the draw context.
pub fn derive_draw_randomness(seed: &Seed, context: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[DRAW_DOMAIN, seed.as_bytes(), context])
}
