//! Deterministic draw stream with bias-free bounded sampling.
//!
//! The stream is Blake2b-256 in counter mode keyed by a 32-byte value:
//! `block_i = Hash(domain || key || i)`, read as little-endian `u64` words.
//! The same key always yields the same words, which is what makes a draw
//! replayable.
//!
//! [`DrawStream::uniform_index`] uses bounded rejection sampling. A raw word
//! `x` is accepted only if `x >= 2^64 mod n`; the accepted range then holds
//! an exact multiple of `n` values and `x % n` is uniform over `[0, n)`.

const STREAM_DOMAIN: &[u8] = b"votedraw/stream/v1";

/// An unbounded, reproducible stream of random words.
#[derive(Clone, Debug)]
pub struct DrawStream {
    key: [u8; 32],
    counter: u64,
    block: [u8; 32],
    offset: usize,
    rejections: u64,
}

impl DrawStream {
    pub fn new(key: [u8; 32]) -> Self {
        Self {
            key,
            counter: 0,
            block: [0u8; 32],
            offset: 32,
            rejections: 0,
        }
    }

    /// Next raw 64-bit word.
    pub fn next_u64(&mut self) -> u64 {
        if self.offset == self.block.len() {
            self.refill();
        }
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.block[self.offset..self.offset + 8]);
        self.offset += 8;
        u64::from_le_bytes(word)
    }

    /// Uniform index in `[0, bound)`, or `None` when `bound == 0`.
    pub fn uniform_index(&mut self, bound: usize) -> Option<usize> {
        if bound == 0 {
            return None;
        }
        let bound = bound as u64;
        loop {
            let x = self.next_u64();
            match accept(x, bound) {
                Some(index) => return Some(index as usize),
                None => self.rejections += 1,
            }
        }
    }

    /// Number of raw words discarded by rejection sampling so far.
    pub fn rejections(&self) -> u64 {
        self.rejections
    }

    fn refill(&mut self) {
        self.block = votedraw_crypto::blake2b_256_multi(&[
            STREAM_DOMAIN,
            &self.key,
            &self.counter.to_le_bytes(),
        ]);
        self.counter += 1;
        self.offset = 0;
    }
}

/// Accept `x` for `bound` if it lies in the unbiased range.
fn accept(x: u64, bound: u64) -> Option<u64> {
    // 2^64 mod bound, computed without 128-bit arithmetic.
    let threshold = bound.wrapping_neg() % bound;
    if x < threshold {
        None
    } else {
        Some(x % bound)
    }
}
