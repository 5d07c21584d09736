//! Randomness for the winner draw.
//!
//! A draw must be unpredictable until the ledger is final and replayable
//! afterwards. The pieces:
//! - [`RandomnessSource`]: produces 32 bytes for a draw context (the digest of
//!   the eligible pool).
//! - [`SessionSeed`]: the default source; a secret 32-byte seed whose
//!   [`SeedCommitment`] is published while voting is open and which is revealed
//!   after close so anyone can recompute the draw.
//! - [`OsEntropy`]: fresh seeds from the operating system.
//! - [`DrawStream`]: expands 32 bytes into an unbounded stream of `u64`s and
//!   draws uniform indices with bounded rejection sampling.

pub mod commit_reveal;
pub mod entropy;
pub mod error;
pub mod sampler;
pub mod session;

pub use commit_reveal::SeedCommitment;
pub use entropy::OsEntropy;
pub use error::VrfError;
pub use sampler::DrawStream;
pub use session::SessionSeed;

use votedraw_types::Seed;

/// Trait for providing draw randomness.
pub trait RandomnessSource: Send + Sync {
    /// Get randomness for a given context (the eligible-pool digest).
    fn get_randomness(&self, context: &[u8]) -> Result<RandomOutput, VrfError>;

    /// Verify that an output was produced by this source for `context`.
    fn verify(&self, context: &[u8], output: &RandomOutput) -> Result<bool, VrfError>;

    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Public commitment to the source's secret, if it has one.
    fn commitment(&self) -> Option<SeedCommitment> {
        None
    }

    /// The secret behind [`commitment`](Self::commitment), for publication
    /// once voting has closed.
    fn reveal(&self) -> Option<Seed> {
        None
    }
}

/// The output of a randomness source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomOutput {
    /// The random bytes (32 bytes).
    pub value: [u8; 32],
}

impl RandomOutput {
    pub fn new(value: [u8; 32]) -> Self {
        Self { value }
    }

    /// Expand this output into a draw stream.
    pub fn stream(&self) -> DrawStream {
        DrawStream::new(self.value)
    }
}
