//! Session-level seeded randomness.

use tracing::debug;
use votedraw_types::Seed;

use crate::{RandomOutput, RandomnessSource, SeedCommitment, VrfError};

/// The default draw source: a secret per-session seed.
///
/// Output for a context is `Hash(domain || seed || context)`. Publishing the
/// commitment up front and the seed after close lets anyone replay a draw;
/// nobody without the seed can predict it while votes are still coming in.
pub struct SessionSeed {
    seed: Seed,
    commitment: SeedCommitment,
}

impl SessionSeed {
    pub fn new(seed: Seed) -> Self {
        let commitment = SeedCommitment::commit(&seed);
        debug!(commitment = %commitment, "session seed installed");
        Self { seed, commitment }
    }

    /// Seed from operating-system entropy.
    pub fn generate() -> Result<Self, VrfError> {
        Ok(Self::new(crate::OsEntropy::fresh_seed()?))
    }

    /// Reveal the secret seed.
    pub fn seed(&self) -> &Seed {
        &self.seed
    }
}

impl RandomnessSource for SessionSeed {
    fn get_randomness(&self, context: &[u8]) -> Result<RandomOutput, VrfError> {
        Ok(RandomOutput::new(votedraw_crypto::derive_draw_randomness(
            &self.seed, context,
        )))
    }

    fn verify(&self, context: &[u8], output: &RandomOutput) -> Result<bool, VrfError> {
        Ok(self.get_randomness(context)?.value == output.value)
    }

    fn name(&self) -> &str {
        "session-seed"
    }

    fn commitment(&self) -> Option<SeedCommitment> {
        Some(self.commitment)
    }

    fn reveal(&self) -> Option<Seed> {
        Some(self.seed)
    }
}
