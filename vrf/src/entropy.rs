//! Fresh seeds from operating-system entropy.

use votedraw_types::Seed;

use crate::VrfError;

/// Operating-system entropy (`getrandom`).
pub struct OsEntropy;

impl OsEntropy {
    /// Draw a fresh 32-byte session seed.
    pub fn fresh_seed() -> Result<Seed, VrfError> {
        let mut bytes = [0u8; 32];
        getrandom::getrandom(&mut bytes).map_err(|e| VrfError::Entropy(e.to_string()))?;
        Ok(Seed::new(bytes))
    }
}
