//! Commit-reveal for the session seed.
//!
//! The operator publishes `Hash(seed)` while voting is open and reveals the
//! seed once the ledger is closed. Anyone holding the ledger export and the
//! revealed seed can then check the reveal against the commitment and replay
//! the draw.

use std::fmt;
use std::str::FromStr;

use votedraw_types::Seed;

use crate::VrfError;

/// A published commitment to a session seed.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeedCommitment([u8; 32]);

impl SeedCommitment {
    /// Commit to a seed.
    pub fn commit(seed: &Seed) -> Self {
        Self(votedraw_crypto::seed_commitment(seed))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, VrfError> {
        let bytes =
            hex::decode(s.trim()).map_err(|e| VrfError::InvalidCommitment(e.to_string()))?;
        let arr: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            VrfError::InvalidCommitment(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }

    /// Check a revealed seed against this commitment.
    pub fn verify_reveal(&self, seed: &Seed) -> Result<(), VrfError> {
        if Self::commit(seed) == *self {
            Ok(())
        } else {
            Err(VrfError::CommitmentMismatch)
        }
    }
}

impl fmt::Debug for SeedCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeedCommitment({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for SeedCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for SeedCommitment {
    type Err = VrfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
