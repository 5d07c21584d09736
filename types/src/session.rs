//! Voting session lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of a voting session: `Uninitialized → Open → Closed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No voting has been opened yet.
    Uninitialized,
    /// Votes are accepted.
    Open,
    /// The ledger is read-only. Terminal.
    Closed,
}

impl SessionPhase {
    /// Whether `cast_vote` is accepted in this phase.
    pub fn accepts_votes(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Whether choices, counts and tallies can be read in this phase.
    pub fn allows_reads(&self) -> bool {
        matches!(self, Self::Open | Self::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
