//! Ledger records.

use serde::{Deserialize, Serialize};

use crate::{ChoiceId, VoterId};

/// An immutable fact that `voter` selected `choice`.
///
/// `sequence` equals the record's position in the ledger and totally orders
/// records for deterministic replay.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter: VoterId,
    pub choice: ChoiceId,
    pub sequence: u64,
}

impl VoteRecord {
    pub fn new(voter: VoterId, choice: ChoiceId, sequence: u64) -> Self {
        Self {
            voter,
            choice,
            sequence,
        }
    }
}
