//! Tallying and winner determination.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use votedraw_ledger::LedgerSnapshot;
use votedraw_types::{ChoiceId, VoteError};

/// Votes per choice. Every registered choice is present, zero counts
/// included, and the counts always sum to the snapshot length.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    counts: BTreeMap<ChoiceId, u64>,
}

impl Tally {
    pub fn get(&self, choice: ChoiceId) -> Option<u64> {
        self.counts.get(&choice).copied()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// `(choice, votes)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ChoiceId, u64)> + '_ {
        self.counts.iter().map(|(id, votes)| (*id, *votes))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The maximum count and every choice reaching it, ascending by id.
    /// `None` when no vote has been counted.
    pub fn leaders(&self) -> Option<(u64, Vec<ChoiceId>)> {
        let max = self.counts.values().copied().max().filter(|m| *m > 0)?;
        let leaders = self
            .counts
            .iter()
            .filter(|(_, votes)| **votes == max)
            .map(|(id, _)| *id)
            .collect();
        Some((max, leaders))
    }
}

/// The choice, or tied set of choices, with the most votes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Winner {
    Single { choice: ChoiceId, votes: u64 },
    /// Two or more choices share the maximum; ids ascending.
    Tied { choices: Vec<ChoiceId>, votes: u64 },
}

impl Winner {
    /// Every winning choice. A single winner yields a one-element slice.
    pub fn choices(&self) -> &[ChoiceId] {
        match self {
            Self::Single { choice, .. } => std::slice::from_ref(choice),
            Self::Tied { choices, .. } => choices,
        }
    }

    pub fn votes(&self) -> u64 {
        match self {
            Self::Single { votes, .. } | Self::Tied { votes, .. } => *votes,
        }
    }

    pub fn is_tie(&self) -> bool {
        matches!(self, Self::Tied { .. })
    }
}

/// Pure tally and winner computation over a snapshot.
pub struct TallyEngine;

impl TallyEngine {
    pub fn tally(&self, snapshot: &LedgerSnapshot) -> Tally {
        let mut counts: BTreeMap<ChoiceId, u64> =
            snapshot.choices().iter().map(|c| (c.id, 0)).collect();
        for record in snapshot.records() {
            *counts.entry(record.choice).or_insert(0) += 1;
        }
        Tally { counts }
    }

    /// Winner of `snapshot`; `NoVotesCast` when it is empty.
    pub fn winner(&self, snapshot: &LedgerSnapshot) -> Result<Winner, VoteError> {
        if snapshot.is_empty() {
            return Err(VoteError::NoVotesCast);
        }
        let (votes, mut choices) = self
            .tally(snapshot)
            .leaders()
            .ok_or(VoteError::NoVotesCast)?;
        if choices.len() == 1 {
            Ok(Winner::Single {
                choice: choices.remove(0),
                votes,
            })
        } else {
            Ok(Winner::Tied { choices, votes })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use votedraw_ledger::{ChoiceRegistry, VoteLedger};
    use votedraw_types::VoterId;

    fn ledger(labels: &[&str], votes: &[(&str, u32)]) -> VoteLedger {
        let registry = Arc::new(ChoiceRegistry::with_choices(labels.iter().copied()).unwrap());
        let ledger = VoteLedger::new(registry);
        ledger.open().unwrap();
        for (voter, choice) in votes {
            ledger
                .cast_vote(VoterId::new(*voter), ChoiceId::new(*choice))
                .unwrap();
        }
        ledger
    }

    #[test]
    fn unvoted_choices_are_present_with_zero() {
        let l = ledger(&["Red", "Blue", "Green"], &[("v1", 0)]);
        let tally = TallyEngine.tally(&l.snapshot());
        assert_eq!(tally.len(), 3);
        assert_eq!(tally.get(ChoiceId::new(1)), Some(0));
        assert_eq!(tally.get(ChoiceId::new(2)), Some(0));
        assert_eq!(tally.total(), 1);
    }

    #[test]
    fn single_winner() {
        let l = ledger(&["Red", "Blue"], &[("v1", 0), ("v2", 1), ("v3", 0)]);
        let winner = TallyEngine.winner(&l.snapshot()).unwrap();
        assert_eq!(
            winner,
            Winner::Single {
                choice: ChoiceId::new(0),
                votes: 2
            }
        );
        assert!(!winner.is_tie());
        assert_eq!(winner.choices(), &[ChoiceId::new(0)]);
    }

    #[test]
    fn tie_reports_every_leader_in_id_order() {
        let l = ledger(&["A", "B", "C"], &[("v1", 2), ("v2", 0), ("v3", 1)]);
        let winner = TallyEngine.winner(&l.snapshot()).unwrap();
        assert!(winner.is_tie());
        assert_eq!(
            winner.choices(),
            &[ChoiceId::new(0), ChoiceId::new(1), ChoiceId::new(2)]
        );
        assert_eq!(winner.votes(), 1);
    }

    #[test]
    fn tie_excludes_trailing_choices() {
        let l = ledger(
            &["A", "B", "C"],
            &[("v1", 0), ("v2", 2), ("v3", 0), ("v4", 2), ("v5", 1)],
        );
        let winner = TallyEngine.winner(&l.snapshot()).unwrap();
        assert_eq!(
            winner,
            Winner::Tied {
                choices: vec![ChoiceId::new(0), ChoiceId::new(2)],
                votes: 2
            }
        );
    }

    #[test]
    fn empty_ledger_has_no_winner() {
        let l = ledger(&["A"], &[]);
        assert_eq!(
            TallyEngine.winner(&l.snapshot()).unwrap_err(),
            VoteError::NoVotesCast
        );
        assert_eq!(TallyEngine.tally(&l.snapshot()).leaders(), None);
    }

    #[test]
    fn winner_is_stable_on_the_same_snapshot() {
        let l = ledger(&["A", "B"], &[("v1", 0), ("v2", 1)]);
        let snap = l.snapshot();
        assert_eq!(
            TallyEngine.winner(&snap).unwrap(),
            TallyEngine.winner(&snap).unwrap()
        );
    }

    #[test]
    fn winner_serializes_with_kind_tag() {
        let winner = Winner::Single {
            choice: ChoiceId::new(1),
            votes: 4,
        };
        let json = serde_json::to_value(&winner).unwrap();
        assert_eq!(json["kind"], "single");
        assert_eq!(json["choice"], 1);
    }
}
