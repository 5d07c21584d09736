//! Fair, replayable selection of one voter from the winning pool.
//!
//! The eligible pool is every voter whose record names a winning choice, in
//! ledger order. The draw context is the Blake2b digest of that pool's
//! content, so the same seed over a different pool gives an unrelated draw.
//! The source's 32-byte output keys a [`DrawStream`](votedraw_vrf::DrawStream)
//! and the index comes from bounded rejection sampling: every eligible voter
//! is selected with probability exactly `1 / pool size`.

use serde::{Deserialize, Serialize};

use votedraw_ledger::LedgerSnapshot;
use votedraw_types::{ChoiceId, VoteError, VoterId};
use votedraw_vrf::RandomnessSource;

/// Audit record of one draw. Together with the ledger export and the
/// revealed seed it is enough to recompute the result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawOutcome {
    /// The selected voter.
    pub voter: VoterId,
    /// Position of `voter` in the eligible pool.
    pub index: u64,
    /// Size of the eligible pool.
    pub eligible: u64,
    pub winning_choices: Vec<ChoiceId>,
    /// Hex digest of the eligible pool (the draw context).
    pub pool_digest: String,
    /// Hex randomness returned by the source for that context.
    pub randomness: String,
    pub source: String,
    /// Ledger version the draw was taken on.
    pub snapshot_version: u64,
}

/// Draws a winner from the voters of the winning choices.
pub struct RandomSelector;

impl RandomSelector {
    /// Voters of any of `winning`, in ledger order.
    pub fn eligible_voters(&self, winning: &[ChoiceId], snapshot: &LedgerSnapshot) -> Vec<VoterId> {
        snapshot.voters_in(winning).cloned().collect()
    }

    /// Select one voter uniformly from the eligible pool.
    ///
    /// Fails with `NoEligibleVoters` when nobody in `snapshot` backed any of
    /// `winning`, which happens when the choice set came from a different
    /// snapshot.
    pub fn select_winner_voter(
        &self,
        winning: &[ChoiceId],
        snapshot: &LedgerSnapshot,
        source: &dyn RandomnessSource,
    ) -> Result<DrawOutcome, VoteError> {
        let pool = self.eligible_voters(winning, snapshot);
        if pool.is_empty() {
            return Err(VoteError::NoEligibleVoters);
        }

        let digest = votedraw_crypto::eligible_pool_digest(&pool);
        let output = source.get_randomness(&digest)?;
        let index = output
            .stream()
            .uniform_index(pool.len())
            .ok_or(VoteError::NoEligibleVoters)?;

        let mut winning_choices = winning.to_vec();
        winning_choices.sort_unstable();
        winning_choices.dedup();

        Ok(DrawOutcome {
            voter: pool[index].clone(),
            index: index as u64,
            eligible: pool.len() as u64,
            winning_choices,
            pool_digest: hex::encode(digest),
            randomness: hex::encode(output.value),
            source: source.name().to_string(),
            snapshot_version: snapshot.version(),
        })
    }

    /// Recompute a recorded draw and report whether every field matches.
    pub fn verify_draw(
        &self,
        outcome: &DrawOutcome,
        snapshot: &LedgerSnapshot,
        source: &dyn RandomnessSource,
    ) -> Result<bool, VoteError> {
        let replayed = self.select_winner_voter(&outcome.winning_choices, snapshot, source)?;
        Ok(replayed == *outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use votedraw_ledger::{ChoiceRegistry, VoteLedger};
    use votedraw_nullables::{FailingRandom, NullRandom};
    use votedraw_types::Seed;
    use votedraw_vrf::SessionSeed;

    const A: ChoiceId = ChoiceId::new(0);
    const B: ChoiceId = ChoiceId::new(1);

    fn snapshot(votes: &[(&str, ChoiceId)]) -> LedgerSnapshot {
        let registry = Arc::new(ChoiceRegistry::with_choices(["A", "B"]).unwrap());
        let ledger = VoteLedger::new(registry);
        ledger.open().unwrap();
        for (voter, choice) in votes {
            ledger.cast_vote(VoterId::new(*voter), *choice).unwrap();
        }
        ledger.snapshot()
    }

    fn seeded(byte: u8) -> SessionSeed {
        SessionSeed::new(Seed::new([byte; 32]))
    }

    #[test]
    fn pool_is_winning_voters_in_ledger_order() {
        let snap = snapshot(&[("v1", A), ("v2", B), ("v3", A)]);
        let pool = RandomSelector.eligible_voters(&[A], &snap);
        assert_eq!(pool, vec![VoterId::new("v1"), VoterId::new("v3")]);
    }

    #[test]
    fn tied_pool_spans_all_tied_choices() {
        let snap = snapshot(&[("v1", A), ("v2", B)]);
        let pool = RandomSelector.eligible_voters(&[A, B], &snap);
        assert_eq!(pool, vec![VoterId::new("v1"), VoterId::new("v2")]);
    }

    #[test]
    fn selected_voter_backed_a_winning_choice() {
        let snap = snapshot(&[("v1", A), ("v2", B), ("v3", A)]);
        for byte in 0..32u8 {
            let outcome = RandomSelector
                .select_winner_voter(&[A], &snap, &seeded(byte))
                .unwrap();
            assert!(outcome.voter.as_str() == "v1" || outcome.voter.as_str() == "v3");
            assert_eq!(outcome.eligible, 2);
            assert_eq!(outcome.snapshot_version, 3);
        }
    }

    #[test]
    fn fixed_seed_reproduces_the_draw() {
        let snap = snapshot(&[("v1", A), ("v2", A), ("v3", A), ("v4", B)]);
        let first = RandomSelector
            .select_winner_voter(&[A], &snap, &seeded(7))
            .unwrap();
        let second = RandomSelector
            .select_winner_voter(&[A], &snap, &seeded(7))
            .unwrap();
        assert_eq!(first, second);
        assert!(RandomSelector.verify_draw(&first, &snap, &seeded(7)).unwrap());
        assert_eq!(first.source, "session-seed");
    }

    #[test]
    fn verify_rejects_other_seed_or_ledger() {
        let snap = snapshot(&[("v1", A), ("v2", A), ("v3", A)]);
        let outcome = RandomSelector
            .select_winner_voter(&[A], &snap, &seeded(7))
            .unwrap();

        let mut forged = outcome.clone();
        forged.randomness = "00".repeat(32);
        assert!(!RandomSelector.verify_draw(&forged, &snap, &seeded(7)).unwrap());

        let other = snapshot(&[("v1", A), ("v2", A), ("v9", A)]);
        assert!(!RandomSelector.verify_draw(&outcome, &other, &seeded(7)).unwrap());
    }

    #[test]
    fn pool_content_changes_the_context() {
        let s1 = snapshot(&[("v1", A), ("v2", A)]);
        let s2 = snapshot(&[("v1", A), ("v3", A)]);
        let o1 = RandomSelector.select_winner_voter(&[A], &s1, &seeded(1)).unwrap();
        let o2 = RandomSelector.select_winner_voter(&[A], &s2, &seeded(1)).unwrap();
        assert_ne!(o1.pool_digest, o2.pool_digest);
        assert_ne!(o1.randomness, o2.randomness);
    }

    #[test]
    fn empty_pool_fails() {
        let snap = snapshot(&[("v1", A)]);
        assert_eq!(
            RandomSelector
                .select_winner_voter(&[B], &snap, &seeded(1))
                .unwrap_err(),
            VoteError::NoEligibleVoters
        );
    }

    #[test]
    fn source_failure_is_surfaced() {
        let snap = snapshot(&[("v1", A)]);
        let err = RandomSelector
            .select_winner_voter(&[A], &snap, &FailingRandom)
            .unwrap_err();
        assert_eq!(err.kind(), "randomness");
    }

    #[test]
    fn null_random_picks_deterministically() {
        let snap = snapshot(&[("v1", A), ("v2", A), ("v3", A)]);
        let a = RandomSelector
            .select_winner_voter(&[A], &snap, &NullRandom::constant([5u8; 32]))
            .unwrap();
        let b = RandomSelector
            .select_winner_voter(&[A], &snap, &NullRandom::constant([5u8; 32]))
            .unwrap();
        assert_eq!(a.voter, b.voter);
        assert_eq!(a.source, "null-random");
    }

    #[test]
    fn varying_seeds_converge_to_uniform() {
        let snap = snapshot(&[("A", A), ("B", A), ("C", A)]);
        let trials = 6_000u32;
        let mut counts: HashMap<String, u32> = HashMap::new();
        for i in 0..trials {
            let mut seed = [0u8; 32];
            seed[..4].copy_from_slice(&i.to_le_bytes());
            let source = SessionSeed::new(Seed::new(seed));
            let outcome = RandomSelector.select_winner_voter(&[A], &snap, &source).unwrap();
            *counts.entry(outcome.voter.to_string()).or_default() += 1;
        }
        assert_eq!(counts.len(), 3);
        for (voter, count) in &counts {
            // Expected 2000 each; allow roughly 6 standard deviations.
            assert!((1_780..=2_220).contains(count), "{voter}: {count} of {trials}");
        }
    }
}
