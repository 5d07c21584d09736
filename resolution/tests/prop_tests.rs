use std::sync::Arc;

use proptest::prelude::*;

use votedraw_ledger::{ChoiceRegistry, VoteLedger};
use votedraw_resolution::{RandomSelector, TallyEngine};
use votedraw_types::{ChoiceId, Seed, VoterId};
use votedraw_vrf::SessionSeed;

fn ledger_with(choices: usize, votes: &[u32]) -> VoteLedger {
    let labels: Vec<String> = (0..choices).map(|i| format!("choice{i}")).collect();
    let ledger = VoteLedger::new(Arc::new(ChoiceRegistry::with_choices(labels).unwrap()));
    ledger.open().unwrap();
    for (i, choice) in votes.iter().enumerate() {
        ledger
            .cast_vote(VoterId::new(format!("voter{i}")), ChoiceId::new(*choice))
            .unwrap();
    }
    ledger
}

proptest! {
    /// Counts always sum to the ledger length, and every choice is present.
    #[test]
    fn tally_conserves_votes(votes in prop::collection::vec(0u32..5, 0..100)) {
        let ledger = ledger_with(5, &votes);
        let tally = TallyEngine.tally(&ledger.snapshot());
        prop_assert_eq!(tally.total(), ledger.size());
        prop_assert_eq!(tally.len(), 5);
    }

    /// Winner is a pure function of the snapshot and names only maximal choices.
    #[test]
    fn winner_is_deterministic_and_maximal(votes in prop::collection::vec(0u32..4, 1..60)) {
        let ledger = ledger_with(4, &votes);
        let snapshot = ledger.snapshot();
        let first = TallyEngine.winner(&snapshot).unwrap();
        let second = TallyEngine.winner(&snapshot).unwrap();
        prop_assert_eq!(&first, &second);

        let tally = TallyEngine.tally(&snapshot);
        let max = tally.iter().map(|(_, n)| n).max().unwrap();
        prop_assert_eq!(first.votes(), max);
        for (id, n) in tally.iter() {
            prop_assert_eq!(first.choices().contains(&id), n == max);
        }
    }

    /// The drawn voter always backed one of the winning choices, and the same
    /// seed reproduces the same draw.
    #[test]
    fn draw_stays_inside_the_winning_pool(
        votes in prop::collection::vec(0u32..3, 1..60),
        seed in prop::array::uniform32(0u8..),
    ) {
        let ledger = ledger_with(3, &votes);
        let snapshot = ledger.snapshot();
        let winner = TallyEngine.winner(&snapshot).unwrap();
        let source = SessionSeed::new(Seed::new(seed));

        let outcome = RandomSelector
            .select_winner_voter(winner.choices(), &snapshot, &source)
            .unwrap();
        let record = snapshot
            .records()
            .iter()
            .find(|r| r.voter == outcome.voter)
            .unwrap();
        prop_assert!(winner.choices().contains(&record.choice));
        prop_assert!(outcome.index < outcome.eligible);

        let again = RandomSelector
            .select_winner_voter(winner.choices(), &snapshot, &source)
            .unwrap();
        prop_assert_eq!(outcome, again);
    }
}
