//! End-to-end voting sessions through the coordinator: the worked scenarios,
//! concurrent casting, and offline replay from a ledger export.

use std::collections::HashSet;
use std::sync::Arc;

use votedraw_ledger::LedgerExport;
use votedraw_resolution::{RandomSelector, ResolutionCoordinator, TallyEngine, Winner};
use votedraw_types::{ChoiceId, Seed, SessionPhase, VoteError, VoterId};
use votedraw_vrf::{SeedCommitment, SessionSeed};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn session(labels: &[&str], seed: u8) -> ResolutionCoordinator {
    let source = Box::new(SessionSeed::new(Seed::new([seed; 32])));
    let coordinator = ResolutionCoordinator::from_labels(labels.iter().copied(), source).unwrap();
    coordinator.open().unwrap();
    coordinator
}

fn v(s: &str) -> VoterId {
    VoterId::new(s)
}

// ---------------------------------------------------------------------------
// 1. Single winner
// ---------------------------------------------------------------------------

#[test]
fn red_wins_and_a_red_voter_is_drawn() {
    let c = session(&["Red", "Blue"], 1);
    c.cast_vote(&v("voter1"), 0).unwrap();
    c.cast_vote(&v("voter2"), 1).unwrap();
    c.cast_vote(&v("voter3"), 0).unwrap();

    assert_eq!(c.vote_count(), 3);
    let tally = c.tally();
    assert_eq!(tally.get(ChoiceId::new(0)), Some(2));
    assert_eq!(tally.get(ChoiceId::new(1)), Some(1));
    assert_eq!(
        c.winner().unwrap(),
        Winner::Single {
            choice: ChoiceId::new(0),
            votes: 2
        }
    );

    let snapshot = c.snapshot();
    let pool = RandomSelector.eligible_voters(&[ChoiceId::new(0)], &snapshot);
    assert_eq!(pool, vec![v("voter1"), v("voter3")]);

    c.close().unwrap();
    let picked = c.pick_random_voter_from_highest_voted_choice().unwrap();
    assert!(picked == v("voter1") || picked == v("voter3"));
}

// ---------------------------------------------------------------------------
// 2. Duplicate vote
// ---------------------------------------------------------------------------

#[test]
fn second_vote_by_same_voter_is_rejected() {
    let c = session(&["Red", "Blue"], 1);
    c.cast_vote(&v("voter1"), 0).unwrap();
    assert_eq!(
        c.cast_vote(&v("voter1"), 1).unwrap_err(),
        VoteError::AlreadyVoted(v("voter1"))
    );
    assert_eq!(c.vote_count(), 1);
}

// ---------------------------------------------------------------------------
// 3. Empty ledger
// ---------------------------------------------------------------------------

#[test]
fn drawing_from_empty_ledger_fails() {
    let c = session(&["Red", "Blue"], 1);
    assert_eq!(
        c.pick_random_voter_from_highest_voted_choice().unwrap_err(),
        VoteError::NoVotesCast
    );
    c.close().unwrap();
    assert_eq!(
        c.pick_random_voter_from_highest_voted_choice().unwrap_err(),
        VoteError::NoVotesCast
    );
}

// ---------------------------------------------------------------------------
// 4. Tie
// ---------------------------------------------------------------------------

#[test]
fn tie_draws_from_both_choices_voters() {
    let mut drawn = HashSet::new();
    for seed in 0..64u8 {
        let c = session(&["A", "B"], seed);
        c.cast_vote(&v("voter1"), 0).unwrap();
        c.cast_vote(&v("voter2"), 1).unwrap();
        c.close().unwrap();

        let winner = c.winner().unwrap();
        assert!(winner.is_tie());
        assert_eq!(winner.choices(), &[ChoiceId::new(0), ChoiceId::new(1)]);

        let outcome = c.draw().unwrap();
        assert_eq!(outcome.eligible, 2);
        drawn.insert(outcome.voter);
    }
    // Across seeds both tied choices' voters get drawn.
    assert_eq!(drawn, HashSet::from([v("voter1"), v("voter2")]));
}

// ---------------------------------------------------------------------------
// 5. Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_voters_are_all_counted() {
    let c = Arc::new(session(&["Red", "Blue", "Green"], 1));
    let n = 200;
    let handles: Vec<_> = (0..n)
        .map(|i| {
            let c = Arc::clone(&c);
            std::thread::spawn(move || c.cast_vote(&VoterId::new(format!("voter{i}")), i % 3))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(c.vote_count(), n as u64);
    let snapshot = c.snapshot();
    let voters: HashSet<_> = snapshot.records().iter().map(|r| r.voter.clone()).collect();
    assert_eq!(voters.len(), n);
    assert_eq!(c.tally().total(), n as u64);
}

#[test]
fn concurrent_duplicates_record_once() {
    let c = Arc::new(session(&["Red", "Blue"], 1));
    let handles: Vec<_> = (0..50)
        .map(|i| {
            let c = Arc::clone(&c);
            std::thread::spawn(move || c.cast_vote(&VoterId::new("same"), i % 2))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| *e == VoteError::AlreadyVoted(VoterId::new("same"))));
    assert_eq!(c.vote_count(), 1);
}

// ---------------------------------------------------------------------------
// 6. Audit replay
// ---------------------------------------------------------------------------

#[test]
fn exported_ledger_and_revealed_seed_replay_the_draw() {
    let c = session(&["Red", "Blue"], 42);
    let commitment = c.seed_commitment().unwrap().to_hex();
    for (i, choice) in [0usize, 1, 0, 0, 1, 0].iter().enumerate() {
        c.cast_vote(&VoterId::new(format!("voter{i}")), *choice).unwrap();
    }
    c.close().unwrap();
    let outcome = c.draw().unwrap();

    // What an auditor receives.
    let export_json = serde_json::to_string(&c.export()).unwrap();
    let seed = c.revealed_seed().unwrap().unwrap();

    let export: LedgerExport = serde_json::from_str(&export_json).unwrap();
    let snapshot = export.into_snapshot().unwrap();
    assert_eq!(snapshot.phase(), SessionPhase::Closed);
    SeedCommitment::from_hex(&commitment)
        .unwrap()
        .verify_reveal(&seed)
        .unwrap();

    let source = SessionSeed::new(seed);
    let winner = TallyEngine.winner(&snapshot).unwrap();
    let replayed = RandomSelector
        .select_winner_voter(winner.choices(), &snapshot, &source)
        .unwrap();
    assert_eq!(replayed, outcome);
}

#[test]
fn a_vote_cast_after_a_draw_changes_the_pool_digest() {
    let c = session(&["Red"], 3);
    c.cast_vote(&v("voter1"), 0).unwrap();
    c.cast_vote(&v("voter2"), 0).unwrap();
    let early = c.draw().unwrap();
    c.cast_vote(&v("voter3"), 0).unwrap();
    let late = c.draw().unwrap();

    assert_eq!(early.snapshot_version, 2);
    assert_eq!(late.snapshot_version, 3);
    assert_ne!(early.pool_digest, late.pool_digest);
    assert!(!c.verify_draw(&early).unwrap());
}
