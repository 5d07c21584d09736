//! The resolution facade consumed by transports.

use std::sync::Arc;

use tracing::{info, warn};

use votedraw_ledger::{ChoiceRegistry, LedgerExport, LedgerSnapshot, VoteLedger};
use votedraw_types::{ChoiceId, Seed, SessionPhase, VoteError, VoterId};
use votedraw_vrf::{RandomnessSource, SeedCommitment};

use crate::selection::{DrawOutcome, RandomSelector};
use crate::tally::{Tally, TallyEngine, Winner};

/// One voting session: ledger, randomness source and the four externally
/// consumed operations.
///
/// Drawing while the session is still `Open` is allowed. The result is simply
/// not final; callers that want a final draw close the session first.
pub struct ResolutionCoordinator {
    ledger: VoteLedger,
    source: Box<dyn RandomnessSource>,
    tally: TallyEngine,
    selector: RandomSelector,
}

impl ResolutionCoordinator {
    pub fn new(ledger: VoteLedger, source: Box<dyn RandomnessSource>) -> Self {
        Self {
            ledger,
            source,
            tally: TallyEngine,
            selector: RandomSelector,
        }
    }

    /// Build a session over a freshly initialized registry. The session
    /// starts `Uninitialized`; call [`open`](Self::open) to accept votes.
    pub fn from_labels<I, S>(labels: I, source: Box<dyn RandomnessSource>) -> Result<Self, VoteError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let registry = Arc::new(ChoiceRegistry::with_choices(labels)?);
        Ok(Self::new(VoteLedger::new(registry), source))
    }

    // ── The four operations ────────────────────────────────────────────

    /// Choice labels in id order.
    pub fn choices(&self) -> Vec<String> {
        self.ledger.registry().labels()
    }

    pub fn vote_count(&self) -> u64 {
        self.ledger.size()
    }

    /// Cast `voter`'s vote for the choice at `choice_index` (0-based).
    pub fn cast_vote(&self, voter: &VoterId, choice_index: usize) -> Result<u64, VoteError> {
        // An index wider than the id space cannot name a choice; u32::MAX is
        // never a registered id in practice and reports as unknown.
        let choice = ChoiceId::from_index(choice_index).unwrap_or(ChoiceId::new(u32::MAX));
        self.ledger.cast_vote(voter.clone(), choice)
    }

    /// Draw the prize winner from the backers of the highest-voted choice.
    pub fn pick_random_voter_from_highest_voted_choice(&self) -> Result<VoterId, VoteError> {
        self.draw().map(|outcome| outcome.voter)
    }

    // ── Reads ──────────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.ledger.phase()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.ledger.snapshot()
    }

    pub fn tally(&self) -> Tally {
        self.tally.tally(&self.ledger.snapshot())
    }

    pub fn winner(&self) -> Result<Winner, VoteError> {
        self.tally.winner(&self.ledger.snapshot())
    }

    /// Winner and draw over one pinned snapshot, with the full audit record.
    pub fn draw(&self) -> Result<DrawOutcome, VoteError> {
        let snapshot = self.ledger.snapshot();
        if snapshot.phase() == SessionPhase::Open {
            warn!(
                version = snapshot.version(),
                "drawing while voting is open; result is not final"
            );
        }

        let winner = self.tally.winner(&snapshot)?;
        let outcome =
            self.selector
                .select_winner_voter(winner.choices(), &snapshot, self.source.as_ref())?;
        info!(
            voter = %outcome.voter,
            index = outcome.index,
            eligible = outcome.eligible,
            tie = winner.is_tie(),
            version = outcome.snapshot_version,
            "winner drawn"
        );
        Ok(outcome)
    }

    /// Recompute a recorded draw against the current ledger.
    pub fn verify_draw(&self, outcome: &DrawOutcome) -> Result<bool, VoteError> {
        self.selector
            .verify_draw(outcome, &self.ledger.snapshot(), self.source.as_ref())
    }

    pub fn export(&self) -> LedgerExport {
        self.ledger.snapshot().export()
    }

    /// Commitment to the draw seed, publishable while voting is open.
    pub fn seed_commitment(&self) -> Option<SeedCommitment> {
        self.source.commitment()
    }

    /// The draw seed. Only revealed once the session is closed.
    pub fn revealed_seed(&self) -> Result<Option<Seed>, VoteError> {
        if self.ledger.phase() != SessionPhase::Closed {
            return Err(VoteError::VotingOpen);
        }
        Ok(self.source.reveal())
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    // ── Administrative control ─────────────────────────────────────────

    pub fn open(&self) -> Result<(), VoteError> {
        self.ledger.open()
    }

    pub fn close(&self) -> Result<(), VoteError> {
        self.ledger.close()
    }
}
