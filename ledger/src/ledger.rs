//! The append-only vote ledger.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use votedraw_types::{ChoiceId, SessionPhase, VoteError, VoteRecord, VoterId};

use crate::registry::ChoiceRegistry;
use crate::snapshot::{LedgerSnapshot, VotersFor};

/// Ledger of cast votes for one voting session.
///
/// Every check in [`cast_vote`](Self::cast_vote) and the append itself run
/// under one write lock, so two concurrent calls for the same voter can never
/// both succeed. Records live in an `Arc<Vec<_>>`; an append while a
/// [`LedgerSnapshot`] still holds the previous version copies the vector
/// instead of mutating the shared one.
pub struct VoteLedger {
    registry: Arc<ChoiceRegistry>,
    state: RwLock<LedgerState>,
}

struct LedgerState {
    phase: SessionPhase,
    records: Arc<Vec<VoteRecord>>,
    voters: HashSet<VoterId>,
}

impl VoteLedger {
    /// A new, `Uninitialized` ledger over `registry`.
    pub fn new(registry: Arc<ChoiceRegistry>) -> Self {
        Self {
            registry,
            state: RwLock::new(LedgerState {
                phase: SessionPhase::Uninitialized,
                records: Arc::new(Vec::new()),
                voters: HashSet::new(),
            }),
        }
    }

    pub fn registry(&self) -> &Arc<ChoiceRegistry> {
        &self.registry
    }

    pub fn phase(&self) -> SessionPhase {
        self.read().phase
    }

    pub fn is_open(&self) -> bool {
        self.phase().accepts_votes()
    }

    /// Start accepting votes. Idempotent while open.
    pub fn open(&self) -> Result<(), VoteError> {
        let mut state = self.write();
        match state.phase {
            SessionPhase::Open => Ok(()),
            SessionPhase::Closed => Err(VoteError::InvalidTransition {
                from: SessionPhase::Closed,
                to: SessionPhase::Open,
            }),
            SessionPhase::Uninitialized => {
                if !self.registry.is_initialized() {
                    return Err(VoteError::NotInitialized);
                }
                state.phase = SessionPhase::Open;
                info!(choices = self.registry.count(), "voting opened");
                Ok(())
            }
        }
    }

    /// Stop accepting votes for good. Idempotent once closed.
    pub fn close(&self) -> Result<(), VoteError> {
        let mut state = self.write();
        match state.phase {
            SessionPhase::Closed => Ok(()),
            SessionPhase::Uninitialized => Err(VoteError::InvalidTransition {
                from: SessionPhase::Uninitialized,
                to: SessionPhase::Closed,
            }),
            SessionPhase::Open => {
                state.phase = SessionPhase::Closed;
                info!(votes = state.records.len(), "voting closed");
                Ok(())
            }
        }
    }

    /// Record `voter`'s vote for `choice` and return the new vote total.
    ///
    /// Checks, in order: the choice exists, voting is open, the voter has not
    /// voted yet.
    pub fn cast_vote(&self, voter: VoterId, choice: ChoiceId) -> Result<u64, VoteError> {
        self.registry.get(choice)?;

        let mut state = self.write();
        if !state.phase.accepts_votes() {
            return Err(VoteError::VotingClosed);
        }
        if state.voters.contains(&voter) {
            warn!(%voter, "duplicate vote rejected");
            return Err(VoteError::AlreadyVoted(voter));
        }

        let sequence = state.records.len() as u64;
        state.voters.insert(voter.clone());
        Arc::make_mut(&mut state.records).push(VoteRecord::new(voter, choice, sequence));
        let total = sequence + 1;
        debug!(%choice, sequence, total, "vote recorded");
        Ok(total)
    }

    /// Number of recorded votes.
    pub fn size(&self) -> u64 {
        self.read().records.len() as u64
    }

    /// Pin the current version of the ledger.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let state = self.read();
        LedgerSnapshot::new(state.phase, self.registry.choices(), Arc::clone(&state.records))
    }

    /// Voters of `choice` in ledger order, over a snapshot pinned now.
    pub fn records_for(&self, choice: ChoiceId) -> Result<VotersFor, VoteError> {
        self.registry.get(choice)?;
        Ok(self.snapshot().voters_for(choice))
    }

    // State is only mutated after every check has passed, so a panic while
    // holding the lock cannot leave it half-updated.
    fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
