//! Pinned ledger views and the portable ledger export.
//!
//! A [`LedgerSnapshot`] shares the ledger's record vector at one version.
//! Appends after the snapshot was taken go to a fresh copy, so a snapshot
//! never observes a partially appended or later record. Tally, winner and
//! selection all run against one snapshot.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use votedraw_types::{Choice, ChoiceId, SessionPhase, VoteError, VoteRecord, VoterId};

/// A consistent, point-in-time view of the ledger.
#[derive(Clone, Debug)]
pub struct LedgerSnapshot {
    phase: SessionPhase,
    choices: Arc<[Choice]>,
    records: Arc<Vec<VoteRecord>>,
}

impl LedgerSnapshot {
    pub(crate) fn new(
        phase: SessionPhase,
        choices: Arc<[Choice]>,
        records: Arc<Vec<VoteRecord>>,
    ) -> Self {
        Self {
            phase,
            choices,
            records,
        }
    }

    /// Version number: the ledger length when the snapshot was pinned.
    pub fn version(&self) -> u64 {
        self.records.len() as u64
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Session phase at the time the snapshot was taken.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn records(&self) -> &[VoteRecord] {
        &self.records
    }

    /// Voters of `choice`, in ledger order.
    pub fn voters_for(&self, choice: ChoiceId) -> VotersFor {
        VotersFor {
            records: Arc::clone(&self.records),
            choice,
            next: 0,
        }
    }

    /// Voters whose choice is any of `choices`, in ledger order.
    pub fn voters_in<'a>(&'a self, choices: &'a [ChoiceId]) -> impl Iterator<Item = &'a VoterId> {
        self.records
            .iter()
            .filter(move |r| choices.contains(&r.choice))
            .map(|r| &r.voter)
    }

    /// Blake2b-256 digest of the choice list and every record.
    pub fn digest(&self) -> [u8; 32] {
        compute_digest(&self.choices, &self.records)
    }

    /// Portable form for audit and offline replay.
    pub fn export(&self) -> LedgerExport {
        LedgerExport {
            version: self.version(),
            phase: self.phase,
            choices: self.choices.iter().map(|c| c.label.clone()).collect(),
            records: self.records.as_ref().clone(),
            digest: hex::encode(self.digest()),
        }
    }
}

/// Lazy, restartable iterator over the voters of one choice.
///
/// Holds its own pin on the snapshot's records; clone it (or call
/// [`restart`](Self::restart)) to iterate again from the start.
#[derive(Clone, Debug)]
pub struct VotersFor {
    records: Arc<Vec<VoteRecord>>,
    choice: ChoiceId,
    next: usize,
}

impl VotersFor {
    pub fn restart(&mut self) {
        self.next = 0;
    }

    pub fn choice(&self) -> ChoiceId {
        self.choice
    }
}

impl Iterator for VotersFor {
    type Item = VoterId;

    fn next(&mut self) -> Option<VoterId> {
        while let Some(record) = self.records.get(self.next) {
            self.next += 1;
            if record.choice == self.choice {
                return Some(record.voter.clone());
            }
        }
        None
    }
}

/// Serializable ledger contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerExport {
    pub version: u64,
    pub phase: SessionPhase,
    pub choices: Vec<String>,
    pub records: Vec<VoteRecord>,
    /// Hex Blake2b-256 digest over `choices` and `records`.
    pub digest: String,
}

impl LedgerExport {
    /// Rebuild a snapshot, re-checking every ledger invariant.
    pub fn into_snapshot(self) -> Result<LedgerSnapshot, VoteError> {
        if self.choices.is_empty() {
            return Err(VoteError::CorruptExport("no choices".into()));
        }
        if self.version != self.records.len() as u64 {
            return Err(VoteError::CorruptExport(format!(
                "version {} does not match {} records",
                self.version,
                self.records.len()
            )));
        }

        let choices: Vec<Choice> = self
            .choices
            .into_iter()
            .enumerate()
            .map(|(i, label)| {
                ChoiceId::from_index(i)
                    .map(|id| Choice::new(id, label))
                    .ok_or_else(|| VoteError::CorruptExport(format!("choice index {i}")))
            })
            .collect::<Result<_, _>>()?;

        {
            let mut seen = HashSet::with_capacity(self.records.len());
            for (position, record) in self.records.iter().enumerate() {
                if record.sequence != position as u64 {
                    return Err(VoteError::CorruptExport(format!(
                        "record at {position} has sequence {}",
                        record.sequence
                    )));
                }
                if record.choice.index() >= choices.len() {
                    return Err(VoteError::CorruptExport(format!(
                        "record at {position} names unknown choice {}",
                        record.choice
                    )));
                }
                if !seen.insert(&record.voter) {
                    return Err(VoteError::CorruptExport(format!(
                        "voter {} appears more than once",
                        record.voter
                    )));
                }
            }
        }

        let expected = hex::encode(compute_digest(&choices, &self.records));
        if !expected.eq_ignore_ascii_case(&self.digest) {
            return Err(VoteError::CorruptExport("digest mismatch".into()));
        }

        Ok(LedgerSnapshot::new(
            self.phase,
            choices.into(),
            Arc::new(self.records),
        ))
    }
}

fn compute_digest(choices: &[Choice], records: &[VoteRecord]) -> [u8; 32] {
    use blake2::digest::consts::U32;
    use blake2::{Blake2b, Digest};

    let mut hasher = Blake2b::<U32>::new();
    hasher.update(b"votedraw/ledger/v1");
    hasher.update((choices.len() as u64).to_le_bytes());
    for choice in choices {
        hasher.update((choice.label.len() as u64).to_le_bytes());
        hasher.update(choice.label.as_bytes());
    }
    hasher.update((records.len() as u64).to_le_bytes());
    for record in records {
        let voter = record.voter.as_bytes();
        hasher.update((voter.len() as u64).to_le_bytes());
        hasher.update(voter);
        hasher.update(record.choice.as_u32().to_le_bytes());
        hasher.update(record.sequence.to_le_bytes());
    }

    let result = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&result);
    out
}
