//! Offline audit: recompute a session's result from its published artefacts.
//!
//! Inputs are the ledger export, the revealed seed and optionally the
//! commitment published while voting was open. The export is re-validated
//! before anything is recomputed.

use anyhow::Context;
use serde::Serialize;

use votedraw_ledger::LedgerExport;
use votedraw_resolution::{DrawOutcome, RandomSelector, Tally, TallyEngine, Winner};
use votedraw_types::Seed;
use votedraw_vrf::{SeedCommitment, SessionSeed};

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub version: u64,
    pub digest: String,
    pub commitment: String,
    /// True when a published commitment was supplied and matched the seed.
    pub commitment_verified: bool,
    pub tally: Tally,
    pub winner: Winner,
    pub draw: DrawOutcome,
}

pub fn replay(
    export: LedgerExport,
    seed: Seed,
    commitment: Option<&str>,
) -> anyhow::Result<ReplayReport> {
    let commitment_verified = match commitment {
        Some(hex) => {
            let published = SeedCommitment::from_hex(hex).context("parsing commitment")?;
            published
                .verify_reveal(&seed)
                .context("seed does not match the published commitment")?;
            true
        }
        None => false,
    };

    let digest = export.digest.clone();
    let snapshot = export.into_snapshot()?;
    let source = SessionSeed::new(seed);

    let engine = TallyEngine;
    let tally = engine.tally(&snapshot);
    let winner = engine.winner(&snapshot)?;
    let draw = RandomSelector.select_winner_voter(winner.choices(), &snapshot, &source)?;

    Ok(ReplayReport {
        version: snapshot.version(),
        digest,
        commitment: SeedCommitment::commit(&seed).to_hex(),
        commitment_verified,
        tally,
        winner,
        draw,
    })
}
