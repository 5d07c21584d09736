//! Error taxonomy shared by the registry, ledger and resolution engine.

use thiserror::Error;

use crate::{ChoiceId, SessionPhase, VoterId};

/// Every failure a voting operation can report.
///
/// All variants are expected, recoverable outcomes returned to the caller.
/// None of them is retried inside the engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VoteError {
    #[error("choice set must not be empty")]
    EmptyChoiceSet,

    #[error("choice label at position {0} is blank")]
    InvalidChoiceLabel(usize),

    #[error("choice registry is already initialized")]
    AlreadyInitialized,

    #[error("choice registry has not been initialized")]
    NotInitialized,

    #[error("unknown choice {0}")]
    UnknownChoice(ChoiceId),

    #[error("voting is closed")]
    VotingClosed,

    #[error("voting is still open")]
    VotingOpen,

    #[error("voter {0} has already voted")]
    AlreadyVoted(VoterId),

    #[error("no votes have been cast")]
    NoVotesCast,

    #[error("no eligible voters for the winning choices")]
    NoEligibleVoters,

    #[error("cannot move session from {from} to {to}")]
    InvalidTransition { from: SessionPhase, to: SessionPhase },

    #[error("randomness source failed: {0}")]
    Randomness(String),

    #[error("corrupt ledger export: {0}")]
    CorruptExport(String),
}

impl VoteError {
    /// Stable machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyChoiceSet => "empty_choice_set",
            Self::InvalidChoiceLabel(_) => "invalid_choice_label",
            Self::AlreadyInitialized => "already_initialized",
            Self::NotInitialized => "not_initialized",
            Self::UnknownChoice(_) => "unknown_choice",
            Self::VotingClosed => "voting_closed",
            Self::VotingOpen => "voting_open",
            Self::AlreadyVoted(_) => "already_voted",
            Self::NoVotesCast => "no_votes_cast",
            Self::NoEligibleVoters => "no_eligible_voters",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Randomness(_) => "randomness",
            Self::CorruptExport(_) => "corrupt_export",
        }
    }
}
