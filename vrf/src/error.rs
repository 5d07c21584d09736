use thiserror::Error;

#[derive(Debug, Error)]
pub enum VrfError {
    #[error("operating system entropy unavailable: {0}")]
    Entropy(String),

    #[error("revealed seed does not match commitment")]
    CommitmentMismatch,

    #[error("invalid commitment: {0}")]
    InvalidCommitment(String),

    #[error("provider not available: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Other(String),
}

impl From<VrfError> for votedraw_types::VoteError {
    fn from(e: VrfError) -> Self {
        votedraw_types::VoteError::Randomness(e.to_string())
    }
}
