//! RPC error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use votedraw_types::VoteError;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Vote(#[from] VoteError),

    #[error("caller identity could not be resolved")]
    MissingIdentity,

    #[error("admin token missing or wrong")]
    Unauthorized,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("server error: {0}")]
    Server(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl RpcError {
    /// Machine-readable error kind sent to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Vote(e) => e.kind(),
            Self::MissingIdentity => "missing_identity",
            Self::Unauthorized => "unauthorized",
            Self::InvalidRequest(_) => "invalid_request",
            Self::NotFound(_) => "not_found",
            Self::Server(_) => "server",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Vote(e) => match e {
                VoteError::UnknownChoice(_)
                | VoteError::EmptyChoiceSet
                | VoteError::InvalidChoiceLabel(_) => StatusCode::BAD_REQUEST,
                VoteError::VotingClosed
                | VoteError::VotingOpen
                | VoteError::AlreadyVoted(_)
                | VoteError::NoVotesCast
                | VoteError::NoEligibleVoters
                | VoteError::AlreadyInitialized
                | VoteError::NotInitialized
                | VoteError::InvalidTransition { .. } => StatusCode::CONFLICT,
                VoteError::Randomness(_) | VoteError::CorruptExport(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::MissingIdentity => StatusCode::UNAUTHORIZED,
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use votedraw_types::{ChoiceId, VoterId};

    #[test]
    fn client_errors_map_to_4xx() {
        let err = RpcError::from(VoteError::UnknownChoice(ChoiceId::new(2)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let err = RpcError::from(VoteError::AlreadyVoted(VoterId::new("v")));
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.kind(), "already_voted");
    }

    #[test]
    fn randomness_failure_is_a_server_error() {
        let err = RpcError::from(VoteError::Randomness("down".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn vote_errors_keep_their_message() {
        let err = RpcError::from(VoteError::VotingClosed);
        assert_eq!(err.to_string(), "voting is closed");
    }
}
