//! HTTP/JSON binding for a votedraw session.
//!
//! Provides endpoints for:
//! - Choices and the running vote count
//! - Casting a vote as the caller's resolved identity
//! - Tally, session status and the winner draw
//! - Audit: seed commitment, revealed seed, ledger export
//! - Administrative open/close

pub mod error;
pub mod handlers;
pub mod identity;
pub mod server;

pub use error::RpcError;
pub use identity::{HeaderVoterResolver, VoterResolver};
pub use server::{router, RpcServer, RpcState};
