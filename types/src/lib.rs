//! Fundamental types for the votedraw workspace.
//!
//! This crate defines the types shared across every other crate: choice and
//! voter identifiers, ledger records, the session phase, the draw seed and the
//! error taxonomy returned by every ledger operation.

pub mod choice;
pub mod error;
pub mod record;
pub mod seed;
pub mod session;
pub mod voter;

pub use choice::{Choice, ChoiceId};
pub use error::VoteError;
pub use record::VoteRecord;
pub use seed::{Seed, SeedParseError};
pub use session::SessionPhase;
pub use voter::VoterId;
