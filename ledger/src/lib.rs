//! Vote ledger.
//!
//! A fixed [`ChoiceRegistry`] and an append-only [`VoteLedger`] of
//! [`VoteRecord`](votedraw_types::VoteRecord)s. Each voter appears at most once
//! and every record names a registered choice. Readers work on a
//! [`LedgerSnapshot`]: an immutable, versioned view that later appends never
//! change.

pub mod ledger;
pub mod registry;
pub mod snapshot;

pub use ledger::VoteLedger;
pub use registry::ChoiceRegistry;
pub use snapshot::{LedgerExport, LedgerSnapshot, VotersFor};
