//! Outcome resolution for a voting session.
//!
//! [`TallyEngine`] counts a ledger snapshot and finds the winning choice or
//! tied set. [`RandomSelector`] draws one voter from everyone who backed a
//! winning choice. [`ResolutionCoordinator`] is the facade callers use: it
//! owns the ledger and the randomness source and pins a single snapshot for
//! winner and draw.
//!
//! Ties never pick a choice arbitrarily: the eligible pool is widened to every
//! voter of every tied choice.

pub mod coordinator;
pub mod selection;
pub mod tally;

pub use coordinator::ResolutionCoordinator;
pub use selection::{DrawOutcome, RandomSelector};
pub use tally::{Tally, TallyEngine, Winner};
