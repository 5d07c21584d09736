//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies of the engine (randomness, caller identity) sit
//! behind traits. This crate provides test-friendly implementations that
//! return deterministic values and never touch the operating system.

pub mod identity;
pub mod random;

pub use identity::NullIdentities;
pub use random::{FailingRandom, NullRandom};
