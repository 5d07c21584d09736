//! Shared utilities for votedraw.

pub mod logging;

pub use logging::{init_logging, LogFormat};
