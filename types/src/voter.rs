//! Opaque voter identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque, pre-verified voter token (an address, a credential hash, ...).
///
/// The ledger assumes nothing about its structure beyond equality and
/// hashing. Authentication happens before a token reaches the core.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(String);

impl VoterId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VoterId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VoterId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
