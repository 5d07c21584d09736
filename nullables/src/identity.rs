//! Nullable identities: predictable voter tokens.

use votedraw_types::VoterId;

/// Hands out `prefix0`, `prefix1`, ... as voter identities.
pub struct NullIdentities {
    prefix: String,
    next: usize,
}

impl NullIdentities {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }

    /// The first `n` identities, without advancing.
    pub fn first_n(&self, n: usize) -> Vec<VoterId> {
        (0..n).map(|i| self.id(i)).collect()
    }

    fn id(&self, i: usize) -> VoterId {
        VoterId::new(format!("{}{}", self.prefix, i))
    }
}

impl Iterator for NullIdentities {
    type Item = VoterId;

    fn next(&mut self) -> Option<VoterId> {
        let id = self.id(self.next);
        self.next += 1;
        Some(id)
    }
}
