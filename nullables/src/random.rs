//! Nullable random: deterministic draw randomness.

use std::sync::atomic::{AtomicUsize, Ordering};

use votedraw_vrf::{RandomOutput, RandomnessSource, VrfError};

/// A deterministic randomness source for testing.
///
/// Returns pre-configured values in order, cycling, regardless of context.
pub struct NullRandom {
    outputs: Vec<[u8; 32]>,
    index: AtomicUsize,
}

impl NullRandom {
    /// Create with a sequence of deterministic random values.
    ///
    /// # Panics
    /// Panics if `outputs` is empty.
    pub fn new(outputs: Vec<[u8; 32]>) -> Self {
        assert!(!outputs.is_empty(), "NullRandom needs at least one output");
        Self {
            outputs,
            index: AtomicUsize::new(0),
        }
    }

    /// Create with a single value that will be returned for every call.
    pub fn constant(value: [u8; 32]) -> Self {
        Self::new(vec![value])
    }

    /// Number of outputs handed out so far.
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }
}

impl RandomnessSource for NullRandom {
    fn get_randomness(&self, _context: &[u8]) -> Result<RandomOutput, VrfError> {
        let current = self.index.fetch_add(1, Ordering::SeqCst) % self.outputs.len();
        Ok(RandomOutput::new(self.outputs[current]))
    }

    fn verify(&self, _context: &[u8], output: &RandomOutput) -> Result<bool, VrfError> {
        Ok(self.outputs.contains(&output.value))
    }

    fn name(&self) -> &str {
        "null-random"
    }
}

/// A source that is never available.
pub struct FailingRandom;

impl RandomnessSource for FailingRandom {
    fn get_randomness(&self, _context: &[u8]) -> Result<RandomOutput, VrfError> {
        Err(VrfError::Unavailable("failing-random".into()))
    }

    fn verify(&self, _context: &[u8], _output: &RandomOutput) -> Result<bool, VrfError> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "failing-random"
    }
}
