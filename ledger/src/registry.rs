//! The fixed set of votable choices.

use std::sync::{Arc, OnceLock};

use votedraw_types::{Choice, ChoiceId, VoteError};

/// Immutable, ordered list of choices. Initialized exactly once.
///
/// Ids are assigned by position: the first label is `ChoiceId(0)`.
#[derive(Debug, Default)]
pub struct ChoiceRegistry {
    choices: OnceLock<Arc<[Choice]>>,
}

impl ChoiceRegistry {
    /// An uninitialized registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and initialize in one step.
    pub fn with_choices<I, S>(labels: I) -> Result<Self, VoteError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let registry = Self::new();
        registry.initialize(labels)?;
        Ok(registry)
    }

    /// Register the choice labels.
    ///
    /// Labels are trimmed. Fails with `AlreadyInitialized` on any call after
    /// the first successful one, `EmptyChoiceSet` for an empty list and
    /// `InvalidChoiceLabel` for a blank label.
    pub fn initialize<I, S>(&self, labels: I) -> Result<(), VoteError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.is_initialized() {
            return Err(VoteError::AlreadyInitialized);
        }

        let mut choices = Vec::new();
        for (position, label) in labels.into_iter().enumerate() {
            let label: String = label.into();
            let label = label.trim();
            if label.is_empty() {
                return Err(VoteError::InvalidChoiceLabel(position));
            }
            let id = ChoiceId::from_index(position)
                .ok_or(VoteError::InvalidChoiceLabel(position))?;
            choices.push(Choice::new(id, label));
        }
        if choices.is_empty() {
            return Err(VoteError::EmptyChoiceSet);
        }

        self.choices
            .set(choices.into())
            .map_err(|_| VoteError::AlreadyInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.choices.get().is_some()
    }

    /// Look up a choice by id.
    pub fn get(&self, id: ChoiceId) -> Result<&Choice, VoteError> {
        self.choices
            .get()
            .and_then(|choices| choices.get(id.index()))
            .ok_or(VoteError::UnknownChoice(id))
    }

    pub fn contains(&self, id: ChoiceId) -> bool {
        self.get(id).is_ok()
    }

    /// Number of choices (0 before initialization).
    pub fn count(&self) -> usize {
        self.choices.get().map_or(0, |c| c.len())
    }

    /// Labels in id order.
    pub fn labels(&self) -> Vec<String> {
        self.choices
            .get()
            .map(|c| c.iter().map(|choice| choice.label.clone()).collect())
            .unwrap_or_default()
    }

    /// Shared handle to the registered choices (empty before initialization).
    pub fn choices(&self) -> Arc<[Choice]> {
        self.choices
            .get()
            .cloned()
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }
}
