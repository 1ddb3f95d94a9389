//! Trial construction: one model plus its shuffled choice set.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::corpus::{Item, ItemPool};
use crate::shuffle;

/// One presentation: the model to match and the displayed choices.
///
/// Replaced wholesale on every new turn, never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Trial {
    /// The reference item the learner must match.
    pub model: Item,
    /// The displayed choices, model included exactly once, in random order.
    pub choices: Vec<Item>,
}

impl Trial {
    /// Id of the model item.
    pub fn model_id(&self) -> &str {
        &self.model.id
    }

    /// Whether an id is among the displayed choices.
    pub fn offers(&self, id: &str) -> bool {
        self.choices.iter().any(|item| item.id == id)
    }
}

/// Build a trial for a model against a pool.
///
/// Curated distractors are resolved against the pool in their authored
/// order (unresolved ids are silently dropped); if fewer than
/// `proposal_count - 1` resolve, the list is topped up with a random draw
/// from the rest of the pool. The model is inserted at a uniformly random
/// position. When the pool holds fewer than `proposal_count` distinct
/// items the trial simply offers fewer choices.
pub fn build_trial<R: Rng>(
    model: &Item,
    pool: &ItemPool,
    proposal_count: usize,
    rng: &mut R,
) -> Trial {
    let wanted = proposal_count.saturating_sub(1);

    let mut distractors: Vec<Item> = model
        .distractors
        .iter()
        .filter_map(|id| pool.get(id).cloned())
        .take(wanted)
        .collect();

    if distractors.len() < wanted {
        let others: Vec<Item> = pool
            .items()
            .iter()
            .filter(|item| item.id != model.id && !distractors.iter().any(|d| d.id == item.id))
            .cloned()
            .collect();
        let mut extra = shuffle::shuffled(&others, rng);
        extra.truncate(wanted - distractors.len());
        distractors.extend(extra);
    }

    Trial {
        model: model.clone(),
        choices: shuffle::insert_at_random(&distractors, model.clone(), rng),
    }
}
