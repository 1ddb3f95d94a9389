//! Item and pool types for the drill corpora.
//!
//! An item is one unit the learner can be asked to recognize, together with
//! its curated distractors (documented visual or phonological confusions).
//! Pools are validated once when they become active; a violation is an
//! authoring defect, not a runtime condition.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SimileError};

/// The linguistic unit a pool drills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    /// Single letters (mirror and morphological confusions).
    #[default]
    Letter,
    /// Syllables (nasal families, mirror inversions).
    Syllable,
    /// Whole words (mirror words, rhyme families, near-homographs).
    Word,
}

impl UnitType {
    /// Get all unit type variants.
    pub fn all() -> &'static [UnitType] {
        &[UnitType::Letter, UnitType::Syllable, UnitType::Word]
    }

    /// Get the display name for this unit type.
    pub fn display_name(&self) -> &'static str {
        match self {
            UnitType::Letter => "Letter",
            UnitType::Syllable => "Syllable",
            UnitType::Word => "Word",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for UnitType {
    type Err = SimileError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "letter" => Ok(UnitType::Letter),
            "syllable" => Ok(UnitType::Syllable),
            "word" => Ok(UnitType::Word),
            other => Err(SimileError::config(format!("unknown unit type: {other}"))),
        }
    }
}

/// One drillable item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Unique identifier within its pool.
    pub id: String,
    /// Displayed form.
    pub value: String,
    /// Ids of curated distractors, in priority order. Ids that do not
    /// resolve against the active pool are dropped at trial-build time.
    pub distractors: Vec<String>,
}

impl Item {
    /// Create an item from string-ish parts.
    pub fn new(id: impl Into<String>, value: impl Into<String>, distractors: &[&str]) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            distractors: distractors.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// An ordered, immutable collection of items for one unit type.
///
/// The only constructor validates the pool invariants, so holding an
/// `ItemPool` is proof the content is sound.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemPool {
    unit: UnitType,
    items: Vec<Item>,
}

impl ItemPool {
    /// Build a pool, validating content integrity.
    ///
    /// # Errors
    ///
    /// Returns `SimileError::Content` if the pool is empty, contains a
    /// duplicate id, or an item lists itself as a distractor.
    pub fn new(unit: UnitType, items: Vec<Item>) -> Result<Self> {
        if items.is_empty() {
            return Err(SimileError::content(format!(
                "empty pool for unit type {unit}"
            )));
        }

        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(SimileError::content(format!(
                    "duplicate item id: {}",
                    item.id
                )));
            }
            if item.distractors.iter().any(|d| d == &item.id) {
                return Err(SimileError::content(format!(
                    "item {} lists itself as a distractor",
                    item.id
                )));
            }
        }

        Ok(Self { unit, items })
    }

    /// The unit type this pool drills.
    pub fn unit(&self) -> UnitType {
        self.unit
    }

    /// All items in pool order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the pool is empty. Always false for a validated pool.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by id.
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Check whether an id exists in the pool.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}
