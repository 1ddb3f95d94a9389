//! Teacher-authored custom item sets.
//!
//! A custom set is stored as a flat list of display values; resolution
//! derives one item per value and gives every item all other items of the
//! set as distractors. Authoring (create/delete/edit UI) is external — this
//! module only turns a stored set into a validated pool.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::config::limits;
use crate::corpus::{Item, ItemPool, UnitType};
use crate::error::{Result, SimileError};

/// A stored custom item set, as authored by a teacher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomSet {
    /// Unique identifier of the set.
    pub id: String,
    /// Display name, bounded length.
    pub name: String,
    /// Unit type the set drills.
    pub unit: UnitType,
    /// Raw display values, one per item.
    pub values: Vec<String>,
}

impl CustomSet {
    /// Create a custom set.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit: UnitType,
        values: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit,
            values,
        }
    }

    /// Load a stored set from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| SimileError::storage(path, e))?;
        let set: CustomSet = serde_json::from_str(&content)?;
        Ok(set)
    }

    /// Resolve the stored values into a validated pool.
    ///
    /// Each value becomes an item whose id is the trimmed, lowercased value
    /// and whose distractors are the ids of all other items in the set.
    ///
    /// # Errors
    ///
    /// Returns `SimileError::Content` if the set is empty, exceeds the item
    /// limit, has an over-long name, or contains values that collide after
    /// normalization.
    pub fn resolve(&self) -> Result<ItemPool> {
        if self.name.chars().count() > limits::MAX_CUSTOM_NAME_CHARS {
            return Err(SimileError::content(format!(
                "custom set name exceeds {} characters",
                limits::MAX_CUSTOM_NAME_CHARS
            )));
        }
        if self.values.is_empty() {
            return Err(SimileError::content(format!(
                "custom set {} has no items",
                self.id
            )));
        }
        if self.values.len() > limits::MAX_CUSTOM_ITEMS {
            return Err(SimileError::content(format!(
                "custom set {} exceeds {} items",
                self.id,
                limits::MAX_CUSTOM_ITEMS
            )));
        }

        let ids: Vec<String> = self.values.iter().map(|v| normalize(v)).collect();

        let mut seen = HashSet::new();
        for (id, value) in ids.iter().zip(&self.values) {
            if id.is_empty() {
                return Err(SimileError::content(format!(
                    "custom set {} contains a blank value",
                    self.id
                )));
            }
            if !seen.insert(id.as_str()) {
                return Err(SimileError::content(format!(
                    "custom set {}: value {value:?} collides after normalization",
                    self.id
                )));
            }
        }

        let items = ids
            .iter()
            .zip(&self.values)
            .map(|(id, value)| Item {
                id: id.clone(),
                value: value.clone(),
                distractors: ids.iter().filter(|other| *other != id).cloned().collect(),
            })
            .collect();

        ItemPool::new(self.unit, items)
    }
}

/// Normalize a raw value into an item id.
fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
