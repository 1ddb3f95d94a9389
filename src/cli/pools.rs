//! List the available corpora.

use serde::{Deserialize, Serialize};

use crate::corpus::{builtin_pool, UnitType};
use crate::error::Result;

/// One listed pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolInfo {
    /// Unit type of the pool.
    pub unit: UnitType,
    /// Number of items.
    pub size: usize,
    /// A few sample values.
    pub samples: Vec<String>,
}

/// Output of the pools command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolsOutput {
    /// The built-in pools.
    pub pools: Vec<PoolInfo>,
}

/// The pools command.
pub struct PoolsCommand;

impl PoolsCommand {
    /// Collect the built-in pools.
    pub fn run(&self) -> Result<PoolsOutput> {
        let mut pools = Vec::new();
        for &unit in UnitType::all() {
            let pool = builtin_pool(unit)?;
            pools.push(PoolInfo {
                unit,
                size: pool.len(),
                samples: pool
                    .items()
                    .iter()
                    .take(5)
                    .map(|item| item.value.clone())
                    .collect(),
            });
        }
        Ok(PoolsOutput { pools })
    }

    /// Render the listing for a terminal or as JSON.
    pub fn render(&self, output: &PoolsOutput, json: bool) -> Result<String> {
        if json {
            return Ok(serde_json::to_string_pretty(output)?);
        }
        let mut text = String::new();
        for info in &output.pools {
            text.push_str(&format!(
                "{:<10} {:>3} items   {} ...\n",
                info.unit.display_name(),
                info.size,
                info.samples.join(" ")
            ));
        }
        Ok(text)
    }
}
