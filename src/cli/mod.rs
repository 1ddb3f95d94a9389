//! CLI commands.
//!
//! - **drill**: the interactive session loop
//! - **report**: ledger totals and the most-failed items
//! - **pools**: list available corpora
//! - **reset**: clear the persisted ledger

pub mod drill;
pub mod pools;
pub mod report;
pub mod reset;

pub use drill::{DrillCommand, DrillOptions};
pub use pools::{PoolsCommand, PoolsOutput};
pub use report::{ReportCommand, ReportOutput};
pub use reset::ResetCommand;

use std::path::Path;

use crate::cert::CorpusSource;
use crate::config::Config;
use crate::corpus::{builtin_pool, CustomSet, ItemPool};
use crate::error::Result;

/// Resolve the active pool for a configuration: a custom set when one is
/// configured, the built-in pool for the configured unit otherwise.
pub fn resolve_pool(config: &Config) -> Result<(ItemPool, CorpusSource)> {
    match &config.custom_set {
        Some(path) => {
            let set = CustomSet::load(Path::new(path))?;
            let pool = set.resolve()?;
            Ok((pool, CorpusSource::Custom { name: set.name }))
        }
        None => Ok((builtin_pool(config.unit)?, CorpusSource::Builtin)),
    }
}
