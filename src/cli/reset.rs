//! Clear the persisted ledger.

use crate::error::Result;
use crate::storage::LedgerStore;

/// The reset-ledger command.
pub struct ResetCommand<S> {
    store: S,
}

impl<S: LedgerStore> ResetCommand<S> {
    /// Create a reset command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Clear the store. Returns whether there was anything to clear.
    pub fn run(&self) -> Result<bool> {
        let had_data = self.store.load()?.has_data();
        self.store.clear()?;
        tracing::info!(had_data, "ledger cleared");
        Ok(had_data)
    }
}
