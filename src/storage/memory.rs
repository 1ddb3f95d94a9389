//! In-memory ledger storage for testing.

use std::sync::RwLock;

use crate::error::Result;
use crate::ledger::PerformanceLedger;
use crate::storage::LedgerStore;

/// In-memory ledger store, primarily for unit tests.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    ledger: RwLock<Option<PerformanceLedger>>,
}

impl MemoryLedgerStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything has been saved.
    pub fn is_empty(&self) -> bool {
        self.ledger.read().unwrap().is_none()
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn load(&self) -> Result<PerformanceLedger> {
        Ok(self.ledger.read().unwrap().clone().unwrap_or_default())
    }

    fn save(&self, ledger: &PerformanceLedger) -> Result<()> {
        *self.ledger.write().unwrap() = Some(ledger.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.ledger.write().unwrap() = None;
        Ok(())
    }
}
