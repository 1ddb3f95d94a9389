//! Ledger storage trait.

use std::sync::Arc;

use crate::error::Result;
use crate::ledger::PerformanceLedger;

/// Trait for performance-ledger persistence backends.
///
/// Implementations are fail-open on missing data: a store that has never
/// been written loads as an empty ledger.
pub trait LedgerStore: Send + Sync {
    /// Load the persisted ledger, or an empty one if nothing was saved yet.
    fn load(&self) -> Result<PerformanceLedger>;

    /// Persist the ledger, replacing any previous snapshot.
    fn save(&self, ledger: &PerformanceLedger) -> Result<()>;

    /// Remove the persisted ledger. Succeeds when nothing was saved.
    fn clear(&self) -> Result<()>;
}

/// Blanket implementation for Arc-wrapped stores, so `Arc<T>` can be used
/// wherever a `LedgerStore` is expected.
impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    fn load(&self) -> Result<PerformanceLedger> {
        (**self).load()
    }

    fn save(&self, ledger: &PerformanceLedger) -> Result<()> {
        (**self).save(ledger)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
