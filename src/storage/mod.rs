//! Ledger persistence backends.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileLedgerStore;
pub use memory::MemoryLedgerStore;
pub use traits::LedgerStore;
