//! Simile - adaptive drill engine for visual-discrimination exercises
//!
//! Simile drills a learner on visually confusable units (letters,
//! syllables, words): each turn shows a model and a set of choices, and the
//! engine adapts by requeueing failures, tracking response fluency, and
//! narrowing to a focus corpus of historically difficult items.

pub mod cert;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod shuffle;
pub mod storage;

pub use cert::{CertificateData, CorpusSource};
pub use config::Config;
pub use corpus::{builtin_pool, CustomSet, Item, ItemPool, UnitType};
pub use engine::{
    build_trial, select_focus_corpus, FluencyTracker, OutcomeEvent, SessionEngine,
    SessionSnapshot, Trial, TurnStatus,
};
pub use error::{Result, SimileError};
pub use ledger::{ItemReport, PerformanceLedger};
pub use storage::{FileLedgerStore, LedgerStore, MemoryLedgerStore};

// CLI commands
pub use cli::{DrillCommand, DrillOptions, PoolsCommand, ReportCommand, ResetCommand};
