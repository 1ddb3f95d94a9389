//! The drill engine: trial construction, fluency tracking, focus
//! selection, and the session state machine.

pub mod fluency;
pub mod focus;
pub mod session;
pub mod trial;

pub use fluency::FluencyTracker;
pub use focus::select_focus_corpus;
pub use session::{OutcomeEvent, SessionEngine, SessionSnapshot, TurnStatus};
pub use trial::{build_trial, Trial};
