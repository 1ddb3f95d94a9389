//! Mastery certificate payload.
//!
//! Built only after the engine reports the certificate unlocked; the
//! renderer (terminal banner, printable export) consumes this data and
//! adds nothing of its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::corpus::UnitType;

/// Where the mastered corpus came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorpusSource {
    /// One of the built-in pools.
    Builtin,
    /// A user-provided custom set.
    Custom {
        /// Display name of the set.
        name: String,
    },
}

/// Everything a certificate rendering needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CertificateData {
    /// Name the learner asked to appear on the certificate.
    pub learner_name: String,
    /// Unit type the certificate was earned on.
    pub unit: UnitType,
    /// Proposal count in effect during the qualifying streak.
    pub proposal_count: usize,
    /// Mean response latency over the qualifying streak, in milliseconds.
    pub mean_latency_ms: u64,
    /// Corpus the streak was achieved on.
    pub source: CorpusSource,
    /// When the certificate was issued.
    pub issued_at: DateTime<Utc>,
}

impl CertificateData {
    /// Assemble a certificate issued now.
    pub fn new(
        learner_name: impl Into<String>,
        unit: UnitType,
        proposal_count: usize,
        mean_latency_ms: u64,
        source: CorpusSource,
    ) -> Self {
        Self {
            learner_name: learner_name.into(),
            unit,
            proposal_count,
            mean_latency_ms,
            source,
            issued_at: Utc::now(),
        }
    }

    /// Human-readable description of the mastered corpus.
    pub fn corpus_label(&self) -> String {
        match &self.source {
            CorpusSource::Builtin => self.unit.display_name().to_string(),
            CorpusSource::Custom { name } => format!("{} ({})", name, self.unit.display_name()),
        }
    }
}
