//! Per-item performance counters accumulated across a session.
//!
//! The ledger is the engine's external collaborator: the engine never
//! mutates it directly, it only emits outcome events that the caller routes
//! here. Counters survive engine restarts and are cleared only by an
//! explicit reset. Item ids only — no learner-identifying data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::limits;
use crate::corpus::ItemPool;

/// Attempt and error counters keyed by item id.
///
/// BTreeMaps keep iteration deterministic, which the focus-corpus selector
/// and the report rely on.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerformanceLedger {
    attempts: BTreeMap<String, u32>,
    errors: BTreeMap<String, u32>,
}

/// One row of the "most failed" aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemReport {
    /// Item id.
    pub id: String,
    /// Displayed form, resolved against the pool (falls back to the id for
    /// items no longer in the active pool).
    pub value: String,
    /// Times the item was presented as the model.
    pub attempts: u32,
    /// Wrong submissions recorded while the item was the model.
    pub errors: u32,
    /// errors / attempts.
    pub error_rate: f64,
}

impl PerformanceLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an item was presented as the model.
    pub fn record_attempt(&mut self, item_id: &str) {
        *self.attempts.entry(item_id.to_string()).or_insert(0) += 1;
    }

    /// Record a wrong submission for the item that was the model.
    pub fn record_error(&mut self, item_id: &str) {
        *self.errors.entry(item_id.to_string()).or_insert(0) += 1;
    }

    /// Clear all counters. The only non-monotonic operation.
    pub fn reset(&mut self) {
        self.attempts.clear();
        self.errors.clear();
    }

    /// Attempts recorded for an item.
    pub fn attempts(&self, item_id: &str) -> u32 {
        self.attempts.get(item_id).copied().unwrap_or(0)
    }

    /// Errors recorded for an item.
    pub fn errors(&self, item_id: &str) -> u32 {
        self.errors.get(item_id).copied().unwrap_or(0)
    }

    /// Total attempts across all items.
    pub fn total_attempts(&self) -> u32 {
        self.attempts.values().sum()
    }

    /// Total errors across all items.
    pub fn total_errors(&self) -> u32 {
        self.errors.values().sum()
    }

    /// Whether anything has been recorded.
    pub fn has_data(&self) -> bool {
        self.total_attempts() > 0
    }

    /// errors / attempts for an item, or `None` below the evaluation
    /// threshold.
    pub fn error_rate(&self, item_id: &str) -> Option<f64> {
        let attempts = self.attempts(item_id);
        if attempts < limits::MIN_ATTEMPTS_FOR_EVAL {
            return None;
        }
        Some(f64::from(self.errors(item_id)) / f64::from(attempts))
    }

    /// The top-N most failed items, by error rate descending.
    ///
    /// Only items with at least one attempt are ranked. Ties keep the
    /// ledger's id order, so the report is deterministic.
    pub fn most_failed(&self, pool: &ItemPool, n: usize) -> Vec<ItemReport> {
        let mut reports: Vec<ItemReport> = self
            .attempts
            .iter()
            .filter(|(_, &attempts)| attempts >= 1)
            .map(|(id, &attempts)| {
                let errors = self.errors(id);
                ItemReport {
                    id: id.clone(),
                    value: pool
                        .get(id)
                        .map(|item| item.value.clone())
                        .unwrap_or_else(|| id.clone()),
                    attempts,
                    errors,
                    error_rate: f64::from(errors) / f64::from(attempts),
                }
            })
            .collect();

        reports.sort_by(|a, b| {
            b.error_rate
                .partial_cmp(&a.error_rate)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        reports.truncate(n);
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{builtin_pool, UnitType};

    #[test]
    fn test_counters_accumulate() {
        let mut ledger = PerformanceLedger::new();
        ledger.record_attempt("b");
        ledger.record_attempt("b");
        ledger.record_error("b");

        assert_eq!(ledger.attempts("b"), 2);
        assert_eq!(ledger.errors("b"), 1);
        assert_eq!(ledger.attempts("d"), 0);
        assert!(ledger.has_data());
    }

    #[test]
    fn test_totals() {
        let mut ledger = PerformanceLedger::new();
        ledger.record_attempt("b");
        ledger.record_attempt("d");
        ledger.record_error("d");
        ledger.record_error("d");

        assert_eq!(ledger.total_attempts(), 2);
        assert_eq!(ledger.total_errors(), 2);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut ledger = PerformanceLedger::new();
        ledger.record_attempt("b");
        ledger.record_error("b");
        ledger.reset();

        assert!(!ledger.has_data());
        assert_eq!(ledger.total_errors(), 0);
        assert_eq!(ledger, PerformanceLedger::new());
    }

    #[test]
    fn test_error_rate() {
        let mut ledger = PerformanceLedger::new();
        assert_eq!(ledger.error_rate("b"), None);

        ledger.record_attempt("b");
        ledger.record_attempt("b");
        ledger.record_error("b");
        assert_eq!(ledger.error_rate("b"), Some(0.5));
    }

    #[test]
    fn test_error_rate_can_exceed_one() {
        // The ledger never couples the two counters; a caller recording
        // more errors than attempts gets a rate above 1.0, not a panic.
        let mut ledger = PerformanceLedger::new();
        ledger.record_attempt("b");
        ledger.record_error("b");
        ledger.record_error("b");
        ledger.record_error("b");
        assert_eq!(ledger.error_rate("b"), Some(3.0));
    }

    #[test]
    fn test_most_failed_orders_by_rate() {
        let pool = builtin_pool(UnitType::Letter).unwrap();
        let mut ledger = PerformanceLedger::new();
        // b: 4 attempts, 1 error (0.25); d: 2 attempts, 2 errors (1.0);
        // p: 3 attempts, 0 errors.
        for _ in 0..4 {
            ledger.record_attempt("b");
        }
        ledger.record_error("b");
        for _ in 0..2 {
            ledger.record_attempt("d");
            ledger.record_error("d");
        }
        for _ in 0..3 {
            ledger.record_attempt("p");
        }

        let top = ledger.most_failed(&pool, 5);
        let ids: Vec<&str> = top.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "b", "p"]);
        assert_eq!(top[0].errors, 2);
        assert_eq!(top[0].value, "d");
    }

    #[test]
    fn test_most_failed_truncates() {
        let pool = builtin_pool(UnitType::Letter).unwrap();
        let mut ledger = PerformanceLedger::new();
        for id in ["b", "d", "p", "q", "n", "u", "m"] {
            ledger.record_attempt(id);
        }
        assert_eq!(ledger.most_failed(&pool, 5).len(), 5);
    }

    #[test]
    fn test_most_failed_falls_back_to_id_for_unknown_items() {
        let pool = builtin_pool(UnitType::Letter).unwrap();
        let mut ledger = PerformanceLedger::new();
        ledger.record_attempt("ba"); // syllable id, not in the letter pool
        let top = ledger.most_failed(&pool, 5);
        assert_eq!(top[0].value, "ba");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut ledger = PerformanceLedger::new();
        ledger.record_attempt("b");
        ledger.record_error("b");
        ledger.record_attempt("d");

        let json = serde_json::to_string(&ledger).unwrap();
        let back: PerformanceLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(ledger, back);
    }
}
