//! Ledger report: totals and the most-failed items.

use serde::{Deserialize, Serialize};

use crate::cli::resolve_pool;
use crate::config::{limits, Config};
use crate::error::Result;
use crate::ledger::ItemReport;
use crate::storage::LedgerStore;

/// Options for the report command.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Output as JSON.
    pub json: bool,
}

/// Output of the report command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOutput {
    /// Total model presentations recorded.
    pub total_attempts: u32,
    /// Total wrong submissions recorded.
    pub total_errors: u32,
    /// errors / attempts across the whole ledger.
    pub overall_error_rate: f64,
    /// The most-failed items, worst first.
    pub most_failed: Vec<ItemReport>,
}

/// The report command.
pub struct ReportCommand<S> {
    config: Config,
    store: S,
}

impl<S: LedgerStore> ReportCommand<S> {
    /// Create a report command.
    pub fn new(config: Config, store: S) -> Self {
        Self { config, store }
    }

    /// Build the report from the persisted ledger.
    pub fn run(&self) -> Result<ReportOutput> {
        let (pool, _) = resolve_pool(&self.config)?;
        let ledger = self.store.load()?;

        let total_attempts = ledger.total_attempts();
        let total_errors = ledger.total_errors();
        let overall_error_rate = if total_attempts > 0 {
            f64::from(total_errors) / f64::from(total_attempts)
        } else {
            0.0
        };

        Ok(ReportOutput {
            total_attempts,
            total_errors,
            overall_error_rate,
            most_failed: ledger.most_failed(&pool, limits::MOST_FAILED_TOP_N),
        })
    }

    /// Render the report for a terminal or as JSON.
    pub fn render(&self, output: &ReportOutput, options: &ReportOptions) -> Result<String> {
        if options.json {
            return Ok(serde_json::to_string_pretty(output)?);
        }

        let mut text = String::new();
        if output.total_attempts == 0 {
            text.push_str("no drill history yet\n");
            return Ok(text);
        }

        text.push_str(&format!(
            "attempts: {}  errors: {}  error rate: {:.0}%\n",
            output.total_attempts,
            output.total_errors,
            output.overall_error_rate * 100.0
        ));
        if !output.most_failed.is_empty() {
            text.push_str("most failed:\n");
            for report in &output.most_failed {
                text.push_str(&format!(
                    "  {:<12} {:>3} attempts  {:>3} errors  {:.0}%\n",
                    report.value,
                    report.attempts,
                    report.errors,
                    report.error_rate * 100.0
                ));
            }
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::PerformanceLedger;
    use crate::storage::MemoryLedgerStore;
    use std::sync::Arc;

    fn store_with_history() -> Arc<MemoryLedgerStore> {
        let store = Arc::new(MemoryLedgerStore::new());
        let mut ledger = PerformanceLedger::new();
        for _ in 0..4 {
            ledger.record_attempt("b");
        }
        ledger.record_error("b");
        ledger.record_error("b");
        for _ in 0..2 {
            ledger.record_attempt("d");
        }
        store.save(&ledger).unwrap();
        store
    }

    #[test]
    fn test_report_totals() {
        let command = ReportCommand::new(Config::default(), store_with_history());
        let output = command.run().unwrap();

        assert_eq!(output.total_attempts, 6);
        assert_eq!(output.total_errors, 2);
        assert!((output.overall_error_rate - 2.0 / 6.0).abs() < 1e-9);
        assert_eq!(output.most_failed[0].id, "b");
    }

    #[test]
    fn test_empty_ledger_report() {
        let command = ReportCommand::new(Config::default(), Arc::new(MemoryLedgerStore::new()));
        let output = command.run().unwrap();

        assert_eq!(output.total_attempts, 0);
        assert!(output.most_failed.is_empty());
        let text = command.render(&output, &ReportOptions::default()).unwrap();
        assert!(text.contains("no drill history"));
    }

    #[test]
    fn test_text_rendering() {
        let command = ReportCommand::new(Config::default(), store_with_history());
        let output = command.run().unwrap();
        let text = command.render(&output, &ReportOptions::default()).unwrap();

        assert!(text.contains("attempts: 6"));
        assert!(text.contains("most failed:"));
        assert!(text.contains('b'));
    }

    #[test]
    fn test_json_rendering() {
        let command = ReportCommand::new(Config::default(), store_with_history());
        let output = command.run().unwrap();
        let json = command
            .render(&output, &ReportOptions { json: true })
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_attempts"], 6);
        assert_eq!(value["most_failed"][0]["id"], "b");
    }
}
