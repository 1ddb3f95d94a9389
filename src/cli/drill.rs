//! Interactive drill loop.
//!
//! Reads answers line by line, drives the session engine, routes outcome
//! events into the ledger, and persists after every turn. All I/O goes
//! through injected reader/writer handles so the loop is testable.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use crate::cert::{CertificateData, CorpusSource};
use crate::cli::resolve_pool;
use crate::config::{limits, Config};
use crate::engine::{OutcomeEvent, SessionEngine, TurnStatus};
use crate::error::Result;
use crate::ledger::PerformanceLedger;
use crate::storage::LedgerStore;

/// Options for the drill command.
#[derive(Debug, Clone, Default)]
pub struct DrillOptions {
    /// Name to put on a certificate, when one is earned.
    pub learner_name: Option<String>,
}

/// The interactive drill command.
pub struct DrillCommand<S> {
    config: Config,
    store: S,
    /// Pause after a correct answer; zero in tests.
    success_pause: Duration,
}

impl<S: LedgerStore> DrillCommand<S> {
    /// Create a drill command with the standard success pause.
    pub fn new(config: Config, store: S) -> Self {
        Self {
            config,
            store,
            success_pause: Duration::from_millis(limits::SUCCESS_PAUSE_MS),
        }
    }

    /// Override the success pause.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.success_pause = pause;
        self
    }

    /// Run the drill loop until the input ends or the learner quits.
    pub fn run<I: BufRead, O: Write>(
        &self,
        options: &DrillOptions,
        input: I,
        mut output: O,
    ) -> Result<()> {
        let (pool, source) = resolve_pool(&self.config)?;
        let mut ledger = self.store.load()?;
        let mut engine = SessionEngine::new(Arc::new(pool), &self.config, &ledger)?;
        let mut certificate_announced = false;

        writeln!(
            output,
            "simile drill: {} pool, {} choices",
            self.config.unit,
            engine.proposal_count()
        )?;
        if engine.focus_mode() {
            let ids: Vec<&str> = engine.focus_items().iter().map(|i| i.value.as_str()).collect();
            writeln!(output, "focus mode on: {}", ids.join(" "))?;
        }
        writeln!(output, "answer with a number, 'r' to restart, 'q' to quit")?;

        self.route_events(&mut engine, &mut ledger)?;
        self.render_trial(&engine, &mut output)?;
        engine.start_chronometer();

        for line in input.lines() {
            let line = line.map_err(|e| crate::error::SimileError::storage("<stdin>", e))?;
            let answer = line.trim();

            match answer {
                "" => continue,
                "q" | "quit" => break,
                "r" | "restart" => {
                    engine.restart();
                    self.route_events(&mut engine, &mut ledger)?;
                    writeln!(output, "session restarted")?;
                    self.render_trial(&engine, &mut output)?;
                    engine.start_chronometer();
                    continue;
                }
                _ => {}
            }

            let Some(chosen_id) = self.choice_for(&engine, answer) else {
                writeln!(output, "pick a number between 1 and {}", engine.current_trial().choices.len())?;
                continue;
            };

            engine.submit_answer(&chosen_id);
            let snapshot = engine.snapshot();
            match snapshot.status {
                TurnStatus::Success => {
                    writeln!(output, "correct! streak {} / total {}", snapshot.streak, snapshot.total_successes)?;
                    if engine.certificate_available() && !certificate_announced {
                        certificate_announced = true;
                        self.announce_certificate(&engine, &source, options, &mut output)?;
                    }
                    std::thread::sleep(self.success_pause);
                }
                TurnStatus::Error => {
                    writeln!(output, "not this one, try again next turn")?;
                }
                TurnStatus::Waiting => continue,
            }

            engine.advance();
            self.route_events(&mut engine, &mut ledger)?;
            engine.refresh_focus(&ledger);
            self.render_trial(&engine, &mut output)?;
            engine.start_chronometer();
        }

        self.store.save(&ledger)?;
        writeln!(output, "session saved")?;
        Ok(())
    }

    /// Map a 1-based numeric answer to a choice id.
    fn choice_for<R: rand::Rng>(&self, engine: &SessionEngine<R>, answer: &str) -> Option<String> {
        let index: usize = answer.parse().ok()?;
        let choices = &engine.current_trial().choices;
        if index == 0 || index > choices.len() {
            return None;
        }
        Some(choices[index - 1].id.clone())
    }

    fn render_trial<R: rand::Rng, O: Write>(
        &self,
        engine: &SessionEngine<R>,
        output: &mut O,
    ) -> Result<()> {
        let trial = engine.current_trial();
        writeln!(output)?;
        writeln!(output, "find: {}", trial.model.value)?;
        let choices: Vec<String> = trial
            .choices
            .iter()
            .enumerate()
            .map(|(i, item)| format!("[{}] {}", i + 1, item.value))
            .collect();
        writeln!(output, "{}", choices.join("  "))?;
        Ok(())
    }

    fn announce_certificate<R: rand::Rng, O: Write>(
        &self,
        engine: &SessionEngine<R>,
        source: &CorpusSource,
        options: &DrillOptions,
        output: &mut O,
    ) -> Result<()> {
        let snapshot = engine.snapshot();
        let mean_ms = snapshot
            .mean_latency
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let cert = CertificateData::new(
            options.learner_name.clone().unwrap_or_else(|| "learner".to_string()),
            self.config.unit,
            engine.proposal_count(),
            mean_ms,
            source.clone(),
        );
        writeln!(output, "*** certificate earned ***")?;
        writeln!(
            output,
            "{} mastered {} ({} choices, mean {}ms)",
            cert.learner_name,
            cert.corpus_label(),
            cert.proposal_count,
            cert.mean_latency_ms
        )?;
        tracing::info!(unit = %cert.unit, mean_ms = cert.mean_latency_ms, "certificate earned");
        Ok(())
    }

    fn route_events<R: rand::Rng>(
        &self,
        engine: &mut SessionEngine<R>,
        ledger: &mut PerformanceLedger,
    ) -> Result<()> {
        let events = engine.drain_events();
        if events.is_empty() {
            return Ok(());
        }
        for event in events {
            match event {
                OutcomeEvent::Attempted { item_id } => ledger.record_attempt(&item_id),
                OutcomeEvent::Failed { item_id } => ledger.record_error(&item_id),
                OutcomeEvent::Succeeded { .. } => {}
            }
        }
        self.store.save(ledger)
    }
}
