//! The session engine: turn queue, state machine, certificate gating.
//!
//! The engine reacts synchronously to external commands and never starts
//! work on its own — no timer, poller, or background task lives here. The
//! pause between a correct answer and `advance` belongs to the caller, as
//! does routing the drained outcome events into the performance ledger.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{limits, Config};
use crate::corpus::{Item, ItemPool};
use crate::engine::fluency::FluencyTracker;
use crate::engine::focus::select_focus_corpus;
use crate::engine::trial::{build_trial, Trial};
use crate::error::{Result, SimileError};
use crate::ledger::PerformanceLedger;
use crate::shuffle::{self, EngineRng};

/// Status of the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    /// Awaiting an answer.
    #[default]
    Waiting,
    /// Answered correctly; terminal until `advance`.
    Success,
    /// Answered incorrectly; terminal until `advance` (retry).
    Error,
}

impl TurnStatus {
    /// Whether the turn has been resolved.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnStatus::Success | TurnStatus::Error)
    }
}

/// Outcome event emitted for the external ledger.
///
/// The engine buffers events; the caller drains them after each command
/// and routes them into its own persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OutcomeEvent {
    /// A new model was presented (session start, advance, restart).
    Attempted { item_id: String },
    /// The model was matched correctly.
    Succeeded { item_id: String },
    /// A wrong choice was submitted while this item was the model.
    Failed { item_id: String },
}

/// Read-only view of the session state, rebuilt on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// The trial currently displayed.
    pub trial: Trial,
    /// Consecutive correct answers since the last error or reset.
    pub streak: u32,
    /// Correct answers since the last restart.
    pub total_successes: u32,
    /// Status of the current turn.
    pub status: TurnStatus,
    /// Whether the mastery certificate has been unlocked (sticky).
    pub certificate_available: bool,
    /// Wrong submissions within the current turn.
    pub errors_this_turn: u32,
    /// Rolling mean latency over the current streak window.
    pub mean_latency: Option<Duration>,
}

/// The adaptive drill session engine.
///
/// Owns the turn queue, current trial, scores, and fluency tracker. The
/// item pool and the performance ledger are shared collaborators: the pool
/// is never mutated, the ledger only ever read (for focus selection).
#[derive(Debug)]
pub struct SessionEngine<R: Rng = EngineRng> {
    pool: Arc<ItemPool>,
    proposal_count: usize,
    fluency_threshold: Duration,
    focus_mode: bool,
    focus_pool: Vec<Item>,
    queue: VecDeque<Item>,
    trial: Trial,
    status: TurnStatus,
    streak: u32,
    total_successes: u32,
    errors_this_turn: u32,
    certificate_available: bool,
    fluency: FluencyTracker,
    events: Vec<OutcomeEvent>,
    rng: R,
}

impl SessionEngine<EngineRng> {
    /// Create an engine with an entropy-seeded RNG.
    pub fn new(pool: Arc<ItemPool>, config: &Config, ledger: &PerformanceLedger) -> Result<Self> {
        Self::with_rng(pool, config, ledger, shuffle::entropy_rng())
    }
}

impl<R: Rng> SessionEngine<R> {
    /// Create an engine with an injected RNG (seeded in tests).
    ///
    /// The pool must be non-empty; the caller is expected to block session
    /// start rather than hand the engine an unusable pool. The opening
    /// trial is built immediately and its `Attempted` event buffered.
    pub fn with_rng(
        pool: Arc<ItemPool>,
        config: &Config,
        ledger: &PerformanceLedger,
        rng: R,
    ) -> Result<Self> {
        if pool.is_empty() {
            return Err(SimileError::content("cannot start a session on an empty pool"));
        }

        let proposal_count = clamp_proposals(config.proposal_count, pool.len());
        let focus_pool = if config.focus_mode {
            select_focus_corpus(ledger, &pool)
        } else {
            Vec::new()
        };

        // Placeholder trial; restart() below builds the real opening turn.
        let first = pool.items()[0].clone();
        let trial = Trial {
            model: first.clone(),
            choices: vec![first],
        };

        let mut engine = Self {
            pool,
            proposal_count,
            fluency_threshold: config.fluency_threshold(),
            focus_mode: config.focus_mode,
            focus_pool,
            queue: VecDeque::new(),
            trial,
            status: TurnStatus::Waiting,
            streak: 0,
            total_successes: 0,
            errors_this_turn: 0,
            certificate_available: false,
            fluency: FluencyTracker::new(limits::STREAK_THRESHOLD),
            events: Vec::new(),
            rng,
        };
        engine.restart();
        Ok(engine)
    }

    /// Items the next model is drawn from: the focus subset when focus
    /// mode is active and non-empty, the full pool otherwise.
    fn active_items(&self) -> &[Item] {
        if self.focus_mode && !self.focus_pool.is_empty() {
            &self.focus_pool
        } else {
            self.pool.items()
        }
    }

    /// Submit an answer, measuring latency from the chronometer.
    pub fn submit_answer(&mut self, chosen_id: &str) {
        let latency = self.fluency.elapsed();
        self.submit_answer_with_latency(chosen_id, latency);
    }

    /// Submit an answer with a caller-supplied latency.
    ///
    /// No-op unless the turn is `Waiting` — the status field is the guard
    /// against double submission.
    pub fn submit_answer_with_latency(&mut self, chosen_id: &str, latency: Duration) {
        if self.status != TurnStatus::Waiting {
            tracing::debug!("submission ignored: turn already {:?}", self.status);
            return;
        }

        let model_id = self.trial.model.id.clone();
        if chosen_id == model_id {
            self.fluency.record_success(latency);
            self.streak += 1;
            self.total_successes += 1;
            self.status = TurnStatus::Success;
            self.events.push(OutcomeEvent::Succeeded { item_id: model_id });

            // The focus subset is biased toward hard items, so a streak
            // achieved there does not represent general mastery.
            if !self.focus_mode && self.streak as usize >= limits::STREAK_THRESHOLD {
                if let Some(mean) = self.fluency.mean_latency() {
                    if mean <= self.fluency_threshold {
                        self.certificate_available = true;
                    }
                }
            }
        } else {
            self.errors_this_turn += 1;
            self.streak = 0;
            self.fluency.record_failure();
            self.status = TurnStatus::Error;
            // The failed item reappears as the very next model.
            self.queue.push_front(self.trial.model.clone());
            self.events.push(OutcomeEvent::Failed { item_id: model_id });
        }
    }

    /// Move to the next turn, after the caller's own success or retry
    /// delay. No-op while the current turn is still `Waiting`.
    pub fn advance(&mut self) {
        if self.status == TurnStatus::Waiting {
            tracing::debug!("advance ignored: turn not resolved");
            return;
        }

        let retiring_id = self.trial.model.id.clone();
        if self.queue.is_empty() {
            self.refill_queue(Some(&retiring_id));
        }
        let Some(next) = self.queue.pop_front() else {
            return;
        };
        self.begin_turn(next);
    }

    /// Restart the session: fresh queue, zeroed scores, certificate
    /// revoked. The performance ledger is untouched — it outlives
    /// restarts and is cleared only by its own explicit reset.
    pub fn restart(&mut self) {
        self.queue.clear();
        self.refill_queue(None);
        self.streak = 0;
        self.total_successes = 0;
        self.certificate_available = false;
        self.fluency.record_failure();
        if let Some(first) = self.queue.pop_front() {
            self.begin_turn(first);
        }
    }

    /// Apply a configuration change: re-resolve the active pool, re-clamp
    /// the proposal count, recompute the focus subset, then restart.
    pub fn reconfigure(
        &mut self,
        pool: Arc<ItemPool>,
        config: &Config,
        ledger: &PerformanceLedger,
    ) -> Result<()> {
        if pool.is_empty() {
            return Err(SimileError::content("cannot reconfigure onto an empty pool"));
        }
        self.pool = pool;
        self.proposal_count = clamp_proposals(config.proposal_count, self.pool.len());
        self.fluency_threshold = config.fluency_threshold();
        self.focus_mode = config.focus_mode;
        self.focus_pool = if self.focus_mode {
            select_focus_corpus(ledger, &self.pool)
        } else {
            Vec::new()
        };
        self.restart();
        Ok(())
    }

    /// Toggle focus mode.
    ///
    /// Reshuffles the queue from the new active pool but lets the
    /// in-flight trial finish. Turning focus off invalidates the
    /// focus-biased streak (streak and latency window reset); whether
    /// focus-mode successes should count toward `total_successes` is a
    /// product policy question — they currently do, matching the
    /// long-standing behavior.
    pub fn set_focus_mode(&mut self, active: bool, ledger: &PerformanceLedger) {
        if active == self.focus_mode {
            return;
        }
        self.focus_mode = active;
        if active {
            self.focus_pool = select_focus_corpus(ledger, &self.pool);
        } else {
            self.focus_pool.clear();
            self.streak = 0;
            self.fluency.record_failure();
        }
        let source = self.active_items().to_vec();
        self.queue = shuffle::shuffled(&source, &mut self.rng).into();
        tracing::debug!(active, queue = self.queue.len(), "focus mode toggled");
    }

    /// Recompute the focus subset after a ledger change. No-op when focus
    /// mode is off.
    pub fn refresh_focus(&mut self, ledger: &PerformanceLedger) {
        if self.focus_mode {
            self.focus_pool = select_focus_corpus(ledger, &self.pool);
        }
    }

    /// Re-arm the chronometer; call when the turn becomes answerable.
    pub fn start_chronometer(&mut self) {
        self.fluency.start();
    }

    /// Drain buffered outcome events for the external ledger.
    pub fn drain_events(&mut self) -> Vec<OutcomeEvent> {
        std::mem::take(&mut self.events)
    }

    /// The trial currently displayed.
    pub fn current_trial(&self) -> &Trial {
        &self.trial
    }

    /// Whether focus mode is active.
    pub fn focus_mode(&self) -> bool {
        self.focus_mode
    }

    /// The focus subset currently in effect (empty when focus is off).
    pub fn focus_items(&self) -> &[Item] {
        &self.focus_pool
    }

    /// The clamped proposal count in effect.
    pub fn proposal_count(&self) -> usize {
        self.proposal_count
    }

    /// Whether the mastery certificate has been unlocked.
    pub fn certificate_available(&self) -> bool {
        self.certificate_available
    }

    /// Build a read-only snapshot for the presentation layer.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            trial: self.trial.clone(),
            streak: self.streak,
            total_successes: self.total_successes,
            status: self.status,
            certificate_available: self.certificate_available,
            errors_this_turn: self.errors_this_turn,
            mean_latency: self.fluency.mean_latency(),
        }
    }

    /// Refill the queue by reshuffling the active pool, excluding the
    /// retiring model when the pool has more than one item.
    fn refill_queue(&mut self, exclude: Option<&str>) {
        let source = self.active_items().to_vec();
        let mut items = shuffle::shuffled(&source, &mut self.rng);
        if let Some(id) = exclude {
            items.retain(|item| item.id != id);
            if items.is_empty() {
                items = shuffle::shuffled(&source, &mut self.rng);
            }
        }
        self.queue = items.into();
    }

    /// Present a new model: build its trial against the full pool (the
    /// focus subset never sources distractors), reset per-turn state, and
    /// buffer the attempt event.
    fn begin_turn(&mut self, model: Item) {
        self.trial = build_trial(&model, &self.pool, self.proposal_count, &mut self.rng);
        self.status = TurnStatus::Waiting;
        self.errors_this_turn = 0;
        self.fluency.start();
        self.events.push(OutcomeEvent::Attempted { item_id: model.id });
    }
}

/// Clamp a configured proposal count to `2..=8`, bounded by the pool size.
fn clamp_proposals(configured: usize, pool_len: usize) -> usize {
    configured
        .clamp(limits::PROPOSALS_MIN, limits::PROPOSALS_MAX)
        .min(pool_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{builtin_pool, Item, UnitType};
    use crate::shuffle::seeded_rng;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn letter_engine(seed: u64) -> SessionEngine {
        let pool = Arc::new(builtin_pool(UnitType::Letter).unwrap());
        SessionEngine::with_rng(
            pool,
            &Config::default(),
            &PerformanceLedger::new(),
            seeded_rng(seed),
        )
        .unwrap()
    }

    fn tiny_pool() -> Arc<ItemPool> {
        Arc::new(
            ItemPool::new(
                UnitType::Letter,
                vec![
                    Item::new("b", "b", &["d", "p", "q"]),
                    Item::new("d", "d", &["b", "p", "q"]),
                    Item::new("p", "p", &["b", "d", "q"]),
                    Item::new("q", "q", &["b", "d", "p"]),
                ],
            )
            .unwrap(),
        )
    }

    /// Answer correctly and advance, draining events into the ledger.
    fn win_turn(engine: &mut SessionEngine, ledger: &mut PerformanceLedger, latency: Duration) {
        let model = engine.current_trial().model.id.clone();
        engine.submit_answer_with_latency(&model, latency);
        assert_eq!(engine.snapshot().status, TurnStatus::Success);
        engine.advance();
        route_events(engine, ledger);
    }

    fn route_events(engine: &mut SessionEngine, ledger: &mut PerformanceLedger) {
        for event in engine.drain_events() {
            match event {
                OutcomeEvent::Attempted { item_id } => ledger.record_attempt(&item_id),
                OutcomeEvent::Failed { item_id } => ledger.record_error(&item_id),
                OutcomeEvent::Succeeded { .. } => {}
            }
        }
    }

    #[test]
    fn test_rejects_empty_pool() {
        let err = ItemPool::new(UnitType::Letter, vec![]).unwrap_err();
        assert!(!err.is_fail_open());
    }

    #[test]
    fn test_initial_state() {
        let mut engine = letter_engine(1);
        let snap = engine.snapshot();

        assert_eq!(snap.status, TurnStatus::Waiting);
        assert_eq!(snap.streak, 0);
        assert_eq!(snap.total_successes, 0);
        assert_eq!(snap.errors_this_turn, 0);
        assert!(!snap.certificate_available);
        assert_eq!(snap.mean_latency, None);
        assert_eq!(snap.trial.choices.len(), 4);

        // The opening model is announced for the ledger.
        let events = engine.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], OutcomeEvent::Attempted { .. }));
    }

    #[test]
    fn test_correct_answer() {
        let mut engine = letter_engine(2);
        let model = engine.current_trial().model.id.clone();

        engine.submit_answer_with_latency(&model, ms(1200));
        let snap = engine.snapshot();

        assert_eq!(snap.status, TurnStatus::Success);
        assert_eq!(snap.streak, 1);
        assert_eq!(snap.total_successes, 1);
        assert_eq!(snap.mean_latency, Some(ms(1200)));

        let events = engine.drain_events();
        assert!(matches!(
            events.last(),
            Some(OutcomeEvent::Succeeded { item_id }) if *item_id == model
        ));
    }

    #[test]
    fn test_wrong_answer_resets_streak_and_requeues_model() {
        let mut engine = letter_engine(3);
        let model = engine.current_trial().model.id.clone();

        engine.submit_answer_with_latency(&model, ms(800));
        engine.advance();
        let model2 = engine.current_trial().model.id.clone();
        engine.submit_answer_with_latency(&wrong_choice(&engine), ms(900));

        let snap = engine.snapshot();
        assert_eq!(snap.status, TurnStatus::Error);
        assert_eq!(snap.streak, 0);
        assert_eq!(snap.errors_this_turn, 1);
        assert_eq!(snap.total_successes, 1);
        assert_eq!(snap.mean_latency, None);

        // The failed item is the very next model.
        engine.advance();
        assert_eq!(engine.current_trial().model.id, model2);
        assert_eq!(engine.snapshot().errors_this_turn, 0);
    }

    fn wrong_choice(engine: &SessionEngine) -> String {
        let trial = engine.current_trial();
        trial
            .choices
            .iter()
            .find(|c| c.id != trial.model.id)
            .map(|c| c.id.clone())
            .unwrap_or_else(|| "definitely-not-a-choice".to_string())
    }

    #[test]
    fn test_double_submission_is_ignored() {
        let mut engine = letter_engine(4);
        let model = engine.current_trial().model.id.clone();

        engine.submit_answer_with_latency(&model, ms(700));
        engine.submit_answer_with_latency(&model, ms(700));
        engine.submit_answer_with_latency(&wrong_choice(&engine), ms(700));

        let snap = engine.snapshot();
        assert_eq!(snap.streak, 1);
        assert_eq!(snap.total_successes, 1);
        assert_eq!(snap.status, TurnStatus::Success);
        assert_eq!(snap.errors_this_turn, 0);
    }

    #[test]
    fn test_advance_is_noop_while_waiting() {
        let mut engine = letter_engine(5);
        let model = engine.current_trial().model.id.clone();
        engine.advance();
        assert_eq!(engine.current_trial().model.id, model);
    }

    #[test]
    fn test_certificate_unlocks_on_dual_condition() {
        let mut engine = letter_engine(6);
        let mut ledger = PerformanceLedger::new();
        route_events(&mut engine, &mut ledger);

        for _ in 0..limits::STREAK_THRESHOLD {
            assert!(!engine.certificate_available());
            win_turn(&mut engine, &mut ledger, ms(1000));
        }
        assert!(engine.certificate_available());
        assert_eq!(engine.snapshot().streak, 10);
    }

    #[test]
    fn test_certificate_needs_fluency_not_just_streak() {
        let mut engine = letter_engine(7);
        let mut ledger = PerformanceLedger::new();
        route_events(&mut engine, &mut ledger);

        // Ten successes, but far too slow on every turn.
        for _ in 0..limits::STREAK_THRESHOLD {
            win_turn(&mut engine, &mut ledger, ms(20_000));
        }
        let snap = engine.snapshot();
        assert_eq!(snap.streak, 10);
        assert!(!snap.certificate_available);
    }

    #[test]
    fn test_certificate_mean_recovers_from_one_slow_turn() {
        // Nine fast turns plus one slow one: mean over the window decides.
        let mut engine = letter_engine(8);
        let mut ledger = PerformanceLedger::new();
        route_events(&mut engine, &mut ledger);

        for _ in 0..9 {
            win_turn(&mut engine, &mut ledger, ms(1000));
        }
        win_turn(&mut engine, &mut ledger, ms(9000));
        // mean = (9*1000 + 9000) / 10 = 1800 <= 6000
        assert!(engine.certificate_available());
    }

    #[test]
    fn test_certificate_is_sticky_across_errors() {
        let mut engine = letter_engine(9);
        let mut ledger = PerformanceLedger::new();
        route_events(&mut engine, &mut ledger);

        for _ in 0..limits::STREAK_THRESHOLD {
            win_turn(&mut engine, &mut ledger, ms(1000));
        }
        assert!(engine.certificate_available());

        engine.submit_answer_with_latency(&wrong_choice(&engine), ms(500));
        assert!(engine.certificate_available());
        engine.advance();
        assert!(engine.certificate_available());
    }

    #[test]
    fn test_restart_resets_session_but_not_ledger() {
        let mut engine = letter_engine(10);
        let mut ledger = PerformanceLedger::new();
        route_events(&mut engine, &mut ledger);

        for _ in 0..limits::STREAK_THRESHOLD {
            win_turn(&mut engine, &mut ledger, ms(1000));
        }
        engine.submit_answer_with_latency(&wrong_choice(&engine), ms(500));
        route_events(&mut engine, &mut ledger);
        let ledger_before = ledger.clone();

        engine.restart();
        let snap = engine.snapshot();
        assert_eq!(snap.streak, 0);
        assert_eq!(snap.total_successes, 0);
        assert_eq!(snap.status, TurnStatus::Waiting);
        assert_eq!(snap.errors_this_turn, 0);
        assert!(!snap.certificate_available);
        assert_eq!(snap.mean_latency, None);

        // Restart announces a new attempt but never touches the counters
        // already routed to the ledger.
        assert_eq!(ledger, ledger_before);
        let events = engine.drain_events();
        assert!(matches!(events.last(), Some(OutcomeEvent::Attempted { .. })));
    }

    #[test]
    fn test_queue_refills_when_exhausted() {
        let pool = tiny_pool();
        let mut engine = SessionEngine::with_rng(
            pool,
            &Config::default(),
            &PerformanceLedger::new(),
            seeded_rng(11),
        )
        .unwrap();
        let mut ledger = PerformanceLedger::new();

        // Play far more turns than the pool holds.
        for _ in 0..20 {
            let previous = engine.current_trial().model.id.clone();
            win_turn(&mut engine, &mut ledger, ms(1000));
            // Refill excludes the just-retired model.
            assert_ne!(engine.current_trial().model.id, previous);
        }
        assert_eq!(ledger.total_attempts(), 21);
    }

    #[test]
    fn test_proposal_count_clamped_to_pool_size() {
        let pool = tiny_pool();
        let config = Config {
            proposal_count: 8,
            ..Config::default()
        };
        let engine =
            SessionEngine::with_rng(pool, &config, &PerformanceLedger::new(), seeded_rng(12))
                .unwrap();

        assert_eq!(engine.proposal_count(), 4);
        assert_eq!(engine.current_trial().choices.len(), 4);
    }

    #[test]
    fn test_focus_mode_suppresses_certificate() {
        let pool = Arc::new(builtin_pool(UnitType::Letter).unwrap());
        let mut ledger = PerformanceLedger::new();
        for _ in 0..5 {
            ledger.record_attempt("b");
        }
        for _ in 0..4 {
            ledger.record_error("b");
        }
        let config = Config {
            focus_mode: true,
            ..Config::default()
        };
        let mut engine =
            SessionEngine::with_rng(pool, &config, &ledger, seeded_rng(13)).unwrap();

        for _ in 0..limits::STREAK_THRESHOLD + 2 {
            let model = engine.current_trial().model.id.clone();
            engine.submit_answer_with_latency(&model, ms(500));
            engine.advance();
        }
        let snap = engine.snapshot();
        assert!(snap.streak >= 10);
        assert!(!snap.certificate_available);
    }

    #[test]
    fn test_focus_mode_draws_models_from_subset() {
        let pool = Arc::new(builtin_pool(UnitType::Letter).unwrap());
        let mut ledger = PerformanceLedger::new();
        for id in ["b", "d", "p", "q"] {
            for _ in 0..5 {
                ledger.record_attempt(id);
                ledger.record_error(id);
            }
        }
        let config = Config {
            focus_mode: true,
            ..Config::default()
        };
        let mut engine =
            SessionEngine::with_rng(pool, &config, &ledger, seeded_rng(14)).unwrap();

        let focus_ids: Vec<String> =
            engine.focus_items().iter().map(|i| i.id.clone()).collect();
        assert!(!focus_ids.is_empty());

        for _ in 0..12 {
            let model = engine.current_trial().model.id.clone();
            assert!(focus_ids.contains(&model), "{model} not in focus subset");
            engine.submit_answer_with_latency(&model, ms(500));
            engine.advance();
        }
    }

    #[test]
    fn test_focus_distractors_come_from_full_pool() {
        // With a 4-item focus subset and 8 proposals, at least some
        // choices must come from outside the subset.
        let pool = Arc::new(builtin_pool(UnitType::Letter).unwrap());
        let mut ledger = PerformanceLedger::new();
        for id in ["b", "d", "p", "q"] {
            for _ in 0..5 {
                ledger.record_attempt(id);
                ledger.record_error(id);
            }
        }
        let config = Config {
            focus_mode: true,
            proposal_count: 8,
            ..Config::default()
        };
        let engine = SessionEngine::with_rng(pool, &config, &ledger, seeded_rng(15)).unwrap();

        assert_eq!(engine.current_trial().choices.len(), 8);
        let focus_ids: Vec<String> =
            engine.focus_items().iter().map(|i| i.id.clone()).collect();
        let outside = engine
            .current_trial()
            .choices
            .iter()
            .filter(|c| !focus_ids.contains(&c.id))
            .count();
        assert!(outside > 0);
    }

    #[test]
    fn test_focus_toggle_keeps_inflight_trial() {
        let mut engine = letter_engine(16);
        let ledger = PerformanceLedger::new();
        let model = engine.current_trial().model.id.clone();

        engine.set_focus_mode(true, &ledger);
        assert_eq!(engine.current_trial().model.id, model);
        assert!(engine.focus_mode());
    }

    #[test]
    fn test_focus_off_resets_streak_but_not_total() {
        let mut engine = letter_engine(17);
        let mut ledger = PerformanceLedger::new();
        route_events(&mut engine, &mut ledger);

        for _ in 0..3 {
            win_turn(&mut engine, &mut ledger, ms(1000));
        }
        engine.set_focus_mode(true, &ledger);
        for _ in 0..2 {
            win_turn(&mut engine, &mut ledger, ms(1000));
        }
        let before = engine.snapshot();
        assert_eq!(before.total_successes, 5);

        engine.set_focus_mode(false, &ledger);
        let snap = engine.snapshot();
        assert_eq!(snap.streak, 0);
        assert_eq!(snap.total_successes, 5);
        assert_eq!(snap.mean_latency, None);
    }

    #[test]
    fn test_refresh_focus_tracks_ledger_changes() {
        let pool = Arc::new(builtin_pool(UnitType::Letter).unwrap());
        let mut ledger = PerformanceLedger::new();
        let config = Config {
            focus_mode: true,
            ..Config::default()
        };
        let mut engine =
            SessionEngine::with_rng(pool, &config, &ledger, seeded_rng(18)).unwrap();
        let before: Vec<String> = engine.focus_items().iter().map(|i| i.id.clone()).collect();

        for _ in 0..5 {
            ledger.record_attempt("x");
            ledger.record_error("x");
        }
        engine.refresh_focus(&ledger);
        let after: Vec<String> = engine.focus_items().iter().map(|i| i.id.clone()).collect();

        assert_ne!(before, after);
        assert_eq!(after[0], "x");
    }

    #[test]
    fn test_reconfigure_switches_pool_and_restarts() {
        let mut engine = letter_engine(19);
        let mut ledger = PerformanceLedger::new();
        route_events(&mut engine, &mut ledger);
        for _ in 0..3 {
            win_turn(&mut engine, &mut ledger, ms(1000));
        }

        let syllables = Arc::new(builtin_pool(UnitType::Syllable).unwrap());
        let config = Config {
            unit: UnitType::Syllable,
            proposal_count: 6,
            ..Config::default()
        };
        engine.reconfigure(syllables.clone(), &config, &ledger).unwrap();

        let snap = engine.snapshot();
        assert_eq!(snap.total_successes, 0);
        assert_eq!(snap.streak, 0);
        assert!(syllables.contains(&snap.trial.model.id));
        assert_eq!(snap.trial.choices.len(), 6);
    }

    #[test]
    fn test_submit_after_error_requires_advance() {
        let mut engine = letter_engine(20);
        engine.submit_answer_with_latency(&wrong_choice(&engine), ms(600));
        let model = engine.current_trial().model.id.clone();

        // Further submissions are ignored until advance.
        engine.submit_answer_with_latency(&model, ms(600));
        assert_eq!(engine.snapshot().status, TurnStatus::Error);
        assert_eq!(engine.snapshot().total_successes, 0);

        engine.advance();
        assert_eq!(engine.snapshot().status, TurnStatus::Waiting);
        assert_eq!(engine.current_trial().model.id, model);
    }

    #[test]
    fn test_event_stream_matches_play() {
        let mut engine = letter_engine(21);
        let opening = engine.drain_events();
        assert_eq!(opening.len(), 1);

        let model = engine.current_trial().model.id.clone();
        engine.submit_answer_with_latency(&wrong_choice(&engine), ms(500));
        engine.advance();
        engine.submit_answer_with_latency(&model, ms(500));
        engine.advance();

        let events = engine.drain_events();
        assert!(matches!(&events[0], OutcomeEvent::Failed { item_id } if *item_id == model));
        assert!(matches!(&events[1], OutcomeEvent::Attempted { item_id } if *item_id == model));
        assert!(matches!(&events[2], OutcomeEvent::Succeeded { item_id } if *item_id == model));
        assert!(matches!(&events[3], OutcomeEvent::Attempted { .. }));
    }

    #[test]
    fn test_turn_status_serialization() {
        for status in [TurnStatus::Waiting, TurnStatus::Success, TurnStatus::Error] {
            let json = serde_json::to_string(&status).unwrap();
            let back: TurnStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(status, back);
        }
        assert!(TurnStatus::Success.is_terminal());
        assert!(!TurnStatus::Waiting.is_terminal());
    }

    #[test]
    fn test_outcome_event_serialization() {
        let event = OutcomeEvent::Failed {
            item_id: "b".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"failed\""));
        let back: OutcomeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
