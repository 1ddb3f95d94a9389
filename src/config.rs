//! Configuration loading for simile.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.simile/config.toml`)
//! 3. User config (`~/.simile/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All fields are optional and invalid values are clamped with a warning;
//! the engine itself may assume a valid configuration.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::corpus::UnitType;
use crate::error::{FailOpen, Result, SimileError};

/// Tuning constants shared across the engine.
pub mod limits {
    /// Minimum number of proposals per trial.
    pub const PROPOSALS_MIN: usize = 2;
    /// Maximum number of proposals per trial.
    pub const PROPOSALS_MAX: usize = 8;
    /// Default number of proposals per trial.
    pub const PROPOSALS_DEFAULT: usize = 4;

    /// Consecutive correct answers required to unlock the certificate.
    /// Also the capacity of the rolling latency window.
    pub const STREAK_THRESHOLD: usize = 10;

    /// Error rate (errors / attempts) above which an item is eligible for
    /// the focus corpus.
    pub const FOCUS_ERROR_THRESHOLD: f64 = 0.3;
    /// Minimum attempts before an item's error rate is considered; below
    /// this the estimator is too noisy.
    pub const MIN_ATTEMPTS_FOR_EVAL: u32 = 1;
    /// Minimum focus corpus size; completed from the least-mastered items.
    pub const MIN_FOCUS_SIZE: usize = 4;
    /// Maximum focus corpus size (working-memory capacity, 7 +/- 2).
    pub const MAX_FOCUS_SIZE: usize = 8;

    /// Fluency thresholds selectable in configuration, in milliseconds.
    pub const FLUENCY_THRESHOLDS_MS: &[u64] = &[3000, 6000, 9000];
    /// Default fluency threshold: 6 seconds.
    pub const FLUENCY_THRESHOLD_DEFAULT_MS: u64 = 6000;

    /// Pause after a correct answer before the next trial, owned by the
    /// caller, never by the engine.
    pub const SUCCESS_PAUSE_MS: u64 = 600;

    /// Maximum items in a custom set.
    pub const MAX_CUSTOM_ITEMS: usize = 50;
    /// Maximum characters in a custom set name.
    pub const MAX_CUSTOM_NAME_CHARS: usize = 40;

    /// Entries in the "most failed" report.
    pub const MOST_FAILED_TOP_N: usize = 5;
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Unit type to drill.
    pub unit: UnitType,
    /// Number of proposals per trial (clamped to 2..=8).
    pub proposal_count: usize,
    /// Mean-latency ceiling for the certificate, in milliseconds.
    pub fluency_threshold_ms: u64,
    /// Whether focus (remediation) mode is active. Session state, not
    /// persisted by the CLI.
    pub focus_mode: bool,
    /// Path of the active custom set file, if any. Session state.
    pub custom_set: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unit: UnitType::Letter,
            proposal_count: limits::PROPOSALS_DEFAULT,
            fluency_threshold_ms: limits::FLUENCY_THRESHOLD_DEFAULT_MS,
            focus_mode: false,
            custom_set: None,
        }
    }
}

/// One configuration layer as read from a TOML file.
///
/// Every field is optional; fields a layer leaves unset fall through to
/// the layer below instead of resetting it to the default.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfigLayer {
    /// Unit type to drill.
    pub unit: Option<UnitType>,
    /// Number of proposals per trial.
    pub proposal_count: Option<usize>,
    /// Mean-latency ceiling for the certificate, in milliseconds.
    pub fluency_threshold_ms: Option<u64>,
    /// Whether focus mode starts active.
    pub focus_mode: Option<bool>,
    /// Path of the active custom set file.
    pub custom_set: Option<String>,
}

impl ConfigLayer {
    /// Load a layer from a TOML file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path).map_err(|e| SimileError::storage(path, e))?;
        let layer = Self::from_toml_str(&raw)?;
        Ok(Some(layer))
    }

    /// Parse a layer from a TOML string.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| SimileError::config(format!("invalid config: {e}")))
    }

    /// Overlay this layer's set fields onto a configuration.
    pub fn apply(self, config: &mut Config) {
        if let Some(unit) = self.unit {
            config.unit = unit;
        }
        if let Some(n) = self.proposal_count {
            config.proposal_count = n;
        }
        if let Some(ms) = self.fluency_threshold_ms {
            config.fluency_threshold_ms = ms;
        }
        if let Some(focus) = self.focus_mode {
            config.focus_mode = focus;
        }
        if let Some(set) = self.custom_set {
            config.custom_set = Some(set);
        }
    }
}

impl Config {
    /// The fluency threshold as a duration.
    pub fn fluency_threshold(&self) -> Duration {
        Duration::from_millis(self.fluency_threshold_ms)
    }

    /// Clamp out-of-range values, warning when anything changes.
    ///
    /// Proposal count is forced into `2..=8`; the fluency threshold is
    /// snapped to the nearest selectable value.
    pub fn clamped(mut self) -> Self {
        let clamped = self
            .proposal_count
            .clamp(limits::PROPOSALS_MIN, limits::PROPOSALS_MAX);
        if clamped != self.proposal_count {
            tracing::warn!(
                "proposal_count {} out of range, clamped to {}",
                self.proposal_count,
                clamped
            );
            self.proposal_count = clamped;
        }

        if !limits::FLUENCY_THRESHOLDS_MS.contains(&self.fluency_threshold_ms) {
            let nearest = limits::FLUENCY_THRESHOLDS_MS
                .iter()
                .copied()
                .min_by_key(|v| v.abs_diff(self.fluency_threshold_ms))
                .unwrap_or(limits::FLUENCY_THRESHOLD_DEFAULT_MS);
            tracing::warn!(
                "fluency_threshold_ms {} is not selectable, snapped to {}",
                self.fluency_threshold_ms,
                nearest
            );
            self.fluency_threshold_ms = nearest;
        }

        self
    }

    /// Load configuration with the full precedence chain.
    ///
    /// Never fails: unreadable or invalid files fall back to the next
    /// layer with a warning. Each file layer only overrides the fields it
    /// actually sets.
    pub fn load() -> Self {
        let project_path = PathBuf::from(".simile/config.toml");
        Self::load_with(user_config_path().as_deref(), Some(&project_path))
    }

    /// Load configuration from explicit layer paths.
    ///
    /// Layers apply lowest to highest: defaults, user file, project file,
    /// then environment overrides, then clamping.
    pub fn load_with(user: Option<&Path>, project: Option<&Path>) -> Self {
        let mut config = Config::default();

        if let Some(path) = user {
            if let Some(layer) = ConfigLayer::load_from(path).fail_open_default("user config") {
                layer.apply(&mut config);
            }
        }
        if let Some(path) = project {
            if let Some(layer) = ConfigLayer::load_from(path).fail_open_default("project config") {
                layer.apply(&mut config);
            }
        }

        config.apply_env();
        config.clamped()
    }

    /// Parse a full configuration from a TOML string; unset fields take
    /// their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let mut config = Config::default();
        ConfigLayer::from_toml_str(raw)?.apply(&mut config);
        Ok(config)
    }

    /// Apply `SIMILE_*` environment variable overrides.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_env(&mut self) {
        if let Ok(raw) = env::var("SIMILE_UNIT") {
            match raw.parse::<UnitType>() {
                Ok(unit) => self.unit = unit,
                Err(err) => tracing::warn!("SIMILE_UNIT ignored: {err}"),
            }
        }
        if let Ok(raw) = env::var("SIMILE_PROPOSALS") {
            match raw.parse::<usize>() {
                Ok(n) => self.proposal_count = n,
                Err(_) => tracing::warn!("SIMILE_PROPOSALS ignored: not a number: {raw}"),
            }
        }
        if let Ok(raw) = env::var("SIMILE_FLUENCY_MS") {
            match raw.parse::<u64>() {
                Ok(ms) => self.fluency_threshold_ms = ms,
                Err(_) => tracing::warn!("SIMILE_FLUENCY_MS ignored: not a number: {raw}"),
            }
        }
        if let Ok(raw) = env::var("SIMILE_FOCUS") {
            self.focus_mode = matches!(raw.as_str(), "1" | "true" | "on");
        }
    }
}

/// The simile home directory (`~/.simile`).
pub fn simile_home() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".simile"))
}

/// Path of the user config file, if a home directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    simile_home().map(|home| home.join("config.toml"))
}

/// Default path of the persisted ledger snapshot.
pub fn default_ledger_path() -> PathBuf {
    simile_home()
        .map(|home| home.join("ledger.json"))
        .unwrap_or_else(|| PathBuf::from(".simile/ledger.json"))
}
