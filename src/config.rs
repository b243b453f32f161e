//! Event configuration.
//!
//! Load per-event rostering settings from TOML so weights and the
//! participation floor can change without code changes.
//!
//! # Examples
//!
//! ```
//! use u_roster::config::EventConfig;
//!
//! let config = EventConfig::from_toml_str(r#"
//!     min_shifts_per_person = 3
//!
//!     [weights]
//!     preference_match = 0.5
//! "#).unwrap();
//!
//! assert_eq!(config.min_shifts_per_person, 3);
//! let w = config.effective_weights();
//! assert!((w.preference_match - 0.5).abs() < 1e-10);
//! assert!((w.experience_balance - 0.25).abs() < 1e-10);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::ConfigError;
use crate::models::Shift;

/// Default participation floor (core shifts per member).
pub const DEFAULT_MIN_SHIFTS_PER_PERSON: usize = 2;

/// Default factor weights.
///
/// These sum to [`DEFAULT_WEIGHTS_TOTAL`] (0.80), not 1.0. Overall scores
/// therefore top out below 100 unless the caller supplies its own weights.
/// TODO: normalize once the intended scale is confirmed.
pub const DEFAULT_WEIGHTS: AlgorithmWeights = AlgorithmWeights {
    preference_match: 0.35,
    experience_balance: 0.25,
    workload_fairness: 0.15,
    core_shift_coverage: 0.05,
};

/// Sum of [`DEFAULT_WEIGHTS`].
pub const DEFAULT_WEIGHTS_TOTAL: f64 = 0.80;

/// Weights of the four scoring factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmWeights {
    /// Weight of the stated-preference factor.
    pub preference_match: f64,
    /// Weight of the experience-mix factor.
    pub experience_balance: f64,
    /// Weight of the workload-fairness factor.
    pub workload_fairness: f64,
    /// Weight of the core-coverage factor.
    pub core_shift_coverage: f64,
}

impl Default for AlgorithmWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

impl AlgorithmWeights {
    /// Creates weights from the four factors.
    pub fn new(
        preference_match: f64,
        experience_balance: f64,
        workload_fairness: f64,
        core_shift_coverage: f64,
    ) -> Self {
        Self {
            preference_match,
            experience_balance,
            workload_fairness,
            core_shift_coverage,
        }
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.preference_match
            + self.experience_balance
            + self.workload_fairness
            + self.core_shift_coverage
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("preference_match", self.preference_match),
            ("experience_balance", self.experience_balance),
            ("workload_fairness", self.workload_fairness),
            ("core_shift_coverage", self.core_shift_coverage),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "weight '{name}' must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Per-event rostering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Minimum core shifts each member should hold.
    pub min_shifts_per_person: usize,
    /// Explicit core shift IDs. `None` derives them from shift priority.
    pub core_shifts: Option<Vec<String>>,
    /// Weight override. `None` uses [`DEFAULT_WEIGHTS`].
    pub weights: Option<AlgorithmWeights>,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            min_shifts_per_person: DEFAULT_MIN_SHIFTS_PER_PERSON,
            core_shifts: None,
            weights: None,
        }
    }
}

impl EventConfig {
    /// Creates a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file can't be read, contains invalid TOML,
    /// or fails [`EventConfig::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the participation floor.
    pub fn with_min_shifts(mut self, min_shifts: usize) -> Self {
        self.min_shifts_per_person = min_shifts;
        self
    }

    /// Sets explicit core shift IDs.
    pub fn with_core_shifts<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.core_shifts = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Overrides the factor weights.
    pub fn with_weights(mut self, weights: AlgorithmWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Weights in effect for a run.
    pub fn effective_weights(&self) -> AlgorithmWeights {
        self.weights.unwrap_or(DEFAULT_WEIGHTS)
    }

    /// Core shift IDs for a run.
    ///
    /// Uses the explicit list when present, otherwise every shift whose
    /// priority is core.
    pub fn core_shift_ids(&self, shifts: &[Shift]) -> HashSet<String> {
        match &self.core_shifts {
            Some(ids) => ids.iter().cloned().collect(),
            None => shifts
                .iter()
                .filter(|s| s.is_core())
                .map(|s| s.id.clone())
                .collect(),
        }
    }

    /// Checks value ranges that serde can't express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(weights) = &self.weights {
            weights.validate()?;
        }
        Ok(())
    }
}
