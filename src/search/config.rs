//! Search configuration.

use crate::error::{invalid, Result};
use crate::fitness::FitnessWeights;
use crate::state::DEFAULT_SELECTION_PROBABILITY;

/// Simulated annealing schedule.
///
/// Temperature falls linearly by `temperature_decrement` every
/// `step_delay` proposals and the run ends once it would drop to zero or
/// below, so the proposal count is fixed:
/// `ceil(initial_temperature / temperature_decrement) * step_delay`.
///
/// # Examples
///
/// ```
/// use psu_search::search::AnnealingConfig;
///
/// let config = AnnealingConfig::default()
///     .with_initial_temperature(10.0)
///     .with_temperature_decrement(3.0)
///     .with_step_delay(4);
/// assert_eq!(config.temperature_levels(), 4);
/// assert_eq!(config.proposal_budget(), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealingConfig {
    /// Starting temperature.
    pub initial_temperature: f64,

    /// Amount subtracted from the temperature at each level change.
    pub temperature_decrement: f64,

    /// Proposals made at each temperature level.
    pub step_delay: usize,

    /// Multiplier applied to fitness differences before the Metropolis
    /// test. Fitness differences between neighbouring covering masks are
    /// small, so this brings them onto the temperature's scale.
    pub scale: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 2500.0,
            temperature_decrement: 0.3,
            step_delay: 5,
            scale: 1e5,
        }
    }
}

impl AnnealingConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_temperature_decrement(mut self, d: f64) -> Self {
        self.temperature_decrement = d;
        self
    }

    pub fn with_step_delay(mut self, n: usize) -> Self {
        self.step_delay = n;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Number of distinct temperatures visited.
    pub fn temperature_levels(&self) -> usize {
        (self.initial_temperature / self.temperature_decrement).ceil() as usize
    }

    /// Total proposals made by one annealing run.
    pub fn proposal_budget(&self) -> usize {
        self.temperature_levels().saturating_mul(self.step_delay)
    }

    /// Validates the schedule.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return invalid(format!(
                "initial_temperature must be positive, got {}",
                self.initial_temperature
            ));
        }
        if !(self.temperature_decrement.is_finite() && self.temperature_decrement > 0.0) {
            return invalid(format!(
                "temperature_decrement must be positive, got {}",
                self.temperature_decrement
            ));
        }
        if self.step_delay == 0 {
            return invalid("step_delay must be at least 1");
        }
        let ratio = (self.initial_temperature / self.temperature_decrement).ceil();
        if !(ratio.is_finite() && ratio < usize::MAX as f64) {
            return invalid(format!(
                "schedule of {} / {} temperature levels does not fit in usize",
                self.initial_temperature, self.temperature_decrement
            ));
        }
        if self.temperature_levels().checked_mul(self.step_delay).is_none() {
            return invalid(format!(
                "{} levels of {} steps overflow the proposal count",
                self.temperature_levels(),
                self.step_delay
            ));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return invalid(format!("scale must be positive, got {}", self.scale));
        }
        Ok(())
    }
}

/// Configuration shared by all search algorithms.
///
/// # Examples
///
/// ```
/// use psu_search::search::{AnnealingConfig, SearchConfig};
///
/// let config = SearchConfig::default()
///     .with_selection_probability(0.3)
///     .with_annealing(AnnealingConfig::default().with_step_delay(10))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Probability that a PSU is selected in a random initial state.
    pub selection_probability: f64,

    /// Fitness formula weights.
    pub weights: FitnessWeights,

    /// Simulated annealing schedule.
    pub annealing: AnnealingConfig,

    /// Random seed for reproducibility. `None` draws a fresh seed per call.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            selection_probability: DEFAULT_SELECTION_PROBABILITY,
            weights: FitnessWeights::default(),
            annealing: AnnealingConfig::default(),
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn with_selection_probability(mut self, p: f64) -> Self {
        self.selection_probability = p;
        self
    }

    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_annealing(mut self, annealing: AnnealingConfig) -> Self {
        self.annealing = annealing;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.selection_probability) {
            return invalid(format!(
                "selection_probability must be in [0, 1], got {}",
                self.selection_probability
            ));
        }
        self.weights.validate()?;
        self.annealing.validate()
    }
}
