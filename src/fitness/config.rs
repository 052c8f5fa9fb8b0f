//! Fitness weights.

use crate::error::{invalid, Result};

/// Weights of the fitness formula.
///
/// ```text
/// efficiency   = 1 / (1 + psu_weight * used + item_weight * carried)
/// covering     = 1 + efficiency
/// non-covering = coverage_weight * covered / |order|
///              + (1 - coverage_weight) * efficiency
/// ```
///
/// Covering scores lie in `(1, 2]`, non-covering scores in `[0, 1)`.
///
/// # Examples
///
/// ```
/// use psu_search::fitness::FitnessWeights;
///
/// let weights = FitnessWeights::default()
///     .with_psu_weight(2.0)
///     .with_item_weight(0.05);
/// assert!(weights.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitnessWeights {
    /// Penalty per selected PSU. Must be positive.
    pub psu_weight: f64,

    /// Penalty per carried item (summed over selected PSUs). Must be positive.
    pub item_weight: f64,

    /// Share of a non-covering score driven by order coverage, in `(0, 1)`.
    pub coverage_weight: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            psu_weight: 1.0,
            item_weight: 0.1,
            coverage_weight: 0.9,
        }
    }
}

impl FitnessWeights {
    pub fn with_psu_weight(mut self, w: f64) -> Self {
        self.psu_weight = w;
        self
    }

    pub fn with_item_weight(mut self, w: f64) -> Self {
        self.item_weight = w;
        self
    }

    pub fn with_coverage_weight(mut self, w: f64) -> Self {
        self.coverage_weight = w;
        self
    }

    /// Validates the weights.
    pub fn validate(&self) -> Result<()> {
        if !(self.psu_weight.is_finite() && self.psu_weight > 0.0) {
            return invalid(format!(
                "psu_weight must be positive and finite, got {}",
                self.psu_weight
            ));
        }
        if !(self.item_weight.is_finite() && self.item_weight > 0.0) {
            return invalid(format!(
                "item_weight must be positive and finite, got {}",
                self.item_weight
            ));
        }
        if !(self.coverage_weight > 0.0 && self.coverage_weight < 1.0) {
            return invalid(format!(
                "coverage_weight must be in (0, 1), got {}",
                self.coverage_weight
            ));
        }
        Ok(())
    }
}
