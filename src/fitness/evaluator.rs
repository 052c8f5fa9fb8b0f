//! Warehouse fitness.

use super::config::FitnessWeights;
use super::types::Objective;
use crate::error::Result;
use crate::state::SelectionMask;
use crate::warehouse::Warehouse;

/// Scores masks against a warehouse and its order.
///
/// Holds only shared references and copies of the weights, so one
/// evaluator can be used from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator<'w> {
    warehouse: &'w Warehouse,
    weights: FitnessWeights,
}

impl<'w> FitnessEvaluator<'w> {
    /// # Errors
    /// [`InvalidInput`](crate::SearchError::InvalidInput) if the weights do
    /// not validate.
    pub fn new(warehouse: &'w Warehouse, weights: FitnessWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { warehouse, weights })
    }

    pub fn warehouse(&self) -> &'w Warehouse {
        self.warehouse
    }

    pub fn weights(&self) -> &FitnessWeights {
        &self.weights
    }

    /// Number of selected PSUs.
    pub fn used_psu_count(&self, mask: &SelectionMask) -> usize {
        mask.count_selected()
    }

    /// Number of order items carried by at least one selected PSU.
    pub fn coverage(&self, mask: &SelectionMask) -> usize {
        let order_len = self.warehouse.order().len();
        if order_len == 0 {
            return 0;
        }
        let mut covered = vec![false; order_len];
        let mut count = 0;
        for i in mask.selected().filter(|&i| i < self.warehouse.psu_count()) {
            for &pos in self.warehouse.order_hits(i) {
                if !covered[pos] {
                    covered[pos] = true;
                    count += 1;
                }
            }
        }
        count
    }

    /// Whether the selected PSUs carry every order item.
    pub fn is_covering(&self, mask: &SelectionMask) -> bool {
        self.coverage(mask) == self.warehouse.order().len()
    }

    /// `1 / (1 + psu_weight * used + item_weight * carried)`, in `(0, 1]`.
    fn efficiency(&self, mask: &SelectionMask) -> f64 {
        let used = self.used_psu_count(mask) as f64;
        let carried = self.warehouse.items_carried(mask) as f64;
        1.0 / (1.0 + self.weights.psu_weight * used + self.weights.item_weight * carried)
    }

    /// Fitness of `mask`; see [`FitnessWeights`] for the formula.
    pub fn fitness(&self, mask: &SelectionMask) -> f64 {
        let efficiency = self.efficiency(mask);
        let order_len = self.warehouse.order().len();
        let covered = self.coverage(mask);

        if covered == order_len {
            return 1.0 + efficiency;
        }

        let w = self.weights.coverage_weight;
        w * (covered as f64 / order_len as f64) + (1.0 - w) * efficiency
    }
}

impl Objective for FitnessEvaluator<'_> {
    fn fitness(&self, mask: &SelectionMask) -> f64 {
        FitnessEvaluator::fitness(self, mask)
    }
}
