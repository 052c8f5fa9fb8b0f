//! Fitness evaluation.
//!
//! Every search algorithm maximizes an [`Objective`]. The warehouse
//! objective, [`FitnessEvaluator`], ranks any mask that covers the order
//! above any mask that does not, and among covering masks prefers fewer
//! PSUs and fewer carried items.

mod config;
mod evaluator;
mod types;

pub use config::FitnessWeights;
pub use evaluator::FitnessEvaluator;
pub use types::Objective;
