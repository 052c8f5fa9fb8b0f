//! Local search over selection masks.
//!
//! Five variants share one state space and one objective:
//!
//! - **Hill climbing**: repeated left-to-right neighbourhood sweeps that
//!   adopt every improvement met along the way.
//! - **First-choice hill climbing**: moves on the first improvement.
//! - **Parallel hill climbing**: independent restarts on the rayon pool,
//!   best result wins; all-or-nothing if a worker aborts.
//! - **Local beam search**: the `k` fittest neighbours of the current `k`
//!   masks form the next generation.
//! - **Simulated annealing**: Metropolis acceptance under a linear
//!   cooling schedule with a fixed proposal budget.
//!
//! All variants maximize fitness and run until their own convergence or
//! schedule ends; there is no external iteration cap.

mod annealing;
mod beam;
mod climb;
mod config;
mod engine;
mod types;

pub use config::{AnnealingConfig, SearchConfig};
pub use engine::SearchEngine;
pub use types::{Algorithm, SearchOutcome, SearchReport, SearchStatistics};
