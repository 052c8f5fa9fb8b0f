//! Algorithm selection and search results.

use crate::error::{invalid, Result};
use crate::state::SelectionMask;
use crate::warehouse::{Psu, Warehouse};
use std::fmt;
use std::time::Duration;

/// The five local-search variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// Sweep the neighbourhood, adopting every improvement on the way.
    HillClimbing,

    /// Move to the first improving neighbour found.
    FirstChoiceHillClimbing,

    /// Independent hill-climbing restarts run concurrently.
    ParallelHillClimbing {
        /// Number of independent runs. Must be at least 1.
        restarts: usize,
    },

    /// Keep the best `beam_width` masks of each generation.
    LocalBeamSearch {
        /// Masks retained per generation. Must be at least 1.
        beam_width: usize,
    },

    /// Metropolis acceptance under a linearly falling temperature.
    SimulatedAnnealing,
}

impl Algorithm {
    /// Canonical names, in menu order.
    pub const NAMES: [&'static str; 5] = [
        "hill-climbing",
        "first-choice-hill-climbing",
        "local-beam-search",
        "parallel-hill-climbing",
        "simulated-annealing",
    ];

    /// Resolves an algorithm by name.
    ///
    /// Names are matched case-insensitively and `_` or spaces may stand in
    /// for `-`. `parameter` is the restart count or beam width; it is
    /// required by those two variants and ignored by the others.
    ///
    /// # Errors
    /// [`InvalidInput`](crate::SearchError::InvalidInput) for an unknown
    /// name or a missing or non-positive parameter.
    ///
    /// # Examples
    ///
    /// ```
    /// use psu_search::search::Algorithm;
    ///
    /// let alg = Algorithm::parse("Local beam search", Some(4)).unwrap();
    /// assert_eq!(alg, Algorithm::LocalBeamSearch { beam_width: 4 });
    /// assert!(Algorithm::parse("parallel_hill_climbing", Some(0)).is_err());
    /// ```
    pub fn parse(name: &str, parameter: Option<i64>) -> Result<Self> {
        let normalized: String = name
            .trim()
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "hill-climbing" => Ok(Algorithm::HillClimbing),
            "first-choice-hill-climbing" => Ok(Algorithm::FirstChoiceHillClimbing),
            "simulated-annealing" => Ok(Algorithm::SimulatedAnnealing),
            "parallel-hill-climbing" => Ok(Algorithm::ParallelHillClimbing {
                restarts: positive_parameter("restarts", parameter)?,
            }),
            "local-beam-search" => Ok(Algorithm::LocalBeamSearch {
                beam_width: positive_parameter("beam width", parameter)?,
            }),
            _ => invalid(format!(
                "unknown algorithm {name:?}, expected one of {:?}",
                Self::NAMES
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::HillClimbing => "hill-climbing",
            Algorithm::FirstChoiceHillClimbing => "first-choice-hill-climbing",
            Algorithm::ParallelHillClimbing { .. } => "parallel-hill-climbing",
            Algorithm::LocalBeamSearch { .. } => "local-beam-search",
            Algorithm::SimulatedAnnealing => "simulated-annealing",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::ParallelHillClimbing { restarts } => {
                write!(f, "{} (restarts={restarts})", self.name())
            }
            Algorithm::LocalBeamSearch { beam_width } => {
                write!(f, "{} (beam_width={beam_width})", self.name())
            }
            _ => f.write_str(self.name()),
        }
    }
}

fn positive_parameter(what: &str, parameter: Option<i64>) -> Result<usize> {
    match parameter {
        None => invalid(format!("{what} is required")),
        Some(p) if p <= 0 => invalid(format!("{what} must be positive, got {p}")),
        Some(p) => usize::try_from(p)
            .or_else(|_| invalid(format!("{what} {p} does not fit in usize"))),
    }
}

/// Result of one search run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchOutcome {
    /// The returned mask.
    pub mask: SelectionMask,

    /// Fitness of `mask`.
    pub fitness: f64,

    /// Fitness evaluations performed, summed over all workers.
    pub evaluations: usize,

    /// Sweeps (hill climbing), generations (beam search) or proposals
    /// (simulated annealing). Summed over restarts for parallel runs.
    pub iterations: usize,

    /// Accepted moves. Only counted by simulated annealing.
    pub accepted_moves: usize,

    /// Fitness of the current state after each improving sweep (hill
    /// climbing), the top fitness of each accepted generation (beam
    /// search), or the current fitness at the end of each temperature
    /// level (simulated annealing). The first entry is the starting state.
    pub fitness_history: Vec<f64>,

    /// Final fitness of each restart, in worker order. Only filled by
    /// parallel hill climbing.
    pub restart_fitness: Vec<f64>,
}

impl SearchOutcome {
    pub(crate) fn new(mask: SelectionMask, fitness: f64) -> Self {
        Self {
            mask,
            fitness,
            evaluations: 0,
            iterations: 0,
            accepted_moves: 0,
            fitness_history: Vec::new(),
            restart_fitness: Vec::new(),
        }
    }
}

/// Figures reported for a finished run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStatistics {
    /// Wall-clock time of the search.
    pub elapsed: Duration,

    /// Selected PSUs.
    pub used_psus: usize,

    /// Items carried, counted once per selected PSU.
    pub items_carried: usize,

    /// Distinct items carried.
    pub distinct_items: usize,

    /// Final fitness.
    pub fitness: f64,
}

/// Outcome of [`SearchEngine::run`](super::SearchEngine::run).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchReport {
    pub algorithm: Algorithm,
    pub outcome: SearchOutcome,
    pub statistics: SearchStatistics,
}

impl SearchReport {
    /// The PSUs picked by the returned mask.
    pub fn selected_psus<'w>(&self, warehouse: &'w Warehouse) -> Vec<&'w Psu> {
        warehouse.selected_psus(&self.outcome.mask).collect()
    }
}
