//! Simulated annealing over selection masks.
//!
//! # Algorithm
//!
//! 1. Start from a random state
//! 2. Propose a random single-flip neighbour and compute
//!    `delta = (f(neighbour) - f(current)) * scale`
//! 3. Accept if `delta > 0`, otherwise with probability `exp(delta / T)`
//! 4. Every `step_delay` proposals lower `T` by `temperature_decrement`
//! 5. Stop once `T` would reach zero and return the *current* state
//!
//! The number of proposals depends only on the schedule, never on the
//! problem size. See [`AnnealingConfig::proposal_budget`].
//!
//! # References
//!
//! Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

use super::config::AnnealingConfig;
use super::types::SearchOutcome;
use crate::fitness::Objective;
use crate::state::StateSpace;
use rand::Rng;

/// Runs one annealing schedule over masks of length `n`.
pub(crate) fn simulated_annealing<O: Objective, R: Rng>(
    objective: &O,
    space: &StateSpace,
    n: usize,
    config: &AnnealingConfig,
    rng: &mut R,
) -> SearchOutcome {
    let mut current = space.random_state(n, rng);
    let mut current_fitness = objective.fitness(&current);
    let mut evaluations = 1usize;
    let mut proposals = 0usize;
    let mut accepted_moves = 0usize;

    let levels = config.temperature_levels();
    let mut fitness_history = vec![current_fitness];

    for level in 0..levels {
        // Computed from the level index so the schedule does not drift.
        let temperature = (config.initial_temperature
            - level as f64 * config.temperature_decrement)
            .max(f64::MIN_POSITIVE);

        for _ in 0..config.step_delay {
            let candidate = space.random_neighbour(&current, rng);
            let fitness = objective.fitness(&candidate);
            evaluations += 1;
            proposals += 1;

            let delta = (fitness - current_fitness) * config.scale;
            let accept = delta > 0.0 || rng.random::<f64>() < (delta / temperature).exp();

            if accept {
                current = candidate;
                current_fitness = fitness;
                accepted_moves += 1;
            }
        }

        fitness_history.push(current_fitness);
        log::trace!("annealing level {level}: T={temperature}, fitness={current_fitness}");
    }

    log::debug!(
        "annealing finished: fitness={current_fitness}, proposals={proposals}, accepted={accepted_moves}"
    );

    let mut outcome = SearchOutcome::new(current, current_fitness);
    outcome.evaluations = evaluations;
    outcome.iterations = proposals;
    outcome.accepted_moves = accepted_moves;
    outcome.fitness_history = fitness_history;
    outcome
}
