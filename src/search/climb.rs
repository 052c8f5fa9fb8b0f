//! Hill climbing, first-choice hill climbing and parallel restarts.
//!
//! # Algorithm
//!
//! 1. Start from a random state
//! 2. Sweep the single-flip neighbourhood of the current state left to
//!    right, comparing each neighbour against a running best that starts
//!    at the current fitness
//! 3. On improvement, adopt the neighbour as the current state. Plain
//!    hill climbing keeps scanning the *same* neighbourhood, so one sweep
//!    can chain several improvements; first choice stops the sweep at once
//! 4. Repeat from the new state until a sweep finds nothing better
//!
//! Plain hill climbing is therefore neither steepest ascent nor first
//! choice: it follows the chain of successive left-to-right improvements.

use super::types::SearchOutcome;
use crate::error::{Result, SearchError};
use crate::fitness::Objective;
use crate::state::StateSpace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClimbMode {
    Sweep,
    FirstChoice,
}

/// Runs one hill climb over masks of length `n`.
pub(crate) fn hill_climb<O: Objective, R: Rng>(
    objective: &O,
    space: &StateSpace,
    n: usize,
    mode: ClimbMode,
    rng: &mut R,
) -> SearchOutcome {
    let mut current = space.random_state(n, rng);
    let mut current_fitness = objective.fitness(&current);
    let mut evaluations = 1usize;
    let mut sweeps = 0usize;
    let mut fitness_history = vec![current_fitness];

    let mut improved = true;
    while improved {
        improved = false;
        sweeps += 1;

        let base = current.clone();
        for candidate in space.neighbours(&base) {
            let fitness = objective.fitness(&candidate);
            evaluations += 1;

            if fitness > current_fitness {
                current = candidate;
                current_fitness = fitness;
                improved = true;

                if mode == ClimbMode::FirstChoice {
                    break;
                }
            }
        }

        if improved {
            fitness_history.push(current_fitness);
        }
    }

    log::debug!(
        "{mode:?} climb finished: fitness={current_fitness}, sweeps={sweeps}, evaluations={evaluations}"
    );

    let mut outcome = SearchOutcome::new(current, current_fitness);
    outcome.evaluations = evaluations;
    outcome.iterations = sweeps;
    outcome.fitness_history = fitness_history;
    outcome
}

/// Runs `restarts` plain hill climbs concurrently and keeps the fittest.
///
/// Worker seeds are drawn from `rng` up front, one per restart, so the
/// result depends only on `rng` and not on thread scheduling. Ties go to
/// the lowest worker index.
pub(crate) fn parallel_hill_climb<O: Objective, R: Rng>(
    objective: &O,
    space: &StateSpace,
    n: usize,
    restarts: usize,
    rng: &mut R,
) -> Result<SearchOutcome> {
    let seeds: Vec<u64> = (0..restarts).map(|_| rng.random()).collect();

    let results = fan_out(&seeds, |seed| {
        let mut worker_rng = StdRng::seed_from_u64(seed);
        hill_climb(objective, space, n, ClimbMode::Sweep, &mut worker_rng)
    })?;

    let restart_fitness: Vec<f64> = results.iter().map(|r| r.fitness).collect();
    let evaluations = results.iter().map(|r| r.evaluations).sum();
    let iterations = results.iter().map(|r| r.iterations).sum();

    let mut best_index = 0;
    for (i, fitness) in restart_fitness.iter().enumerate().skip(1) {
        if *fitness > restart_fitness[best_index] {
            best_index = i;
        }
    }

    let mut best = results
        .into_iter()
        .nth(best_index)
        .ok_or_else(|| SearchError::ComputeFailure("no restart produced a result".into()))?;
    best.evaluations = evaluations;
    best.iterations = iterations;
    best.restart_fitness = restart_fitness;
    Ok(best)
}

/// Runs `worker` once per seed on the rayon pool.
///
/// Each worker writes only its own slot of the result vector; the call
/// returns after every worker has finished. A panicking worker fails the
/// whole call with [`SearchError::ComputeFailure`].
pub(crate) fn fan_out<T, F>(seeds: &[u64], worker: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(u64) -> T + Sync,
{
    let slots: Vec<std::thread::Result<T>> = seeds
        .par_iter()
        .map(|&seed| panic::catch_unwind(AssertUnwindSafe(|| worker(seed))))
        .collect();

    let mut results = Vec::with_capacity(slots.len());
    for (index, slot) in slots.into_iter().enumerate() {
        match slot {
            Ok(result) => results.push(result),
            Err(payload) => {
                let reason = panic_reason(payload.as_ref());
                log::warn!("worker {index} of {} aborted: {reason}", seeds.len());
                return Err(SearchError::ComputeFailure(format!(
                    "worker {index} aborted: {reason}"
                )));
            }
        }
    }
    Ok(results)
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SelectionMask;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ---- Toy objectives ----

    /// Maximized by selecting everything.
    struct OneMax;

    impl Objective for OneMax {
        fn fitness(&self, mask: &SelectionMask) -> f64 {
            mask.count_selected() as f64
        }
    }

    /// Rewards specific positions with distinct weights.
    struct Weighted(Vec<f64>);

    impl Objective for Weighted {
        fn fitness(&self, mask: &SelectionMask) -> f64 {
            mask.selected().map(|i| self.0[i]).sum()
        }
    }

    /// Two basins: all-zero (fitness n) and all-one (fitness 2n); elsewhere
    /// the number of zeros, which pulls every climb towards all-zero.
    struct Trap;

    impl Objective for Trap {
        fn fitness(&self, mask: &SelectionMask) -> f64 {
            let ones = mask.count_selected();
            if ones == mask.len() {
                2.0 * mask.len() as f64
            } else {
                (mask.len() - ones) as f64
            }
        }
    }

    fn is_local_optimum<O: Objective>(objective: &O, mask: &SelectionMask) -> bool {
        let f = objective.fitness(mask);
        StateSpace::default()
            .neighbours(mask)
            .all(|n| objective.fitness(&n) <= f)
    }

    #[test]
    fn test_hill_climb_onemax() {
        let mut rng = StdRng::seed_from_u64(42);
        let out = hill_climb(&OneMax, &StateSpace::default(), 30, ClimbMode::Sweep, &mut rng);
        assert_eq!(out.mask.count_selected(), 30);
        assert_eq!(out.fitness, 30.0);
    }

    #[test]
    fn test_sweep_keeps_scanning_old_neighbourhood() {
        // From 000 the sweep compares flips of the old base: 100 (1.0) is
        // adopted, then 010 (3.0) replaces it, 001 (2.0) does not. The next
        // sweep starts from 010 and adopts 110 (4.0), then 011 (5.0).
        let objective = Weighted(vec![1.0, 3.0, 2.0]);
        let space = StateSpace::new(0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let out = hill_climb(&objective, &space, 3, ClimbMode::Sweep, &mut rng);
        assert_eq!(out.fitness_history, vec![0.0, 3.0, 5.0, 6.0]);
        assert_eq!(out.mask.as_slice(), &[true, true, true]);
        assert_eq!(out.iterations, 4);
        assert_eq!(out.evaluations, 1 + 4 * 3);
    }

    #[test]
    fn test_first_choice_stops_at_first_improvement() {
        let objective = Weighted(vec![1.0, 3.0, 2.0]);
        let space = StateSpace::new(0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let out = hill_climb(&objective, &space, 3, ClimbMode::FirstChoice, &mut rng);
        assert_eq!(out.fitness_history, vec![0.0, 1.0, 4.0, 6.0]);
        assert_eq!(out.mask.as_slice(), &[true, true, true]);
    }

    #[test]
    fn test_onemax_one_bit_per_sweep() {
        // Every neighbour of an all-zero base holds a single bit, so each
        // sweep can only add one bit, whichever mode is used.
        let space = StateSpace::new(0.0).unwrap();
        for mode in [ClimbMode::Sweep, ClimbMode::FirstChoice] {
            let mut rng = StdRng::seed_from_u64(1);
            let out = hill_climb(&OneMax, &space, 10, mode, &mut rng);
            assert_eq!(out.mask.count_selected(), 10);
            assert_eq!(out.iterations, 11);
            assert_eq!(out.fitness_history.len(), 11);
        }
    }

    #[test]
    fn test_first_choice_returns_local_optimum() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = hill_climb(&Trap, &StateSpace::default(), 12, ClimbMode::FirstChoice, &mut rng);
            assert!(is_local_optimum(&Trap, &out.mask), "seed {seed}: {}", out.mask);
        }
    }

    #[test]
    fn test_history_non_decreasing() {
        let mut rng = StdRng::seed_from_u64(9);
        let objective = Weighted((0..25).map(|i| (i % 7) as f64 - 3.0).collect());
        let out = hill_climb(&objective, &StateSpace::default(), 25, ClimbMode::Sweep, &mut rng);
        for w in out.fitness_history.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn test_zero_length() {
        let mut rng = StdRng::seed_from_u64(0);
        let out = hill_climb(&OneMax, &StateSpace::default(), 0, ClimbMode::Sweep, &mut rng);
        assert!(out.mask.is_empty());
        assert_eq!(out.iterations, 1);
    }

    #[test]
    fn test_parallel_best_of_restarts() {
        let mut rng = StdRng::seed_from_u64(3);
        let out = parallel_hill_climb(&Trap, &StateSpace::default(), 8, 16, &mut rng).unwrap();
        assert_eq!(out.restart_fitness.len(), 16);
        for &f in &out.restart_fitness {
            assert!(out.fitness >= f);
        }
        assert_eq!(Trap.fitness(&out.mask), out.fitness);
    }

    #[test]
    fn test_parallel_single_restart_matches_plain_climb() {
        let space = StateSpace::default();
        let mut master = StdRng::seed_from_u64(11);
        let worker_seed: u64 = master.random();
        let mut worker = StdRng::seed_from_u64(worker_seed);
        let plain = hill_climb(&Trap, &space, 15, ClimbMode::Sweep, &mut worker);

        let mut master = StdRng::seed_from_u64(11);
        let parallel = parallel_hill_climb(&Trap, &space, 15, 1, &mut master).unwrap();

        assert_eq!(parallel.mask, plain.mask);
        assert_eq!(parallel.fitness, plain.fitness);
    }

    #[test]
    fn test_parallel_reproducible_with_seed() {
        let space = StateSpace::default();
        let a = parallel_hill_climb(&Trap, &space, 10, 6, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = parallel_hill_climb(&Trap, &space, 10, 6, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a.mask, b.mask);
        assert_eq!(a.restart_fitness, b.restart_fitness);
    }

    /// Panics on its `fail_at`-th evaluation, whichever worker makes it.
    struct FailingObjective {
        calls: AtomicUsize,
        fail_at: usize,
    }

    impl Objective for FailingObjective {
        fn fitness(&self, mask: &SelectionMask) -> f64 {
            if self.calls.fetch_add(1, Ordering::SeqCst) == self.fail_at {
                panic!("evaluation failed");
            }
            mask.count_selected() as f64
        }
    }

    #[test]
    fn test_parallel_worker_failure_aborts_whole_run() {
        let objective = FailingObjective {
            calls: AtomicUsize::new(0),
            fail_at: 3,
        };
        let mut rng = StdRng::seed_from_u64(6);
        let result = parallel_hill_climb(&objective, &StateSpace::default(), 10, 8, &mut rng);
        match result {
            Err(SearchError::ComputeFailure(msg)) => assert!(msg.contains("evaluation failed")),
            Ok(outcome) => panic!("expected ComputeFailure, got a result: {}", outcome.mask),
            Err(other) => panic!("expected ComputeFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_fan_out_preserves_slot_order() {
        let seeds: Vec<u64> = (0..32).collect();
        let results = fan_out(&seeds, |seed| seed * 2).unwrap();
        assert_eq!(results, seeds.iter().map(|s| s * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_fan_out_worker_panic_is_compute_failure() {
        let seeds: Vec<u64> = (0..8).collect();
        let result = fan_out(&seeds, |seed| {
            if seed == 5 {
                panic!("worker lost");
            }
            seed
        });
        match result {
            Err(SearchError::ComputeFailure(msg)) => assert!(msg.contains("worker lost")),
            other => panic!("expected ComputeFailure, got {other:?}"),
        }
    }
}
