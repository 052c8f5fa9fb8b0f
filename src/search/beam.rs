//! Local beam search.
//!
//! # Algorithm
//!
//! 1. Create `k` random builder masks
//! 2. Expand the neighbourhood of every builder and merge all candidates
//!    into a buffer holding the `k` fittest, best first
//! 3. If the buffer's top is not strictly fitter than the previous top,
//!    stop and return the previous top
//! 4. Otherwise the buffer becomes the next builders; go to 2

use super::types::SearchOutcome;
use crate::fitness::Objective;
use crate::state::{SelectionMask, StateSpace};
use rand::Rng;

/// Fixed-capacity buffer of masks, sorted by descending fitness.
///
/// A candidate always fills a free slot. Once full, a candidate enters
/// when its fitness is `>=` the worst entry's, evicting that entry. It is
/// placed ahead of every entry it ties with, so among equal fitness the
/// most recent candidate ranks first and the oldest is evicted first.
#[derive(Debug, Clone)]
pub(crate) struct Beam {
    entries: Vec<(SelectionMask, f64)>,
    capacity: usize,
}

impl Beam {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Offers a candidate; returns whether it was retained.
    pub(crate) fn offer(&mut self, mask: SelectionMask, fitness: f64) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.entries.len() == self.capacity {
            match self.entries.last() {
                Some(&(_, worst)) if fitness >= worst => {
                    self.entries.pop();
                }
                _ => return false,
            }
        }
        let pos = self
            .entries
            .iter()
            .position(|&(_, f)| fitness >= f)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, (mask, fitness));
        true
    }

    pub(crate) fn top_fitness(&self) -> Option<f64> {
        self.entries.first().map(|&(_, f)| f)
    }

    #[cfg(test)]
    pub(crate) fn fitnesses(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|&(_, f)| f)
    }

    pub(crate) fn into_masks(self) -> Vec<SelectionMask> {
        self.entries.into_iter().map(|(m, _)| m).collect()
    }
}

/// Runs local beam search with `beam_width` builders over masks of length `n`.
///
/// # Panics
/// Panics if `beam_width` is zero; callers validate it first.
pub(crate) fn local_beam_search<O: Objective, R: Rng>(
    objective: &O,
    space: &StateSpace,
    n: usize,
    beam_width: usize,
    rng: &mut R,
) -> SearchOutcome {
    assert!(beam_width > 0, "beam_width must be at least 1");

    let mut builders: Vec<SelectionMask> =
        (0..beam_width).map(|_| space.random_state(n, rng)).collect();
    let mut top_fitness = objective.fitness(&builders[0]);
    let mut evaluations = 1usize;
    let mut generations = 0usize;
    let mut fitness_history = vec![top_fitness];

    loop {
        generations += 1;
        let mut beam = Beam::with_capacity(beam_width);

        for builder in &builders {
            for candidate in space.neighbours(builder) {
                let fitness = objective.fitness(&candidate);
                evaluations += 1;
                beam.offer(candidate, fitness);
            }
        }

        match beam.top_fitness() {
            Some(fitness) if fitness > top_fitness => {
                log::debug!("beam generation {generations}: top fitness {fitness}");
                top_fitness = fitness;
                fitness_history.push(fitness);
                builders = beam.into_masks();
            }
            _ => break,
        }
    }

    log::debug!(
        "beam search finished: fitness={top_fitness}, generations={generations}, evaluations={evaluations}"
    );

    let mut outcome = SearchOutcome::new(builders.swap_remove(0), top_fitness);
    outcome.evaluations = evaluations;
    outcome.iterations = generations;
    outcome.fitness_history = fitness_history;
    outcome
}
