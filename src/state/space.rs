//! Random states and single-flip neighbourhoods.

use super::mask::SelectionMask;
use crate::error::{invalid, Result};
use rand::Rng;

/// Default probability that a PSU is selected in a random state.
pub const DEFAULT_SELECTION_PROBABILITY: f64 = 0.5;

/// Generates and mutates selection masks.
///
/// Stateless apart from the selection probability; randomness is always
/// supplied by the caller so that parallel workers can own private
/// generators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateSpace {
    selection_probability: f64,
}

impl Default for StateSpace {
    fn default() -> Self {
        Self {
            selection_probability: DEFAULT_SELECTION_PROBABILITY,
        }
    }
}

impl StateSpace {
    /// Creates a state space whose random states select each PSU with
    /// probability `selection_probability`.
    ///
    /// # Errors
    /// [`InvalidInput`](crate::SearchError::InvalidInput) unless the
    /// probability lies in `[0, 1]`.
    pub fn new(selection_probability: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&selection_probability) {
            return invalid(format!(
                "selection probability must be in [0, 1], got {selection_probability}"
            ));
        }
        Ok(Self {
            selection_probability,
        })
    }

    pub fn selection_probability(&self) -> f64 {
        self.selection_probability
    }

    /// Mask of length `n`, each position independently selected.
    pub fn random_state<R: Rng>(&self, n: usize, rng: &mut R) -> SelectionMask {
        let bits = (0..n)
            .map(|_| rng.random_bool(self.selection_probability))
            .collect();
        SelectionMask::from_bits(bits)
    }

    /// All masks one flip away from `mask`, in ascending flip index.
    pub fn generate_neighbourhood(&self, mask: &SelectionMask) -> Vec<SelectionMask> {
        self.neighbours(mask).collect()
    }

    /// Lazy form of [`generate_neighbourhood`](Self::generate_neighbourhood).
    ///
    /// Yields the same sequence, but only one neighbour is materialized at
    /// a time.
    pub fn neighbours<'a>(&self, mask: &'a SelectionMask) -> Neighbours<'a> {
        Neighbours {
            base: mask,
            next: 0,
        }
    }

    /// Flips one uniformly chosen position.
    ///
    /// A zero-length mask has nothing to flip and is returned as is.
    pub fn random_neighbour<R: Rng>(&self, mask: &SelectionMask, rng: &mut R) -> SelectionMask {
        if mask.is_empty() {
            return mask.clone();
        }
        mask.flipped(rng.random_range(0..mask.len()))
    }
}

/// Iterator over the single-flip neighbourhood of a base mask.
#[derive(Debug, Clone)]
pub struct Neighbours<'a> {
    base: &'a SelectionMask,
    next: usize,
}

impl Iterator for Neighbours<'_> {
    type Item = SelectionMask;

    fn next(&mut self) -> Option<SelectionMask> {
        if self.next >= self.base.len() {
            return None;
        }
        let neighbour = self.base.flipped(self.next);
        self.next += 1;
        Some(neighbour)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.base.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Neighbours<'_> {}
