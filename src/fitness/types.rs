//! Core trait for scoring selection masks.

use crate::state::SelectionMask;

/// Scores a selection mask. Higher is better.
///
/// The search algorithms are written against this trait.
/// [`SearchEngine`](crate::search::SearchEngine) always drives them with
/// [`FitnessEvaluator`](super::FitnessEvaluator), the warehouse implementation.
///
/// # Examples
///
/// ```
/// use psu_search::fitness::Objective;
/// use psu_search::SelectionMask;
///
/// /// Maximizes the number of selected positions.
/// struct OneMax;
///
/// impl Objective for OneMax {
///     fn fitness(&self, mask: &SelectionMask) -> f64 {
///         mask.count_selected() as f64
///     }
/// }
///
/// assert_eq!(OneMax.fitness(&SelectionMask::from_bits(vec![true, true])), 2.0);
/// ```
pub trait Objective: Sync {
    /// Computes the fitness of `mask`. Must be finite and side-effect free.
    fn fitness(&self, mask: &SelectionMask) -> f64;
}
