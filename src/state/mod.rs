//! Search state space.
//!
//! A state is a [`SelectionMask`] over the loaded PSUs. Neighbours differ
//! in exactly one position (one PSU added or removed).

mod mask;
mod space;

pub use mask::SelectionMask;
pub use space::{Neighbours, StateSpace, DEFAULT_SELECTION_PROBABILITY};
