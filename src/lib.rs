//! Local-search PSU selection.
//!
//! Picks a subset of warehouse PSUs (portable storage units, each carrying
//! a fixed set of items) whose combined contents cover an order while
//! wasting as little capacity as possible. The search space is the set of
//! boolean selection masks over the loaded PSUs.
//!
//! - **State space** ([`state`]): random masks, single-flip neighbourhoods.
//! - **Fitness** ([`fitness`]): a score every algorithm *maximizes*. Any
//!   mask covering the order beats any mask that does not; among covering
//!   masks fewer PSUs and fewer carried items win.
//! - **Search** ([`search`]): hill climbing, first-choice hill climbing,
//!   parallel hill climbing, local beam search and simulated annealing.
//!
//! # Architecture
//!
//! The loaded PSUs and order live in an immutable [`Warehouse`] value that
//! is passed into every search. Nothing is stored in process-wide state, so
//! independent searches can run side by side. Parsing problem files and
//! displaying results are left to the caller.
//!
//! # Examples
//!
//! ```
//! use psu_search::search::{Algorithm, SearchConfig, SearchEngine};
//! use psu_search::Warehouse;
//!
//! let warehouse = Warehouse::from_item_lists(vec![vec![1], vec![2], vec![1, 2]], vec![1, 2]);
//! let engine = SearchEngine::new(&warehouse, SearchConfig::default().with_seed(7)).unwrap();
//! let report = engine.run(&Algorithm::FirstChoiceHillClimbing).unwrap();
//! assert!(engine.evaluator().is_covering(&report.outcome.mask));
//! ```

pub mod error;
pub mod fitness;
pub mod search;
pub mod state;
pub mod warehouse;

pub use error::{Result, SearchError};
pub use state::SelectionMask;
pub use warehouse::{ItemId, Order, Psu, Warehouse};
