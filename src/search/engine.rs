//! Search entry point.
//!
//! [`SearchEngine`] binds a [`Warehouse`] to a [`SearchConfig`], validates
//! every call before any search state is created, and dispatches to the
//! five algorithms.

use super::annealing::simulated_annealing;
use super::beam::local_beam_search;
use super::climb::{hill_climb, parallel_hill_climb, ClimbMode};
use super::config::SearchConfig;
use super::types::{Algorithm, SearchOutcome, SearchReport, SearchStatistics};
use crate::error::{invalid, Result};
use crate::fitness::FitnessEvaluator;
use crate::state::{SelectionMask, StateSpace};
use crate::warehouse::Warehouse;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

/// Runs local searches against one warehouse.
///
/// # Usage
///
/// ```
/// use psu_search::search::{SearchConfig, SearchEngine};
/// use psu_search::Warehouse;
///
/// let warehouse = Warehouse::from_item_lists(vec![vec![1], vec![2], vec![1, 2]], vec![1, 2]);
/// let engine = SearchEngine::new(&warehouse, SearchConfig::default()).unwrap();
///
/// let outcome = engine.parallel_hill_climbing(warehouse.psu_count(), 4).unwrap();
/// assert_eq!(outcome.restart_fitness.len(), 4);
/// assert!(engine.parallel_hill_climbing(warehouse.psu_count(), 0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SearchEngine<'w> {
    warehouse: &'w Warehouse,
    evaluator: FitnessEvaluator<'w>,
    space: StateSpace,
    config: SearchConfig,
}

impl<'w> SearchEngine<'w> {
    /// # Errors
    /// [`InvalidInput`](crate::SearchError::InvalidInput) if `config` does
    /// not validate.
    pub fn new(warehouse: &'w Warehouse, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let evaluator = FitnessEvaluator::new(warehouse, config.weights)?;
        let space = StateSpace::new(config.selection_probability)?;
        Ok(Self {
            warehouse,
            evaluator,
            space,
            config,
        })
    }

    pub fn warehouse(&self) -> &'w Warehouse {
        self.warehouse
    }

    pub fn evaluator(&self) -> &FitnessEvaluator<'w> {
        &self.evaluator
    }

    pub fn state_space(&self) -> &StateSpace {
        &self.space
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn fitness(&self, mask: &SelectionMask) -> f64 {
        self.evaluator.fitness(mask)
    }

    pub fn used_psu_count(&self, mask: &SelectionMask) -> usize {
        self.evaluator.used_psu_count(mask)
    }

    pub fn distinct_item_count(&self, mask: &SelectionMask) -> usize {
        self.warehouse.distinct_item_count(mask)
    }

    /// Hill climbing with full left-to-right sweeps.
    pub fn hill_climbing(&self, psu_count: usize) -> Result<SearchOutcome> {
        self.check_psu_count(psu_count)?;
        Ok(hill_climb(
            &self.evaluator,
            &self.space,
            psu_count,
            ClimbMode::Sweep,
            &mut self.rng(),
        ))
    }

    /// Hill climbing that moves on the first improving neighbour.
    pub fn first_choice_hill_climbing(&self, psu_count: usize) -> Result<SearchOutcome> {
        self.check_psu_count(psu_count)?;
        Ok(hill_climb(
            &self.evaluator,
            &self.space,
            psu_count,
            ClimbMode::FirstChoice,
            &mut self.rng(),
        ))
    }

    /// `restarts` concurrent hill climbs; the fittest result wins.
    ///
    /// # Errors
    /// [`InvalidInput`](crate::SearchError::InvalidInput) if `restarts` is
    /// zero, [`ComputeFailure`](crate::SearchError::ComputeFailure) if a
    /// worker aborts.
    pub fn parallel_hill_climbing(
        &self,
        psu_count: usize,
        restarts: usize,
    ) -> Result<SearchOutcome> {
        self.check_psu_count(psu_count)?;
        check_positive("restarts", restarts)?;
        parallel_hill_climb(
            &self.evaluator,
            &self.space,
            psu_count,
            restarts,
            &mut self.rng(),
        )
    }

    /// Local beam search keeping `beam_width` masks per generation.
    pub fn local_beam_search(
        &self,
        psu_count: usize,
        beam_width: usize,
    ) -> Result<SearchOutcome> {
        self.check_psu_count(psu_count)?;
        check_positive("beam width", beam_width)?;
        Ok(local_beam_search(
            &self.evaluator,
            &self.space,
            psu_count,
            beam_width,
            &mut self.rng(),
        ))
    }

    /// Simulated annealing under the configured schedule.
    pub fn simulated_annealing(&self, psu_count: usize) -> Result<SearchOutcome> {
        self.check_psu_count(psu_count)?;
        Ok(simulated_annealing(
            &self.evaluator,
            &self.space,
            psu_count,
            &self.config.annealing,
            &mut self.rng(),
        ))
    }

    /// Runs `algorithm` over every loaded PSU and reports statistics.
    pub fn run(&self, algorithm: &Algorithm) -> Result<SearchReport> {
        let n = self.warehouse.psu_count();
        log::info!(
            "starting {algorithm} over {n} psus, order of {} items",
            self.warehouse.order().len()
        );

        let start = Instant::now();
        let outcome = match *algorithm {
            Algorithm::HillClimbing => self.hill_climbing(n),
            Algorithm::FirstChoiceHillClimbing => self.first_choice_hill_climbing(n),
            Algorithm::ParallelHillClimbing { restarts } => {
                self.parallel_hill_climbing(n, restarts)
            }
            Algorithm::LocalBeamSearch { beam_width } => self.local_beam_search(n, beam_width),
            Algorithm::SimulatedAnnealing => self.simulated_annealing(n),
        }?;
        let statistics = self.statistics(&outcome.mask, start.elapsed())?;

        log::info!(
            "{} finished in {:.2?}: {} psus, {} items carried ({} distinct), fitness {}",
            algorithm.name(),
            statistics.elapsed,
            statistics.used_psus,
            statistics.items_carried,
            statistics.distinct_items,
            statistics.fitness
        );

        Ok(SearchReport {
            algorithm: *algorithm,
            outcome,
            statistics,
        })
    }

    /// Parses `name` and `parameter` with [`Algorithm::parse`] and runs it.
    pub fn run_named(&self, name: &str, parameter: Option<i64>) -> Result<SearchReport> {
        let algorithm = Algorithm::parse(name, parameter)?;
        self.run(&algorithm)
    }

    /// Statistics of `mask` for a run that took `elapsed`.
    pub fn statistics(
        &self,
        mask: &SelectionMask,
        elapsed: Duration,
    ) -> Result<SearchStatistics> {
        self.warehouse.check_mask(mask)?;
        Ok(SearchStatistics {
            elapsed,
            used_psus: self.used_psu_count(mask),
            items_carried: self.warehouse.items_carried(mask),
            distinct_items: self.distinct_item_count(mask),
            fitness: self.fitness(mask),
        })
    }

    fn check_psu_count(&self, psu_count: usize) -> Result<()> {
        if psu_count != self.warehouse.psu_count() {
            return invalid(format!(
                "psu count {psu_count} does not match the {} loaded psus",
                self.warehouse.psu_count()
            ));
        }
        Ok(())
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        }
    }
}

fn check_positive(what: &str, value: usize) -> Result<()> {
    if value == 0 {
        return invalid(format!("{what} must be at least 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::AnnealingConfig;
    use crate::SearchError;

    const A: u32 = 10;
    const B: u32 = 20;

    /// P1 = {A}, P2 = {B}, P3 = {A, B}; order = {A, B}.
    fn scenario() -> Warehouse {
        Warehouse::from_item_lists(vec![vec![A], vec![B], vec![A, B]], vec![A, B])
    }

    fn all_algorithms() -> Vec<Algorithm> {
        vec![
            Algorithm::HillClimbing,
            Algorithm::FirstChoiceHillClimbing,
            Algorithm::ParallelHillClimbing { restarts: 4 },
            Algorithm::LocalBeamSearch { beam_width: 3 },
            Algorithm::SimulatedAnnealing,
        ]
    }

    #[test]
    fn test_every_algorithm_covers_order() {
        let wh = scenario();
        for seed in 0..5 {
            let engine = SearchEngine::new(&wh, SearchConfig::default().with_seed(seed)).unwrap();
            for alg in all_algorithms() {
                let report = engine.run(&alg).unwrap();
                let items = wh.masked_items(&report.outcome.mask);
                assert!(
                    items.contains(&A) && items.contains(&B),
                    "{alg} seed {seed} returned {}",
                    report.outcome.mask
                );
            }
        }
    }

    #[test]
    fn test_minimal_cover_scores_best() {
        let wh = scenario();
        let engine = SearchEngine::new(&wh, SearchConfig::default()).unwrap();
        let p3 = SelectionMask::from_indices(3, &[2]);
        let p1p2 = SelectionMask::from_indices(3, &[0, 1]);
        assert!(engine.fitness(&p3) >= engine.fitness(&p1p2));
        assert_eq!(engine.used_psu_count(&p3), 1);
        assert_eq!(engine.distinct_item_count(&p3), 2);
    }

    #[test]
    fn test_first_choice_returns_local_optimum() {
        let wh = Warehouse::from_item_lists(
            (0..10).map(|i| vec![i % 4, (i + 1) % 6]).collect(),
            vec![0, 1, 2, 3, 4],
        );
        for seed in 0..10 {
            let engine = SearchEngine::new(&wh, SearchConfig::default().with_seed(seed)).unwrap();
            let out = engine.first_choice_hill_climbing(10).unwrap();
            let f = engine.fitness(&out.mask);
            for neighbour in engine.state_space().neighbours(&out.mask) {
                assert!(engine.fitness(&neighbour) <= f, "seed {seed}");
            }
        }
    }

    #[test]
    fn test_zero_psus() {
        let wh = Warehouse::from_item_lists(vec![], vec![A]);
        let engine = SearchEngine::new(&wh, SearchConfig::default().with_seed(3)).unwrap();
        for alg in all_algorithms() {
            let report = engine.run(&alg).unwrap();
            assert!(report.outcome.mask.is_empty(), "{alg}");
            assert_eq!(report.statistics.used_psus, 0);
        }
    }

    #[test]
    fn test_restarts_zero_is_invalid() {
        let wh = scenario();
        let engine = SearchEngine::new(&wh, SearchConfig::default()).unwrap();
        let err = engine.parallel_hill_climbing(3, 0).unwrap_err();
        assert!(matches!(err, SearchError::InvalidInput(_)));
        let err = engine
            .run(&Algorithm::ParallelHillClimbing { restarts: 0 })
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidInput(_)));
    }

    #[test]
    fn test_beam_width_zero_is_invalid() {
        let wh = scenario();
        let engine = SearchEngine::new(&wh, SearchConfig::default()).unwrap();
        assert!(matches!(
            engine.local_beam_search(3, 0),
            Err(SearchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_psu_count_mismatch_is_invalid() {
        let wh = scenario();
        let engine = SearchEngine::new(&wh, SearchConfig::default()).unwrap();
        assert!(engine.hill_climbing(4).is_err());
        assert!(engine.simulated_annealing(2).is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let wh = scenario();
        let config =
            SearchConfig::default().with_annealing(AnnealingConfig::default().with_step_delay(0));
        assert!(SearchEngine::new(&wh, config).is_err());
    }

    #[test]
    fn test_run_named() {
        let wh = scenario();
        let engine = SearchEngine::new(&wh, SearchConfig::default().with_seed(8)).unwrap();
        let report = engine.run_named("local beam search", Some(2)).unwrap();
        assert_eq!(report.algorithm, Algorithm::LocalBeamSearch { beam_width: 2 });
        assert!(engine.run_named("local beam search", None).is_err());
        assert!(engine.run_named("genetic", None).is_err());
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let wh = Warehouse::from_item_lists(
            (0..12).map(|i| vec![i % 5, (i * 3) % 7, 9]).collect(),
            vec![0, 1, 2, 3, 4],
        );
        let engine = SearchEngine::new(&wh, SearchConfig::default().with_seed(21)).unwrap();
        for alg in all_algorithms() {
            let a = engine.run(&alg).unwrap();
            let b = engine.run(&alg).unwrap();
            assert_eq!(a.outcome.mask, b.outcome.mask, "{alg}");
        }
    }

    #[test]
    fn test_statistics() {
        let wh = scenario();
        let engine = SearchEngine::new(&wh, SearchConfig::default()).unwrap();
        let mask = SelectionMask::from_indices(3, &[0, 2]);
        let stats = engine.statistics(&mask, Duration::from_millis(5)).unwrap();
        assert_eq!(stats.used_psus, 2);
        assert_eq!(stats.items_carried, 3);
        assert_eq!(stats.distinct_items, 2);
        assert_eq!(stats.fitness, engine.fitness(&mask));
        assert!(engine
            .statistics(&SelectionMask::empty(2), Duration::ZERO)
            .is_err());
    }

    #[test]
    fn test_report_fitness_matches_mask() {
        let wh = scenario();
        let engine = SearchEngine::new(&wh, SearchConfig::default().with_seed(2)).unwrap();
        for alg in all_algorithms() {
            let report = engine.run(&alg).unwrap();
            assert_eq!(report.outcome.fitness, report.statistics.fitness, "{alg}");
        }
    }
}
