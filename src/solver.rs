//! The `solve` entry point.
//!
//! Selects an algorithm by name, builds the starting solution, runs the
//! chosen driver and reports a [`SolveStats`] record alongside the
//! [`Solution`].

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use u_numflow::random::create_rng;

use crate::constructive::ConstructionMethod;
use crate::error::RoutingError;
use crate::evaluation::Objective;
use crate::models::{ProblemInstance, Solution};
use crate::sa::{SaConfig, SaRunner, SaStats};
use crate::tabu::{TabuConfig, TabuRunner, TabuStats};

/// Algorithms reachable through [`solve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// [`SaRunner`] from the configured construction.
    SimulatedAnnealing,
    /// [`TabuRunner`] from the configured construction.
    TabuSearch,
    /// Greedy nearest neighbor only.
    Greedy,
    /// Clarke-Wright savings only.
    Savings,
}

impl Algorithm {
    /// All algorithms.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Greedy,
        Algorithm::Savings,
        Algorithm::SimulatedAnnealing,
        Algorithm::TabuSearch,
    ];

    /// The name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::SimulatedAnnealing => "simulated_annealing",
            Algorithm::TabuSearch => "tabu_search",
            Algorithm::Greedy => "greedy",
            Algorithm::Savings => "savings",
        }
    }

    /// Whether the algorithm improves a constructed solution.
    pub fn is_metaheuristic(self) -> bool {
        matches!(self, Algorithm::SimulatedAnnealing | Algorithm::TabuSearch)
    }
}

impl FromStr for Algorithm {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| RoutingError::UnknownAlgorithm { name: s.to_string() })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Options shared by every algorithm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Heuristic that seeds the metaheuristics.
    pub construction: ConstructionMethod,
    /// Score the metaheuristics minimize.
    pub objective: Objective,
    /// Random seed; `None` draws one from the thread RNG.
    pub seed: Option<u64>,
    /// Simulated Annealing settings.
    pub sa: SaConfig,
    /// Tabu Search settings.
    pub tabu: TabuConfig,
    /// Known optimal cost, for gap reporting.
    pub known_optimal: Option<f64>,
}

impl SolveOptions {
    pub fn with_construction(mut self, construction: ConstructionMethod) -> Self {
        self.construction = construction;
        self
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_sa(mut self, sa: SaConfig) -> Self {
        self.sa = sa;
        self
    }

    pub fn with_tabu(mut self, tabu: TabuConfig) -> Self {
        self.tabu = tabu;
        self
    }

    pub fn with_known_optimal(mut self, optimal: f64) -> Self {
        self.known_optimal = Some(optimal);
        self
    }
}

/// Algorithm-specific counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlgorithmStats {
    /// Construction heuristics report nothing extra.
    Construction,
    /// Counters from [`SaRunner`].
    SimulatedAnnealing(SaStats),
    /// Counters from [`TabuRunner`].
    TabuSearch(TabuStats),
}

/// Summary of one [`solve`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveStats {
    /// Algorithm that ran.
    pub algorithm: Algorithm,
    /// Wall-clock time including construction.
    pub solve_time: Duration,
    /// Total distance of the returned solution.
    pub final_cost: f64,
    /// Whether the returned solution satisfies every constraint.
    pub feasible: bool,
    /// Number of violations on the returned solution.
    pub violation_count: usize,
    /// Total distance of the starting solution, for metaheuristics.
    pub initial_cost: Option<f64>,
    /// Percentage gap to [`SolveOptions::known_optimal`].
    pub gap: Option<f64>,
    /// Driver counters.
    pub details: AlgorithmStats,
}

/// A solution with its run statistics.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// The evaluated solution.
    pub solution: Solution,
    /// Run statistics.
    pub stats: SolveStats,
}

/// Solves `instance` with the algorithm named `algorithm`.
///
/// Accepted names are `simulated_annealing`, `tabu_search`, `greedy` and
/// `savings`.
///
/// # Errors
///
/// Returns [`RoutingError::UnknownAlgorithm`] for any other name, or the
/// error from validating the instance or the selected driver's config.
///
/// # Examples
///
/// ```
/// use u_vrp::models::{Customer, Fleet, ProblemInstance};
/// use u_vrp::solver::{solve, SolveOptions};
///
/// let instance = ProblemInstance::new("demo", Customer::depot(0.0, 0.0))
///     .with_customer(Customer::new(1, 10.0, 10.0, 10))
///     .with_customer(Customer::new(2, 20.0, 0.0, 15))
///     .with_fleet(Fleet::homogeneous(2, 20));
///
/// let outcome = solve(&instance, "greedy", &SolveOptions::default()).unwrap();
/// assert!(outcome.stats.feasible);
/// assert!((outcome.stats.final_cost - 68.284).abs() < 1e-3);
///
/// assert!(solve(&instance, "genetic", &SolveOptions::default()).is_err());
/// ```
pub fn solve(
    instance: &ProblemInstance,
    algorithm: &str,
    options: &SolveOptions,
) -> Result<SolveOutcome, RoutingError> {
    solve_with_cancel(instance, algorithm, options, None)
}

/// [`solve`] with an optional cancellation flag for the metaheuristics.
///
/// Setting the flag stops the driver at its next outer iteration; the best
/// solution found so far is still returned.
pub fn solve_with_cancel(
    instance: &ProblemInstance,
    algorithm: &str,
    options: &SolveOptions,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<SolveOutcome, RoutingError> {
    let algorithm: Algorithm = algorithm.parse()?;
    instance.validate()?;
    match algorithm {
        Algorithm::SimulatedAnnealing => options.sa.validate()?,
        Algorithm::TabuSearch => options.tabu.validate()?,
        Algorithm::Greedy | Algorithm::Savings => {}
    }

    log::info!(
        "Solving '{}' with {algorithm}: {} customers, {} vehicles",
        instance.name(),
        instance.num_customers(),
        instance.fleet().vehicle_count()
    );
    let start = Instant::now();

    let (solution, initial_cost, details) = match algorithm {
        Algorithm::Greedy => (
            ConstructionMethod::Greedy.construct(instance),
            None,
            AlgorithmStats::Construction,
        ),
        Algorithm::Savings => (
            ConstructionMethod::Savings.construct(instance),
            None,
            AlgorithmStats::Construction,
        ),
        Algorithm::SimulatedAnnealing => {
            let initial = options.construction.construct(instance);
            let mut rng = create_rng(options.seed.unwrap_or_else(rand::random));
            let mut runner = SaRunner::new(instance, &options.sa).with_objective(options.objective);
            if let Some(flag) = cancel {
                runner = runner.with_cancel(flag);
            }
            let result = runner.run(&initial, &mut rng)?;
            (
                result.best,
                Some(initial.total_cost()),
                AlgorithmStats::SimulatedAnnealing(result.stats),
            )
        }
        Algorithm::TabuSearch => {
            let initial = options.construction.construct(instance);
            let mut rng = create_rng(options.seed.unwrap_or_else(rand::random));
            let mut runner =
                TabuRunner::new(instance, &options.tabu).with_objective(options.objective);
            if let Some(flag) = cancel {
                runner = runner.with_cancel(flag);
            }
            let result = runner.run(&initial, &mut rng)?;
            (
                result.best,
                Some(initial.total_cost()),
                AlgorithmStats::TabuSearch(result.stats),
            )
        }
    };

    let solve_time = start.elapsed();
    let final_cost = solution.total_cost();
    let stats = SolveStats {
        algorithm,
        solve_time,
        final_cost,
        feasible: solution.is_feasible(),
        violation_count: solution.violations().len(),
        initial_cost,
        gap: options
            .known_optimal
            .and_then(|optimal| optimality_gap(final_cost, optimal)),
        details,
    };
    log::info!(
        "{algorithm} finished in {:.3}s: cost {final_cost:.3}, feasible {}",
        solve_time.as_secs_f64(),
        stats.feasible
    );

    Ok(SolveOutcome { solution, stats })
}

/// Percentage gap `(found - optimal) / optimal × 100`.
///
/// Returns `None` when `optimal` is not positive.
///
/// # Examples
///
/// ```
/// use u_vrp::solver::optimality_gap;
///
/// assert!((optimality_gap(110.0, 100.0).unwrap() - 10.0).abs() < 1e-10);
/// assert!(optimality_gap(5.0, 0.0).is_none());
/// ```
pub fn optimality_gap(found: f64, optimal: f64) -> Option<f64> {
    (optimal > 0.0).then(|| (found - optimal) / optimal * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Fleet};

    fn setup() -> ProblemInstance {
        ProblemInstance::new("solver", Customer::depot(0.0, 0.0))
            .with_customer(Customer::new(1, 10.0, 0.0, 10))
            .with_customer(Customer::new(2, 10.0, 10.0, 10))
            .with_customer(Customer::new(3, 0.0, 10.0, 10))
            .with_customer(Customer::new(4, -10.0, 0.0, 10))
            .with_customer(Customer::new(5, 0.0, -10.0, 10))
            .with_fleet(Fleet::homogeneous(2, 30))
    }

    fn fast_options() -> SolveOptions {
        SolveOptions::default()
            .with_seed(42)
            .with_sa(SaConfig::default().with_max_iterations(300))
            .with_tabu(TabuConfig::default().with_max_iterations(30))
    }

    #[test]
    fn test_algorithm_names_round_trip() {
        for a in Algorithm::ALL {
            assert_eq!(a.name().parse::<Algorithm>().expect("known"), a);
            assert_eq!(a.to_string(), a.name());
        }
        assert!(Algorithm::TabuSearch.is_metaheuristic());
        assert!(!Algorithm::Savings.is_metaheuristic());
    }

    #[test]
    fn test_unknown_algorithm() {
        let err = solve(&setup(), "ant_colony", &SolveOptions::default()).unwrap_err();
        assert_eq!(
            err,
            RoutingError::UnknownAlgorithm {
                name: "ant_colony".into()
            }
        );
    }

    #[test]
    fn test_invalid_instance_rejected() {
        let inst = setup().with_fleet(Fleet::homogeneous(0, 30));
        let err = solve(&inst, "greedy", &SolveOptions::default()).unwrap_err();
        assert_eq!(err, RoutingError::NoVehicles);
    }

    #[test]
    fn test_invalid_driver_config_rejected() {
        let options = SolveOptions::default().with_sa(SaConfig::default().with_cooling_rate(2.0));
        assert!(matches!(
            solve(&setup(), "simulated_annealing", &options),
            Err(RoutingError::InvalidConfig(_))
        ));
        // irrelevant driver configs are not checked
        assert!(solve(&setup(), "greedy", &options).is_ok());
    }

    #[test]
    fn test_construction_stats() {
        let outcome = solve(&setup(), "savings", &SolveOptions::default()).expect("solve");
        assert_eq!(outcome.stats.algorithm, Algorithm::Savings);
        assert_eq!(outcome.stats.details, AlgorithmStats::Construction);
        assert!(outcome.stats.initial_cost.is_none());
        assert!((outcome.stats.final_cost - outcome.solution.total_cost()).abs() < 1e-10);
        assert_eq!(outcome.stats.violation_count, outcome.solution.violations().len());
    }

    #[test]
    fn test_metaheuristics_improve_or_keep() {
        for name in ["simulated_annealing", "tabu_search"] {
            let outcome = solve(&setup(), name, &fast_options()).expect("solve");
            let initial = outcome.stats.initial_cost.expect("metaheuristic");
            assert!(outcome.stats.final_cost <= initial + 1e-10);
            match (&outcome.stats.details, name) {
                (AlgorithmStats::SimulatedAnnealing(s), "simulated_annealing") => {
                    assert!(s.iterations > 0)
                }
                (AlgorithmStats::TabuSearch(_), "tabu_search") => {}
                other => panic!("unexpected details {other:?}"),
            }
        }
    }

    #[test]
    fn test_seeded_solve_is_reproducible() {
        let a = solve(&setup(), "simulated_annealing", &fast_options()).expect("solve");
        let b = solve(&setup(), "simulated_annealing", &fast_options()).expect("solve");
        assert_eq!(a.solution.routes(), b.solution.routes());
    }

    #[test]
    fn test_gap() {
        let options = SolveOptions::default().with_known_optimal(40.0);
        let outcome = solve(&setup(), "greedy", &options).expect("solve");
        let expected = (outcome.stats.final_cost - 40.0) / 40.0 * 100.0;
        assert!((outcome.stats.gap.expect("gap") - expected).abs() < 1e-10);

        let options = SolveOptions::default().with_known_optimal(0.0);
        assert!(solve(&setup(), "greedy", &options)
            .expect("solve")
            .stats
            .gap
            .is_none());
    }

    #[test]
    fn test_cancelled_solve_returns_initial() {
        let flag = Arc::new(AtomicBool::new(true));
        let outcome =
            solve_with_cancel(&setup(), "tabu_search", &fast_options(), Some(flag)).expect("solve");
        let AlgorithmStats::TabuSearch(stats) = &outcome.stats.details else {
            panic!("expected tabu stats");
        };
        assert!(stats.cancelled);
        assert!(
            (outcome.stats.final_cost - outcome.stats.initial_cost.expect("initial")).abs() < 1e-10
        );
    }
}
