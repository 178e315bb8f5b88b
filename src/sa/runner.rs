//! SA execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use serde::Serialize;

use super::SaConfig;
use crate::error::RoutingError;
use crate::evaluation::Objective;
use crate::models::{ProblemInstance, Solution};

/// Counters collected during a Simulated Annealing run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaStats {
    /// Candidates evaluated.
    pub iterations: usize,
    /// Candidates accepted, improving or not.
    pub accepted_moves: usize,
    /// Candidates strictly better than the current solution.
    pub improving_moves: usize,
    /// Number of cooling steps applied.
    pub temperature_reductions: usize,
    /// Temperature when the loop stopped.
    pub final_temperature: f64,
    /// Times each operator was drawn, in [`NeighborhoodOperator::ALL`] order.
    ///
    /// [`NeighborhoodOperator::ALL`]: crate::neighborhood::NeighborhoodOperator::ALL
    pub operator_usage: [usize; 4],
    /// Objective score of the starting solution.
    pub initial_cost: f64,
    /// Objective score of the returned solution.
    pub best_cost: f64,
    /// Whether the run stopped on the cancel flag or the time limit.
    pub cancelled: bool,
    /// Score of the current solution after each iteration.
    pub current_cost_history: Vec<f64>,
    /// Best score after each iteration.
    pub best_cost_history: Vec<f64>,
}

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult {
    /// Best solution observed, with evaluated costs and feasibility.
    pub best: Solution,
    /// Run counters.
    pub stats: SaStats,
}

/// Runs Simulated Annealing from a given starting solution.
///
/// # Examples
///
/// ```
/// use u_vrp::constructive::greedy_nearest_neighbor;
/// use u_vrp::models::{Customer, Fleet, ProblemInstance};
/// use u_vrp::sa::{SaConfig, SaRunner};
///
/// let instance = ProblemInstance::new("sa", Customer::depot(0.0, 0.0))
///     .with_customer(Customer::new(1, 10.0, 0.0, 5))
///     .with_customer(Customer::new(2, 0.0, 10.0, 5))
///     .with_customer(Customer::new(3, -10.0, 0.0, 5))
///     .with_fleet(Fleet::homogeneous(2, 20));
/// let initial = greedy_nearest_neighbor(&instance);
///
/// let config = SaConfig::default().with_max_iterations(500);
/// let mut rng = u_numflow::random::create_rng(42);
/// let result = SaRunner::new(&instance, &config).run(&initial, &mut rng).unwrap();
/// assert!(result.best.total_cost() <= initial.total_cost() + 1e-10);
/// ```
pub struct SaRunner<'a> {
    instance: &'a ProblemInstance,
    config: &'a SaConfig,
    objective: Objective,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> SaRunner<'a> {
    /// Creates a runner minimizing total distance.
    pub fn new(instance: &'a ProblemInstance, config: &'a SaConfig) -> Self {
        Self {
            instance,
            config,
            objective: Objective::Distance,
            cancel: None,
        }
    }

    /// Sets the objective used to rank candidates.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    /// Sets a flag that stops the run at the next temperature level.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Runs the annealing loop.
    ///
    /// The returned solution never scores worse than `initial`.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::InvalidConfig`] if the configuration is invalid.
    pub fn run<R: Rng>(&self, initial: &Solution, rng: &mut R) -> Result<SaResult, RoutingError> {
        self.config.validate()?;
        let config = self.config;
        let depot = self.instance.depot();
        let deadline = config.time_limit.map(|limit| Instant::now() + limit);

        let mut current = initial.clone();
        let mut current_cost = self.objective.evaluate(self.instance, &mut current);
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut stats = SaStats {
            initial_cost: current_cost,
            ..SaStats::default()
        };
        let mut temperature = config.initial_temperature;

        while temperature > config.final_temperature && stats.iterations < config.max_iterations {
            if self.should_stop(deadline) {
                log::warn!(
                    "SA stopped early after {} iterations (T = {temperature:.3})",
                    stats.iterations
                );
                stats.cancelled = true;
                break;
            }

            for _ in 0..config.iterations_per_temperature {
                if stats.iterations >= config.max_iterations {
                    break;
                }

                let operator = config.operator_weights.select(rng);
                stats.operator_usage[operator.index()] += 1;
                let (mut candidate, _) = operator.neighbor(&current, depot, rng);
                let candidate_cost = self.objective.evaluate(self.instance, &mut candidate);

                if candidate_cost < best_cost {
                    best = candidate.clone();
                    best_cost = candidate_cost;
                }

                let delta = candidate_cost - current_cost;
                let accept = delta < 0.0 || rng.random::<f64>() < (-delta / temperature).exp();
                log::trace!(
                    "SA iter {}: {operator} delta {delta:.3} T {temperature:.3} accept {accept}",
                    stats.iterations
                );
                if accept {
                    if delta < 0.0 {
                        stats.improving_moves += 1;
                    }
                    stats.accepted_moves += 1;
                    current = candidate;
                    current_cost = candidate_cost;
                }

                stats.iterations += 1;
                stats.current_cost_history.push(current_cost);
                stats.best_cost_history.push(best_cost);
            }

            temperature *= config.cooling_rate;
            stats.temperature_reductions += 1;
            log::debug!(
                "SA cooled to T = {temperature:.3}: current {current_cost:.3}, best {best_cost:.3}"
            );
        }

        best.evaluate(self.instance);
        stats.final_temperature = temperature;
        stats.best_cost = best_cost;

        Ok(SaResult { best, stats })
    }

    fn should_stop(&self, deadline: Option<Instant>) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
            || deadline.is_some_and(|d| Instant::now() >= d)
    }
}
