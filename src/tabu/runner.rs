//! Tabu Search execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::seq::index;
use rand::Rng;
use serde::Serialize;

use super::{TabuConfig, TabuList};
use crate::error::RoutingError;
use crate::evaluation::Objective;
use crate::models::{ProblemInstance, RouteArena, Solution};
use crate::neighborhood::{
    customer_positions, sample_relocate, sample_two_opt_in, swap_between, Move,
};

/// Upper bound on 2-opt candidates drawn from a single route.
const TWO_OPT_PER_ROUTE: usize = 5;

/// Counters collected during a Tabu Search run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TabuStats {
    /// Completed iterations.
    pub iterations: usize,
    /// Candidates skipped because they matched a tabu entry.
    pub tabu_rejections: usize,
    /// Iterations whose chosen move was tabu but beat the best score.
    pub aspiration_acceptances: usize,
    /// Iteration at which the best solution was found.
    pub best_iteration: usize,
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

/// Result of a Tabu Search run.
#[derive(Debug, Clone)]
pub struct TabuResult {
    /// Best solution observed, with evaluated costs and feasibility.
    pub best: Solution,
    /// Run counters.
    pub stats: TabuStats,
}

/// Outcome of choosing among scored candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Selection {
    /// Index of the chosen candidate, if any is admissible.
    pub index: Option<usize>,
    /// Whether the chosen candidate was tabu (admitted by aspiration).
    pub aspiration: bool,
    /// Tabu candidates that did not beat the best score.
    pub rejected: usize,
}

/// Picks the lowest-scoring admissible candidate.
///
/// A candidate is admissible when it is not tabu, or when it is tabu but
/// scores strictly below `best_cost`. Ties keep the earliest candidate.
pub(crate) fn select_move(scored: &[(Move, f64)], tabu: &TabuList, best_cost: f64) -> Selection {
    let mut selection = Selection {
        index: None,
        aspiration: false,
        rejected: 0,
    };
    let mut chosen_cost = f64::INFINITY;
    for (i, (mv, cost)) in scored.iter().enumerate() {
        let is_tabu = tabu.is_tabu(mv);
        if is_tabu && *cost >= best_cost {
            selection.rejected += 1;
            continue;
        }
        if selection.index.is_none() || *cost < chosen_cost {
            selection.index = Some(i);
            selection.aspiration = is_tabu;
            chosen_cost = *cost;
        }
    }
    selection
}

/// Runs Tabu Search from a given starting solution.
///
/// Each iteration samples a bounded neighborhood of swap, relocate and
/// 2-opt moves, moves to the best admissible candidate even if it is worse
/// than the current solution, and forbids undoing that move for
/// `tabu_tenure` iterations.
///
/// # Examples
///
/// ```
/// use u_vrp::constructive::greedy_nearest_neighbor;
/// use u_vrp::models::{Customer, Fleet, ProblemInstance};
/// use u_vrp::tabu::{TabuConfig, TabuRunner};
///
/// let instance = ProblemInstance::new("tabu", Customer::depot(0.0, 0.0))
///     .with_customer(Customer::new(1, 10.0, 0.0, 5))
///     .with_customer(Customer::new(2, 0.0, 10.0, 5))
///     .with_customer(Customer::new(3, -10.0, 0.0, 5))
///     .with_fleet(Fleet::homogeneous(2, 20));
/// let initial = greedy_nearest_neighbor(&instance);
///
/// let config = TabuConfig::default().with_max_iterations(50);
/// let mut rng = u_numflow::random::create_rng(42);
/// let result = TabuRunner::new(&instance, &config).run(&initial, &mut rng).unwrap();
/// assert!(result.best.total_cost() <= initial.total_cost() + 1e-10);
/// ```
pub struct TabuRunner<'a> {
    instance: &'a ProblemInstance,
    config: &'a TabuConfig,
    objective: Objective,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> TabuRunner<'a> {
    /// Creates a runner minimizing total distance.
    pub fn new(instance: &'a ProblemInstance, config: &'a TabuConfig) -> Self {
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

    /// Sets a flag that stops the run before the next iteration.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Runs the search loop.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::InvalidConfig`] if the configuration is invalid.
    pub fn run<R: Rng>(&self, initial: &Solution, rng: &mut R) -> Result<TabuResult, RoutingError> {
        self.config.validate()?;
        let config = self.config;
        let deadline = config.time_limit.map(|limit| Instant::now() + limit);

        let mut current = initial.clone();
        let mut current_cost = self.objective.evaluate(self.instance, &mut current);
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut stats = TabuStats {
            initial_cost: current_cost,
            ..TabuStats::default()
        };
        let mut tabu = TabuList::new();
        let mut no_improvement = 0usize;

        while stats.iterations < config.max_iterations && no_improvement < config.max_no_improvement {
            if self.should_stop(deadline) {
                log::warn!("Tabu search stopped early after {} iterations", stats.iterations);
                stats.cancelled = true;
                break;
            }
            let iteration = stats.iterations;
            tabu.evict(iteration, config.tabu_tenure);

            let scored: Vec<(Move, f64)> = self
                .candidate_moves(current.routes(), rng)
                .into_iter()
                .map(|mv| {
                    let mut candidate = current.clone();
                    mv.apply(candidate.routes_mut());
                    (mv, self.objective.evaluate(self.instance, &mut candidate))
                })
                .collect();

            let selection = select_move(&scored, &tabu, best_cost);
            stats.tabu_rejections += selection.rejected;
            let Some(chosen) = selection.index else {
                log::debug!("Tabu search found no admissible move at iteration {iteration}");
                break;
            };
            let (mv, cost) = scored[chosen];
            if selection.aspiration {
                stats.aspiration_acceptances += 1;
            }
            log::trace!("Tabu iter {iteration}: {mv} -> {cost:.3}");

            mv.apply(current.routes_mut());
            current_cost = cost;

            if current_cost < best_cost {
                best = current.clone();
                best_cost = current_cost;
                stats.best_iteration = iteration;
                no_improvement = 0;
                log::debug!("Tabu iter {iteration}: new best {best_cost:.3} via {mv}");
            } else {
                no_improvement += 1;
            }

            tabu.push(mv.inverse(), iteration);
            stats.iterations += 1;
            stats.current_cost_history.push(current_cost);
            stats.best_cost_history.push(best_cost);
        }

        best.evaluate(self.instance);
        stats.best_cost = best_cost;

        Ok(TabuResult { best, stats })
    }

    /// Samples the bounded neighborhood of `routes`.
    fn candidate_moves<R: Rng>(&self, routes: &RouteArena, rng: &mut R) -> Vec<Move> {
        let depot = self.instance.depot();
        let config = self.config;
        let mut moves = Vec::with_capacity(
            config.max_swap_moves + config.max_relocate_moves + config.max_two_opt_moves,
        );

        // distinct position pairs, drawn without replacement
        let positions = customer_positions(routes, depot);
        let n = positions.len();
        let total_pairs = n * n.saturating_sub(1) / 2;
        let amount = config.max_swap_moves.min(total_pairs);
        for k in index::sample(rng, total_pairs, amount).iter() {
            let (a, b) = pair_at(n, k);
            moves.push(swap_between(routes, positions[a], positions[b]));
        }

        for _ in 0..config.max_relocate_moves {
            if let Some(mv @ Move::Relocate {
                from_route,
                from_pos,
                to_route,
                to_pos,
                ..
            }) = sample_relocate(routes, depot, rng)
            {
                if from_route != to_route || from_pos != to_pos {
                    moves.push(mv);
                }
            }
        }

        let mut two_opt = 0;
        'routes: for r in 0..routes.len() {
            let picks = TWO_OPT_PER_ROUTE.min(routes.route(r).len().saturating_sub(3));
            for _ in 0..picks {
                if two_opt >= config.max_two_opt_moves {
                    break 'routes;
                }
                if let Some(mv) = sample_two_opt_in(routes, r, rng) {
                    moves.push(mv);
                    two_opt += 1;
                }
            }
        }

        moves
    }

    fn should_stop(&self, deadline: Option<Instant>) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
            || deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Decodes the `k`-th pair `(a, b)` with `a < b < n` in row-major order.
fn pair_at(n: usize, mut k: usize) -> (usize, usize) {
    let mut a = 0;
    while k >= n - 1 - a {
        k -= n - 1 - a;
        a += 1;
    }
    (a, a + 1 + k)
}
