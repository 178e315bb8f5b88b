//! Neighborhood operators for local search over VRP solutions.
//!
//! Every operator samples a random [`Move`] from the current routes; the
//! move is then applied to a copy of the solution. Operators never check
//! feasibility and never update costs.
//!
//! - [`sample_swap`]: exchange two customer occurrences anywhere
//! - [`sample_relocate`]: move one customer to a random position
//! - [`sample_two_opt`]: reverse a segment within one route
//! - [`sample_cross_exchange`]: exchange segments between two routes

mod cross_exchange;
mod moves;
mod relocate;
mod swap;
mod two_opt;

pub use cross_exchange::sample_cross_exchange;
pub use moves::Move;
pub use relocate::sample_relocate;
pub use swap::sample_swap;
pub(crate) use swap::swap_between;
pub use two_opt::{sample_two_opt, sample_two_opt_in};

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::models::{RouteArena, Solution};

/// The four neighborhood operator families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborhoodOperator {
    /// Exchange two customers.
    Swap,
    /// Move one customer.
    Relocate,
    /// Reverse a segment.
    TwoOpt,
    /// Exchange segments between routes.
    CrossExchange,
}

impl NeighborhoodOperator {
    /// All operators, in roulette order.
    pub const ALL: [NeighborhoodOperator; 4] = [
        NeighborhoodOperator::Swap,
        NeighborhoodOperator::Relocate,
        NeighborhoodOperator::TwoOpt,
        NeighborhoodOperator::CrossExchange,
    ];

    /// Position in [`ALL`](Self::ALL).
    pub fn index(self) -> usize {
        match self {
            NeighborhoodOperator::Swap => 0,
            NeighborhoodOperator::Relocate => 1,
            NeighborhoodOperator::TwoOpt => 2,
            NeighborhoodOperator::CrossExchange => 3,
        }
    }

    /// Samples a move of this family, or `None` if the routes admit none.
    pub fn sample<R: Rng>(self, routes: &RouteArena, depot: usize, rng: &mut R) -> Option<Move> {
        match self {
            NeighborhoodOperator::Swap => sample_swap(routes, depot, rng),
            NeighborhoodOperator::Relocate => sample_relocate(routes, depot, rng),
            NeighborhoodOperator::TwoOpt => sample_two_opt(routes, rng),
            NeighborhoodOperator::CrossExchange => sample_cross_exchange(routes, rng),
        }
    }

    /// Copies `solution` and applies a sampled move to the copy.
    ///
    /// When no move exists the copy is returned unchanged. Cost caches of
    /// the copy are stale.
    pub fn neighbor<R: Rng>(
        self,
        solution: &Solution,
        depot: usize,
        rng: &mut R,
    ) -> (Solution, Option<Move>) {
        let mut candidate = solution.clone();
        let mv = self.sample(solution.routes(), depot, rng);
        if let Some(mv) = mv {
            mv.apply(candidate.routes_mut());
        }
        (candidate, mv)
    }
}

impl fmt::Display for NeighborhoodOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NeighborhoodOperator::Swap => "swap",
            NeighborhoodOperator::Relocate => "relocate",
            NeighborhoodOperator::TwoOpt => "two_opt",
            NeighborhoodOperator::CrossExchange => "cross_exchange",
        };
        f.write_str(s)
    }
}

/// Selection weights for the operator roulette.
///
/// Weights need not sum to one; they are normalized by their total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorWeights {
    /// Weight of [`NeighborhoodOperator::Swap`].
    pub swap: f64,
    /// Weight of [`NeighborhoodOperator::Relocate`].
    pub relocate: f64,
    /// Weight of [`NeighborhoodOperator::TwoOpt`].
    pub two_opt: f64,
    /// Weight of [`NeighborhoodOperator::CrossExchange`].
    pub cross_exchange: f64,
}

impl Default for OperatorWeights {
    fn default() -> Self {
        Self {
            swap: 0.3,
            relocate: 0.3,
            two_opt: 0.2,
            cross_exchange: 0.2,
        }
    }
}

impl OperatorWeights {
    /// Weights in [`NeighborhoodOperator::ALL`] order.
    pub fn as_array(&self) -> [f64; 4] {
        [self.swap, self.relocate, self.two_opt, self.cross_exchange]
    }

    /// Checks that weights are finite, non-negative and not all zero.
    pub fn validate(&self) -> Result<(), RoutingError> {
        let w = self.as_array();
        if w.iter().any(|x| !x.is_finite() || *x < 0.0) {
            return Err(RoutingError::InvalidConfig(
                "operator weights must be finite and non-negative".into(),
            ));
        }
        if w.iter().sum::<f64>() <= 0.0 {
            return Err(RoutingError::InvalidConfig(
                "at least one operator weight must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Draws an operator with probability proportional to its weight.
    pub fn select<R: Rng>(&self, rng: &mut R) -> NeighborhoodOperator {
        let w = self.as_array();
        let total: f64 = w.iter().sum();
        let mut r = rng.random::<f64>() * total;
        for (op, weight) in NeighborhoodOperator::ALL.into_iter().zip(w) {
            if r < weight {
                return op;
            }
            r -= weight;
        }
        // rounding can leave r at the very top of the range
        NeighborhoodOperator::ALL
            .into_iter()
            .zip(w)
            .rev()
            .find(|&(_, weight)| weight > 0.0)
            .map_or(NeighborhoodOperator::Swap, |(op, _)| op)
    }
}

/// Positions of all non-depot nodes, as `(route, position)` pairs.
pub(crate) fn customer_positions(routes: &RouteArena, depot: usize) -> Vec<(usize, usize)> {
    routes
        .iter()
        .enumerate()
        .flat_map(|(r, route)| {
            route
                .iter()
                .enumerate()
                .filter(move |&(_, &n)| n != depot)
                .map(move |(p, _)| (r, p))
        })
        .collect()
}
