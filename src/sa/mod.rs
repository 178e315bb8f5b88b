//! Simulated Annealing over VRP solutions.
//!
//! # Algorithm
//!
//! Starting from a constructed solution, each iteration draws one
//! neighborhood operator by roulette over [`OperatorWeights`], applies it to
//! a copy of the current solution and scores the copy. Improving candidates
//! are always accepted; worsening ones with the Metropolis probability
//! `exp(-Δ/T)`. After `iterations_per_temperature` candidates the
//! temperature cools geometrically. The best candidate ever scored is kept
//! regardless of acceptance.
//!
//! # Complexity
//!
//! O(I · (n + m)) for I candidates, n nodes and m routes: each candidate
//! copies the route arena and re-evaluates its cost.
//!
//! # Reference
//!
//! Kirkpatrick, S., Gelatt, C.D. & Vecchi, M.P. (1983). "Optimization by
//! Simulated Annealing", *Science* 220(4598), 671-680.
//!
//! [`OperatorWeights`]: crate::neighborhood::OperatorWeights

mod config;
mod runner;

pub use config::SaConfig;
pub use runner::{SaResult, SaRunner, SaStats};
