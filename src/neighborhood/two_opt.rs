//! 2-opt operator.
//!
//! # Algorithm
//!
//! Picks a random route. If it has at least four nodes, picks
//! `1 ≤ i < j ≤ len - 2` and reverses `route[i..=j]`, which replaces edges
//! `(i-1, i)` and `(j, j+1)` with `(i-1, j)` and `(i, j+1)`.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A Method for Solving Traveling-Salesman Problems",
//! *Operations Research* 6(6), 791-812.

use rand::Rng;

use super::Move;
use crate::models::RouteArena;

/// Samples a segment reversal within one random route.
///
/// Returns `None` when the chosen route has fewer than four nodes.
///
/// # Examples
///
/// ```
/// use u_vrp::models::RouteArena;
/// use u_vrp::neighborhood::{sample_two_opt, Move};
///
/// let mut routes = RouteArena::new();
/// routes.push_route(&[0, 1, 2, 0]);
///
/// let mut rng = u_numflow::random::create_rng(42);
/// let mv = sample_two_opt(&routes, &mut rng).unwrap();
/// assert_eq!(mv, Move::TwoOpt { route: 0, i: 1, j: 2 });
/// ```
pub fn sample_two_opt<R: Rng>(routes: &RouteArena, rng: &mut R) -> Option<Move> {
    if routes.is_empty() {
        return None;
    }
    let route = rng.random_range(0..routes.len());
    sample_two_opt_in(routes, route, rng)
}

/// Samples a segment reversal within route `route`.
pub fn sample_two_opt_in<R: Rng>(routes: &RouteArena, route: usize, rng: &mut R) -> Option<Move> {
    let len = routes.route(route).len();
    if len < 4 {
        return None;
    }
    let i = rng.random_range(1..=len - 3);
    let j = rng.random_range(i + 1..=len - 2);
    Some(Move::TwoOpt { route, i, j })
}
