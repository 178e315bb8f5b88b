//! Swap operator.
//!
//! # Algorithm
//!
//! Picks two distinct customer occurrences uniformly at random, anywhere in
//! the solution, and exchanges them. Both may lie in the same route.

use rand::Rng;

use super::{customer_positions, Move};
use crate::models::RouteArena;

/// Samples a swap of two random customer occurrences.
///
/// Returns `None` when fewer than two customers are routed.
///
/// # Examples
///
/// ```
/// use u_vrp::models::RouteArena;
/// use u_vrp::neighborhood::{sample_swap, Move};
///
/// let mut routes = RouteArena::new();
/// routes.push_route(&[0, 1, 0]);
/// routes.push_route(&[0, 2, 0]);
///
/// let mut rng = u_numflow::random::create_rng(42);
/// let mv = sample_swap(&routes, 0, &mut rng).unwrap();
/// assert!(matches!(mv, Move::Swap { .. }));
/// mv.apply(&mut routes);
/// assert_eq!(routes.route(0), &[0, 2, 0]);
/// ```
pub fn sample_swap<R: Rng>(routes: &RouteArena, depot: usize, rng: &mut R) -> Option<Move> {
    let positions = customer_positions(routes, depot);
    let n = positions.len();
    if n < 2 {
        return None;
    }
    let a = rng.random_range(0..n);
    let mut b = rng.random_range(0..n - 1);
    if b >= a {
        b += 1;
    }
    Some(swap_between(routes, positions[a], positions[b]))
}

/// The swap of the nodes at two `(route, position)` slots.
pub(crate) fn swap_between(
    routes: &RouteArena,
    (route_a, pos_a): (usize, usize),
    (route_b, pos_b): (usize, usize),
) -> Move {
    Move::Swap {
        route_a,
        pos_a,
        customer_a: routes.route(route_a)[pos_a],
        route_b,
        pos_b,
        customer_b: routes.route(route_b)[pos_b],
    }
}
