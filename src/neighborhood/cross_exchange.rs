//! CROSS-exchange operator.
//!
//! # Algorithm
//!
//! Picks two distinct routes, each serving at least one customer, then a
//! random contiguous interior segment in each (`1 ≤ start ≤ end ≤ len - 2`)
//! and exchanges the segments. Segment lengths may differ, so route loads
//! and lengths change.
//!
//! # Reference
//!
//! Taillard, É., Badeau, P., Gendreau, M., Guertin, F. & Potvin, J.-Y.
//! (1997). "A Tabu Search Heuristic for the Vehicle Routing Problem with
//! Soft Time Windows", *Transportation Science* 31(2), 170-186.

use rand::Rng;

use super::Move;
use crate::models::RouteArena;

/// Samples a segment exchange between two random routes.
///
/// Returns `None` when there are fewer than two routes or either chosen
/// route has no customers.
///
/// # Examples
///
/// ```
/// use u_vrp::models::RouteArena;
/// use u_vrp::neighborhood::sample_cross_exchange;
///
/// let mut routes = RouteArena::new();
/// routes.push_route(&[0, 1, 0]);
/// routes.push_route(&[0, 2, 0]);
///
/// let mut rng = u_numflow::random::create_rng(42);
/// let mv = sample_cross_exchange(&routes, &mut rng).unwrap();
/// mv.apply(&mut routes);
/// assert_eq!(routes.to_vecs().concat().iter().sum::<usize>(), 3);
/// assert_ne!(routes.route(0), &[0, 1, 0]);
/// ```
pub fn sample_cross_exchange<R: Rng>(routes: &RouteArena, rng: &mut R) -> Option<Move> {
    let n = routes.len();
    if n < 2 {
        return None;
    }
    let route_a = rng.random_range(0..n);
    let mut route_b = rng.random_range(0..n - 1);
    if route_b >= route_a {
        route_b += 1;
    }
    let len_a = routes.route(route_a).len();
    let len_b = routes.route(route_b).len();
    if len_a <= 2 || len_b <= 2 {
        return None;
    }
    let start_a = rng.random_range(1..=len_a - 2);
    let end_a = rng.random_range(start_a..=len_a - 2);
    let start_b = rng.random_range(1..=len_b - 2);
    let end_b = rng.random_range(start_b..=len_b - 2);
    Some(Move::CrossExchange {
        route_a,
        start_a,
        end_a,
        route_b,
        start_b,
        end_b,
    })
}
